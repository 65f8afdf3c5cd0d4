/*!
 * Terminal presentation for the livery CLI
 *
 * Status lines go through `console`, tables through `comfy-table`. Status
 * lines for failures go to stderr so `--json` stdout stays parseable.
 */

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use console::style;
use livery_core_manifest::{BuildReport, ItemRecord, Manifest};

const MARK_OK: &str = "✓";
const MARK_FAIL: &str = "✗";
const MARK_WARN: &str = "⚠";
const MARK_NOTE: &str = "ℹ";
const MARK_HINT: &str = "→";

/// Digest characters shown in summaries
const SHORT_DIGEST_LEN: usize = 12;

fn table_with(preset: &str) -> Table {
    let mut table = Table::new();
    table
        .load_preset(preset)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Borderless two-column summary of a finished build or check
pub fn build_summary_table(report: &BuildReport) -> Table {
    let output = match &report.output {
        Some(path) => path.display().to_string(),
        None => "(check only, nothing written)".to_string(),
    };

    let mut rows = vec![
        ("Files Scanned", report.files_scanned.to_string()),
        ("Items", report.manifest.len().to_string()),
        ("Digest", short_digest(&report.digest).to_string()),
        ("Output", output),
    ];
    if let Some(at) = report.manifest.generated_at {
        rows.push(("Generated At", at.to_rfc3339()));
    }

    let mut table = table_with(presets::UTF8_NO_BORDERS);
    for (key, value) in rows {
        table.add_row(vec![
            Cell::new(key).fg(Color::Cyan),
            Cell::new(value).add_attribute(Attribute::Bold),
        ]);
    }
    table
}

/// One row per catalog item, in manifest order
pub fn item_table(manifest: &Manifest) -> Table {
    let mut table = table_with(presets::UTF8_FULL);
    table.set_header(
        ["ID", "Name", "Version", "Aircraft", "Tags", "Downloads"]
            .into_iter()
            .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
    );

    for item in &manifest.items {
        table.add_row(item_row(item));
    }
    table
}

fn item_row(item: &ItemRecord) -> Vec<Cell> {
    let aircraft = [&item.aircraft, &item.variant]
        .into_iter()
        .flatten()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    let tags = item.tags.as_deref().unwrap_or_default().join(", ");

    vec![
        Cell::new(&item.id).fg(Color::Cyan),
        Cell::new(&item.name),
        Cell::new(&item.version),
        Cell::new(aircraft),
        Cell::new(tags).fg(Color::Yellow),
        Cell::new(item.download_count()),
    ]
}

/// Leading characters of a hex digest
pub fn short_digest(digest: &str) -> &str {
    digest.get(..SHORT_DIGEST_LEN).unwrap_or(digest)
}

/// Print a failure, with a hint line when one is known
pub fn print_error(message: &str, suggestion: Option<&str>) {
    eprintln!("\n{} {}", style(format!("{MARK_FAIL} Error:")).red(), message);
    if let Some(hint) = suggestion {
        eprintln!("  {} {}", style(MARK_HINT).dim(), style(hint).dim());
    }
    eprintln!();
}

pub fn print_warning(message: &str) {
    eprintln!("{} {}", style(MARK_WARN).yellow(), style(message).yellow());
}

pub fn print_success(message: &str) {
    println!("{} {}", style(MARK_OK).green(), style(message).green());
}

pub fn print_info(message: &str) {
    println!("{} {}", style(MARK_NOTE).cyan(), message);
}
