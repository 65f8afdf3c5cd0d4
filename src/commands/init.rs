/*!
 * Livery Init Command - Repository Scaffolding
 *
 * Writes a `livery.toml` with the default settings and creates the metadata
 * directory it points at, so a fresh content repository can run
 * `livery build` straight away.
 */

use crate::config::{PublishConfig, DEFAULT_CONFIG_FILE};
use anyhow::{bail, Context, Result};
use console::style;
use std::fs;
use std::path::{Path, PathBuf};

/// What `init` created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitOutcome {
    pub config_path: PathBuf,
    pub created_input_dir: bool,
}

/// Scaffold a content repository rooted at `root`
pub fn run_init(root: &Path, force: bool) -> Result<InitOutcome> {
    let config_path = root.join(DEFAULT_CONFIG_FILE);
    if config_path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }

    let config = PublishConfig::default();
    config
        .to_file(&config_path)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    let input_dir = root.join(&config.input_dir);
    let created_input_dir = !input_dir.exists();
    if created_input_dir {
        fs::create_dir_all(&input_dir)
            .with_context(|| format!("Failed to create {}", input_dir.display()))?;
    }

    print_next_steps(&config);

    Ok(InitOutcome {
        config_path,
        created_input_dir,
    })
}

fn print_next_steps(config: &PublishConfig) {
    println!("\n{}", style("Livery catalog initialized").cyan().bold());
    println!(
        "  Add one {} file per livery to {}",
        style(&config.pattern).green(),
        style(config.input_dir.display()).green()
    );
    println!(
        "  Then run {} to publish {}",
        style("livery build").bold(),
        style(config.output.display()).green()
    );
}
