/*!
 * Tracing setup for the livery binary
 *
 * Diagnostics never touch stdout: either compact lines on stderr, or JSON
 * lines in the file given by `--log` / `log_file`.
 */

use std::fs::File;
use std::path::Path;
use tracing::{Level, Subscriber};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::config::PublishConfig;
use crate::error::{LiveryError, Result};

/// Install the global subscriber. `RUST_LOG` takes precedence over the config.
///
/// With `json_output` the stderr layer is left out, so stderr only ever
/// carries the single JSON failure object; `log_file` still receives logs.
pub fn init_logging(config: &PublishConfig, json_output: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(effective_level(config))))
        .map_err(|e| LiveryError::Config(format!("Failed to create log filter: {}", e)))?;

    let file_layer = match &config.log_file {
        Some(path) => Some(json_file_layer(path)?),
        None => None,
    };
    let stderr_layer = logs_to_stderr(config, json_output).then(stderr_layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| LiveryError::Config(format!("Logging already initialized: {}", e)))
}

fn effective_level(config: &PublishConfig) -> Level {
    if config.verbose {
        Level::DEBUG
    } else {
        config.log_level.to_tracing_level()
    }
}

fn logs_to_stderr(config: &PublishConfig, json_output: bool) -> bool {
    config.log_file.is_none() && !json_output
}

fn default_directives(level: Level) -> String {
    format!("livery={level},livery_core_manifest={level}")
}

fn stderr_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact()
}

fn json_file_layer<S>(log_path: &Path) -> Result<impl Layer<S>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let file = File::create(log_path).map_err(|e| {
        LiveryError::Config(format!(
            "Failed to create log file {}: {}",
            log_path.display(),
            e
        ))
    })?;

    Ok(fmt::layer()
        .with_writer(file)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(false)
        .json())
}
