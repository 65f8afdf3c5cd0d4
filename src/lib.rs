/*!
 * Livery - static catalog manifest builder
 *
 * Turns a directory of per-livery `*.meta.json` files into the single
 * `manifest.json` served from a static-pages host:
 * - Strict field validation with file and field in every error
 * - Duplicate id detection across the whole catalog
 * - Deterministic ordering by id, independent of directory order
 * - Atomic replacement of the published manifest
 *
 * Author: Shane Wall <shaneawall@gmail.com>
 */

pub mod cli_style;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;

// Re-export commonly used types
pub use config::{LogLevel, PublishConfig};
pub use error::{LiveryError, Result};
pub use livery_core_manifest::{build, BuildOptions, BuildReport, ItemRecord, Manifest};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
