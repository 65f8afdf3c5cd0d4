//! Core manifest data structures for livery catalogs
//!
//! Contributors describe each downloadable livery in its own `*.meta.json`
//! file. This crate turns a directory of those files into the single
//! `manifest.json` the client application downloads.
//!
//! # Key Concepts
//!
//! - **Item Record**: validated metadata for one livery package
//! - **Manifest**: every Item Record ordered by id, plus a build timestamp
//! - **Atomic write**: the manifest only becomes visible once fully written
//!
//! # Example
//!
//! ```no_run
//! use livery_core_manifest::{build, BuildOptions};
//!
//! let report = build(&BuildOptions::new("liveries", "manifest.json"))?;
//! println!("{} item(s), digest {}", report.manifest.len(), report.digest);
//! # Ok::<(), livery_core_manifest::Error>(())
//! ```

pub mod build;
pub mod collect;
pub mod error;
pub mod item;
pub mod manifest;
pub mod validate;

// Re-export main types for convenience
pub use build::{build, BuildOptions, BuildReport};
pub use collect::{
    collect, discover, read_record, CollectOptions, RawRecord, DEFAULT_MAX_FILE_BYTES,
    DEFAULT_PATTERN,
};
pub use error::{Error, Result};
pub use item::{Changelog, ChangelogEntry, DownloadLink, ItemRecord, Scalar};
pub use manifest::{assemble, write_atomic, Manifest, ValidatedRecord};
pub use validate::{validate, validate_value, OPTIONAL_FIELDS, REQUIRED_FIELDS};

/// Conventional name of the published manifest
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Conventional name of the metadata directory
pub const LIVERIES_DIR_NAME: &str = "liveries";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conventional_names() {
        assert_eq!(MANIFEST_FILE_NAME, "manifest.json");
        assert_eq!(LIVERIES_DIR_NAME, "liveries");
        assert!(glob::Pattern::new(DEFAULT_PATTERN)
            .unwrap()
            .matches("a320-delta.meta.json"));
    }
}
