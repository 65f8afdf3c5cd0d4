//! End-to-end manifest build
//!
//! `collect -> validate -> assemble -> write`, fail-closed: if any metadata
//! file is rejected nothing is written and the previous manifest stays in
//! place. Every rejected file is logged so a contributor sees all problems in
//! one run, and the first one (in file-name order) is returned.

use crate::collect::{discover, read_record, CollectOptions};
use crate::error::{Error, Result};
use crate::manifest::{assemble, Manifest, ValidatedRecord};
use crate::validate::validate;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Inputs for one build
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Directory holding the metadata files
    pub input_dir: PathBuf,

    /// Where to write the manifest; `None` validates without writing
    pub output: Option<PathBuf>,

    /// File discovery settings
    pub collect: CollectOptions,

    /// Record `generated_at` in the manifest
    pub stamp_time: bool,
}

impl BuildOptions {
    /// Build from `input_dir` into `output` with default settings
    pub fn new(input_dir: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output: Some(output.into()),
            collect: CollectOptions::default(),
            stamp_time: true,
        }
    }

    /// Validate `input_dir` only
    pub fn check(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output: None,
            collect: CollectOptions::default(),
            stamp_time: false,
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.collect.pattern = pattern.into();
        self
    }

    pub fn with_stamp_time(mut self, stamp_time: bool) -> Self {
        self.stamp_time = stamp_time;
        self
    }
}

/// Outcome of a successful build
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Metadata files read
    pub files_scanned: usize,

    /// Where the manifest was written, if it was
    pub output: Option<PathBuf>,

    /// BLAKE3 digest of the item list
    pub digest: String,

    /// The assembled manifest
    pub manifest: Manifest,
}

/// Run a full build
pub fn build(options: &BuildOptions) -> Result<BuildReport> {
    info!("Building manifest from {:?}", options.input_dir);

    let paths = discover(&options.input_dir, &options.collect.pattern)?;
    let records = validate_all(&paths, options.collect.max_file_bytes)?;

    let mut manifest = assemble(records)?;
    if options.stamp_time {
        manifest = manifest.with_generated_at(Utc::now());
    }
    let digest = manifest.digest()?;

    if let Some(output) = &options.output {
        manifest.write(output)?;
        info!(
            "Wrote {:?} with {} item(s) (digest {})",
            output,
            manifest.len(),
            &digest[..12]
        );
    } else {
        info!(
            "Check passed: {} item(s) (digest {})",
            manifest.len(),
            &digest[..12]
        );
    }

    Ok(BuildReport {
        files_scanned: paths.len(),
        output: options.output.clone(),
        digest,
        manifest,
    })
}

/// Read and validate every file, logging each failure before returning the first
fn validate_all(paths: &[PathBuf], max_file_bytes: u64) -> Result<Vec<ValidatedRecord>> {
    let mut records = Vec::with_capacity(paths.len());
    let mut failures: Vec<Error> = Vec::new();

    for path in paths {
        match load_one(path, max_file_bytes) {
            Ok(record) => records.push(record),
            Err(e) => {
                error!("{}", e);
                failures.push(e);
            }
        }
    }

    if failures.is_empty() {
        return Ok(records);
    }

    error!(
        "Rejected {} of {} metadata file(s); manifest not written",
        failures.len(),
        paths.len()
    );
    Err(failures.remove(0))
}

fn load_one(path: &Path, max_file_bytes: u64) -> Result<ValidatedRecord> {
    let raw = read_record(path, max_file_bytes)?;
    let item = validate(&raw)?;
    Ok(ValidatedRecord {
        source: raw.source,
        item,
    })
}
