//! Discovery and parsing of metadata files
//!
//! Only the top level of the input directory is scanned. The order in which
//! the filesystem hands back entries is platform-dependent, so discovered paths
//! are sorted before anything else looks at them.

use crate::error::{Error, Result};
use glob::Pattern;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default naming convention for metadata files
pub const DEFAULT_PATTERN: &str = "*.meta.json";

/// Default upper bound on a single metadata file (1 MiB)
pub const DEFAULT_MAX_FILE_BYTES: u64 = 1024 * 1024;

/// An untyped metadata document and the file it came from
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub source: PathBuf,
    pub value: Value,
}

/// How metadata files are located and read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectOptions {
    /// File-name glob marking a file as item metadata
    pub pattern: String,

    /// Files larger than this are rejected
    pub max_file_bytes: u64,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.to_string(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

/// Read and parse every metadata file in `dir`
///
/// Fails on the first unreadable or malformed file.
pub fn collect(dir: &Path, options: &CollectOptions) -> Result<Vec<RawRecord>> {
    let records = discover(dir, &options.pattern)?
        .iter()
        .map(|path| read_record(path, options.max_file_bytes))
        .collect::<Result<Vec<_>>>()?;

    info!("Collected {} metadata file(s) from {:?}", records.len(), dir);
    Ok(records)
}

/// List the metadata files in `dir`, sorted by path
pub fn discover(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let matcher = Pattern::new(pattern).map_err(|e| Error::Pattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    let mut paths = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();

        // Lossy, so a name that is not UTF-8 is still matched and never dropped
        let name = entry.file_name().to_string_lossy().into_owned();

        if is_ignored(&name) || !matcher.matches(&name) {
            continue;
        }

        // Follows symlinks, so a linked metadata file still counts
        let metadata = fs::metadata(&path).map_err(|e| Error::io(&path, e))?;
        if !metadata.is_file() {
            debug!("Skipping non-file entry {:?}", path);
            continue;
        }

        paths.push(path);
    }

    paths.sort();
    debug!("Discovered {} file(s) matching {:?} in {:?}", paths.len(), pattern, dir);
    Ok(paths)
}

/// Read one metadata file into an untyped JSON value
pub fn read_record(path: &Path, max_file_bytes: u64) -> Result<RawRecord> {
    let metadata = fs::metadata(path).map_err(|e| Error::io(path, e))?;
    if metadata.len() > max_file_bytes {
        return Err(Error::io(
            path,
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "file is {} bytes, limit is {} bytes",
                    metadata.len(),
                    max_file_bytes
                ),
            ),
        ));
    }

    // Raw bytes: invalid UTF-8 is a JSON syntax error, not an I/O failure
    let content = fs::read(path).map_err(|e| Error::io(path, e))?;
    let value: Value = serde_json::from_slice(&content).map_err(|e| Error::parse(path, &e))?;

    Ok(RawRecord {
        source: path.to_path_buf(),
        value,
    })
}

/// Dotfiles and editor leftovers never count as metadata
fn is_ignored(name: &str) -> bool {
    name.starts_with('.') || name.ends_with(".tmp") || name.ends_with(".swp")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = tempdir().unwrap();
        for name in ["b.meta.json", "a.meta.json", "readme.md", ".hidden.meta.json", "c.json"] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }
        fs::create_dir(dir.path().join("nested.meta.json")).unwrap();

        let found = discover(dir.path(), DEFAULT_PATTERN).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, ["a.meta.json", "b.meta.json"]);
    }

    #[test]
    fn test_discover_custom_pattern() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("one.livery.json"), "{}").unwrap();
        fs::write(dir.path().join("two.meta.json"), "{}").unwrap();

        let found = discover(dir.path(), "*.livery.json").unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("one.livery.json"));
    }

    #[test]
    fn test_invalid_pattern() {
        let dir = tempdir().unwrap();
        let err = discover(dir.path(), "[").unwrap_err();
        assert!(matches!(err, Error::Pattern { .. }));
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let dir = tempdir().unwrap();
        let err = discover(&dir.path().join("liveries"), DEFAULT_PATTERN).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_read_record_parse_error_has_position() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.meta.json");
        fs::write(&path, "{\n  \"id\": \"liv1\",\n  oops\n}").unwrap();

        match read_record(&path, DEFAULT_MAX_FILE_BYTES).unwrap_err() {
            Error::Parse { file, line, .. } => {
                assert_eq!(file, path);
                assert_eq!(line, 3);
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_read_record_invalid_utf8_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin1.meta.json");
        fs::write(&path, b"{\n  \"name\": \"Aegean \xff\"\n}").unwrap();

        let err = read_record(&path, DEFAULT_MAX_FILE_BYTES).unwrap_err();
        match &err {
            Error::Parse { file, line, .. } => {
                assert_eq!(file, &path);
                assert_eq!(*line, 2);
            }
            other => panic!("expected parse error, got {other:?}"),
        }
        assert!(err.is_content_error());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_discover_keeps_non_utf8_file_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.meta.json"), "{}").unwrap();
        let odd = dir.path().join(OsStr::from_bytes(b"b\xff.meta.json"));
        fs::write(&odd, "{}").unwrap();

        let found = discover(dir.path(), DEFAULT_PATTERN).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[1], odd);
    }

    #[test]
    fn test_read_record_size_limit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("big.meta.json");
        fs::write(&path, format!("{{\"pad\": \"{}\"}}", "x".repeat(64))).unwrap();

        let err = read_record(&path, 16).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().contains("limit is 16 bytes"));
    }

    #[test]
    fn test_collect_empty_directory() {
        let dir = tempdir().unwrap();
        let records = collect(dir.path(), &CollectOptions::default()).unwrap();
        assert!(records.is_empty());
    }
}
