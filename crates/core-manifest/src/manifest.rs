//! The published manifest
//!
//! A [`Manifest`] is the ordered collection of every validated Item Record,
//! plus an optional generation timestamp. It is rebuilt from scratch on every
//! run and replaces the previous output in a single atomic rename.

use crate::error::{Error, Result};
use crate::item::ItemRecord;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Aggregated catalog consumed by the client application
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Manifest {
    /// When this manifest was built (UTC)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,

    /// Items ordered by id
    pub items: Vec<ItemRecord>,
}

/// An Item Record together with the file it was read from
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRecord {
    pub source: PathBuf,
    pub item: ItemRecord,
}

/// Order records by id and reject duplicate ids
///
/// The result does not depend on the order of `records`. When several files
/// share an id, the error names all of them.
pub fn assemble(records: Vec<ValidatedRecord>) -> Result<Manifest> {
    let mut by_id: BTreeMap<String, Vec<ValidatedRecord>> = BTreeMap::new();
    for record in records {
        by_id.entry(record.item.id.clone()).or_default().push(record);
    }

    let mut items = Vec::with_capacity(by_id.len());
    for (id, mut group) in by_id {
        if group.len() > 1 {
            let mut files: Vec<PathBuf> = group.into_iter().map(|r| r.source).collect();
            files.sort();
            return Err(Error::DuplicateId { id, files });
        }
        if let Some(record) = group.pop() {
            items.push(record.item);
        }
    }

    Ok(Manifest::new(items))
}

impl Manifest {
    /// Create an unstamped manifest from already-ordered items
    pub fn new(items: Vec<ItemRecord>) -> Self {
        Self {
            generated_at: None,
            items,
        }
    }

    /// Stamp the manifest with a build time (whole seconds)
    pub fn with_generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at.trunc_subsecs(0));
        self
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an item by id. Does not assume order, since a loaded manifest may be hand-edited.
    pub fn get(&self, id: &str) -> Option<&ItemRecord> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Canonical text form: pretty JSON with a trailing newline
    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    /// BLAKE3 digest of the item list, independent of `generated_at`
    pub fn digest(&self) -> Result<String> {
        let bytes = serde_json::to_vec(&self.items)?;
        Ok(blake3::hash(&bytes).to_hex().to_string())
    }

    /// Atomically replace `path` with this manifest
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = self.to_json()?;
        write_atomic(path.as_ref(), json.as_bytes())
    }

    /// Load a previously written manifest
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let manifest: Manifest =
            serde_json::from_str(&contents).map_err(|e| Error::parse(path, &e))?;
        Ok(manifest)
    }
}

/// Write `contents` to a temporary file beside `path`, then rename it into place
///
/// The temporary file is removed if anything fails before the rename, so the
/// previous contents of `path` stay visible until the new ones are complete.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| Error::io(parent, e))?;
    temp.write_all(contents)
        .map_err(|e| Error::io(temp.path(), e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| Error::io(temp.path(), e))?;

    // NamedTempFile is created 0600; the published file must be world-readable
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))
            .map_err(|e| Error::io(temp.path(), e))?;
    }

    debug!("Renaming {:?} over {:?}", temp.path(), path);
    temp.persist(path).map_err(|e| Error::io(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn record(id: &str, file: &str) -> ValidatedRecord {
        ValidatedRecord {
            source: PathBuf::from(file),
            item: ItemRecord::new(id, format!("Livery {id}"), "1.0", format!("https://x/{id}.zip")),
        }
    }

    #[test]
    fn test_assemble_sorts_by_id() {
        let manifest = assemble(vec![
            record("liv3", "c.meta.json"),
            record("liv1", "z.meta.json"),
            record("liv2", "a.meta.json"),
        ])
        .unwrap();
        let ids: Vec<_> = manifest.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["liv1", "liv2", "liv3"]);
        assert_eq!(manifest.generated_at, None);
    }

    #[test]
    fn test_assemble_rejects_duplicates() {
        let err = assemble(vec![
            record("liv1", "b.meta.json"),
            record("liv2", "c.meta.json"),
            record("liv1", "a.meta.json"),
        ])
        .unwrap_err();
        match err {
            Error::DuplicateId { id, files } => {
                assert_eq!(id, "liv1");
                assert_eq!(files, [PathBuf::from("a.meta.json"), PathBuf::from("b.meta.json")]);
            }
            other => panic!("expected duplicate id, got {other:?}"),
        }
    }

    #[test]
    fn test_assemble_empty() {
        let manifest = assemble(Vec::new()).unwrap();
        assert!(manifest.is_empty());
        assert_eq!(manifest.to_json().unwrap(), "{\n  \"items\": []\n}\n");
    }

    #[test]
    fn test_get_by_id() {
        let manifest = assemble(vec![record("b", "b.json"), record("a", "a.json")]).unwrap();
        assert_eq!(manifest.get("b").map(|i| i.name.as_str()), Some("Livery b"));
        assert!(manifest.get("c").is_none());

        let unsorted = Manifest::new(vec![
            ItemRecord::new("z", "Z", "1", "https://x/z"),
            ItemRecord::new("a", "A", "1", "https://x/a"),
        ]);
        assert_eq!(unsorted.get("a").map(|i| i.name.as_str()), Some("A"));
    }

    #[test]
    fn test_digest_ignores_timestamp() {
        let manifest = assemble(vec![record("liv1", "a.json")]).unwrap();
        let stamped = manifest
            .clone()
            .with_generated_at(Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap());
        assert_eq!(manifest.digest().unwrap(), stamped.digest().unwrap());
        assert_eq!(manifest.digest().unwrap().len(), 64);

        let other = assemble(vec![record("liv2", "a.json")]).unwrap();
        assert_ne!(manifest.digest().unwrap(), other.digest().unwrap());
    }

    #[test]
    fn test_timestamp_serialized_as_rfc3339() {
        let manifest = Manifest::new(Vec::new())
            .with_generated_at(Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap());
        let json = manifest.to_json().unwrap();
        assert!(json.contains("\"generated_at\": \"2026-10-19T12:00:00Z\""));
    }

    #[test]
    fn test_write_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        let manifest = assemble(vec![record("liv1", "a.json"), record("liv2", "b.json")])
            .unwrap()
            .with_generated_at(Utc::now());

        manifest.write(&path).unwrap();
        let loaded = Manifest::load(&path).unwrap();
        assert_eq!(loaded, manifest);

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .filter(|name| name != "manifest.json")
            .collect();
        assert!(leftovers.is_empty(), "temp files left behind: {leftovers:?}");
    }

    #[test]
    fn test_write_replaces_previous_output() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        fs::write(&path, "old").unwrap();

        Manifest::new(Vec::new()).write(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\n  \"items\": []\n}\n");
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("manifest.json");
        let err = Manifest::new(Vec::new()).write(&path).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        assert!(!path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_written_manifest_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        Manifest::new(Vec::new()).write(&path).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn test_load_malformed_manifest() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        fs::write(&path, "{\"items\": [}").unwrap();
        assert!(matches!(Manifest::load(&path), Err(Error::Parse { .. })));
    }
}
