//! Validation of raw metadata into Item Records
//!
//! Metadata files are first parsed into an untyped [`serde_json::Value`] and
//! then converted field by field into an [`ItemRecord`]. Nothing is coerced:
//! a value that does not have the expected shape is rejected with the name of
//! the offending field, and the first violation wins.

use crate::collect::RawRecord;
use crate::error::{Error, Result};
use crate::item::{Changelog, ChangelogEntry, DownloadLink, ItemRecord, Scalar};
use serde_json::{Map, Value};
use std::path::Path;

/// Fields every metadata file must carry, in the order they are checked
pub const REQUIRED_FIELDS: [&str; 4] = ["id", "name", "version", "download_url"];

/// Documented optional fields, in the order they are checked
pub const OPTIONAL_FIELDS: [&str; 8] = [
    "aircraft",
    "variant",
    "registration",
    "year",
    "changelog",
    "tags",
    "photos",
    "downloads",
];

/// Validate a raw record read from disk
pub fn validate(raw: &RawRecord) -> Result<ItemRecord> {
    validate_value(&raw.source, &raw.value)
}

/// Validate an untyped JSON value; `file` is only used for error reporting
pub fn validate_value(file: &Path, value: &Value) -> Result<ItemRecord> {
    let fields = value.as_object().ok_or_else(|| {
        Error::validation(
            file,
            "$root",
            format!("expected a JSON object, found {}", kind(value)),
        )
    })?;
    let check = Fields { file, fields };

    let id = check.required_string("id")?;
    let name = check.required_string("name")?;
    let version = check.required_string("version")?;
    let download_url = check.required_string("download_url")?;

    let aircraft = check.scalar("aircraft")?;
    let variant = check.scalar("variant")?;
    let registration = check.scalar("registration")?;
    let year = check.scalar("year")?;
    let changelog = check.changelog("changelog")?;
    let tags = check.string_list("tags", true)?;
    let photos = check
        .string_list("photos", false)?
        .filter(|p| !p.is_empty());
    let downloads = check.downloads("downloads")?.filter(|d| !d.is_empty());

    let extra = fields
        .iter()
        .filter(|(key, _)| !is_documented(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Ok(ItemRecord {
        id,
        name,
        version,
        download_url,
        aircraft,
        variant,
        registration,
        year,
        changelog,
        tags,
        photos,
        downloads,
        extra,
    })
}

fn is_documented(key: &str) -> bool {
    REQUIRED_FIELDS.contains(&key) || OPTIONAL_FIELDS.contains(&key)
}

/// Human name of a JSON value's type
fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

struct Fields<'a> {
    file: &'a Path,
    fields: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    fn fail(&self, field: impl Into<String>, reason: impl Into<String>) -> Error {
        Error::validation(self.file, field, reason)
    }

    /// Look up an optional field; explicit `null` counts as absent
    fn optional(&self, key: &str) -> Option<&'a Value> {
        self.fields.get(key).filter(|v| !v.is_null())
    }

    fn required_string(&self, key: &str) -> Result<String> {
        match self.fields.get(key) {
            None | Some(Value::Null) => Err(self.fail(key, "missing required field")),
            Some(Value::String(s)) if is_blank(s) => Err(self.fail(key, "must not be empty")),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Err(self.fail(
                key,
                format!("expected a string, found {}", kind(other)),
            )),
        }
    }

    fn scalar(&self, key: &str) -> Result<Option<Scalar>> {
        let Some(value) = self.optional(key) else {
            return Ok(None);
        };
        Scalar::from_value(value).map(Some).ok_or_else(|| {
            self.fail(
                key,
                format!(
                    "expected a string, number or boolean, found {}",
                    kind(value)
                ),
            )
        })
    }

    fn array(&self, key: &str) -> Result<Option<&'a Vec<Value>>> {
        match self.optional(key) {
            None => Ok(None),
            Some(Value::Array(items)) => Ok(Some(items)),
            Some(other) => Err(self.fail(
                key,
                format!("expected an array, found {}", kind(other)),
            )),
        }
    }

    /// Tags are free text and may be blank; photo URLs may not
    fn string_list(&self, key: &str, allow_blank: bool) -> Result<Option<Vec<String>>> {
        let Some(items) = self.array(key)? else {
            return Ok(None);
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::String(s) if allow_blank || !is_blank(s) => Ok(s.clone()),
                other => Err(element_error(self, key, i, other)),
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    fn downloads(&self, key: &str) -> Result<Option<Vec<DownloadLink>>> {
        let Some(items) = self.array(key)? else {
            return Ok(None);
        };
        let mut links = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let entry = item.as_object().ok_or_else(|| {
                self.fail(
                    format!("{key}[{i}]"),
                    format!("expected an object with label and url, found {}", kind(item)),
                )
            })?;
            let label = self.entry_string(entry, &format!("{key}[{i}]"), "label")?;
            let url = self.entry_string(entry, &format!("{key}[{i}]"), "url")?;
            let extra = unknown_keys(entry, &["label", "url"]);
            links.push(DownloadLink { label, url, extra });
        }
        Ok(Some(links))
    }

    fn changelog(&self, key: &str) -> Result<Option<Changelog>> {
        let Some(value) = self.optional(key) else {
            return Ok(None);
        };
        if let Some(note) = Scalar::from_value(value) {
            return Ok(Some(Changelog::Note(note)));
        }
        let Value::Array(items) = value else {
            return Err(self.fail(
                key,
                format!(
                    "expected free text or a list of release entries, found {}",
                    kind(value)
                ),
            ));
        };

        let mut entries = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let path = format!("{key}[{i}]");
            let entry = item.as_object().ok_or_else(|| {
                self.fail(
                    path.as_str(),
                    format!("expected a release entry object, found {}", kind(item)),
                )
            })?;
            let version = self.entry_string(entry, &path, "version")?;
            let date = match entry.get("date").filter(|v| !v.is_null()) {
                None => None,
                Some(Value::String(s)) => Some(s.clone()),
                Some(other) => {
                    return Err(self.fail(
                        format!("{path}.date"),
                        format!("expected a string, found {}", kind(other)),
                    ))
                }
            };
            let changes = match entry.get("changes").filter(|v| !v.is_null()) {
                None => None,
                Some(Value::Array(lines)) => Some(
                    lines
                        .iter()
                        .enumerate()
                        .map(|(j, line)| match line {
                            Value::String(s) => Ok(s.clone()),
                            other => Err(self.fail(
                                format!("{path}.changes[{j}]"),
                                format!("expected a string, found {}", kind(other)),
                            )),
                        })
                        .collect::<Result<Vec<_>>>()?,
                ),
                Some(other) => {
                    return Err(self.fail(
                        format!("{path}.changes"),
                        format!("expected an array, found {}", kind(other)),
                    ))
                }
            };
            entries.push(ChangelogEntry {
                version,
                date,
                changes,
                extra: unknown_keys(entry, &["version", "date", "changes"]),
            });
        }
        Ok(Some(Changelog::Entries(entries)))
    }

    /// A required non-empty string inside a nested object
    fn entry_string(&self, entry: &Map<String, Value>, path: &str, key: &str) -> Result<String> {
        let field = format!("{path}.{key}");
        match entry.get(key) {
            None | Some(Value::Null) => Err(self.fail(field, "missing required field")),
            Some(Value::String(s)) if is_blank(s) => Err(self.fail(field, "must not be empty")),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Err(self.fail(
                field,
                format!("expected a string, found {}", kind(other)),
            )),
        }
    }
}

/// Keys of a nested entry outside `known`, copied as written
fn unknown_keys(entry: &Map<String, Value>, known: &[&str]) -> Map<String, Value> {
    entry
        .iter()
        .filter(|(k, _)| !known.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

fn element_error(fields: &Fields<'_>, key: &str, index: usize, item: &Value) -> Error {
    let reason = match item {
        Value::String(_) => "must not be empty".to_string(),
        other => format!("expected a string, found {}", kind(other)),
    };
    fields.fail(format!("{key}[{index}]"), reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(value: Value) -> Result<ItemRecord> {
        validate_value(Path::new("test.meta.json"), &value)
    }

    fn expect_field(result: Result<ItemRecord>, expected: &str) -> String {
        match result {
            Err(Error::Validation { field, reason, .. }) => {
                assert_eq!(field, expected, "wrong field (reason: {reason})");
                reason
            }
            other => panic!("expected validation error on {expected}, got {other:?}"),
        }
    }

    fn minimal() -> Value {
        json!({
            "id": "liv1",
            "name": "Delta",
            "version": "1.0",
            "download_url": "https://x/a.zip"
        })
    }

    #[test]
    fn test_minimal_record() {
        let item = check(minimal()).unwrap();
        assert_eq!(item.id, "liv1");
        assert_eq!(item.name, "Delta");
        assert_eq!(item.version, "1.0");
        assert_eq!(item.download_url, "https://x/a.zip");
        assert!(item.tags.is_none());
        assert!(item.photos.is_none());
        assert!(item.downloads.is_none());
        assert!(item.extra.is_empty());
    }

    #[test]
    fn test_root_must_be_object() {
        let reason = expect_field(check(json!(["liv1"])), "$root");
        assert!(reason.contains("array"));
    }

    #[test]
    fn test_missing_download_url() {
        let mut value = minimal();
        value.as_object_mut().unwrap().remove("download_url");
        let reason = expect_field(check(value), "download_url");
        assert_eq!(reason, "missing required field");
    }

    #[test]
    fn test_required_fields_checked_in_order() {
        let reason = expect_field(check(json!({"name": 5})), "id");
        assert_eq!(reason, "missing required field");

        let reason = expect_field(check(json!({"id": "a", "name": 5})), "name");
        assert_eq!(reason, "expected a string, found number");
    }

    #[test]
    fn test_no_coercion_of_numeric_id() {
        let mut value = minimal();
        value["id"] = json!(42);
        let reason = expect_field(check(value), "id");
        assert!(reason.contains("number"));
    }

    #[test]
    fn test_blank_required_string_rejected() {
        let mut value = minimal();
        value["version"] = json!("   ");
        let reason = expect_field(check(value), "version");
        assert_eq!(reason, "must not be empty");
    }

    #[test]
    fn test_scalars_accept_strings_numbers_and_booleans() {
        let mut value = minimal();
        value["aircraft"] = json!("A320");
        value["year"] = json!(1998);
        value["registration"] = json!(null);
        let item = check(value).unwrap();
        assert_eq!(item.aircraft, Some(Scalar::from("A320")));
        assert_eq!(item.year, Some(Scalar::from(1998)));
        assert_eq!(item.registration, None);
    }

    #[test]
    fn test_scalar_rejects_objects() {
        let mut value = minimal();
        value["variant"] = json!({"name": "neo"});
        let reason = expect_field(check(value), "variant");
        assert!(reason.contains("object"));
    }

    #[test]
    fn test_tags_must_be_strings() {
        let mut value = minimal();
        value["tags"] = json!(["GR", 7]);
        let reason = expect_field(check(value), "tags[1]");
        assert!(reason.contains("number"));

        let mut value = minimal();
        value["tags"] = json!("GR");
        expect_field(check(value), "tags");
    }

    #[test]
    fn test_blank_tags_kept_but_blank_photos_rejected() {
        let mut value = minimal();
        value["tags"] = json!(["GR", ""]);
        let item = check(value).unwrap();
        assert_eq!(item.tags.unwrap(), ["GR".to_string(), String::new()]);

        let mut value = minimal();
        value["photos"] = json!(["https://x/1.jpg", "  "]);
        let reason = expect_field(check(value), "photos[1]");
        assert_eq!(reason, "must not be empty");
    }

    #[test]
    fn test_empty_photos_and_downloads_are_absent() {
        let mut value = minimal();
        value["photos"] = json!([]);
        value["downloads"] = json!([]);
        let item = check(value).unwrap();
        assert_eq!(item.photos, None);
        assert_eq!(item.downloads, None);
        assert_eq!(item.thumbnail(), None);
    }

    #[test]
    fn test_downloads_preserve_order_and_count() {
        let mut value = minimal();
        value["downloads"] = json!([
            {"label": "FS20", "url": "https://x/20.zip"},
            {"label": "FS24", "url": "https://x/24.zip", "size_mb": 310},
            {"label": "Extras", "url": "https://x/extra.zip"}
        ]);
        let item = check(value).unwrap();
        let downloads = item.downloads.unwrap();
        let labels: Vec<_> = downloads.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, ["FS20", "FS24", "Extras"]);
        assert_eq!(downloads[1].extra["size_mb"], 310);
    }

    #[test]
    fn test_download_entry_shape() {
        let mut value = minimal();
        value["downloads"] = json!([{"label": "FS24"}]);
        let reason = expect_field(check(value), "downloads[0].url");
        assert_eq!(reason, "missing required field");

        let mut value = minimal();
        value["downloads"] = json!(["https://x/24.zip"]);
        expect_field(check(value), "downloads[0]");
    }

    #[test]
    fn test_changelog_entries() {
        let mut value = minimal();
        value["changelog"] = json!([
            {"version": "1.1", "date": "2025-03-01", "changes": ["Fixed tail logo"]},
            {"version": "1.0"}
        ]);
        let item = check(value).unwrap();
        match item.changelog {
            Some(Changelog::Entries(entries)) => {
                assert_eq!(entries.len(), 2);
                assert_eq!(entries[0].changes.as_deref(), Some(&["Fixed tail logo".to_string()][..]));
            }
            other => panic!("unexpected changelog: {other:?}"),
        }

        let mut value = minimal();
        value["changelog"] = json!([{"version": "1.1", "changes": [1]}]);
        expect_field(check(value), "changelog[0].changes[0]");
    }

    #[test]
    fn test_changelog_entry_keeps_extra_keys() {
        let mut value = minimal();
        value["changelog"] = json!([{"version": "1.0", "author": "jane", "notes": "first"}]);
        let item = check(value).unwrap();
        let Some(Changelog::Entries(entries)) = &item.changelog else {
            panic!("unexpected changelog: {:?}", item.changelog);
        };
        assert_eq!(entries[0].extra["author"], "jane");
        assert_eq!(entries[0].extra["notes"], "first");
        assert!(!entries[0].extra.contains_key("version"));

        let written = serde_json::to_value(&item).unwrap();
        assert_eq!(written["changelog"][0]["author"], "jane");
        let back: ItemRecord = serde_json::from_value(written).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_unknown_fields_carried_through() {
        let mut value = minimal();
        value["download_fs24"] = json!("https://x/24.zip");
        value["package_folders_fs24"] = json!(["liv1-a320"]);
        let item = check(value).unwrap();
        assert_eq!(item.extra.len(), 2);
        assert_eq!(item.extra["download_fs24"], "https://x/24.zip");
    }
}
