//! Read-only record store.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::catalog::{seed, Record};

/// Error type for building a store.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("catalog key {key:?} does not match record oid {oid}")]
    KeyMismatch { key: String, oid: i64 },
}

/// Immutable mapping from identifier to record.
///
/// Serializes as a plain JSON object keyed by identifier.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct RecordStore {
    records: BTreeMap<String, Record>,
}

impl RecordStore {
    /// Build a store, rejecting any key that is not the canonical decimal form
    /// of its record's `oid`.
    pub fn from_records(records: BTreeMap<String, Record>) -> Result<Self, CatalogError> {
        for (key, record) in &records {
            if *key != record.key() {
                return Err(CatalogError::KeyMismatch {
                    key: key.clone(),
                    oid: record.oid,
                });
            }
        }
        Ok(Self { records })
    }

    /// The built-in fixture catalog.
    pub fn builtin() -> Self {
        Self {
            records: seed::builtin_records(),
        }
    }

    /// Load a catalog from a JSON file shaped like the `GET /stocks` output.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)?;
        let records: BTreeMap<String, Record> = serde_json::from_str(&content)?;
        Self::from_records(records)
    }

    pub fn get(&self, oid: &str) -> Option<&Record> {
        self.records.get(oid)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_contains_fixture_ids() {
        let store = RecordStore::builtin();
        assert_eq!(store.len(), seed::BUILTIN.len());
        for id in ["9537", "221", "66", "149"] {
            assert!(store.get(id).is_some(), "missing {id}");
        }
        assert!(store.get("00000").is_none());
        assert!(store.get("").is_none());
    }

    #[test]
    fn builtin_keys_match_oids() {
        let store = RecordStore::builtin();
        for id in store.ids() {
            let record = store.get(id).unwrap();
            assert_eq!(id.parse::<i64>().unwrap(), record.oid);
        }
    }

    #[test]
    fn rejects_mismatched_key() {
        let mut records = BTreeMap::new();
        records.insert("1".to_string(), seed::fixture(2, "two"));

        let err = RecordStore::from_records(records).unwrap_err();
        assert!(matches!(err, CatalogError::KeyMismatch { oid: 2, .. }));
    }

    #[test]
    fn rejects_non_canonical_keys() {
        for key in ["0066", "+66", " 66"] {
            let mut records = BTreeMap::new();
            records.insert(key.to_string(), seed::fixture(66, "CDProject"));

            let err = RecordStore::from_records(records).unwrap_err();
            assert!(
                matches!(err, CatalogError::KeyMismatch { oid: 66, .. }),
                "accepted {key:?}"
            );
        }
    }

    #[test]
    fn loads_catalog_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let body = serde_json::json!({ "7": seed::fixture(7, "Seven") });
        write!(file, "{body}").unwrap();

        let store = RecordStore::load(file.path()).unwrap();
        assert_eq!(store.ids().collect::<Vec<_>>(), vec!["7"]);
        assert_eq!(store.get("7").unwrap().display_name, "Seven");
    }

    #[test]
    fn load_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(matches!(
            RecordStore::load(file.path()),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn serializes_as_object_keyed_by_id() {
        let value = serde_json::to_value(RecordStore::builtin()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), seed::BUILTIN.len());
        assert_eq!(object["149"]["displayName"], "Lena");
    }
}
