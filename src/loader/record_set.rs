//! Immutable, shared record collection decoded from the index document

use crate::loader::error::LoadError;
use crate::models::SearchRecord;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Decode a JSON array document element by element.
///
/// Returns the decoded items and the number of elements that were skipped
/// because they did not decode into `T`.
pub fn decode_array<T: DeserializeOwned>(
    bytes: &[u8],
    document: &str,
) -> Result<(Vec<T>, usize), LoadError> {
    let elements = match serde_json::from_slice::<Value>(bytes)? {
        Value::Array(elements) => elements,
        _ => return Err(LoadError::NotAnArray),
    };

    let mut items = Vec::with_capacity(elements.len());
    let mut malformed = 0;
    for (position, element) in elements.into_iter().enumerate() {
        match serde_json::from_value::<T>(element) {
            Ok(item) => items.push(item),
            Err(e) => {
                malformed += 1;
                tracing::warn!(document, position, error = %e, "Dropping malformed element");
            }
        }
    }
    Ok((items, malformed))
}

/// Records in producer order plus an id lookup. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct RecordSet {
    records: Arc<[SearchRecord]>,
    by_id: Arc<HashMap<u64, usize>>,
    dropped: usize,
}

impl RecordSet {
    pub fn empty() -> Self {
        Self::from_records(Vec::new())
    }

    /// Build from already decoded records; later duplicates of an id are dropped
    pub fn from_records(records: Vec<SearchRecord>) -> Self {
        Self::build(records, 0)
    }

    /// Decode an index document.
    ///
    /// The document must be a JSON array. Elements that do not decode into a
    /// [`SearchRecord`] are skipped and counted in [`RecordSet::dropped`].
    pub fn from_json(bytes: &[u8]) -> Result<Self, LoadError> {
        let (records, malformed) = decode_array::<SearchRecord>(bytes, "index")?;
        Ok(Self::build(records, malformed))
    }

    fn build(records: Vec<SearchRecord>, mut dropped: usize) -> Self {
        let mut by_id = HashMap::with_capacity(records.len());
        let mut unique = Vec::with_capacity(records.len());
        for record in records {
            if by_id.contains_key(&record.id) {
                dropped += 1;
                tracing::warn!(id = record.id, "Dropping duplicate index record");
                continue;
            }
            by_id.insert(record.id, unique.len());
            unique.push(record);
        }

        Self {
            records: Arc::from(unique),
            by_id: Arc::new(by_id),
            dropped,
        }
    }

    pub fn records(&self) -> &[SearchRecord] {
        &self.records
    }

    pub fn get(&self, id: u64) -> Option<&SearchRecord> {
        self.by_id.get(&id).map(|&index| &self.records[index])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records skipped while decoding (malformed or duplicate id)
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SearchRecord> {
        self.records.iter()
    }
}

impl Default for RecordSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a SearchRecord;
    type IntoIter = std::slice::Iter<'a, SearchRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
