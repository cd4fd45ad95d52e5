use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::models::EndpointRecord;
use crate::services::SpecNormalizer;

/// Ordering applied to a list of endpoint records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    NameAscending,
    NameDescending,
    /// Document order
    IdAscending,
    /// Records without a latency go last
    LatencyAscending,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NameAscending => "name_ascending",
            Self::NameDescending => "name_descending",
            Self::IdAscending => "id_ascending",
            Self::LatencyAscending => "latency_ascending",
        }
    }

    /// Human label, as shown in a sort picker.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NameAscending => "Name A-Z",
            Self::NameDescending => "Name Z-A",
            Self::IdAscending => "Serial Number",
            Self::LatencyAscending => "Latency",
        }
    }

    fn compare(&self, a: &EndpointRecord, b: &EndpointRecord) -> Ordering {
        match self {
            Self::NameAscending => collate(&a.name, &b.name),
            Self::NameDescending => collate(&b.name, &a.name),
            Self::IdAscending => a.id.cmp(&b.id),
            Self::LatencyAscending => match (a.latency, b.latency) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Self::NameAscending,
            Self::NameDescending,
            Self::IdAscending,
            Self::LatencyAscending,
        ]
        .into_iter()
        .find(|key| key.as_str() == s || key.label().eq_ignore_ascii_case(s))
        .ok_or_else(|| AppError::Validation(format!("Unknown sort key: {}", s)))
    }
}

/// Locale-aware string comparison.
///
/// Strings compare first on their base letters (accents and case folded
/// away), then on accents, then on case with lower case first. Byte order is
/// only the last resort, so equal strings are the only `Equal` result.
pub fn collate(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(&primary_key(b))
        .then_with(|| secondary_key(a).cmp(&secondary_key(b)))
        .then_with(|| tertiary_key(a).cmp(&tertiary_key(b)))
        .then_with(|| a.cmp(b))
}

fn primary_key(s: &str) -> Vec<char> {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn secondary_key(s: &str) -> Vec<char> {
    s.nfd().flat_map(char::to_lowercase).collect()
}

fn tertiary_key(s: &str) -> Vec<bool> {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(char::is_uppercase)
        .collect()
}

/// In-memory catalog over the records of one normalization pass.
///
/// The record list is never modified after construction; a reload builds a
/// new catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<EndpointRecord>,
    by_id: HashMap<u64, usize>,
}

impl Catalog {
    pub fn new(records: Vec<EndpointRecord>) -> Self {
        let by_id = records
            .iter()
            .enumerate()
            .map(|(index, record)| (record.id, index))
            .collect();

        Self { records, by_id }
    }

    /// Normalize a raw document and index the result.
    pub fn from_document(doc: &Value) -> AppResult<Self> {
        Ok(Self::new(SpecNormalizer::normalize(doc)?))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in catalog (document) order.
    pub fn records(&self) -> &[EndpointRecord] {
        &self.records
    }

    pub fn find_by_id(&self, id: u64) -> Option<&EndpointRecord> {
        self.by_id.get(&id).map(|&index| &self.records[index])
    }

    /// Look up by `(path, method)`, which survives reloads where ids do not.
    pub fn find_by_route(&self, path: &str, method: &str) -> Option<&EndpointRecord> {
        self.records.iter().find(|r| r.matches_route(path, method))
    }

    /// Case-insensitive substring match on the record name. An empty query
    /// returns every record. Catalog order is preserved.
    pub fn search(&self, query: &str) -> Vec<&EndpointRecord> {
        if query.is_empty() {
            return self.records.iter().collect();
        }

        let needle = query.to_lowercase();
        self.records
            .iter()
            .filter(|r| r.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Stable sort: records that compare equal keep their input order.
    pub fn sort<'a>(
        mut records: Vec<&'a EndpointRecord>,
        key: SortKey,
    ) -> Vec<&'a EndpointRecord> {
        records.sort_by(|a, b| key.compare(a, b));
        records
    }

    /// Filter by query, then sort.
    pub fn view(&self, query: &str, key: SortKey) -> Vec<&EndpointRecord> {
        Self::sort(self.search(query), key)
    }
}
