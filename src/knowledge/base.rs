use std::path::Path;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::KnowledgeBaseError;
use crate::models::{IngredientRecord, RiskLevel};
use crate::normalizer::{canonical_e_number, fold};

/// Folded comparison keys of one well-formed record, computed once per snapshot.
#[derive(Debug, Clone)]
pub struct MatchKeys {
    pub name: String,
    pub alternatives: Vec<String>,
    pub e_number: Option<String>,
}

impl MatchKeys {
    fn of(record: &IngredientRecord) -> Self {
        Self {
            name: fold(&record.name),
            alternatives: record
                .alternative_names
                .iter()
                .map(|alt| fold(alt))
                .filter(|alt| !alt.is_empty())
                .collect(),
            e_number: record
                .e_number
                .as_deref()
                .map(|e| fold(&canonical_e_number(e)))
                .filter(|e| !e.is_empty()),
        }
    }
}

/// An immutable, ordered ingredient table.
///
/// Table order is significant: every tie in matching and categorization is broken by
/// position. Malformed records stay in the table (they still show up when browsing) but
/// have no match keys and are never matched.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    records: Vec<IngredientRecord>,
    keys: Vec<Option<MatchKeys>>,
}

impl KnowledgeBase {
    pub fn from_records(records: Vec<IngredientRecord>) -> Self {
        let keys = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                // A name of nothing but combining marks folds to "" and would contain-match anything.
                let keys = record
                    .is_well_formed()
                    .then(|| MatchKeys::of(record))
                    .filter(|keys| !keys.name.is_empty());
                if keys.is_none() {
                    warn!(
                        index,
                        id = %record.id,
                        name = %record.name,
                        "skipping malformed ingredient record (blank name or missing risk level)"
                    );
                }
                keys
            })
            .collect();

        Self { records, keys }
    }

    /// Parse a JSON knowledge base: a bare array of records, or an object whose `data`
    /// field is that array. Elements that are not record-shaped are skipped with a warning.
    pub fn from_json_str(content: &str) -> Result<Self, KnowledgeBaseError> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_json_value(value)
    }

    pub fn from_json_value(value: Value) -> Result<Self, KnowledgeBaseError> {
        let items = match value {
            Value::Array(items) => items,
            Value::Object(mut map) => match map.remove("data") {
                Some(Value::Array(items)) => items,
                Some(other) => return Err(KnowledgeBaseError::NotASequence(kind_of(&other))),
                None => return Err(KnowledgeBaseError::NotASequence("object without `data`")),
            },
            other => return Err(KnowledgeBaseError::NotASequence(kind_of(&other))),
        };

        let records = items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value(item) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(index, error = %e, "skipping unreadable ingredient entry");
                    None
                }
            })
            .collect::<Vec<IngredientRecord>>();

        debug!(count = records.len(), "parsed ingredient records");
        Ok(Self::from_records(records))
    }

    pub fn load(path: &Path) -> Result<Self, KnowledgeBaseError> {
        let content = std::fs::read_to_string(path).map_err(|source| KnowledgeBaseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Append another table after this one, preserving both orders.
    pub fn merge(self, other: KnowledgeBase) -> Self {
        let mut records = self.records;
        let mut keys = self.keys;
        records.extend(other.records);
        keys.extend(other.keys);
        Self { records, keys }
    }

    pub fn records(&self) -> &[IngredientRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records excluded from matching.
    pub fn malformed_count(&self) -> usize {
        self.keys.iter().filter(|k| k.is_none()).count()
    }

    /// Well-formed records with their match keys, in table order.
    pub fn matchable(&self) -> impl Iterator<Item = (&IngredientRecord, &MatchKeys)> {
        self.records
            .iter()
            .zip(&self.keys)
            .filter_map(|(record, keys)| keys.as_ref().map(|k| (record, k)))
    }

    pub fn find_by_id(&self, id: &str) -> Option<&IngredientRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Records passing every filter set in `query`, in table order.
    pub fn query(&self, query: &IngredientQuery) -> Vec<&IngredientRecord> {
        let search = query.search.as_deref().map(fold).filter(|s| !s.is_empty());
        self.records
            .iter()
            .filter(|r| match &search {
                Some(term) => {
                    fold(&r.name).contains(term.as_str())
                        || r.alternative_names
                            .iter()
                            .any(|alt| fold(alt).contains(term.as_str()))
                }
                None => true,
            })
            .filter(|r| match &query.risk_level {
                Some(level) => r.risk_level.as_ref() == Some(level),
                None => true,
            })
            .filter(|r| match &query.category {
                Some(category) => r.category.eq_ignore_ascii_case(category),
                None => true,
            })
            .collect()
    }
}

/// Filters for browsing the knowledge base. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct IngredientQuery {
    pub search: Option<String>,
    pub risk_level: Option<RiskLevel>,
    pub category: Option<String>,
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
