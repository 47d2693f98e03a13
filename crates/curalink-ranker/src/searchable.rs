//! Declared text serialisation used for keyword matching.
//!
//! Each record type lists the fields that take part in matching, in a fixed
//! order. The searchable text is those fields joined by newlines and
//! lower-cased. Field names and provenance (origin, synthesised URLs) are not
//! part of it.

use curalink_common::{CanonicalPublication, CanonicalTrial};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("candidate could not be serialised for scoring: {0}")]
pub struct SearchTextError(pub String);

pub trait Searchable {
    /// Field values in matching order. Absent fields are simply left out.
    fn search_fields(&self) -> Result<Vec<String>, SearchTextError>;

    fn searchable_text(&self) -> Result<String, SearchTextError> {
        Ok(self.search_fields()?.join("\n").to_lowercase())
    }
}

impl Searchable for CanonicalTrial {
    fn search_fields(&self) -> Result<Vec<String>, SearchTextError> {
        let mut fields = Vec::new();
        fields.extend(self.nct_id.clone());
        fields.extend(self.title.clone());
        fields.extend(self.description.clone());
        fields.extend(self.phase.map(|p| p.as_str().to_string()));
        fields.extend(self.status.map(|s| s.as_str().to_string()));
        fields.extend(self.conditions.iter().cloned());
        fields.extend(self.eligibility.criteria.clone());
        fields.extend(self.eligibility.min_age.clone());
        fields.extend(self.eligibility.max_age.clone());
        fields.extend(self.eligibility.sex.map(|s| s.as_str().to_string()));
        fields.extend(self.location.facilities.iter().cloned());
        fields.extend(self.contact_email.clone());
        fields.extend(self.sponsor.clone());
        fields.extend(self.ai_summary.clone());
        Ok(fields)
    }
}

impl Searchable for CanonicalPublication {
    fn search_fields(&self) -> Result<Vec<String>, SearchTextError> {
        let mut fields = Vec::new();
        fields.extend(self.pmid.clone());
        fields.extend(self.title.clone());
        fields.extend(self.abstract_text.clone());
        fields.extend(self.authors.iter().cloned());
        fields.extend(self.journal.clone());
        fields.extend(self.published_date.clone());
        fields.extend(self.doi.clone());
        fields.extend(self.keywords.iter().cloned());
        fields.extend(self.related_conditions.iter().cloned());
        fields.extend(self.ai_summary.clone());
        Ok(fields)
    }
}

/// Arbitrary documents: every scalar leaf, in `serde_json::Map` iteration order. Keys are skipped.
impl Searchable for Value {
    fn search_fields(&self) -> Result<Vec<String>, SearchTextError> {
        let mut fields = Vec::new();
        collect_leaves(self, &mut fields);
        Ok(fields)
    }
}

fn collect_leaves(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Null          => {}
        Value::Bool(b)       => out.push(b.to_string()),
        Value::Number(n)     => out.push(n.to_string()),
        Value::String(s)     => out.push(s.clone()),
        Value::Array(items)  => items.iter().for_each(|v| collect_leaves(v, out)),
        Value::Object(map)   => map.values().for_each(|v| collect_leaves(v, out)),
    }
}

/// Scores any serialisable record through its JSON form.
///
/// Serialisation failures surface as [`SearchTextError`], which the ranker
/// turns into a zero score for that candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AsJson<T>(pub T);

impl<T: Serialize> Searchable for AsJson<T> {
    fn search_fields(&self) -> Result<Vec<String>, SearchTextError> {
        let value = serde_json::to_value(&self.0).map_err(|e| SearchTextError(e.to_string()))?;
        value.search_fields()
    }
}
