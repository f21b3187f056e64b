use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One OCR'd or extracted unit of text tied to a single source file.
///
/// Pages are created once per discovered file at the start of a grouping
/// run and are immutable afterwards. They are never persisted on their
/// own, only as constituents of assembled letters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Canonical key derived from the source filename (suffixes stripped).
    pub key: String,
    /// Verbatim file content.
    pub text: String,
    /// Path the text was read from, relative to the scan root when possible.
    pub source_path: String,
    /// Optional side-channel translation of the same page.
    pub translation: Option<String>,
}

/// One group proposed by the external collaborator.
///
/// This is untrusted output: every page reference must be resolved against
/// the authoritative page set before use. Missing fields are tolerated and
/// passed through unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProposedGroup {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub pages: Vec<String>,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub reason: String,
}

/// The collaborator's full grouping response.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GroupingResponse {
    #[serde(default)]
    pub letters: Vec<ProposedGroup>,
    #[serde(default)]
    pub unassigned_pages: Vec<String>,
}

/// Provenance record written next to each assembled letter.
///
/// A merge of the originating proposed group with the files that were
/// actually resolved and the reference IDs extracted from their names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LetterMeta {
    #[serde(flatten)]
    pub group: ProposedGroup,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_files: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reference_ids: Vec<String>,
}

/// An assembled letter: ordered pages, concatenated text, provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct Letter {
    pub id: String,
    /// Directory name the letter is persisted under.
    pub folder_name: String,
    /// Page keys that actually resolved, in assembly order.
    pub page_keys: Vec<String>,
    /// Exact concatenation of the constituent page texts, no separators.
    pub text: String,
    pub meta: LetterMeta,
}

/// Loose view of one per-document analysis JSON.
///
/// Analysis documents are heterogeneous (image analyses, spreadsheet
/// analyses, text extractions, letter metadata), so every field is
/// extracted independently and a field with an unexpected shape is
/// dropped without taking the rest of the document with it.
#[derive(Debug, Clone, Default)]
pub struct DocumentAnalysis {
    pub document_type: Option<String>,
    pub structured_data: StructuredData,
    pub document_metadata: DocumentMetadata,
    pub notes: Option<String>,
}

impl DocumentAnalysis {
    pub fn from_value(value: &serde_json::Value) -> Self {
        Self {
            document_type: value
                .get("document_type")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string),
            structured_data: value
                .get("structured_data")
                .map(StructuredData::from_value)
                .unwrap_or_default(),
            document_metadata: value
                .get("document_metadata")
                .map(DocumentMetadata::from_value)
                .unwrap_or_default(),
            notes: value
                .get("notes")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StructuredData {
    pub people: Vec<String>,
    pub organizations: Vec<String>,
    pub locations: Vec<String>,
    pub dates: Vec<String>,
}

impl StructuredData {
    fn from_value(value: &serde_json::Value) -> Self {
        Self {
            people: string_list(value.get("people")),
            organizations: string_list(value.get("organizations")),
            locations: string_list(value.get("locations")),
            dates: string_list(value.get("dates")),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DocumentMetadata {
    /// Dates appear as strings or numbers depending on the producer.
    pub date: Option<serde_json::Value>,
}

impl DocumentMetadata {
    fn from_value(value: &serde_json::Value) -> Self {
        Self {
            date: value
                .get("date")
                .filter(|date| !date.is_null())
                .cloned(),
        }
    }
}

/// String entries of a JSON array; anything else yields nothing.
fn string_list(value: Option<&serde_json::Value>) -> Vec<String> {
    value
        .and_then(serde_json::Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(serde_json::Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// One retained sample document (filename plus raw parsed JSON).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SampleDocument {
    pub file: String,
    pub data: serde_json::Value,
}

/// One free-text observation lifted from a document's notes field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Finding {
    pub file: String,
    pub note: String,
}

/// Frozen result of one aggregation run over the whole corpus.
///
/// Entity sequences are sorted and deduplicated; counts are numbers of
/// contributing documents, not entity occurrences. Rebuilt from scratch
/// on every run.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AggregatedSnapshot {
    pub named_individuals: Vec<String>,
    pub organizations: Vec<String>,
    pub locations: Vec<String>,
    pub dates: Vec<String>,
    pub document_type_counts: BTreeMap<String, u64>,
    pub total_documents: u64,
    pub samples: Vec<SampleDocument>,
    pub explosive_findings: Vec<Finding>,
}

/// Pretty-print a value as JSON with a trailing newline, the format used
/// for every artifact this pipeline writes.
pub fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}
