use crate::error::{AggregateError, Result};
use dossier_model::{AggregatedSnapshot, DocumentAnalysis, Finding, SampleDocument};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// First-N sample retention cap.
pub const SAMPLE_CAP: usize = 20;

/// Path segments excluded from the corpus walk: the pipeline's own
/// working area and version-control metadata.
pub const EXCLUDED_SEGMENTS: &[&str] = &["PIPELINE", ".git"];

/// Mutable accumulation state for one aggregation run.
///
/// Owned and local to the run; `freeze` turns it into the immutable
/// snapshot handed to summarization. Sets deduplicate by construction,
/// counts count contributing documents.
#[derive(Default)]
struct Accumulator {
    named_individuals: BTreeSet<String>,
    organizations: BTreeSet<String>,
    locations: BTreeSet<String>,
    dates: BTreeSet<String>,
    document_type_counts: BTreeMap<String, u64>,
    total_documents: u64,
    samples: Vec<SampleDocument>,
    explosive_findings: Vec<Finding>,
}

impl Accumulator {
    fn add_document(&mut self, file_name: &str, data: serde_json::Value) {
        self.total_documents += 1;

        let analysis = DocumentAnalysis::from_value(&data);

        self.named_individuals
            .extend(analysis.structured_data.people.iter().cloned());
        self.organizations
            .extend(analysis.structured_data.organizations.iter().cloned());
        self.locations
            .extend(analysis.structured_data.locations.iter().cloned());
        self.dates
            .extend(analysis.structured_data.dates.iter().cloned());

        if let Some(date) = analysis.document_metadata.date {
            self.dates.insert(json_to_plain_string(&date));
        }

        let document_type = match analysis.document_type {
            Some(explicit) => explicit,
            None if file_name.contains("_extraction") => "text_extraction".to_string(),
            None => "image_analysis".to_string(),
        };
        *self.document_type_counts.entry(document_type).or_insert(0) += 1;

        if let Some(note) = analysis.notes.filter(|note| !note.is_empty()) {
            self.explosive_findings.push(Finding {
                file: file_name.to_string(),
                note,
            });
        }

        if self.samples.len() < SAMPLE_CAP {
            self.samples.push(SampleDocument {
                file: file_name.to_string(),
                data,
            });
        }
    }

    fn freeze(self) -> AggregatedSnapshot {
        AggregatedSnapshot {
            named_individuals: self.named_individuals.into_iter().collect(),
            organizations: self.organizations.into_iter().collect(),
            locations: self.locations.into_iter().collect(),
            dates: self.dates.into_iter().collect(),
            document_type_counts: self.document_type_counts,
            total_documents: self.total_documents,
            samples: self.samples,
            explosive_findings: self.explosive_findings,
        }
    }
}

/// Fold every analysis JSON under the root into one snapshot.
///
/// Files that fail to parse are logged and skipped; only an unreadable
/// root is an error. The snapshot is rebuilt from scratch on every run.
pub fn aggregate(root: &Path) -> Result<AggregatedSnapshot> {
    if let Err(err) = fs::read_dir(root) {
        return Err(AggregateError::Root {
            path: root.to_path_buf(),
            source: err,
        });
    }

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(root) {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file()
                    && has_json_extension(entry.path())
                    && !is_excluded(entry.path())
                {
                    paths.push(entry.path().to_path_buf());
                }
            }
            Err(err) => log::warn!("failed to read entry under {}: {err}", root.display()),
        }
    }
    paths.sort();
    log::info!("found {} JSON files to aggregate", paths.len());

    let mut acc = Accumulator::default();
    for path in &paths {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) => {
                log::warn!("could not read {}: {err}", path.display());
                continue;
            }
        };
        let data: serde_json::Value = match serde_json::from_str(&raw) {
            Ok(data) => data,
            Err(err) => {
                log::warn!("could not parse {}: {err}", path.display());
                continue;
            }
        };
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        acc.add_document(file_name, data);
    }

    Ok(acc.freeze())
}

fn has_json_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

fn is_excluded(path: &Path) -> bool {
    path.components().any(|component| {
        component
            .as_os_str()
            .to_str()
            .map(|segment| EXCLUDED_SEGMENTS.contains(&segment))
            .unwrap_or(false)
    })
}

/// Dates arrive as strings or numbers; numbers are rendered without
/// quotes, strings without surrounding quotes.
fn json_to_plain_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
