//! Cross-corpus aggregation of per-document analyses.
//!
//! One run walks the whole corpus of previously produced JSON, folds it
//! into deduplicated entity sets and per-type counts, and hands the
//! frozen snapshot to summarization. No state is carried between runs.

mod engine;
mod error;
mod summary;

pub use engine::{aggregate, EXCLUDED_SEGMENTS, SAMPLE_CAP};
pub use error::{AggregateError, Result};
pub use summary::{
    build_summary_request, fallback_report, summarize, NO_DOCUMENTS_REPORT,
};
