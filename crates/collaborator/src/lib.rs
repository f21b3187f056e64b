//! The opaque boundary to the hosted model.
//!
//! Everything behind [`Collaborator`] is untrusted: callers re-validate
//! whatever comes back before acting on it. Calls are blocking and return
//! fully materialized strings; there is no cancellation and no resume, a
//! failed call is simply retried on a later run.

mod error;
mod gemini;
mod response;

pub use error::{CollaboratorError, Result};
pub use gemini::{GeminiClient, API_KEY_VAR, MODEL_VAR};
pub use response::{extract_json_object, strip_report_fences};

use std::path::Path;

/// One text-in/text-out request.
#[derive(Debug, Clone, Copy)]
pub struct TextRequest<'a> {
    /// Task instructions, sent first.
    pub instructions: &'a str,
    /// Payload (page listing, letter text, snapshot excerpt). May be empty.
    pub input: &'a str,
    /// Ask the model for a JSON body instead of plain text.
    pub json_response: bool,
}

/// Blocking request/response boundary to the external model.
pub trait Collaborator {
    fn generate(&self, request: &TextRequest<'_>) -> Result<String>;

    /// Transcribe a single page image to raw text.
    fn transcribe(&self, image: &Path, instructions: &str) -> Result<String>;
}
