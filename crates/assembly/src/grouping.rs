use crate::error::{AssemblyError, Result};
use dossier_collaborator::extract_json_object;
use dossier_model::GroupingResponse;

const EXCERPT_LEN: usize = 500;

/// Parse the collaborator's raw grouping response.
///
/// The response is untrusted: it may be wrapped in markdown fences or
/// carry stray prose around the JSON object. Fence-stripping and
/// brace-matching run first; if parsing still fails the error carries a
/// bounded excerpt of the raw text.
pub fn parse_grouping(raw: &str) -> Result<GroupingResponse> {
    let json_text = extract_json_object(raw);
    serde_json::from_str(&json_text).map_err(|err| AssemblyError::Grouping {
        message: err.to_string(),
        excerpt: excerpt(raw),
    })
}

fn excerpt(raw: &str) -> String {
    let mut end = raw.len().min(EXCERPT_LEN);
    while !raw.is_char_boundary(end) {
        end -= 1;
    }
    raw[..end].to_string()
}
