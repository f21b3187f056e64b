//! Instruction texts sent to the collaborator.
//!
//! These are part of the wire contract with the model: the grouping
//! instructions pin the exact JSON schema the reconciler parses.

pub const PROMPT_TRANSCRIBE: &str = "\
This is a single page image from an official investigative document set.
Transcribe the text exactly as it appears (handwritten, typed, stamped, etc.).
Do not add numbering, bullets, labels, or commentary.
Do not prefix lines with numbers or symbols.
Return only the raw text with original line breaks.";

pub const PROMPT_GROUPING: &str = "\
You will receive a list of document pages from an investigative document release.
Each item has a filename and its full text content.
Group pages that belong to the same narrative/letter/memo and order pages within each group.

Rules:
- Use ONLY the provided pages. Do not invent or omit pages.
- Group pages that clearly continue the same document (shared salutations, signatures, identifiers, dates, or topics).
- Order pages according to content flow; maintain chronological continuity when dates are present.
- If a page is ambiguous, place it in the best-fitting group with low confidence or leave it unassigned.
- Do NOT alter or rewrite page text. Preserve provenance.
- Output STRICT JSON only with this schema (no commentary):
  {
    \"letters\": [
      { \"id\": \"L0001\", \"pages\": [\"<filename>\", ...], \"confidence\": 0.0, \"reason\": \"...\" },
      { \"id\": \"L0002\", \"pages\": [ ... ], \"confidence\": 0.0, \"reason\": \"...\" }
    ],
    \"unassigned_pages\": [\"<filename>\", ...]
  }";

pub const PROMPT_TRANSLATE_HEADER: &str = "\
Translate the following investigative document page(s) to natural, idiomatic English.
Preserve meaning, dates, names, and paragraph breaks.
Do not add headings, numbering, labels, or commentary.
Output only the translated text.";

/// Wrap source text in the translation request markers.
pub fn translation_request(source_text: &str) -> String {
    format!(
        "{PROMPT_TRANSLATE_HEADER}\n\n--- BEGIN SOURCE TEXT ---\n{source_text}\n--- END SOURCE TEXT ---"
    )
}
