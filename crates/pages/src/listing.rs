use dossier_model::Page;

pub const PAGES_START: &str = "--- PAGES START ---";
pub const PAGES_END: &str = "--- PAGES END ---";
pub const PAGE_START: &str = "=== PAGE START ===";
pub const PAGE_END: &str = "=== PAGE END ===";

/// Serialize the page listing into the grouping request payload.
///
/// Page text goes in verbatim between explicit boundary markers; nothing
/// is summarized, reordered, or truncated here. If the corpus does not
/// fit into one collaborator call, splitting it is the caller's problem.
pub fn build_listing(pages: &[Page]) -> String {
    let mut lines: Vec<String> = vec![PAGES_START.to_string()];
    for page in pages {
        lines.push(PAGE_START.to_string());
        lines.push(format!("filename: {}", page.key));
        lines.push("text:".to_string());
        lines.push(page.text.clone());
        if let Some(translation) = page.translation.as_deref() {
            if !translation.is_empty() {
                lines.push("english:".to_string());
                lines.push(translation.to_string());
            }
        }
        lines.push(PAGE_END.to_string());
    }
    lines.push(PAGES_END.to_string());
    lines.join("\n")
}
