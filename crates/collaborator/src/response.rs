/// Best-effort recovery of a JSON object from a model response.
///
/// Models occasionally wrap their output in markdown fences or prepend
/// commentary even when told not to. The recovery order is: strip a
/// ```json fence, then a bare ``` fence, then cut from the first `{` to
/// its brace-matched close. When the braces never balance the rest of
/// the string is returned as-is and the caller's parse decides.
pub fn extract_json_object(raw: &str) -> String {
    let mut text = raw.trim();

    if let Some(inner) = fenced_block(text, "```json") {
        text = inner;
    } else if let Some(inner) = fenced_block(text, "```") {
        text = inner;
    }

    if text.starts_with('{') {
        return text.to_string();
    }

    let Some(start) = text.find('{') else {
        return text.to_string();
    };
    let tail = &text[start..];

    let mut depth = 0usize;
    for (i, ch) in tail.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return tail[..=i].to_string();
                }
            }
            _ => {}
        }
    }
    tail.to_string()
}

fn fenced_block<'a>(text: &'a str, fence: &str) -> Option<&'a str> {
    let start = text.find(fence)? + fence.len();
    let end = text[start..].find("```")? + start;
    if end > start {
        Some(text[start..end].trim())
    } else {
        None
    }
}

/// Strip markdown fences from a free-text report (summaries come back
/// fenced now and then; the body is kept verbatim).
pub fn strip_report_fences(raw: &str) -> String {
    let text = raw.trim();
    if text.starts_with("```markdown") || text.starts_with("```") {
        return text.replace("```markdown", "").replace("```", "").trim().to_string();
    }
    text.to_string()
}
