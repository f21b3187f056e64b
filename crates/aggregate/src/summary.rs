use dossier_collaborator::{strip_report_fences, Collaborator, TextRequest};
use dossier_model::AggregatedSnapshot;

/// Fixed report for an empty corpus; no collaborator call is made.
pub const NO_DOCUMENTS_REPORT: &str =
    "No documents have been processed yet. Summary will appear as processing begins.";

const MAX_INDIVIDUALS: usize = 50;
const MAX_ORGANIZATIONS: usize = 30;
const MAX_LOCATIONS: usize = 30;
const MAX_SAMPLES: usize = 10;

const PROMPT_STRATEGIC_SUMMARY: &str = "\
You are analyzing documents from an investigative document release. You have been given aggregated data from ALL processed documents.

Create a STRATEGIC, HIGH-LEVEL summary that journalists and investigators can use. Focus on:

1. NAMED INDIVIDUALS: List ALL people explicitly named or identified across all documents
2. MOST EXPLOSIVE FINDINGS: The top 5-10 most significant revelations (ranked by newsworthiness)
3. DOCUMENT SCOPE: What types of evidence, date ranges, sources
4. PATTERNS & CONNECTIONS: Relationships, recurring themes, timeline patterns
5. LEGAL/FINANCIAL IMPLICATIONS: Potential violations, financial dealings, legal significance

FORMAT - Start directly with sections (NO preamble):

### Named Individuals Identified
[List all named people with brief context for each]

### Most Explosive Findings
[Ranked list of 5-10 most significant revelations with document references]

### Document Analysis
- Total documents processed: [number]
- Date range: [if identifiable]
- Document types: [photos, financial records, communications, etc.]

### Key Patterns & Connections
[Identify relationships, recurring locations, timeline connections]

### Legal & Financial Significance
[Potential implications, violations, financial dealings]

Be specific, factual, and concise. Total length: 400-600 words. This is for investigative journalists - prioritize newsworthiness and verifiable facts.";

/// Serialize the snapshot excerpt sent alongside the summary prompt.
pub fn build_summary_request(snapshot: &AggregatedSnapshot) -> String {
    let individuals = bounded_json(&snapshot.named_individuals, MAX_INDIVIDUALS);
    let organizations = bounded_json(&snapshot.organizations, MAX_ORGANIZATIONS);
    let locations = bounded_json(&snapshot.locations, MAX_LOCATIONS);
    let type_counts =
        serde_json::to_string_pretty(&snapshot.document_type_counts).unwrap_or_else(|_| "{}".into());
    let samples = serde_json::to_string_pretty(
        &snapshot.samples[..snapshot.samples.len().min(MAX_SAMPLES)],
    )
    .unwrap_or_else(|_| "[]".into());

    format!(
        "{PROMPT_STRATEGIC_SUMMARY}\n\n\
         AGGREGATED DATA FROM ALL PROCESSED DOCUMENTS:\n\n\
         Total Documents Analyzed: {total}\n\n\
         Named Individuals Found: {individuals_count}\n{individuals}\n\n\
         Organizations Found: {organizations_count}\n{organizations}\n\n\
         Locations Identified: {locations_count}\n{locations}\n\n\
         Document Types:\n{type_counts}\n\n\
         Sample Document Data (for context):\n{samples}\n\n\
         Now create the strategic summary as specified above. Focus on newsworthiness, named individuals, and explosive findings.",
        total = snapshot.total_documents,
        individuals_count = snapshot.named_individuals.len(),
        organizations_count = snapshot.organizations.len(),
        locations_count = snapshot.locations.len(),
    )
}

fn bounded_json(values: &[String], cap: usize) -> String {
    if values.is_empty() {
        return "[]".to_string();
    }
    serde_json::to_string_pretty(&values[..values.len().min(cap)])
        .unwrap_or_else(|_| "[]".into())
}

/// Deterministic stand-in report when the collaborator is unavailable.
pub fn fallback_report(snapshot: &AggregatedSnapshot) -> String {
    let types: Vec<&str> = snapshot
        .document_type_counts
        .keys()
        .map(String::as_str)
        .collect();
    format!(
        "### Processing Status\n\n\
         - Total documents analyzed: {}\n\
         - Named individuals identified: {}\n\
         - Organizations found: {}\n\
         - Document types: {}\n\n\
         (Strategic analysis temporarily unavailable - processing continues)",
        snapshot.total_documents,
        snapshot.named_individuals.len(),
        snapshot.organizations.len(),
        types.join(", "),
    )
}

/// Produce the strategic report for a snapshot.
///
/// Empty corpus short-circuits to the fixed message; a collaborator
/// failure substitutes the deterministic fallback. This function never
/// fails, by design: every run ends with a written report.
pub fn summarize(snapshot: &AggregatedSnapshot, collaborator: &dyn Collaborator) -> String {
    if snapshot.total_documents == 0 {
        return NO_DOCUMENTS_REPORT.to_string();
    }

    let request = build_summary_request(snapshot);
    log::info!(
        "sending aggregated data from {} documents for strategic analysis",
        snapshot.total_documents
    );
    match collaborator.generate(&TextRequest {
        instructions: &request,
        input: "",
        json_response: false,
    }) {
        Ok(report) => strip_report_fences(&report),
        Err(err) => {
            log::error!("summary generation failed: {err}");
            fallback_report(snapshot)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dossier_collaborator::CollaboratorError;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    struct StubSummarizer {
        reply: Option<String>,
    }

    impl Collaborator for StubSummarizer {
        fn generate(
            &self,
            _request: &TextRequest<'_>,
        ) -> dossier_collaborator::Result<String> {
            match &self.reply {
                Some(reply) => Ok(reply.clone()),
                None => Err(CollaboratorError::EmptyResponse),
            }
        }

        fn transcribe(
            &self,
            _image: &Path,
            _instructions: &str,
        ) -> dossier_collaborator::Result<String> {
            unreachable!("summarization never calls transcribe")
        }
    }

    fn snapshot_with(total: u64) -> AggregatedSnapshot {
        AggregatedSnapshot {
            named_individuals: vec!["Jane Doe".to_string()],
            organizations: vec!["Acme".to_string()],
            locations: vec![],
            dates: vec![],
            document_type_counts: [("memo".to_string(), total)].into_iter().collect(),
            total_documents: total,
            samples: vec![],
            explosive_findings: vec![],
        }
    }

    #[test]
    fn empty_corpus_short_circuits_without_a_call() {
        let snapshot = AggregatedSnapshot::default();
        // a failing collaborator proves no call is made
        let report = summarize(&snapshot, &StubSummarizer { reply: None });
        assert_eq!(report, NO_DOCUMENTS_REPORT);
    }

    #[test]
    fn collaborator_failure_substitutes_the_fallback() {
        let report = summarize(&snapshot_with(3), &StubSummarizer { reply: None });
        assert!(report.starts_with("### Processing Status"));
        assert!(report.contains("Total documents analyzed: 3"));
        assert!(report.contains("memo"));
    }

    #[test]
    fn fenced_reports_are_unwrapped() {
        let stub = StubSummarizer {
            reply: Some("```markdown\n### Named Individuals Identified\nJane\n```".to_string()),
        };
        let report = summarize(&snapshot_with(1), &stub);
        assert_eq!(report, "### Named Individuals Identified\nJane");
    }

    #[test]
    fn request_embeds_counts_and_entities() {
        let request = build_summary_request(&snapshot_with(7));
        assert!(request.contains("Total Documents Analyzed: 7"));
        assert!(request.contains("Named Individuals Found: 1"));
        assert!(request.contains("Jane Doe"));
        assert!(request.contains("\"memo\": 7"));
    }

    #[test]
    fn request_caps_entity_lists() {
        let mut snapshot = snapshot_with(1);
        snapshot.named_individuals = (0..200).map(|i| format!("person{i:03}")).collect();
        let request = build_summary_request(&snapshot);
        assert!(request.contains("person049"));
        assert!(!request.contains("person050"));
        assert!(request.contains("Named Individuals Found: 200"));
    }
}
