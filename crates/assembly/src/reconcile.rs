use dossier_model::{Page, ProposedGroup};
use std::collections::HashMap;

/// Authoritative lookup from page references to real pages.
///
/// The exact index maps full page keys; the prefix index maps the
/// substring before the first `_` and exists because the collaborator
/// sometimes references a page by its bare ID, dropping the
/// `_page2`-style suffix. Both indexes are last-write-wins over the
/// loader's sorted page order, so a duplicate key or a shared prefix
/// resolves to the lexicographically last file.
pub struct PageIndex<'a> {
    exact: HashMap<&'a str, &'a Page>,
    prefix: HashMap<&'a str, &'a Page>,
}

impl<'a> PageIndex<'a> {
    pub fn build(pages: &'a [Page]) -> Self {
        let mut exact = HashMap::with_capacity(pages.len());
        let mut prefix = HashMap::with_capacity(pages.len());
        for page in pages {
            exact.insert(page.key.as_str(), page);
            prefix.insert(id_prefix(&page.key), page);
        }
        Self { exact, prefix }
    }

    /// Exact key lookup first, then the reference's own ID prefix.
    pub fn resolve(&self, reference: &str) -> Option<&'a Page> {
        if let Some(page) = self.exact.get(reference) {
            return Some(page);
        }
        self.prefix.get(id_prefix(reference)).copied()
    }
}

fn id_prefix(key: &str) -> &str {
    key.split('_').next().unwrap_or(key)
}

/// Resolve one proposed group against the page index.
///
/// References that resolve to nothing are dropped, not promoted to the
/// unassigned list: the reconciler trusts the grouping decision but can
/// only materialize pages that exist on disk. A page referenced by more
/// than one group is resolved for each of them; double-assignment is the
/// collaborator's mistake to avoid, not ours to repair.
pub fn resolve_group<'a>(group: &ProposedGroup, index: &PageIndex<'a>) -> Vec<&'a Page> {
    let mut resolved = Vec::with_capacity(group.pages.len());
    for reference in &group.pages {
        match index.resolve(reference) {
            Some(page) => resolved.push(page),
            None => log::debug!(
                "group {}: dropping unresolvable page reference {reference:?}",
                group.id
            ),
        }
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn page(key: &str) -> Page {
        Page {
            key: key.to_string(),
            text: format!("text of {key}"),
            source_path: format!("pages/{key}.txt"),
            translation: None,
        }
    }

    fn group(id: &str, refs: &[&str]) -> ProposedGroup {
        ProposedGroup {
            id: id.to_string(),
            pages: refs.iter().map(|r| r.to_string()).collect(),
            confidence: 0.5,
            reason: String::new(),
        }
    }

    #[test]
    fn exact_match_wins_over_prefix() {
        let pages = vec![page("abc_page1"), page("abc")];
        let index = PageIndex::build(&pages);
        assert_eq!(index.resolve("abc").unwrap().key, "abc");
        assert_eq!(index.resolve("abc_page1").unwrap().key, "abc_page1");
    }

    #[test]
    fn suffixless_reference_resolves_via_prefix() {
        let pages = vec![page("ABC123_page2")];
        let index = PageIndex::build(&pages);
        assert_eq!(index.resolve("ABC123").unwrap().key, "ABC123_page2");
    }

    #[test]
    fn reference_prefix_is_derived_from_the_reference() {
        let pages = vec![page("uuid-1_1_105_c")];
        let index = PageIndex::build(&pages);
        // reference carries a different suffix than the stored key
        assert_eq!(index.resolve("uuid-1_9_999").unwrap().key, "uuid-1_1_105_c");
    }

    #[test]
    fn prefix_collision_keeps_the_last_page() {
        let pages = vec![page("doc_page1"), page("doc_page2")];
        let index = PageIndex::build(&pages);
        assert_eq!(index.resolve("doc").unwrap().key, "doc_page2");
    }

    #[test]
    fn unresolvable_references_are_dropped() {
        let pages = vec![page("a"), page("b")];
        let index = PageIndex::build(&pages);
        let resolved = resolve_group(&group("L0001", &["a", "XYZ", "b"]), &index);
        let keys: Vec<&str> = resolved.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn pages_may_appear_in_more_than_one_group() {
        let pages = vec![page("a")];
        let index = PageIndex::build(&pages);
        let first = resolve_group(&group("L0001", &["a"]), &index);
        let second = resolve_group(&group("L0002", &["a"]), &index);
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
    }
}
