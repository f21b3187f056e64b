use dossier_assembly::{assemble_and_write, parse_grouping};
use dossier_pages::{build_listing, PageLoader};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

/// Full pages-on-disk to letters-on-disk flow with a canned collaborator
/// response, the way a replay run executes it.
#[test]
fn pages_flow_through_grouping_to_letter_folders() {
    let temp = TempDir::new().unwrap();
    let pages_dir = temp.path().join("pages");
    let letters_dir = temp.path().join("letters");
    fs::create_dir_all(&pages_dir).unwrap();

    fs::write(pages_dir.join("aaa-1_p1_source.txt"), "Liebe Grete,\n").unwrap();
    fs::write(pages_dir.join("aaa-1_p2_source.txt"), "Deine Dorle").unwrap();
    fs::write(pages_dir.join("bbb-2_source.txt"), "Rechnung 1939").unwrap();

    let pages = PageLoader::new(&pages_dir).load().unwrap();
    assert_eq!(pages.len(), 3);

    // the response references one page by bare prefix and one page that
    // does not exist at all
    let raw = r#"```json
{
  "letters": [
    {"id": "L0001", "pages": ["aaa-1_p1", "aaa-1_p2", "missing_page"], "confidence": 0.8, "reason": "same letter"},
    {"id": "L0002", "pages": ["bbb-2"], "confidence": 0.4, "reason": "standalone"}
  ],
  "unassigned_pages": []
}
```"#;
    let response = parse_grouping(raw).unwrap();
    let letters =
        assemble_and_write(&letters_dir, &response, &pages, Some("SetF")).unwrap();
    assert_eq!(letters.len(), 2);

    let first = letters_dir.join("SetF L0001");
    assert_eq!(
        fs::read_to_string(first.join("text.txt")).unwrap(),
        "Liebe Grete,\nDeine Dorle"
    );
    let meta: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(first.join("meta.json")).unwrap()).unwrap();
    // the proposed reference list survives verbatim, including the
    // reference that could not be materialized
    assert_eq!(meta["pages"].as_array().unwrap().len(), 3);
    assert_eq!(meta["source_files"].as_array().unwrap().len(), 2);

    let second = letters_dir.join("SetF L0002");
    assert_eq!(
        fs::read_to_string(second.join("source.txt")).unwrap(),
        "Rechnung 1939"
    );
}

/// The audit listing and the assembled text both preserve page bytes.
#[test]
fn fidelity_from_disk_to_listing_and_letter() {
    let temp = TempDir::new().unwrap();
    let pages_dir = temp.path().join("pages");
    fs::create_dir_all(&pages_dir).unwrap();

    let text_a = "line one\n\n   indented line\ntrailing blank\n\n";
    let text_b = "no trailing newline";
    fs::write(pages_dir.join("a.txt"), text_a).unwrap();
    fs::write(pages_dir.join("b.txt"), text_b).unwrap();

    let pages = PageLoader::new(&pages_dir).load().unwrap();
    let listing = build_listing(&pages);
    assert!(listing.contains(text_a));
    assert!(listing.contains(text_b));

    let response = parse_grouping(
        r#"{"letters": [{"id": "L0001", "pages": ["a", "b"]}], "unassigned_pages": []}"#,
    )
    .unwrap();
    let letters_dir = temp.path().join("letters");
    let letters = assemble_and_write(&letters_dir, &response, &pages, None).unwrap();
    assert_eq!(letters[0].text, format!("{text_a}{text_b}"));
    assert_eq!(
        fs::read_to_string(letters_dir.join("L0001").join("text.txt")).unwrap(),
        format!("{text_a}{text_b}")
    );
}
