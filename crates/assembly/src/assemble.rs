use crate::reconcile::{resolve_group, PageIndex};
use crate::refids::{dedup_ordered, extract_reference_ids};
use crate::Result;
use dossier_model::{GroupingResponse, Letter, LetterMeta, Page};
use std::fs;
use std::path::Path;

/// Filenames the concatenated letter text is written under. Two copies
/// of the same bytes: older readers look for `source.txt`, newer ones
/// for `text.txt`.
pub const TEXT_FILENAMES: &[&str] = &["source.txt", "text.txt"];
pub const META_FILENAME: &str = "meta.json";

/// Build letters from a grouping response, without touching disk.
///
/// Letters are produced in response order, one per proposed group, even
/// when every page reference of a group failed to resolve (the letter is
/// then empty but its provenance record still exists). Text is the exact
/// ordered concatenation of the resolved pages, no separators added.
pub fn assemble_letters(
    response: &GroupingResponse,
    pages: &[Page],
    collection: Option<&str>,
) -> Vec<Letter> {
    let index = PageIndex::build(pages);
    let mut letters = Vec::with_capacity(response.letters.len());

    for (i, group) in response.letters.iter().enumerate() {
        let id = if group.id.is_empty() {
            format!("L{:04}", i + 1)
        } else {
            group.id.clone()
        };

        let resolved = resolve_group(group, &index);
        let mut text = String::new();
        let mut page_keys = Vec::with_capacity(resolved.len());
        let mut source_files = Vec::with_capacity(resolved.len());
        let mut ids = Vec::new();
        for page in &resolved {
            text.push_str(&page.text);
            page_keys.push(page.key.clone());
            source_files.push(page.source_path.clone());
            let basename = Path::new(&page.source_path)
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(page.source_path.as_str());
            ids.extend(extract_reference_ids(basename));
        }

        letters.push(Letter {
            id: id.clone(),
            folder_name: folder_name(collection, &id),
            page_keys,
            text,
            meta: LetterMeta {
                group: group.clone(),
                source_files: dedup_ordered(source_files),
                reference_ids: dedup_ordered(ids),
            },
        });
    }
    letters
}

/// `"<collection> <id>"` when a collection name is known, else the bare id.
pub fn folder_name(collection: Option<&str>, id: &str) -> String {
    match collection {
        Some(name) if !name.trim().is_empty() => format!("{} {id}", name.trim()),
        _ => id.to_string(),
    }
}

/// Persist one letter under `output_dir/<folder_name>/`.
///
/// Reruns with the same grouping overwrite the folder contents wholesale.
pub fn write_letter(output_dir: &Path, letter: &Letter) -> Result<()> {
    let dir = output_dir.join(&letter.folder_name);
    fs::create_dir_all(&dir)?;
    fs::write(
        dir.join(META_FILENAME),
        dossier_model::to_pretty_json(&letter.meta)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err.to_string()))?,
    )?;
    for name in TEXT_FILENAMES {
        fs::write(dir.join(name), &letter.text)?;
    }
    Ok(())
}

/// Assemble and persist every letter of a grouping response.
///
/// Each letter's write is independent and best-effort: one failed folder
/// is logged and the remaining letters still go out. Returns the
/// assembled letters regardless of write outcome.
pub fn assemble_and_write(
    output_dir: &Path,
    response: &GroupingResponse,
    pages: &[Page],
    collection: Option<&str>,
) -> Result<Vec<Letter>> {
    fs::create_dir_all(output_dir)?;
    let letters = assemble_letters(response, pages, collection);
    for letter in &letters {
        if let Err(err) = write_letter(output_dir, letter) {
            log::error!("failed to write letter {}: {err}", letter.folder_name);
        }
    }
    log::info!(
        "assembled {} letters under {}",
        letters.len(),
        output_dir.display()
    );
    Ok(letters)
}
