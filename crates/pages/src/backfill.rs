use crate::error::Result;
use crate::loader::page_key;
use crate::prompts::PROMPT_TRANSCRIBE;
use dossier_collaborator::Collaborator;
use std::fs;
use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Transcribe page images that have no page-text file yet.
///
/// For every image in `images_dir` (sorted) whose derived key has no
/// `<key>_source.txt` under `pages_dir`, ask the collaborator for a
/// transcription and write it. A failed transcription is logged and an
/// empty page file is written so the page still shows up in the listing.
/// A page file that cannot be written is logged and skipped. Returns the
/// number of pages written.
pub fn transcribe_missing(
    images_dir: &Path,
    pages_dir: &Path,
    collaborator: &dyn Collaborator,
) -> Result<usize> {
    let mut images: Vec<PathBuf> = fs::read_dir(images_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| is_image(path))
        .collect();
    images.sort();

    let mut written = 0usize;
    let total = images.len();
    for (i, image) in images.iter().enumerate() {
        let name = image
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let key = page_key(name);
        let out_path = pages_dir.join(format!("{key}_source.txt"));
        if out_path.is_file() {
            continue;
        }

        log::info!("[{}/{total}] transcribing {name}", i + 1);
        let text = match collaborator.transcribe(image, PROMPT_TRANSCRIBE) {
            Ok(text) => text,
            Err(err) => {
                log::error!("transcription failed for {name}: {err}");
                String::new()
            }
        };
        if let Err(err) = fs::write(&out_path, text) {
            log::error!("could not write {}: {err}", out_path.display());
            continue;
        }
        written += 1;
    }
    Ok(written)
}

fn is_image(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                IMAGE_EXTENSIONS.iter().any(|known| *known == ext)
            })
            .unwrap_or(false)
}
