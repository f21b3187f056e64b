use crate::assemble::TEXT_FILENAMES;
use dossier_collaborator::{Collaborator, TextRequest};
use dossier_pages::prompts::translation_request;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENGLISH_FILENAME: &str = "en.txt";

/// Letter directories under a letters root: any direct subdirectory
/// holding one of the conventional text files, sorted by name. Accepts
/// both bare-id and collection-prefixed folder names.
pub fn list_letter_dirs(letters_dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(letters_dir) else {
        return Vec::new();
    };
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_dir() && TEXT_FILENAMES.iter().any(|name| path.join(name).is_file())
        })
        .collect();
    dirs.sort();
    dirs
}

/// Counts for one translation run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TranslateStats {
    pub translated: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Translate every assembled letter to English.
///
/// A letter with an existing `en.txt` is skipped unless `force` is set.
/// An empty source text gets an empty translation without a collaborator
/// call. A collaborator or filesystem failure aborts only that letter;
/// the rest of the batch proceeds.
pub fn translate_letters(
    letters_dir: &Path,
    collaborator: &dyn Collaborator,
    force: bool,
) -> TranslateStats {
    let mut stats = TranslateStats::default();
    for dir in list_letter_dirs(letters_dir) {
        let Some(source_path) = TEXT_FILENAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
        else {
            continue;
        };
        let english_path = dir.join(ENGLISH_FILENAME);
        if english_path.exists() && !force {
            log::info!("skip existing: {}", english_path.display());
            stats.skipped += 1;
            continue;
        }

        let source = match fs::read_to_string(&source_path) {
            Ok(source) => source,
            Err(err) => {
                log::error!("could not read {}: {err}", source_path.display());
                stats.failed += 1;
                continue;
            }
        };
        let source = source.trim();
        if source.is_empty() {
            if let Err(err) = fs::write(&english_path, "") {
                log::error!("could not write {}: {err}", english_path.display());
                stats.failed += 1;
            } else {
                stats.translated += 1;
            }
            continue;
        }

        log::info!("translating {} ({} chars)", dir.display(), source.len());
        let prompt = translation_request(source);
        let english = match collaborator.generate(&TextRequest {
            instructions: &prompt,
            input: "",
            json_response: false,
        }) {
            Ok(text) => text,
            Err(err) => {
                log::error!("translation failed for {}: {err}", dir.display());
                stats.failed += 1;
                continue;
            }
        };
        if let Err(err) = fs::write(&english_path, format!("{english}\n")) {
            log::error!("could not write {}: {err}", english_path.display());
            stats.failed += 1;
            continue;
        }
        stats.translated += 1;
    }
    stats
}
