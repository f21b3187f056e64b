use crate::error::{PagesError, Result};
use dossier_model::Page;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Suffixes stripped from a page filename to derive its key, tried in
/// priority order. `_source.txt` is the transcription side of a page,
/// `_text.txt` the extracted-text side; plain `.txt` is the catch-all.
const KEY_SUFFIXES: &[&str] = &["_source.txt", "_text.txt", ".txt"];

/// Derive the canonical page key from a filename.
///
/// The match is case-insensitive but the returned key keeps the
/// original casing. A filename matching none of the known suffixes
/// falls back to its stem.
pub fn page_key(filename: &str) -> String {
    let name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);
    let lower = name.to_lowercase();
    for suffix in KEY_SUFFIXES {
        if lower.ends_with(suffix) {
            return name[..name.len() - suffix.len()].to_string();
        }
    }
    match name.rfind('.') {
        Some(dot) => name[..dot].to_string(),
        None => name.to_string(),
    }
}

/// Loads page-text artifacts from a directory tree.
pub struct PageLoader {
    root: PathBuf,
    translations_dir: Option<PathBuf>,
}

impl PageLoader {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            translations_dir: None,
        }
    }

    /// Attach a side-channel directory of `<key>_english.txt` translations.
    pub fn with_translations_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.translations_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Discover every `*.txt` page under the root, sorted by path.
    ///
    /// Unreadable individual files are logged and skipped; only an
    /// unreadable root is an error. The returned order is the processing
    /// order for everything downstream.
    pub fn load(&self) -> Result<Vec<Page>> {
        if let Err(err) = fs::read_dir(&self.root) {
            return Err(PagesError::Root {
                path: self.root.clone(),
                source: err,
            });
        }

        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in WalkDir::new(&self.root) {
            match entry {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        continue;
                    }
                    if has_txt_extension(entry.path()) {
                        paths.push(entry.path().to_path_buf());
                    }
                }
                Err(err) => log::warn!("failed to read entry under {}: {err}", self.root.display()),
            }
        }
        paths.sort();

        let mut pages = Vec::with_capacity(paths.len());
        for path in paths {
            let text = match fs::read_to_string(&path) {
                Ok(text) => text,
                Err(err) => {
                    log::warn!("skipping unreadable page {}: {err}", path.display());
                    continue;
                }
            };
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();
            let key = page_key(&file_name);
            let translation = self.read_translation(&key);
            pages.push(Page {
                key,
                text,
                source_path: path.display().to_string(),
                translation,
            });
        }

        log::info!("loaded {} pages from {}", pages.len(), self.root.display());
        Ok(pages)
    }

    fn read_translation(&self, key: &str) -> Option<String> {
        let dir = self.translations_dir.as_ref()?;
        let path = dir.join(format!("{key}_english.txt"));
        match fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                log::warn!("ignoring unreadable translation {}: {err}", path.display());
                None
            }
        }
    }
}

fn has_txt_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("txt"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn key_strips_suffixes_in_priority_order() {
        assert_eq!(page_key("abc123_source.txt"), "abc123");
        assert_eq!(page_key("abc123_text.txt"), "abc123");
        assert_eq!(page_key("abc123.txt"), "abc123");
        assert_eq!(page_key("ABC_SOURCE.TXT"), "ABC");
        assert_eq!(page_key("scan_1_105_c_source.txt"), "scan_1_105_c");
        assert_eq!(page_key("weird.dat"), "weird");
        assert_eq!(page_key("noext"), "noext");
    }

    #[test]
    fn load_sorts_and_reads_verbatim() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b_source.txt"), "second\npage\n").unwrap();
        fs::write(temp.path().join("a_source.txt"), "first").unwrap();
        fs::write(temp.path().join("notes.md"), "ignored").unwrap();

        let pages = PageLoader::new(temp.path()).load().unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].key, "a");
        assert_eq!(pages[0].text, "first");
        assert_eq!(pages[1].key, "b");
        assert_eq!(pages[1].text, "second\npage\n");
    }

    #[test]
    fn load_recurses_into_subdirectories() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("batch2");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("deep.txt"), "nested").unwrap();

        let pages = PageLoader::new(temp.path()).load().unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].key, "deep");
    }

    #[test]
    fn missing_root_is_an_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");
        let err = PageLoader::new(&missing).load().unwrap_err();
        assert!(matches!(err, PagesError::Root { .. }));
    }

    #[test]
    fn translations_attach_by_key() {
        let temp = TempDir::new().unwrap();
        let pages_dir = temp.path().join("pages");
        let english_dir = temp.path().join("english");
        fs::create_dir_all(&pages_dir).unwrap();
        fs::create_dir_all(&english_dir).unwrap();
        fs::write(pages_dir.join("p1_source.txt"), "text one").unwrap();
        fs::write(pages_dir.join("p2_source.txt"), "text two").unwrap();
        fs::write(english_dir.join("p1_english.txt"), "translated one").unwrap();

        let pages = PageLoader::new(&pages_dir)
            .with_translations_dir(&english_dir)
            .load()
            .unwrap();
        assert_eq!(pages[0].translation.as_deref(), Some("translated one"));
        assert_eq!(pages[1].translation, None);
    }
}
