use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One line of the file browser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub path: PathBuf,
    pub is_dir: bool,
}

impl Entry {
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

fn matches_extension(path: &Path, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
}

/// List `dir`: sub-directories first, then files, each sorted by name.
/// Hidden entries are skipped; files are filtered by `extensions` unless
/// the filter is empty.
pub fn list_entries(dir: &Path, extensions: &[String]) -> io::Result<Vec<Entry>> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            dirs.push(Entry { path, is_dir: true });
        } else if matches_extension(&path, extensions) {
            files.push(Entry {
                path,
                is_dir: false,
            });
        }
    }

    dirs.sort_by_key(|e| e.name());
    files.sort_by_key(|e| e.name());
    dirs.extend(files);
    Ok(dirs)
}
