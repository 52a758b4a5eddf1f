use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::AssetError;

/// Recursively list the files under `dir` whose extension is one of
/// `extensions` (no leading dot, case ignored).
///
/// Entries come back sorted by file name within each directory so the order
/// is stable across platforms. A missing directory yields an empty list.
/// Entries that cannot be read are skipped with a warning; only an
/// unreadable `dir` itself is an error.
pub fn enumerate_files(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>, AssetError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    std::fs::read_dir(dir)?;

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(dir).display().to_string();
                warn!(path = %path, error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if has_extension(entry.path(), extensions) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|x| x.eq_ignore_ascii_case(ext)))
}

/// Name an asset by its path relative to `base`, without its final extension
/// and with `/` as the separator on every platform.
///
/// `base/sub/b.ogg` becomes `sub/b`; `base/a.b.wav` becomes `a.b`.
pub fn asset_name(base: &Path, file: &Path) -> String {
    let rel = file.strip_prefix(base).unwrap_or(file);
    let stem = rel.with_extension("");
    let parts: Vec<Cow<'_, str>> = stem
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect();
    parts.join("/")
}
