use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolves an `#include`d file against the §6 search order: the
/// including file's own directory, then each directory on the host
/// `PATH`-style environment variable, then the current working
/// directory. Returns `None` if no candidate exists.
pub fn resolve_include(including_dir: &Path, include_path: &str) -> Option<PathBuf> {
    let direct = including_dir.join(include_path);
    if direct.is_file() {
        return Some(direct);
    }

    if let Some(path_var) = env::var_os("PATH") {
        for dir in env::split_paths(&path_var) {
            let candidate = dir.join(include_path);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }

    let cwd_candidate = env::current_dir().ok()?.join(include_path);
    if cwd_candidate.is_file() {
        Some(cwd_candidate)
    } else {
        None
    }
}

pub fn read_source(path: &Path) -> std::io::Result<String> {
    fs::read_to_string(path)
}

/// Canonicalizes `path` for use as the include-dedup key, falling back to
/// the path as given if the filesystem can't canonicalize it (e.g. it was
/// already removed between resolution and read).
pub fn canonicalize_or_absolute(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
