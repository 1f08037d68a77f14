//! Target and wordlist loading: line splitting, `$HEX[...]` decoding, and
//! recursive wordlist directory expansion.

use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::error::{CombError, Result};
use crate::hexline::decode_line;

fn split_lines(content: &[u8]) -> Vec<Vec<u8>> {
    String::from_utf8_lossy(content)
        .lines()
        .map(decode_line)
        .collect()
}

/// Load the target file. A directory target path is a fatal error,
/// unlike a directory wordlist path, which is recursed into instead.
pub fn load_target_file(path: &Path) -> Result<Vec<Vec<u8>>> {
    if path.is_dir() {
        return Err(CombError::InvalidFlags(format!(
            "target path is a directory, expected a file: {}",
            path.display()
        )));
    }
    let content = std::fs::read(path)?;
    Ok(split_lines(&content))
}

/// Expand the wordlist argument list: directories are walked recursively
/// for regular files; paths that do not exist are skipped with a
/// warning rather than aborting the run.
pub fn expand_wordlist_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for p in paths {
        if !p.exists() {
            warn!(path = %p.display(), "wordlist path does not exist, skipping");
            continue;
        }
        if p.is_dir() {
            for entry in WalkDir::new(p).into_iter().filter_map(|e| e.ok()) {
                if entry.file_type().is_file() {
                    out.push(entry.into_path());
                }
            }
        } else {
            out.push(p.clone());
        }
    }
    out
}

/// Load one wordlist file. An unreadable file is recoverable: logged and
/// treated as empty rather than aborting the run.
pub fn load_wordlist(path: &Path) -> Vec<Vec<u8>> {
    match std::fs::read(path) {
        Ok(content) => split_lines(&content),
        Err(e) => {
            warn!(path = %path.display(), %e, "failed to read wordlist, skipping");
            Vec::new()
        }
    }
}
