//! Whole-file writes and marker-region splicing for generated output

use regex::{NoExpand, Regex};
use std::fs;
use std::path::{Path, PathBuf};
use transpile_core::{TranspileError, TranspileResult};
use walkdir::WalkDir;

pub fn read_file(path: &Path) -> TranspileResult<String> {
    fs::read_to_string(path).map_err(|e| TranspileError::file_access(path, e))
}

/// Regular files directly inside `dir`, sorted by file name
pub fn list_files(dir: &Path) -> TranspileResult<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| TranspileError::file_access(dir, std::io::Error::from(e)))?;
        if entry.file_type().is_file() {
            found.push(entry.into_path());
        }
    }
    Ok(found)
}

/// Replace the file's contents, creating missing parent directories
pub fn overwrite_file(path: &Path, contents: &str) -> TranspileResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| TranspileError::file_access(parent, e))?;
        }
    }
    fs::write(path, contents).map_err(|e| TranspileError::file_access(path, e))
}

/// Replace the first match of `region` in the file with `replacement`, taken literally.
///
/// Returns `false` (and leaves the file untouched) when the region is absent.
pub fn replace_in_file(path: &Path, region: &Regex, replacement: &str) -> TranspileResult<bool> {
    let contents = read_file(path)?;
    if !region.is_match(&contents) {
        log::warn!("{}: no region matching {} found, file left unchanged", path.display(), region.as_str());
        return Ok(false);
    }
    let spliced = region.replace(&contents, NoExpand(replacement));
    overwrite_file(path, &spliced)?;
    Ok(true)
}
