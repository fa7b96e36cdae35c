//! Directory listing and file filtering for batch runs

use crate::error::DspError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// List every regular file under `dir`, recursively, in sorted order
///
/// # Errors
///
/// Returns `DspError::InvalidInput` if `dir` is not a directory, or the
/// underlying error if part of the tree cannot be read.
pub fn files_in_dir(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, DspError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(DspError::InvalidInput(format!(
            "Not a directory: {}",
            dir.display()
        )));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();

    log::debug!("Found {} files under {}", files.len(), dir.display());
    Ok(files)
}

/// Keep only paths with a `.wav` extension (any case)
pub fn only_wav_files<I>(paths: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    paths
        .into_iter()
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map_or(false, |ext| ext.eq_ignore_ascii_case("wav"))
        })
        .collect()
}
