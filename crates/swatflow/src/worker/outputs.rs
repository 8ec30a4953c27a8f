use std::path::{Path, PathBuf};

use crate::common::utils::fs::{create_empty_file, resolve_path};

/// Makes sure that all `expected` outputs exist in `job_dir`.
///
/// Missing files are replaced by zero-byte placeholders so that the file transfer
/// of the scheduler and downstream existence checks do not fail after a partial
/// model failure. Returns the placeholders that had to be created.
pub fn ensure_outputs(job_dir: &Path, expected: &[PathBuf]) -> crate::Result<Vec<PathBuf>> {
    let mut placeholders = vec![];
    for output in expected {
        let path = resolve_path(job_dir, output);
        if path.exists() {
            log::debug!("Found expected output {}", path.display());
            continue;
        }
        log::warn!(
            "Expected output {} is missing, creating an empty placeholder",
            path.display()
        );
        create_empty_file(&path)?;
        placeholders.push(output.clone());
    }
    Ok(placeholders)
}
