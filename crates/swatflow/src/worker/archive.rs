use std::path::Path;

use bstr::ByteSlice;

use crate::common::error::{SwatflowError, error};
use crate::common::utils::fs::absolute_path;
use crate::scheduler::common::{exit_code, run_program};

const TAR_PROGRAM: &str = "tar";

/// Extracts `archive` into `destination`.
/// The compression (gzip, bzip2, xz, ...) is detected by `tar` itself.
pub async fn extract_archive(archive: &Path, destination: &Path) -> crate::Result<()> {
    if !archive.is_file() {
        return error(format!("Input archive {} does not exist", archive.display()));
    }
    std::fs::create_dir_all(destination)?;
    // `tar` runs inside `destination`, relative paths would be resolved twice
    let archive = absolute_path(archive.to_path_buf())?;
    let destination = absolute_path(destination.to_path_buf())?;

    let archive_arg = archive.to_string_lossy().to_string();
    let destination_arg = destination.to_string_lossy().to_string();
    let args = ["-xf", archive_arg.as_str(), "-C", destination_arg.as_str()];
    let output = run_program(TAR_PROGRAM, &args, &destination).await?;
    if !output.status.success() {
        return Err(SwatflowError::CommandError {
            command: format!("{TAR_PROGRAM} {}", args.join(" ")),
            code: exit_code(&output),
            stderr: output.stderr.to_str_lossy().trim().to_string(),
            stdout: output.stdout.to_str_lossy().trim().to_string(),
        });
    }
    log::info!(
        "Extracted {} into {}",
        archive.display(),
        destination.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::extract_archive;
    use crate::common::error::SwatflowError;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_extract_archive() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src");
        std::fs::create_dir_all(source.join("TxtInOut")).unwrap();
        std::fs::write(source.join("TxtInOut/file.cio"), "cio").unwrap();
        let status = std::process::Command::new("tar")
            .args(["-czf", "../input.tar.gz", "TxtInOut"])
            .current_dir(&source)
            .status()
            .unwrap();
        assert!(status.success());

        let job_dir = dir.path().join("job");
        extract_archive(&dir.path().join("input.tar.gz"), &job_dir)
            .await
            .unwrap();
        assert_eq!(
            std::fs::read_to_string(job_dir.join("TxtInOut/file.cio")).unwrap(),
            "cio"
        );
    }

    #[tokio::test]
    async fn test_extract_missing_archive() {
        let dir = TempDir::new().unwrap();
        let result = extract_archive(&dir.path().join("missing.tar.gz"), dir.path()).await;
        assert!(matches!(result, Err(SwatflowError::GenericError(_))));
    }

    #[tokio::test]
    async fn test_extract_corrupted_archive() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("broken.tar.gz");
        std::fs::write(&archive, "this is not an archive").unwrap();
        let result = extract_archive(&archive, &dir.path().join("out")).await;
        assert!(matches!(result, Err(SwatflowError::CommandError { .. })));
    }
}
