use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::common::error::SwatflowError;
use crate::common::utils::fs::resolve_path;
use crate::scheduler::common::create_command;

/// Calibration file and output location passed to calibration runs of the model.
#[derive(Debug, Clone)]
pub struct CalibrationArgs {
    pub calibration_file: PathBuf,
    pub output_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ModelCommand {
    pub executable: PathBuf,
    pub args: Vec<String>,
    pub calibration: Option<CalibrationArgs>,
}

impl ModelCommand {
    fn arguments(&self) -> Vec<String> {
        let mut arguments = self.args.clone();
        if let Some(calibration) = &self.calibration {
            arguments.push(calibration.calibration_file.to_string_lossy().to_string());
            arguments.push(calibration.output_path.to_string_lossy().to_string());
        }
        arguments
    }
}

/// A bare program name is looked up in `PATH`, a relative path is resolved
/// against the job directory.
fn resolve_executable(job_dir: &Path, executable: &Path) -> PathBuf {
    if executable.is_relative() && executable.components().count() > 1 {
        job_dir.join(executable)
    } else {
        executable.to_path_buf()
    }
}

/// Runs the model inside `workdir` and fails if it does not exit successfully.
/// Standard streams are inherited, so the model output ends up in the job logs.
pub async fn run_model(model: &ModelCommand, job_dir: &Path, workdir: &Path) -> crate::Result<()> {
    let workdir = resolve_path(job_dir, workdir);
    std::fs::create_dir_all(&workdir)?;

    let executable = resolve_executable(job_dir, &model.executable);
    let executable = executable.to_string_lossy().to_string();
    let arguments = model.arguments();

    let mut command_args: Vec<&str> = vec![executable.as_str()];
    command_args.extend(arguments.iter().map(|a| a.as_str()));
    let command_line = command_args.join(" ");
    log::info!("Running `{command_line}` in {}", workdir.display());

    let mut command = create_command(command_args, &workdir);
    let status = command
        .status()
        .await
        .with_context(|| format!("Cannot start model executable {executable}"))?;
    if !status.success() {
        return Err(SwatflowError::CommandError {
            command: command_line,
            code: status.code().unwrap_or(-1),
            stderr: String::new(),
            stdout: String::new(),
        });
    }
    log::info!("Model finished successfully");
    Ok(())
}
