use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use crate::client::globalsettings::GlobalSettings;
use crate::common::utils::fs::absolute_path;
use crate::worker::model::{CalibrationArgs, ModelCommand};
use crate::worker::{WorkerJob, run_worker};

#[derive(Parser)]
pub struct WorkerOpts {
    /// Input archive extracted into the job directory before the model runs.
    /// Can be used multiple times. Overrides `worker.archives` from the configuration
    #[arg(long = "archive", value_name = "PATH")]
    pub archives: Vec<PathBuf>,

    /// Model executable (binary or interpreter).
    /// Overrides `worker.executable` from the configuration
    #[arg(long, value_hint = clap::ValueHint::CommandName)]
    pub executable: Option<PathBuf>,

    /// Argument passed to the executable before the calibration pair.
    /// Can be used multiple times. Overrides `worker.args` from the configuration
    #[arg(long = "arg", value_name = "ARG", allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// Directory where the model is executed, relative to the job directory.
    /// Overrides `worker.workdir` from the configuration
    #[arg(long)]
    pub workdir: Option<PathBuf>,

    /// Output file that has to exist after the model finishes.
    /// Can be used multiple times. Overrides `worker.expected_outputs` from the configuration
    #[arg(long = "expected-output", value_name = "PATH")]
    pub expected_outputs: Vec<PathBuf>,

    /// Job directory. Default: current working directory
    #[arg(long, value_hint = clap::ValueHint::DirPath)]
    pub job_dir: Option<PathBuf>,

    /// Calibration file passed to the model
    #[arg(requires = "output_path")]
    pub calibration_file: Option<PathBuf>,

    /// Output location passed to the model after the calibration file
    pub output_path: Option<PathBuf>,
}

fn or_configured<T: Clone>(values: Vec<T>, configured: &[T]) -> Vec<T> {
    if values.is_empty() {
        configured.to_vec()
    } else {
        values
    }
}

pub async fn command_worker(gsettings: &GlobalSettings, opts: WorkerOpts) -> anyhow::Result<()> {
    let config = gsettings.load_config()?.worker;

    let executable = opts
        .executable
        .or(config.executable)
        .context("No model executable configured, use --executable or `worker.executable`")?;
    let job_dir = match opts.job_dir {
        Some(dir) => absolute_path(dir).context("Cannot resolve job directory")?,
        None => std::env::current_dir().context("Cannot get current working directory")?,
    };
    let calibration = match (opts.calibration_file, opts.output_path) {
        (Some(calibration_file), Some(output_path)) => Some(CalibrationArgs {
            calibration_file,
            output_path,
        }),
        _ => None,
    };

    let job = WorkerJob {
        job_dir,
        archives: or_configured(opts.archives, &config.archives),
        model: ModelCommand {
            executable,
            args: or_configured(opts.args, &config.args),
            calibration,
        },
        model_dir: opts
            .workdir
            .or(config.workdir)
            .unwrap_or_else(|| PathBuf::from(".")),
        expected_outputs: or_configured(opts.expected_outputs, &config.expected_outputs),
    };

    let report = run_worker(&job).await?;
    let placeholders = report.placeholders();
    if placeholders.is_empty() {
        log::info!("Worker finished, all expected outputs are present");
    } else {
        log::warn!(
            "Worker finished, {} expected output(s) replaced by empty placeholders: {}",
            placeholders.len(),
            placeholders
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    Ok(())
}
