//! Entrypoint executed by a worker job on an allocated compute slot.
//!
//! The worker is fail-fast: every step either completes, finishes with a tolerated
//! condition, or returns an error that aborts the whole job.

use std::path::{Path, PathBuf};

pub mod archive;
pub mod model;
pub mod outputs;

use crate::common::utils::fs::{absolute_path, resolve_path};
use crate::worker::archive::extract_archive;
use crate::worker::model::{ModelCommand, run_model};
use crate::worker::outputs::ensure_outputs;

#[derive(Debug, Clone, PartialEq)]
pub enum ToleratedCondition {
    /// Expected outputs that were missing and replaced by empty placeholders
    MissingOutputs(Vec<PathBuf>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Completed,
    Tolerated(ToleratedCondition),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerStep {
    ExtractArchive,
    RunModel,
    CheckOutputs,
}

pub struct WorkerJob {
    /// Working directory of the job, where the scheduler transferred the inputs
    pub job_dir: PathBuf,
    pub archives: Vec<PathBuf>,
    pub model: ModelCommand,
    /// Directory where the model is executed, relative to `job_dir`
    pub model_dir: PathBuf,
    pub expected_outputs: Vec<PathBuf>,
}

#[derive(Debug, Default)]
pub struct WorkerReport {
    pub steps: Vec<(WorkerStep, StepOutcome)>,
}

impl WorkerReport {
    pub fn tolerated(&self) -> impl Iterator<Item = &ToleratedCondition> {
        self.steps.iter().filter_map(|(_, outcome)| match outcome {
            StepOutcome::Tolerated(condition) => Some(condition),
            StepOutcome::Completed => None,
        })
    }

    pub fn placeholders(&self) -> Vec<&Path> {
        self.tolerated()
            .flat_map(|condition| match condition {
                ToleratedCondition::MissingOutputs(paths) => paths.iter().map(|p| p.as_path()),
            })
            .collect()
    }
}

async fn extract_step(job: &WorkerJob, job_dir: &Path) -> crate::Result<StepOutcome> {
    for archive in &job.archives {
        let archive = resolve_path(job_dir, archive);
        extract_archive(&archive, job_dir).await?;
    }
    Ok(StepOutcome::Completed)
}

async fn model_step(job: &WorkerJob, job_dir: &Path) -> crate::Result<StepOutcome> {
    run_model(&job.model, job_dir, &job.model_dir).await?;
    Ok(StepOutcome::Completed)
}

fn outputs_step(job: &WorkerJob, job_dir: &Path) -> crate::Result<StepOutcome> {
    let placeholders = ensure_outputs(job_dir, &job.expected_outputs)?;
    if placeholders.is_empty() {
        Ok(StepOutcome::Completed)
    } else {
        Ok(StepOutcome::Tolerated(ToleratedCondition::MissingOutputs(
            placeholders,
        )))
    }
}

/// Extracts the inputs, runs the model and checks its outputs.
/// The first fatal error stops the job; later steps are not executed.
pub async fn run_worker(job: &WorkerJob) -> crate::Result<WorkerReport> {
    let job_dir = absolute_path(job.job_dir.clone())?;
    let mut report = WorkerReport::default();

    report
        .steps
        .push((WorkerStep::ExtractArchive, extract_step(job, &job_dir).await?));
    report
        .steps
        .push((WorkerStep::RunModel, model_step(job, &job_dir).await?));
    report
        .steps
        .push((WorkerStep::CheckOutputs, outputs_step(job, &job_dir)?));

    Ok(report)
}
