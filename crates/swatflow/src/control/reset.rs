use std::path::PathBuf;

use crate::common::error::error;
use crate::common::utils::fs::{list_with_prefix, remove_dir_if_exists, remove_file_if_exists};
use crate::scheduler::{BatchScheduler, SubmitOutput};
use crate::workflow::dag::generated_dag_artifacts;
use crate::workflow::state::WorkflowState;

pub struct ResetReport {
    /// Artifacts of previous runs that were deleted
    pub removed: Vec<PathBuf>,
    pub submit: SubmitOutput,
}

fn remove_path(path: PathBuf, removed: &mut Vec<PathBuf>) -> crate::Result<()> {
    let is_dir = path
        .symlink_metadata()
        .map(|m| m.is_dir())
        .unwrap_or(false);
    let existed = if is_dir {
        remove_dir_if_exists(&path)?
    } else {
        remove_file_if_exists(&path)?
    };
    if existed {
        log::debug!("Removed {}", path.display());
        removed.push(path);
    }
    Ok(())
}

/// Paths produced by previous runs of the workflow.
fn previous_artifacts(state: &WorkflowState) -> crate::Result<Vec<PathBuf>> {
    let workflow = &state.config().workflow;
    let mut paths = generated_dag_artifacts(&state.dag_file())?;
    // Sub-DAGs of all generations, their DAGMan files and the `current` symlink
    paths.extend(list_with_prefix(
        state.root(),
        &format!("{}_", workflow.sub_dag_prefix),
    )?);
    paths.extend([
        state.runs_dir(),
        state.results().path().to_path_buf(),
        state.counter().path().to_path_buf(),
        state.signal_file().path().to_path_buf(),
        state.activity_log().path().to_path_buf(),
        state.log_dir(),
    ]);
    paths.extend(workflow.extra_artifacts.iter().map(|path| state.path(path)));
    Ok(paths)
}

/// Brings the workflow directory into its initial state and submits the top-level DAG.
///
/// After a reset, the iteration counter contains `0` and the results file is empty,
/// independently of what was left behind by previous runs. Queued jobs and old
/// artifacts are removed even when the DAG file is missing; only the submission fails.
pub async fn run_reset(
    state: &WorkflowState,
    scheduler: &dyn BatchScheduler,
    user: &str,
) -> crate::Result<ResetReport> {
    // `condor_rm` fails when the user has no jobs, which is the usual case
    if let Err(error) = scheduler.remove_user_jobs(user).await {
        log::warn!("Cannot remove jobs of user {user}: {error:?}");
    } else {
        log::info!("Removed queued jobs of user {user}");
    }

    let artifacts = previous_artifacts(state)?;
    if let Some(path) = artifacts.iter().find(|path| state.root().starts_with(path)) {
        return error(format!(
            "Refusing to remove {}, it contains the workflow directory",
            path.display()
        ));
    }
    let mut removed = vec![];
    for path in artifacts {
        remove_path(path, &mut removed)?;
    }
    log::info!("Removed {} artifact(s) of previous runs", removed.len());

    state.counter().write(0)?;
    state.results().create_empty()?;
    std::fs::create_dir_all(state.log_dir())?;

    let activity = state.activity_log();
    let dag_file = state.dag_file();
    if !dag_file.is_file() {
        activity.record_or_warn(&format!(
            "ERROR: Workflow reset, but DAG file {} does not exist",
            dag_file.display()
        ));
        return error(format!("DAG file {} does not exist", dag_file.display()));
    }
    activity.record_or_warn("Workflow reset, submitting initial DAG");

    let submit = scheduler.submit_dag(&dag_file, false).await?;
    if submit.success() {
        log::info!(
            "Submitted {}{}",
            dag_file.display(),
            submit
                .cluster_id
                .as_ref()
                .map(|id| format!(" (cluster {id})"))
                .unwrap_or_default()
        );
        activity.record_or_warn("Initial submission succeeded");
    } else {
        log::error!(
            "Submission of {} failed with exit code {}\nStderr: {}",
            dag_file.display(),
            submit.exit_code,
            submit.stderr
        );
        activity.record_or_warn(&format!(
            "ERROR: Initial submission failed with exit code {}",
            submit.exit_code
        ));
    }

    Ok(ResetReport { removed, submit })
}
