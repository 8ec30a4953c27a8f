use crate::scheduler::BatchScheduler;
use crate::workflow::dag::{remove_files, stale_dag_files};
use crate::workflow::signal::ContinueDecision;
use crate::workflow::state::WorkflowState;

#[derive(Debug, Clone, PartialEq)]
pub enum TriggerOutcome {
    /// The workflow was submitted again and the signal file was consumed
    Resubmitted { cluster_id: Option<String> },
    /// No continuation was requested
    Finished { signal_removed: bool },
    /// Continuation was requested but could not be performed, the signal file is retained
    Failed { reason: String },
}

impl TriggerOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, TriggerOutcome::Failed { .. })
    }
}

/// Decides whether the workflow continues after a finished stage and, if so,
/// resubmits the top-level DAG.
///
/// Failures are not returned as errors. They are written to the activity log and
/// reported through [`TriggerOutcome::Failed`], because the caller usually runs as a
/// DAGMan POST script whose exit code would otherwise mark the stage as failed.
pub async fn run_trigger(state: &WorkflowState, scheduler: &dyn BatchScheduler) -> TriggerOutcome {
    let activity = state.activity_log();
    let signal = state.signal_file();

    let fail = |reason: String| {
        log::error!("{reason}");
        activity.record_or_warn(&format!("ERROR: {reason}"));
        TriggerOutcome::Failed { reason }
    };

    let decision = match signal.read_decision() {
        Ok(decision) => decision,
        Err(error) => {
            return fail(format!(
                "Cannot read signal file {}: {error}",
                signal.path().display()
            ));
        }
    };

    if decision == ContinueDecision::Stop {
        log::info!("No continuation requested, the workflow is finished");
        activity.record_or_warn("Signal file does not request continuation, workflow finished");
        let mut signal_removed = false;
        if state.config().workflow.remove_signal_on_stop {
            match signal.remove() {
                Ok(removed) => signal_removed = removed,
                Err(error) => log::warn!(
                    "Cannot remove signal file {}: {error}",
                    signal.path().display()
                ),
            }
        }
        return TriggerOutcome::Finished { signal_removed };
    }

    let dag_file = state.dag_file();
    log::info!("Continuation requested, resubmitting {}", dag_file.display());
    activity.record_or_warn(&format!(
        "Continuation requested, resubmitting {}",
        dag_file.display()
    ));

    let removed = match stale_dag_files(&dag_file).and_then(remove_files) {
        Ok(removed) => removed,
        Err(error) => return fail(format!("Cannot remove stale DAG files: {error}")),
    };
    if !removed.is_empty() {
        log::info!("Removed {} stale DAG file(s)", removed.len());
    }

    let output = match scheduler.submit_dag(&dag_file, true).await {
        Ok(output) => output,
        Err(error) => return fail(format!("Resubmission could not be started: {error:?}")),
    };
    if !output.success() {
        return fail(format!(
            "Resubmission failed with exit code {}, keeping signal file {}\nStderr: {}\nStdout: {}",
            output.exit_code,
            signal.path().display(),
            output.stderr,
            output.stdout
        ));
    }

    if let Err(error) = signal.remove() {
        log::warn!(
            "Cannot remove signal file {}: {error}",
            signal.path().display()
        );
    }
    let message = match &output.cluster_id {
        Some(cluster_id) => format!("Resubmission succeeded (cluster {cluster_id})"),
        None => "Resubmission succeeded".to_string(),
    };
    log::info!("{message}");
    activity.record_or_warn(&message);

    TriggerOutcome::Resubmitted {
        cluster_id: output.cluster_id,
    }
}
