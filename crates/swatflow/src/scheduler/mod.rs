use std::future::Future;
use std::path::Path;
use std::pin::Pin;

pub mod common;
pub mod condor;

pub type SchedulerResult<T> = anyhow::Result<T>;

/// Result of a workflow submission.
/// A non-zero exit code is not an error, callers decide what to do with it.
#[derive(Debug, Clone)]
pub struct SubmitOutput {
    pub exit_code: i32,
    /// Cluster id reported by the scheduler, if it could be found in its output.
    pub cluster_id: Option<String>,
    pub stdout: String,
    pub stderr: String,
}

impl SubmitOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Handler that drives an external batch scheduler through its command-line tools.
pub trait BatchScheduler {
    /// Submits a DAG workflow. With `force`, previously generated submission files
    /// are overwritten.
    fn submit_dag(
        &self,
        dag_file: &Path,
        force: bool,
    ) -> Pin<Box<dyn Future<Output = SchedulerResult<SubmitOutput>>>>;

    /// Removes all queued and running jobs of `user`.
    fn remove_user_jobs(&self, user: &str) -> Pin<Box<dyn Future<Output = SchedulerResult<()>>>>;
}
