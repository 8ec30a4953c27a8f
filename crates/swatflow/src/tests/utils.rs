use std::cell::RefCell;
use std::future::Future;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::rc::Rc;

use tempfile::TempDir;

use crate::common::config::SwatflowConfig;
use crate::scheduler::{BatchScheduler, SchedulerResult, SubmitOutput};
use crate::workflow::state::WorkflowState;

/// Writes an executable shell script into `dir` and returns its path.
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Creates a workflow in a fresh temporary directory.
pub fn create_workflow(config: SwatflowConfig) -> (TempDir, WorkflowState) {
    let dir = TempDir::new().unwrap();
    let state = WorkflowState::new(dir.path().to_path_buf(), config);
    (dir, state)
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchedulerCall {
    SubmitDag {
        dag_file: PathBuf,
        force: bool,
        /// Files that existed next to the DAG at the time of submission
        siblings: Vec<String>,
    },
    RemoveUserJobs(String),
}

/// Scheduler that records its calls and answers with a fixed exit code.
#[derive(Clone)]
pub struct MockScheduler {
    pub calls: Rc<RefCell<Vec<SchedulerCall>>>,
    pub submit_exit_code: i32,
    pub fail_remove: bool,
}

impl MockScheduler {
    pub fn new(submit_exit_code: i32) -> Self {
        Self {
            calls: Default::default(),
            submit_exit_code,
            fail_remove: false,
        }
    }

    pub fn calls(&self) -> Vec<SchedulerCall> {
        self.calls.borrow().clone()
    }

    pub fn submit_count(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, SchedulerCall::SubmitDag { .. }))
            .count()
    }
}

impl BatchScheduler for MockScheduler {
    fn submit_dag(
        &self,
        dag_file: &Path,
        force: bool,
    ) -> Pin<Box<dyn Future<Output = SchedulerResult<SubmitOutput>>>> {
        let mut siblings: Vec<String> = dag_file
            .parent()
            .and_then(|dir| std::fs::read_dir(dir).ok())
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.file_name().to_string_lossy().to_string())
                    .collect()
            })
            .unwrap_or_default();
        siblings.sort();
        self.calls.borrow_mut().push(SchedulerCall::SubmitDag {
            dag_file: dag_file.to_path_buf(),
            force,
            siblings,
        });
        let exit_code = self.submit_exit_code;
        Box::pin(async move {
            Ok(SubmitOutput {
                exit_code,
                cluster_id: (exit_code == 0).then(|| "1".to_string()),
                stdout: String::new(),
                stderr: if exit_code == 0 {
                    String::new()
                } else {
                    "submission failed".to_string()
                },
            })
        })
    }

    fn remove_user_jobs(&self, user: &str) -> Pin<Box<dyn Future<Output = SchedulerResult<()>>>> {
        self.calls
            .borrow_mut()
            .push(SchedulerCall::RemoveUserJobs(user.to_string()));
        let fail = self.fail_remove;
        Box::pin(async move {
            if fail {
                anyhow::bail!("no jobs to remove");
            }
            Ok(())
        })
    }
}
