use std::path::{Path, PathBuf};

use crate::common::config::SwatflowConfig;
use crate::common::utils::fs::resolve_path;
use crate::workflow::activity::ActivityLog;
use crate::workflow::counter::IterationCounter;
use crate::workflow::results::ResultsFile;
use crate::workflow::signal::SignalFile;

/// Handle to the persisted state of a workflow rooted in a directory.
pub struct WorkflowState {
    root: PathBuf,
    config: SwatflowConfig,
}

impl WorkflowState {
    pub fn new(root: PathBuf, config: SwatflowConfig) -> Self {
        Self { root, config }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &SwatflowConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SwatflowConfig {
        &mut self.config
    }

    /// Resolves a configured path against the workflow directory.
    pub fn path<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        resolve_path(&self.root, path.as_ref())
    }

    pub fn dag_file(&self) -> PathBuf {
        self.path(&self.config.workflow.dag_file)
    }

    pub fn signal_file(&self) -> SignalFile {
        SignalFile::new(
            self.path(&self.config.workflow.signal_file),
            self.config.workflow.continue_token.clone(),
        )
    }

    pub fn counter(&self) -> IterationCounter {
        IterationCounter::new(self.path(&self.config.workflow.state_file))
    }

    pub fn results(&self) -> ResultsFile {
        ResultsFile::new(self.path(&self.config.workflow.results_file))
    }

    pub fn activity_log(&self) -> ActivityLog {
        ActivityLog::new(self.path(&self.config.workflow.activity_log))
    }

    pub fn runs_dir(&self) -> PathBuf {
        self.path(&self.config.workflow.runs_dir)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.path(&self.config.workflow.log_dir)
    }

    /// Directory of a single run as it is written into the sub-DAG,
    /// i.e. relative to the workflow directory unless `runs_dir` is absolute.
    pub fn run_dir_entry(&self, generation: u32, run_id: u32) -> PathBuf {
        self.config
            .workflow
            .runs_dir
            .join(format!("gen_{generation}"))
            .join(format!("run_{run_id}"))
    }

    pub fn run_dir(&self, generation: u32, run_id: u32) -> PathBuf {
        self.path(self.run_dir_entry(generation, run_id))
    }

    pub fn sub_dag_name(&self, generation: u32) -> String {
        format!("{}_gen_{generation}.dag", self.config.workflow.sub_dag_prefix)
    }

    pub fn sub_dag_file(&self, generation: u32) -> PathBuf {
        self.root.join(self.sub_dag_name(generation))
    }

    pub fn current_sub_dag_link(&self) -> PathBuf {
        self.root
            .join(format!("{}_current.dag", self.config.workflow.sub_dag_prefix))
    }
}
