use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

use crate::common::error::SwatflowError;

/// Configuration of a workflow, usually loaded from `swatflow.toml`.
///
/// Every key has a default, so an empty file (or no file at all) describes the
/// standard iterative DAG layout.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SwatflowConfig {
    pub workflow: WorkflowConfig,
    pub scheduler: SchedulerConfig,
    pub worker: WorkerConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkflowConfig {
    /// Top-level DAG submitted by `reset` and resubmitted by `trigger`.
    pub dag_file: PathBuf,
    pub signal_file: PathBuf,
    /// Iteration counter
    pub state_file: PathBuf,
    pub results_file: PathBuf,
    pub runs_dir: PathBuf,
    pub log_dir: PathBuf,
    pub activity_log: PathBuf,
    /// Sub-DAGs are named `<prefix>_gen_<N>.dag`, the current one is `<prefix>_current.dag`.
    pub sub_dag_prefix: String,
    pub worker_submit_file: String,
    pub continue_token: String,
    pub max_iterations: u32,
    pub jobs_per_iteration: u32,
    /// Remove the signal file when the trigger decides to stop.
    pub remove_signal_on_stop: bool,
    /// Make the trigger exit with a non-zero code when resubmission fails.
    pub strict_trigger: bool,
    /// Additional paths removed by `reset`.
    pub extra_artifacts: Vec<PathBuf>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            dag_file: "main.dag".into(),
            signal_file: "continue_signal.txt".into(),
            state_file: "iteration.state".into(),
            results_file: "all_results.csv".into(),
            runs_dir: "multi_runs".into(),
            log_dir: "logs".into(),
            activity_log: "post_script.log".into(),
            sub_dag_prefix: "worker_jobs".to_string(),
            worker_submit_file: "worker.sub".to_string(),
            continue_token: "continue".to_string(),
            max_iterations: 3,
            jobs_per_iteration: 5,
            remove_signal_on_stop: false,
            strict_trigger: false,
            extra_artifacts: vec![],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerConfig {
    pub submit_dag_program: String,
    pub remove_program: String,
    /// Owner of the jobs removed by `reset`. Defaults to the current user.
    pub user: Option<String>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            submit_dag_program: "condor_submit_dag".to_string(),
            remove_program: "condor_rm".to_string(),
            user: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkerConfig {
    pub executable: Option<PathBuf>,
    /// Arguments passed before the optional calibration/output pair,
    /// e.g. the script path when `executable` is an interpreter.
    pub args: Vec<String>,
    pub archives: Vec<PathBuf>,
    /// Directory (relative to the job directory) where the model is executed.
    pub workdir: Option<PathBuf>,
    pub expected_outputs: Vec<PathBuf>,
}

/// A path that names its own directory: it cannot point to the workflow directory
/// itself, the filesystem root or anything above them.
fn is_dedicated_directory(path: &Path) -> bool {
    let components: Vec<Component> = path.components().collect();
    components.iter().any(|c| matches!(c, Component::Normal(_)))
        && !components.contains(&Component::ParentDir)
}

impl SwatflowConfig {
    pub fn parse(content: &str) -> crate::Result<SwatflowConfig> {
        let config: SwatflowConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration from `path`.
    /// When `required` is false, a missing file yields the default configuration.
    pub fn load(path: &Path, required: bool) -> crate::Result<SwatflowConfig> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                log::debug!("Loading configuration from {}", path.display());
                Self::parse(&content)
            }
            Err(error) if error.kind() == std::io::ErrorKind::NotFound && !required => {
                log::debug!(
                    "Configuration file {} not found, using defaults",
                    path.display()
                );
                Ok(SwatflowConfig::default())
            }
            Err(error) => Err(SwatflowError::GenericError(format!(
                "Cannot read configuration file {}: {error}",
                path.display()
            ))),
        }
    }

    fn validate(&self) -> crate::Result<()> {
        let workflow = &self.workflow;
        if workflow.continue_token.trim().is_empty() {
            return Err(SwatflowError::DeserializationError(
                "'continue_token' must not be empty".into(),
            ));
        }
        if workflow.jobs_per_iteration == 0 {
            return Err(SwatflowError::DeserializationError(
                "'jobs_per_iteration' must be at least 1".into(),
            ));
        }
        if workflow.sub_dag_prefix.is_empty() {
            return Err(SwatflowError::DeserializationError(
                "'sub_dag_prefix' must not be empty".into(),
            ));
        }
        // Both directories are deleted as a whole by `reset`
        for (key, path) in [("runs_dir", &workflow.runs_dir), ("log_dir", &workflow.log_dir)] {
            if !is_dedicated_directory(path) {
                return Err(SwatflowError::DeserializationError(format!(
                    "'{key}' must name a dedicated subdirectory, not {:?}",
                    path.display().to_string()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::SwatflowConfig;
    use crate::common::error::SwatflowError;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = SwatflowConfig::parse("").unwrap();
        assert_eq!(config.workflow.dag_file, PathBuf::from("main.dag"));
        assert_eq!(config.workflow.continue_token, "continue");
        assert_eq!(config.workflow.max_iterations, 3);
        assert_eq!(config.workflow.jobs_per_iteration, 5);
        assert_eq!(config.scheduler.submit_dag_program, "condor_submit_dag");
        assert!(config.worker.executable.is_none());
    }

    #[test]
    fn test_read_full_config() {
        let config = SwatflowConfig::parse(
            r#"
        [workflow]
        dag_file = "swat.dag"
        max_iterations = 10
        remove_signal_on_stop = true

        [scheduler]
        user = "jdoe"

        [worker]
        executable = "/opt/swatplus/swatplus"
        archives = ["TxtInOut.tar.gz"]
        workdir = "TxtInOut"
        expected_outputs = ["TxtInOut/channel_sd_day.txt", "TxtInOut/channel_sd_mon.txt"]
        "#,
        )
        .unwrap();
        assert_eq!(config.workflow.dag_file, PathBuf::from("swat.dag"));
        assert_eq!(config.workflow.max_iterations, 10);
        assert!(config.workflow.remove_signal_on_stop);
        assert_eq!(config.workflow.signal_file, PathBuf::from("continue_signal.txt"));
        assert_eq!(config.scheduler.user.as_deref(), Some("jdoe"));
        assert_eq!(
            config.worker.executable,
            Some(PathBuf::from("/opt/swatplus/swatplus"))
        );
        assert_eq!(config.worker.expected_outputs.len(), 2);
    }

    #[test]
    fn test_reject_unknown_key() {
        let result = SwatflowConfig::parse(
            r#"
        [workflow]
        dag = "x.dag"
        "#,
        );
        assert!(matches!(
            result,
            Err(SwatflowError::DeserializationError(_))
        ));
    }

    #[test]
    fn test_reject_zero_jobs() {
        let result = SwatflowConfig::parse(
            r#"
        [workflow]
        jobs_per_iteration = 0
        "#,
        );
        assert!(matches!(
            result,
            Err(SwatflowError::DeserializationError(_))
        ));
    }

    #[test]
    fn test_reject_workflow_root_as_generated_dir() {
        for content in [
            "[workflow]\nruns_dir = \".\"",
            "[workflow]\nruns_dir = \"\"",
            "[workflow]\nlog_dir = \"/\"",
            "[workflow]\nlog_dir = \"logs/..\"",
            "[workflow]\nruns_dir = \"../other\"",
        ] {
            assert!(
                matches!(
                    SwatflowConfig::parse(content),
                    Err(SwatflowError::DeserializationError(_))
                ),
                "{content} was accepted"
            );
        }
        let config = SwatflowConfig::parse("[workflow]\nruns_dir = \"/scratch/runs\"").unwrap();
        assert_eq!(config.workflow.runs_dir, PathBuf::from("/scratch/runs"));
    }

    #[test]
    fn test_load_missing_optional_config() {
        let dir = TempDir::new().unwrap();
        let config = SwatflowConfig::load(&dir.path().join("swatflow.toml"), false).unwrap();
        assert_eq!(config.workflow.runs_dir, PathBuf::from("multi_runs"));
        assert!(SwatflowConfig::load(&dir.path().join("swatflow.toml"), true).is_err());
    }
}
