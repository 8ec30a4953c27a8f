use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use anyhow::Context;
use bstr::ByteSlice;

use crate::common::config::SchedulerConfig;
use crate::common::env::USER_ENV;
use crate::scheduler::common::{check_command_output, exit_code, run_program};
use crate::scheduler::{BatchScheduler, SchedulerResult, SubmitOutput};

/// Drives HTCondor through `condor_submit_dag` and `condor_rm`.
pub struct CondorScheduler {
    submit_dag_program: String,
    remove_program: String,
}

impl CondorScheduler {
    pub fn new(config: &SchedulerConfig) -> Self {
        Self {
            submit_dag_program: config.submit_dag_program.clone(),
            remove_program: config.remove_program.clone(),
        }
    }
}

impl BatchScheduler for CondorScheduler {
    fn submit_dag(
        &self,
        dag_file: &Path,
        force: bool,
    ) -> Pin<Box<dyn Future<Output = SchedulerResult<SubmitOutput>>>> {
        let program = self.submit_dag_program.clone();
        let dag_file = dag_file.to_path_buf();

        Box::pin(async move {
            // DAGMan writes its files next to the DAG, so it is submitted from the DAG directory
            let workdir = match dag_file.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => std::env::current_dir()?,
            };
            let dag_name = dag_file
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .ok_or_else(|| anyhow::anyhow!("Invalid DAG path {}", dag_file.display()))?;

            let mut args = vec![];
            if force {
                args.push("-f");
            }
            args.push(dag_name.as_str());

            let output = run_program(&program, &args, &workdir).await?;
            let stdout = output.stdout.to_str_lossy().trim().to_string();
            let stderr = output.stderr.to_str_lossy().trim().to_string();
            log::debug!("{program} output: {stdout}");

            Ok(SubmitOutput {
                exit_code: exit_code(&output),
                cluster_id: parse_cluster_id(&stdout),
                stdout,
                stderr,
            })
        })
    }

    fn remove_user_jobs(&self, user: &str) -> Pin<Box<dyn Future<Output = SchedulerResult<()>>>> {
        let program = self.remove_program.clone();
        let user = user.to_string();

        Box::pin(async move {
            let workdir = std::env::current_dir()?;
            let output = run_program(&program, &[user.as_str()], &workdir).await?;
            check_command_output(output).with_context(|| format!("{program} execution failed"))?;
            Ok(())
        })
    }
}

/// Finds the cluster id in the output of `condor_submit`/`condor_submit_dag`,
/// e.g. `1 job(s) submitted to cluster 4251.`
pub fn parse_cluster_id(output: &str) -> Option<String> {
    output
        .lines()
        .map(|line| line.trim())
        .find_map(|line| line.split_once("submitted to cluster "))
        .map(|(_, rest)| rest.trim_end_matches('.').trim().to_string())
        .filter(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()))
}

/// Returns the user whose jobs are managed by this workflow.
pub fn current_user(configured: Option<&str>) -> anyhow::Result<String> {
    if let Some(user) = configured {
        return Ok(user.to_string());
    }
    match nix::unistd::User::from_uid(nix::unistd::getuid()) {
        Ok(Some(user)) => return Ok(user.name),
        Ok(None) => {}
        Err(error) => log::debug!("Cannot look up the current user: {error}"),
    }
    std::env::var(USER_ENV).context("Cannot determine the current user")
}
