use clap::Parser;

use crate::client::globalsettings::GlobalSettings;
use crate::control::trigger::{TriggerOutcome, run_trigger};
use crate::scheduler::condor::CondorScheduler;

#[derive(Parser)]
pub struct TriggerOpts {
    /// Exit with a non-zero code when the resubmission fails.
    /// By default the trigger always succeeds, so that the scheduler does not
    /// mark the stage as failed
    #[arg(long)]
    pub strict: bool,

    /// Remove the signal file when no continuation is requested
    #[arg(long)]
    pub remove_stale_signal: bool,
}

pub async fn command_trigger(gsettings: &GlobalSettings, opts: TriggerOpts) -> anyhow::Result<()> {
    let mut state = match gsettings.load_state() {
        Ok(state) => state,
        Err(error) if !opts.strict => {
            log::error!("Cannot load workflow state, no action taken: {error:?}");
            return Ok(());
        }
        Err(error) => return Err(error),
    };
    let strict = opts.strict || state.config().workflow.strict_trigger;
    if opts.remove_stale_signal {
        state.config_mut().workflow.remove_signal_on_stop = true;
    }

    let scheduler = CondorScheduler::new(&state.config().scheduler);
    match run_trigger(&state, &scheduler).await {
        TriggerOutcome::Failed { reason } if strict => {
            Err(anyhow::anyhow!("Trigger failed: {reason}"))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::{TriggerOpts, command_trigger};
    use crate::client::globalsettings::GlobalSettings;
    use crate::tests::utils::write_script;
    use std::path::Path;
    use tempfile::TempDir;

    fn opts(strict: bool, remove_stale_signal: bool) -> TriggerOpts {
        TriggerOpts {
            strict,
            remove_stale_signal,
        }
    }

    /// Workflow directory whose `condor_submit_dag` is replaced by a script exiting
    /// with `submit_exit_code`.
    fn create_workflow_dir(dir: &Path, submit_exit_code: i32, extra_config: &str) -> GlobalSettings {
        let program = write_script(
            dir,
            "submit",
            &format!("echo submitted >> submissions.txt\nexit {submit_exit_code}"),
        );
        std::fs::write(dir.join("main.dag"), "JOB prepare prepare.sub\n").unwrap();
        std::fs::write(
            dir.join("swatflow.toml"),
            format!(
                "[workflow]\n{extra_config}\n[scheduler]\nsubmit_dag_program = '{}'\n",
                program.display()
            ),
        )
        .unwrap();
        GlobalSettings::new(dir.to_path_buf(), None)
    }

    #[tokio::test]
    async fn test_trigger_invalid_config() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("swatflow.toml"), "[workflow]\nunknown = 1\n").unwrap();
        std::fs::write(dir.path().join("continue_signal.txt"), "continue").unwrap();
        let gsettings = GlobalSettings::new(dir.path().to_path_buf(), None);

        assert!(command_trigger(&gsettings, opts(false, false)).await.is_ok());
        assert!(command_trigger(&gsettings, opts(true, false)).await.is_err());
        assert!(dir.path().join("continue_signal.txt").exists());
    }

    #[tokio::test]
    async fn test_trigger_failed_submit_is_tolerated() {
        let dir = TempDir::new().unwrap();
        let gsettings = create_workflow_dir(dir.path(), 1, "");
        std::fs::write(dir.path().join("continue_signal.txt"), "continue").unwrap();

        assert!(command_trigger(&gsettings, opts(false, false)).await.is_ok());
        assert!(dir.path().join("submissions.txt").exists());
        assert!(dir.path().join("continue_signal.txt").exists());
    }

    #[tokio::test]
    async fn test_trigger_strict_from_config() {
        let dir = TempDir::new().unwrap();
        let gsettings = create_workflow_dir(dir.path(), 1, "strict_trigger = true");
        std::fs::write(dir.path().join("continue_signal.txt"), "continue").unwrap();

        assert!(command_trigger(&gsettings, opts(false, false)).await.is_err());
        assert!(dir.path().join("continue_signal.txt").exists());
    }

    #[tokio::test]
    async fn test_trigger_strict_succeeds_on_resubmission() {
        let dir = TempDir::new().unwrap();
        let gsettings = create_workflow_dir(dir.path(), 0, "");
        std::fs::write(dir.path().join("continue_signal.txt"), "continue").unwrap();

        assert!(command_trigger(&gsettings, opts(true, false)).await.is_ok());
        assert!(!dir.path().join("continue_signal.txt").exists());
    }

    #[tokio::test]
    async fn test_trigger_removes_stale_signal() {
        let dir = TempDir::new().unwrap();
        let gsettings = create_workflow_dir(dir.path(), 0, "");
        let signal = dir.path().join("continue_signal.txt");

        std::fs::write(&signal, "").unwrap();
        command_trigger(&gsettings, opts(false, false)).await.unwrap();
        assert!(signal.exists());

        command_trigger(&gsettings, opts(false, true)).await.unwrap();
        assert!(!signal.exists());
        assert!(!dir.path().join("submissions.txt").exists());
    }
}
