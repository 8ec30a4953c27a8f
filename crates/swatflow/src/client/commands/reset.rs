use clap::Parser;

use crate::client::globalsettings::GlobalSettings;
use crate::control::reset::run_reset;
use crate::scheduler::condor::{CondorScheduler, current_user};

#[derive(Parser)]
pub struct ResetOpts {
    /// User whose jobs are removed from the queue.
    /// Default: `scheduler.user` from the configuration or the current user
    #[arg(long)]
    pub user: Option<String>,
}

/// Returns the exit code of the initial submission.
pub async fn command_reset(gsettings: &GlobalSettings, opts: ResetOpts) -> anyhow::Result<i32> {
    let state = gsettings.load_state()?;
    let user = current_user(
        opts.user
            .as_deref()
            .or(state.config().scheduler.user.as_deref()),
    )?;

    let scheduler = CondorScheduler::new(&state.config().scheduler);
    let report = run_reset(&state, &scheduler, &user).await?;
    if !report.submit.stdout.is_empty() {
        println!("{}", report.submit.stdout);
    }
    Ok(report.submit.exit_code)
}
