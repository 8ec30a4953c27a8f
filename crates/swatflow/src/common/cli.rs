use std::path::PathBuf;

use clap::Parser;
use clap_complete::Shell;

use crate::client::commands::controller::ControllerOpts;
use crate::client::commands::reset::ResetOpts;
use crate::client::commands::trigger::TriggerOpts;
use crate::client::commands::worker::WorkerOpts;

// Common CLI options
#[derive(Parser)]
pub struct CommonOpts {
    /// Directory with the workflow files (DAG, signal file, iteration counter, ...)
    #[arg(
        long,
        value_hint = clap::ValueHint::DirPath,
        global = true,
        env = crate::common::env::SWATFLOW_DIR,
        help_heading("GLOBAL OPTIONS"),
        hide_short_help(true)
    )]
    pub workflow_dir: Option<PathBuf>,

    /// Path to the configuration file.
    /// Default: `swatflow.toml` in the workflow directory, if it exists
    #[arg(
        long,
        value_hint = clap::ValueHint::FilePath,
        global = true,
        env = crate::common::env::SWATFLOW_CONFIG,
        help_heading("GLOBAL OPTIONS"),
        hide_short_help(true)
    )]
    pub config: Option<PathBuf>,

    /// Enables more detailed log output
    #[arg(
        long,
        env = crate::common::env::SWATFLOW_DEBUG,
        global = true,
        help_heading("GLOBAL OPTIONS"),
        hide_short_help(true)
    )]
    pub debug: bool,
}

// Root CLI options
#[derive(Parser)]
#[command(
    author,
    about,
    version(crate::SWATFLOW_VERSION),
    disable_help_subcommand(true),
    help_expected(true)
)]
pub struct RootOptions {
    #[clap(flatten)]
    pub common: CommonOpts,

    #[clap(subcommand)]
    pub subcmd: SubCommand,
}

#[derive(Parser)]
pub enum SubCommand {
    /// Extract inputs, run the model and check its outputs (runs inside a worker job)
    Worker(WorkerOpts),
    /// Resubmit the workflow if the signal file requests another iteration
    /// (runs as a DAG POST script)
    Trigger(TriggerOpts),
    /// Remove jobs and artifacts of previous runs and submit the workflow again
    Reset(ResetOpts),
    /// Steps of the iteration controller
    Controller(ControllerOpts),
    /// Generate shell completion script
    GenerateCompletion(GenerateCompletionOpts),
}

#[derive(Parser)]
pub struct GenerateCompletionOpts {
    /// Shell flavour for which the completion script should be generated
    #[arg(value_enum)]
    pub shell: Shell,
}
