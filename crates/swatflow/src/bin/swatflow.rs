use std::io;

use clap::{CommandFactory, FromArgMatches};
use clap_complete::generate;

use swatflow::client::commands::controller::command_controller;
use swatflow::client::commands::reset::command_reset;
use swatflow::client::commands::trigger::command_trigger;
use swatflow::client::commands::worker::command_worker;
use swatflow::client::globalsettings::GlobalSettings;
use swatflow::common::cli::{CommonOpts, GenerateCompletionOpts, RootOptions, SubCommand};
use swatflow::common::setup::setup_logging;

fn make_global_settings(opts: CommonOpts) -> GlobalSettings {
    let workflow_dir = opts.workflow_dir.unwrap_or_else(|| ".".into());
    GlobalSettings::new(workflow_dir, opts.config)
}

fn generate_completion(opts: GenerateCompletionOpts) -> anyhow::Result<()> {
    let generator = opts.shell;

    let mut app = RootOptions::command();
    eprintln!("Generating completion file for {generator}...");
    generate(generator, &mut app, "swatflow", &mut io::stdout());
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> swatflow::Result<()> {
    let matches = RootOptions::command().get_matches();
    let top_opts = match RootOptions::from_arg_matches(&matches) {
        Ok(opts) => opts,
        Err(error) => error.exit(),
    };

    setup_logging(top_opts.common.debug);

    let gsettings = make_global_settings(top_opts.common);

    let result: anyhow::Result<i32> = match top_opts.subcmd {
        SubCommand::Worker(opts) => command_worker(&gsettings, opts).await.map(|_| 0),
        SubCommand::Trigger(opts) => command_trigger(&gsettings, opts).await.map(|_| 0),
        SubCommand::Reset(opts) => command_reset(&gsettings, opts).await,
        SubCommand::Controller(opts) => command_controller(&gsettings, opts).map(|_| 0),
        SubCommand::GenerateCompletion(opts) => generate_completion(opts).map(|_| 0),
    };

    match result {
        Ok(0) => Ok(()),
        Ok(code) => std::process::exit(code),
        Err(e) => {
            log::error!("{e:?}");
            std::process::exit(1);
        }
    }
}
