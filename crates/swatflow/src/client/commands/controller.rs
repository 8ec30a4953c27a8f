use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::client::globalsettings::GlobalSettings;
use crate::control::generation::{check_generation, prepare_generation};

#[derive(Parser)]
pub struct ControllerOpts {
    #[clap(subcommand)]
    subcmd: ControllerCommand,
}

#[derive(Parser)]
enum ControllerCommand {
    /// Create run directories and the sub-DAG of the next generation
    Prepare(PrepareOpts),
    /// Gather results of the finished generation and write the signal file
    Check,
}

#[derive(Parser)]
struct PrepareOpts {
    /// Seed of the parameter sampler, for reproducible generations
    #[arg(long)]
    seed: Option<u64>,
}

pub fn command_controller(
    gsettings: &GlobalSettings,
    opts: ControllerOpts,
) -> anyhow::Result<()> {
    let state = gsettings.load_state()?;
    match opts.subcmd {
        ControllerCommand::Prepare(opts) => {
            let prepared = match opts.seed {
                Some(seed) => prepare_generation(&state, &mut StdRng::seed_from_u64(seed))?,
                None => prepare_generation(&state, &mut rand::rng())?,
            };
            log::info!(
                "Generation {} prepared in {}",
                prepared.generation,
                prepared.sub_dag.display()
            );
        }
        ControllerCommand::Check => {
            let checked = check_generation(&state)?;
            log::info!(
                "Generation {} checked, {} result(s) appended, decision: {:?}",
                checked.generation,
                checked.rows.len(),
                checked.decision
            );
        }
    }
    Ok(())
}
