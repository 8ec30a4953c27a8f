use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rand::Rng;

use crate::common::error::SwatflowError;
use crate::common::utils::fs::create_symlink;
use crate::workflow::dag::{DagNode, render_dag};
use crate::workflow::results::ResultRow;
use crate::workflow::signal::ContinueDecision;
use crate::workflow::state::WorkflowState;

const PARAMS_FILE: &str = "params.txt";
const EFFICIENCY_FILE: &str = "efficiency.txt";
const PARAM_RANGE: std::ops::RangeInclusive<u32> = 1..=100;

pub struct PreparedGeneration {
    pub generation: u32,
    pub sub_dag: PathBuf,
    pub run_dirs: Vec<PathBuf>,
}

pub struct CheckedGeneration {
    pub generation: u32,
    pub rows: Vec<ResultRow>,
    pub decision: ContinueDecision,
}

fn node_name(run_id: u32) -> String {
    format!("run_{run_id}")
}

/// Creates run directories with sampled parameters and a sub-DAG for the next
/// generation, then advances the iteration counter.
///
/// A missing or corrupted counter starts the workflow from the first generation.
pub fn prepare_generation<R: Rng>(
    state: &WorkflowState,
    rng: &mut R,
) -> crate::Result<PreparedGeneration> {
    let workflow = &state.config().workflow;
    let counter = state.counter();
    let current = match counter.read() {
        Ok(generation) => generation.unwrap_or(0),
        Err(SwatflowError::StateError(message)) => {
            log::warn!("{message}, starting from generation 0");
            0
        }
        Err(error) => return Err(error),
    };
    let generation = current.checked_add(1).ok_or_else(|| {
        SwatflowError::StateError(format!(
            "Iteration counter {} cannot be advanced past {current}",
            counter.path().display()
        ))
    })?;
    log::info!("Preparing generation {generation}");

    let mut nodes = Vec::with_capacity(workflow.jobs_per_iteration as usize);
    let mut run_dirs = Vec::with_capacity(workflow.jobs_per_iteration as usize);
    for run_id in 0..workflow.jobs_per_iteration {
        let run_dir = state.run_dir(generation, run_id);
        std::fs::create_dir_all(&run_dir)?;
        let first = rng.random_range(PARAM_RANGE);
        let second = rng.random_range(PARAM_RANGE);
        std::fs::write(run_dir.join(PARAMS_FILE), format!("{first}\n{second}\n"))?;

        let entry = state.run_dir_entry(generation, run_id);
        let name = node_name(run_id);
        nodes.push(DagNode {
            name: name.clone(),
            submit_file: workflow.worker_submit_file.clone(),
            vars: vec![
                (
                    "ParamFile",
                    entry.join(PARAMS_FILE).to_string_lossy().to_string(),
                ),
                ("RunDir", entry.to_string_lossy().to_string()),
                ("GenNum", generation.to_string()),
                ("NodeName", name),
            ],
        });
        run_dirs.push(run_dir);
    }

    let sub_dag = state.sub_dag_file(generation);
    std::fs::write(&sub_dag, render_dag(&nodes))?;
    // Relative target, so the link survives moving the workflow directory
    create_symlink(
        &state.current_sub_dag_link(),
        Path::new(&state.sub_dag_name(generation)),
    )?;
    counter.write(generation)?;

    log::info!(
        "Generated {} parameter file(s) and sub-DAG {}",
        run_dirs.len(),
        sub_dag.display()
    );
    Ok(PreparedGeneration {
        generation,
        sub_dag,
        run_dirs,
    })
}

fn read_efficiency(path: &Path) -> crate::Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content.trim().to_string())),
        Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
        Err(error) => Err(error.into()),
    }
}

/// Appends the results of the generation that just finished and writes the signal
/// file that tells the trigger whether another generation should be submitted.
pub fn check_generation(state: &WorkflowState) -> crate::Result<CheckedGeneration> {
    let workflow = &state.config().workflow;
    let counter = state.counter();
    let generation = match counter.read()? {
        None => {
            return Err(SwatflowError::StateError(format!(
                "{} not found, cannot determine the finished generation",
                counter.path().display()
            )));
        }
        Some(0) => {
            return Err(SwatflowError::StateError(
                "Iteration counter is 0, no generation has been prepared".to_string(),
            ));
        }
        Some(generation) => generation,
    };

    log::info!("Gathering results of generation {generation}");
    let mut rows = Vec::with_capacity(workflow.jobs_per_iteration as usize);
    for run_id in 0..workflow.jobs_per_iteration {
        let path = state.run_dir(generation, run_id).join(EFFICIENCY_FILE);
        let efficiency = read_efficiency(&path)?;
        match &efficiency {
            Some(value) => log::info!("Generation {generation}, run {run_id}: efficiency {value}"),
            None => log::warn!("Result file {} not found", path.display()),
        }
        rows.push(ResultRow {
            generation,
            run_id,
            efficiency,
        });
    }
    state.results().append(&rows)?;

    let decision = if generation < workflow.max_iterations {
        log::info!(
            "Generation {generation} is below the limit of {} generations, continuing",
            workflow.max_iterations
        );
        ContinueDecision::Continue
    } else {
        log::info!("Reached generation {generation}, stopping");
        ContinueDecision::Stop
    };
    state.signal_file().write(decision)?;

    Ok(CheckedGeneration {
        generation,
        rows,
        decision,
    })
}
