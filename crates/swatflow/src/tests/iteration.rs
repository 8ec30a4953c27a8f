use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::common::config::SwatflowConfig;
use crate::control::generation::{check_generation, prepare_generation};
use crate::control::reset::run_reset;
use crate::control::trigger::{TriggerOutcome, run_trigger};
use crate::tests::utils::{MockScheduler, create_workflow};

/// Drives the whole loop the way DAGMan would: reset, then prepare/workers/check and
/// the trigger for every generation, until the trigger stops resubmitting.
#[tokio::test]
async fn test_iterate_until_limit() {
    let mut config = SwatflowConfig::default();
    config.workflow.jobs_per_iteration = 2;
    config.workflow.max_iterations = 3;
    let (dir, state) = create_workflow(config);
    std::fs::write(dir.path().join("main.dag"), "").unwrap();

    let scheduler = MockScheduler::new(0);
    let mut rng = StdRng::seed_from_u64(0);

    run_reset(&state, &scheduler, "jdoe").await.unwrap();
    assert_eq!(scheduler.submit_count(), 1);

    let mut outcomes = vec![];
    loop {
        let prepared = prepare_generation(&state, &mut rng).unwrap();
        for run_dir in &prepared.run_dirs {
            std::fs::write(run_dir.join("efficiency.txt"), "0.5").unwrap();
        }
        check_generation(&state).unwrap();
        let outcome = run_trigger(&state, &scheduler).await;
        let finished = matches!(outcome, TriggerOutcome::Finished { .. });
        outcomes.push(outcome);
        if finished {
            break;
        }
        assert!(outcomes.len() < 10, "The workflow does not terminate");
    }

    assert_eq!(outcomes.len(), 3);
    // Initial submission and two resubmissions
    assert_eq!(scheduler.submit_count(), 3);
    assert_eq!(state.counter().read().unwrap(), Some(3));

    let results = std::fs::read_to_string(state.results().path()).unwrap();
    let lines: Vec<&str> = results.lines().collect();
    assert_eq!(lines[0], "generation,run_id,efficiency");
    assert_eq!(lines.len(), 1 + 3 * 2);
    assert_eq!(lines[6], "3,1,0.5");
}
