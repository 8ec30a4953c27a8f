//! Files persisted between process invocations of a workflow.
//!
//! Each command of the workflow runs as a separate process started by the scheduler,
//! so all shared state lives in plain files inside the workflow directory.

pub mod activity;
pub mod counter;
pub mod dag;
pub mod results;
pub mod signal;
pub mod state;
