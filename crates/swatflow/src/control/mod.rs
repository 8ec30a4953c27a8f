//! Control-flow steps of the iterative workflow, executed on the submission host.

pub mod generation;
pub mod reset;
pub mod trigger;
