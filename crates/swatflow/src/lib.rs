pub mod client;
pub mod common;
pub mod control;
pub mod scheduler;
pub mod worker;
pub mod workflow;

#[cfg(test)]
pub(crate) mod tests;

pub type Error = crate::common::error::SwatflowError;
pub type Result<T> = std::result::Result<T, Error>;

pub const SWATFLOW_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the configuration file looked up in the workflow directory.
pub const DEFAULT_CONFIG_FILE: &str = "swatflow.toml";
