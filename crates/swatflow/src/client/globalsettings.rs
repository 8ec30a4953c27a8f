use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::DEFAULT_CONFIG_FILE;
use crate::common::config::SwatflowConfig;
use crate::common::utils::fs::{absolute_path, resolve_path};
use crate::workflow::state::WorkflowState;

pub struct GlobalSettings {
    workflow_dir: PathBuf,
    config_path: Option<PathBuf>,
}

impl GlobalSettings {
    pub fn new(workflow_dir: PathBuf, config_path: Option<PathBuf>) -> Self {
        GlobalSettings {
            workflow_dir,
            config_path,
        }
    }

    pub fn workflow_directory(&self) -> &Path {
        &self.workflow_dir
    }

    /// An explicitly passed configuration file has to exist,
    /// the default one is optional.
    pub fn load_config(&self) -> anyhow::Result<SwatflowConfig> {
        let (path, required) = match &self.config_path {
            Some(path) => (resolve_path(&self.workflow_dir, path), true),
            None => (self.workflow_dir.join(DEFAULT_CONFIG_FILE), false),
        };
        SwatflowConfig::load(&path, required)
            .with_context(|| format!("Cannot load configuration {}", path.display()))
    }

    pub fn load_state(&self) -> anyhow::Result<WorkflowState> {
        let root = absolute_path(self.workflow_dir.clone())
            .context("Cannot resolve workflow directory")?;
        Ok(WorkflowState::new(root, self.load_config()?))
    }
}
