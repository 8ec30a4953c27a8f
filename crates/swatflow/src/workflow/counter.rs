use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::common::error::SwatflowError;

/// Generation number of the iterative workflow, stored as a single integer.
pub struct IterationCounter {
    path: PathBuf,
}

impl IterationCounter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `None` if the counter file does not exist.
    pub fn read(&self) -> crate::Result<Option<u32>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };
        content.trim().parse::<u32>().map(Some).map_err(|_| {
            SwatflowError::StateError(format!(
                "Invalid content {:?} in {}",
                content.trim(),
                self.path.display()
            ))
        })
    }

    pub fn write(&self, generation: u32) -> crate::Result<()> {
        std::fs::write(&self.path, generation.to_string())?;
        Ok(())
    }
}
