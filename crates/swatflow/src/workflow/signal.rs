use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::common::utils::fs::remove_file_if_exists;

/// Decision read from the signal file after a workflow stage finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContinueDecision {
    /// Another iteration should be submitted
    Continue,
    /// The workflow is finished
    Stop,
}

impl ContinueDecision {
    pub fn from_content(content: &str, token: &str) -> Self {
        if content.contains(token) {
            ContinueDecision::Continue
        } else {
            ContinueDecision::Stop
        }
    }
}

/// Control channel between the iteration controller and the post-processing trigger.
pub struct SignalFile {
    path: PathBuf,
    token: String,
}

impl SignalFile {
    pub fn new(path: PathBuf, token: String) -> Self {
        Self { path, token }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// A missing signal file means that nobody asked for another iteration.
    pub fn read_decision(&self) -> crate::Result<ContinueDecision> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(ContinueDecision::from_content(&content, &self.token)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(ContinueDecision::Stop),
            Err(error) => Err(error.into()),
        }
    }

    /// Writes the token for `Continue`, an empty file for `Stop`.
    pub fn write(&self, decision: ContinueDecision) -> crate::Result<()> {
        let content = match decision {
            ContinueDecision::Continue => self.token.as_str(),
            ContinueDecision::Stop => "",
        };
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn remove(&self) -> crate::Result<bool> {
        Ok(remove_file_if_exists(&self.path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::{ContinueDecision, SignalFile};
    use tempfile::TempDir;

    fn signal(dir: &TempDir) -> SignalFile {
        SignalFile::new(dir.path().join("continue_signal.txt"), "continue".into())
    }

    #[test]
    fn test_decision_from_content() {
        assert_eq!(
            ContinueDecision::from_content("continue", "continue"),
            ContinueDecision::Continue
        );
        assert_eq!(
            ContinueDecision::from_content("please continue\n", "continue"),
            ContinueDecision::Continue
        );
        assert_eq!(
            ContinueDecision::from_content("", "continue"),
            ContinueDecision::Stop
        );
        assert_eq!(
            ContinueDecision::from_content("stop", "continue"),
            ContinueDecision::Stop
        );
    }

    #[test]
    fn test_missing_signal_stops() {
        let dir = TempDir::new().unwrap();
        assert_eq!(signal(&dir).read_decision().unwrap(), ContinueDecision::Stop);
    }

    #[test]
    fn test_write_signal() {
        let dir = TempDir::new().unwrap();
        let signal = signal(&dir);
        signal.write(ContinueDecision::Continue).unwrap();
        assert_eq!(std::fs::read_to_string(signal.path()).unwrap(), "continue");
        assert_eq!(signal.read_decision().unwrap(), ContinueDecision::Continue);

        signal.write(ContinueDecision::Stop).unwrap();
        assert_eq!(std::fs::read_to_string(signal.path()).unwrap(), "");
        assert_eq!(signal.read_decision().unwrap(), ContinueDecision::Stop);

        assert!(signal.remove().unwrap());
        assert!(!signal.exists());
        assert!(!signal.remove().unwrap());
    }
}
