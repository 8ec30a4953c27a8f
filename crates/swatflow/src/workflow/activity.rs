use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Persistent text log of control decisions, kept next to the workflow files
/// so that it survives the scheduler's own log rotation.
pub struct ActivityLog {
    path: PathBuf,
}

impl ActivityLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&self, message: &str) -> crate::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        for line in message.lines() {
            writeln!(file, "[{timestamp}] {line}")?;
        }
        Ok(())
    }

    /// Records a message and mirrors it into the process log.
    /// Failing to write the activity log must not change the outcome of the caller.
    pub fn record_or_warn(&self, message: &str) {
        if let Err(error) = self.record(message) {
            log::warn!(
                "Cannot write to activity log {}: {error}",
                self.path.display()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ActivityLog;
    use tempfile::TempDir;

    #[test]
    fn test_record_appends_lines() {
        let dir = TempDir::new().unwrap();
        let log = ActivityLog::new(dir.path().join("logs/post_script.log"));
        log.record("first").unwrap();
        log.record("second\nthird").unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with('[') && lines[0].ends_with("] first"));
        assert!(lines[2].ends_with("] third"));
    }
}
