use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

const RESULTS_HEADER: &str = "generation,run_id,efficiency";
const MISSING_VALUE: &str = "NA";

#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub generation: u32,
    pub run_id: u32,
    /// `None` when the run did not produce a result
    pub efficiency: Option<String>,
}

/// Append-only CSV file with results of all generations.
pub struct ResultsFile {
    path: PathBuf,
}

impl ResultsFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the file, truncating any previous content.
    pub fn create_empty(&self) -> crate::Result<()> {
        std::fs::File::create(&self.path)?;
        Ok(())
    }

    /// Appends rows, writing the header first if the file is missing or empty.
    pub fn append(&self, rows: &[ResultRow]) -> crate::Result<()> {
        let needs_header = std::fs::metadata(&self.path)
            .map(|m| m.len() == 0)
            .unwrap_or(true);

        let mut content = String::new();
        if needs_header {
            writeln!(content, "{RESULTS_HEADER}").unwrap();
        }
        for row in rows {
            writeln!(
                content,
                "{},{},{}",
                row.generation,
                row.run_id,
                format_field(row.efficiency.as_deref().unwrap_or(MISSING_VALUE))
            )
            .unwrap();
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

/// Quotes a CSV field if it contains a separator, a quote or a line break.
fn format_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
