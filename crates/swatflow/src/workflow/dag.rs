use std::fmt::Write;
use std::path::{Path, PathBuf};

use crate::common::utils::fs::{list_with_prefix, remove_file_if_exists};

/// Suffixes of files that DAGMan keeps next to a running or failed DAG and that
/// block a forced resubmission.
const STALE_SUFFIXES: [&str; 2] = ["lock", "nodes.log"];
const RESCUE_SUFFIX: &str = "rescue";

/// A single worker node of a generated sub-DAG.
pub struct DagNode {
    pub name: String,
    pub submit_file: String,
    pub vars: Vec<(&'static str, String)>,
}

pub fn render_dag(nodes: &[DagNode]) -> String {
    let mut dag = String::new();
    for node in nodes {
        writeln!(dag, "JOB {} {}", node.name, node.submit_file).unwrap();
        for (key, value) in &node.vars {
            writeln!(dag, "VARS {} {}=\"{}\"", node.name, key, escape_value(value)).unwrap();
        }
        dag.push('\n');
    }
    dag
}

/// DAGMan macro values are enclosed in double quotes, inner quotes and
/// backslashes have to be escaped.
fn escape_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn dag_dir_and_name(dag_file: &Path) -> Option<(PathBuf, String)> {
    let name = dag_file.file_name()?.to_string_lossy().to_string();
    let dir = match dag_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Some((dir, name))
}

/// Lock, node log and rescue files of `dag_file` that currently exist.
pub fn stale_dag_files(dag_file: &Path) -> crate::Result<Vec<PathBuf>> {
    let Some((dir, name)) = dag_dir_and_name(dag_file) else {
        return Ok(vec![]);
    };
    let mut files: Vec<PathBuf> = STALE_SUFFIXES
        .iter()
        .map(|suffix| dir.join(format!("{name}.{suffix}")))
        .filter(|path| path.exists())
        .collect();
    files.extend(list_with_prefix(&dir, &format!("{name}.{RESCUE_SUFFIX}"))?);
    Ok(files)
}

/// Every file generated by the scheduler for `dag_file` (`<dag>.*`), including
/// submission files, DAGMan logs, lock, metrics and rescue files.
pub fn generated_dag_artifacts(dag_file: &Path) -> crate::Result<Vec<PathBuf>> {
    let Some((dir, name)) = dag_dir_and_name(dag_file) else {
        return Ok(vec![]);
    };
    Ok(list_with_prefix(&dir, &format!("{name}."))?)
}

/// Removes all files in `paths`, returning the ones that were actually removed.
pub fn remove_files(paths: Vec<PathBuf>) -> crate::Result<Vec<PathBuf>> {
    let mut removed = vec![];
    for path in paths {
        if remove_file_if_exists(&path)? {
            log::debug!("Removed {}", path.display());
            removed.push(path);
        }
    }
    Ok(removed)
}
