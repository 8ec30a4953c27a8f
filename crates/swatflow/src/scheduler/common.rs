use anyhow::Context;
use bstr::ByteSlice;
use std::path::Path;
use std::process::Output;
use tokio::process::Command;

pub fn create_command(arguments: Vec<&str>, workdir: &Path) -> Command {
    let mut command = Command::new(arguments[0]);
    command.args(&arguments[1..]);
    command.current_dir(workdir);
    command.kill_on_drop(true);
    command
}

/// Runs `program` with `args` inside `workdir` and returns its output, regardless of the exit code.
pub async fn run_program(program: &str, args: &[&str], workdir: &Path) -> anyhow::Result<Output> {
    let program_path =
        which::which(program).with_context(|| format!("Cannot find program `{program}`"))?;
    let program_path = program_path.to_string_lossy().to_string();

    let mut arguments: Vec<&str> = vec![program_path.as_str()];
    arguments.extend_from_slice(args);
    log::debug!(
        "Running command `{}` in {}",
        arguments.join(" "),
        workdir.display()
    );

    let mut command = create_command(arguments, workdir);
    command
        .output()
        .await
        .with_context(|| format!("{program} start failed"))
}

pub fn check_command_output(output: Output) -> anyhow::Result<Output> {
    let status = output.status;
    if !status.success() {
        return Err(anyhow::anyhow!(
            "Exit code: {}\nStderr: {}\nStdout: {}",
            exit_code(&output),
            output.stderr.to_str_lossy().trim(),
            output.stdout.to_str_lossy().trim()
        ));
    }
    Ok(output)
}

/// Exit code of a finished process, `-1` when it was terminated by a signal.
pub fn exit_code(output: &Output) -> i32 {
    output.status.code().unwrap_or(-1)
}
