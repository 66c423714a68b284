use crate::error::DeployError;
use anyhow::Result;
use std::ffi::OsStr;
use std::path::Path;
use tokio::process::Command;
use tracing::{info, warn};

/// Exit information of a finished child process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub command: String,
    pub success: bool,
    pub code: Option<i32>,
}

impl ProcessOutcome {
    /// Turn a failed exit into an error when `strict`, otherwise only log it
    pub fn check(self, strict: bool) -> Result<Self> {
        if self.success {
            return Ok(self);
        }
        if strict {
            return Err(DeployError::ProcessFailed {
                command: self.command,
                code: self.code,
            }
            .into());
        }
        warn!(
            "`{}` exited with status {:?}; continuing anyway",
            self.command, self.code
        );
        Ok(self)
    }
}

/// Run `command` through the platform shell in `cwd` and wait for it to exit
pub async fn run_shell_command(command: &str, cwd: &Path) -> Result<ProcessOutcome> {
    let mut cmd = if cfg!(windows) {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command);
        cmd
    } else {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        cmd
    };
    cmd.current_dir(cwd);

    wait_for(cmd, command.to_string()).await
}

/// Spawn `program` with `args` in `cwd` and wait for it to exit
pub async fn run_program<I, S>(program: &Path, args: I, cwd: &Path) -> Result<ProcessOutcome>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args: Vec<S> = args.into_iter().collect();
    let command_line = std::iter::once(program.display().to_string())
        .chain(args.iter().map(|a| {
            let a: &OsStr = a.as_ref();
            a.to_string_lossy().into_owned()
        }))
        .collect::<Vec<_>>()
        .join(" ");

    let mut cmd = Command::new(program);
    cmd.args(&args).current_dir(cwd);

    wait_for(cmd, command_line).await
}

async fn wait_for(mut cmd: Command, command_line: String) -> Result<ProcessOutcome> {
    info!("Running `{}`", command_line);

    let status = cmd.status().await.map_err(|source| DeployError::Spawn {
        command: command_line.clone(),
        source,
    })?;

    Ok(ProcessOutcome {
        command: command_line,
        success: status.success(),
        code: status.code(),
    })
}
