//! External command execution with per-call timeouts
//!
//! Every collector and probe goes through the [`CommandRunner`] trait, so
//! tests can replace the operating system with scripted tool output.

use async_trait::async_trait;
use std::{io, process::Stdio, time::Duration};
use thiserror::Error;
use tokio::process::Command;

/// Captured result of a finished process.
///
/// A non-zero exit code is a normal outcome here; callers inspect
/// `exit_code` themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    /// Build an output with exit code 0
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: Some(0),
        }
    }

    /// Build an output with the given exit code and stderr
    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            exit_code: Some(exit_code),
        }
    }

    /// True when the process exited with code 0
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Ways a command can fail to produce a [`CommandOutput`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    /// Executable not found on this host
    #[error("command not found: {program}")]
    NotFound { program: String },

    /// Process exceeded its deadline and was killed
    #[error("{program} timed out after {}s", timeout.as_secs_f64())]
    Timeout { program: String, timeout: Duration },

    /// Any other spawn or wait failure
    #[error("failed to run {program}: {message}")]
    Spawn { program: String, message: String },
}

impl ProcessError {
    /// Name of the program that failed
    pub fn program(&self) -> &str {
        match self {
            Self::NotFound { program } | Self::Timeout { program, .. } | Self::Spawn { program, .. } => program,
        }
    }
}

/// Executes one external command per call
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`, killing it once `timeout` elapses
    async fn run(&self, program: &str, args: &[&str], timeout: Duration) -> Result<CommandOutput, ProcessError>;
}

/// Runner backed by real OS processes.
///
/// Environment and working directory are inherited from the parent.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, program: &str, args: &[&str], timeout: Duration) -> Result<CommandOutput, ProcessError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| spawn_error(program, &e))?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let collect = async {
            let (out, err) = tokio::join!(read_pipe(stdout), read_pipe(stderr));
            let status = child.wait().await?;
            Ok::<_, io::Error>((status, out?, err?))
        };

        let outcome = tokio::time::timeout(timeout, collect).await;

        match outcome {
            Ok(Ok((status, out, err))) => Ok(CommandOutput {
                stdout: out,
                stderr: err,
                exit_code: status.code(),
            }),
            Ok(Err(e)) => Err(ProcessError::Spawn {
                program: program.to_string(),
                message: e.to_string(),
            }),
            Err(_) => {
                let _ = child.kill().await;
                Err(ProcessError::Timeout {
                    program: program.to_string(),
                    timeout,
                })
            }
        }
    }
}

fn spawn_error(program: &str, error: &io::Error) -> ProcessError {
    if error.kind() == io::ErrorKind::NotFound {
        ProcessError::NotFound {
            program: program.to_string(),
        }
    } else {
        ProcessError::Spawn {
            program: program.to_string(),
            message: error.to_string(),
        }
    }
}

async fn read_pipe<R>(pipe: Option<R>) -> io::Result<String>
where
    R: tokio::io::AsyncRead + Unpin,
{
    use tokio::io::AsyncReadExt;

    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_output_helpers() {
        let ok = CommandOutput::ok("hello");
        assert!(ok.success());
        assert_eq!(ok.stdout, "hello");

        let failed = CommandOutput::failed(2, "boom");
        assert!(!failed.success());
        assert_eq!(failed.stderr, "boom");
    }

    #[test]
    fn test_process_error_program() {
        let err = ProcessError::Timeout {
            program: "ping".to_string(),
            timeout: Duration::from_secs(3),
        };
        assert_eq!(err.program(), "ping");
        assert!(err.to_string().contains("timed out after 3s"));
    }

    #[tokio::test]
    async fn test_missing_executable_is_not_found() {
        let runner = SystemCommandRunner::new();
        let result = runner
            .run("nha-definitely-missing-tool", &[], Duration::from_secs(1))
            .await;
        assert!(matches!(result, Err(ProcessError::NotFound { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_not_an_error() {
        let runner = SystemCommandRunner::new();
        let output = runner
            .run("sh", &["-c", "echo out; echo err >&2; exit 3"], Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(output.exit_code, Some(3));
        assert_eq!(output.stdout.trim(), "out");
        assert_eq!(output.stderr.trim(), "err");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_kills_child() {
        let runner = SystemCommandRunner::new();
        let started = std::time::Instant::now();
        let result = runner
            .run("sleep", &["5"], Duration::from_millis(200))
            .await;
        assert!(matches!(result, Err(ProcessError::Timeout { .. })));
        assert!(started.elapsed() < Duration::from_secs(4));
    }
}
