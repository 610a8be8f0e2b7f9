//! Subprocess execution behind a narrow, fakeable interface
//!
//! Every external tool call (git, the aggregate validator) goes through
//! `CommandExecutor`: (program, args, working directory, optional
//! timeout) in, (exit code, captured stdout/stderr) out. Tests substitute
//! a recording fake; the real implementation wraps `std::process`.

use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// One subprocess invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecRequest {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub timeout: Option<Duration>,
}

impl ExecRequest {
    pub fn new(program: impl Into<String>, args: Vec<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args,
            cwd: cwd.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Captured result of a finished subprocess
#[derive(Debug, Clone, Default)]
pub struct ExecOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("Failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} timed out after {} seconds", .timeout.as_secs())]
    Timeout { program: String, timeout: Duration },

    #[error("Failed to capture output of {program}: {source}")]
    Capture {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

pub trait CommandExecutor {
    fn run(&self, request: &ExecRequest) -> Result<ExecOutput, ExecError>;
}

/// Executor backed by real child processes
pub struct SystemExecutor;

impl CommandExecutor for SystemExecutor {
    fn run(&self, request: &ExecRequest) -> Result<ExecOutput, ExecError> {
        match request.timeout {
            None => {
                let output = Command::new(&request.program)
                    .args(&request.args)
                    .current_dir(&request.cwd)
                    .output()
                    .map_err(|source| ExecError::Launch {
                        program: request.program.clone(),
                        source,
                    })?;

                Ok(ExecOutput {
                    code: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                })
            }
            Some(timeout) => run_with_deadline(request, timeout),
        }
    }
}

/// Bounded wait: poll the child, kill it at the deadline. Reader threads
/// drain the pipes the whole time so the child never blocks on a full
/// pipe buffer.
fn run_with_deadline(request: &ExecRequest, timeout: Duration) -> Result<ExecOutput, ExecError> {
    let mut child = Command::new(&request.program)
        .args(&request.args)
        .current_dir(&request.cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| ExecError::Launch {
            program: request.program.clone(),
            source,
        })?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let stdout_reader = std::thread::spawn(move || drain(stdout));
    let stderr_reader = std::thread::spawn(move || drain(stderr));

    let started = Instant::now();
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if started.elapsed() >= timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(ExecError::Timeout {
                        program: request.program.clone(),
                        timeout,
                    });
                }
                std::thread::sleep(Duration::from_millis(25));
            }
            Err(source) => {
                return Err(ExecError::Capture {
                    program: request.program.clone(),
                    source,
                });
            }
        }
    };

    Ok(ExecOutput {
        code: status.code(),
        stdout: join_reader(stdout_reader, &request.program)?,
        stderr: join_reader(stderr_reader, &request.program)?,
    })
}

fn drain<R: Read>(stream: Option<R>) -> std::io::Result<String> {
    let mut buf = Vec::new();
    if let Some(mut stream) = stream {
        stream.read_to_end(&mut buf)?;
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn join_reader(
    handle: JoinHandle<std::io::Result<String>>,
    program: &str,
) -> Result<String, ExecError> {
    match handle.join() {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(source)) => Err(ExecError::Capture {
            program: program.to_string(),
            source,
        }),
        Err(_) => Err(ExecError::Capture {
            program: program.to_string(),
            source: std::io::Error::other("output reader thread panicked"),
        }),
    }
}
