//! Subprocess execution utilities.

use std::ffi::OsStr;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Output, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use thiserror::Error;

/// How often a running child is polled while waiting with a deadline.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Failure to run a subprocess to completion.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to wait for `{program}`: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` did not finish within {timeout:?}")]
    TimedOut { program: String, timeout: Duration },
}

/// Builder for subprocess execution.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    program: PathBuf,
    args: Vec<String>,
    env: Vec<(String, String)>,
}

impl ProcessBuilder {
    /// Create a new process builder for the given program.
    pub fn new(program: impl AsRef<Path>) -> Self {
        ProcessBuilder {
            program: program.as_ref().to_path_buf(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    /// Add a single argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_string_lossy().into_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args.extend(
            args.into_iter()
                .map(|s| s.as_ref().to_string_lossy().into_owned()),
        );
        self
    }

    /// Set an environment variable.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Get the arguments.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd
    }

    fn spawn(&self) -> Result<Child, ProcessError> {
        self.build_command()
            .spawn()
            .map_err(|source| ProcessError::Spawn {
                program: self.program.display().to_string(),
                source,
            })
    }

    /// Execute the command and wait for completion, capturing both streams.
    pub fn exec(&self) -> Result<Output, ProcessError> {
        let child = self.spawn()?;
        child
            .wait_with_output()
            .map_err(|source| ProcessError::Wait {
                program: self.program.display().to_string(),
                source,
            })
    }

    /// Execute with a deadline.
    ///
    /// Both pipes are drained on background threads so a child writing
    /// more than a pipe buffer cannot stall. On timeout the child is
    /// killed and reaped before returning.
    pub fn exec_with_timeout(&self, timeout: Duration) -> Result<Output, ProcessError> {
        let mut child = self.spawn()?;
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let deadline = Instant::now() + timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break Ok(status),
                Ok(None) if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    break Err(ProcessError::TimedOut {
                        program: self.program.display().to_string(),
                        timeout,
                    });
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(source) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    break Err(ProcessError::Wait {
                        program: self.program.display().to_string(),
                        source,
                    });
                }
            }
        };

        let stdout = collect(stdout);
        let stderr = collect(stderr);
        let status: ExitStatus = status?;

        Ok(Output {
            status,
            stdout,
            stderr,
        })
    }

    /// Display the command for error messages.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

/// Find an executable in PATH.
pub fn find_executable(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}

/// Find a C++ compiler.
pub fn find_cxx_compiler() -> Option<PathBuf> {
    // Check CXX environment variable first
    if let Ok(cxx) = std::env::var("CXX") {
        if let Some(path) = find_executable(&cxx) {
            return Some(path);
        }
    }

    for compiler in &["c++", "g++", "clang++", "cl"] {
        if let Some(path) = find_executable(compiler) {
            return Some(path);
        }
    }

    None
}

/// Find CMake.
pub fn find_cmake() -> Option<PathBuf> {
    find_executable("cmake")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_command() {
        let pb = ProcessBuilder::new("g++").args(["--version", "-v"]);
        assert_eq!(pb.display_command(), "g++ --version -v");
        assert_eq!(pb.get_args(), ["--version", "-v"]);
    }

    #[test]
    fn test_spawn_failure() {
        let err = ProcessBuilder::new("definitely-not-a-real-program-cafpack")
            .exec_with_timeout(Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, ProcessError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_with_timeout_captures_stderr() {
        let output = ProcessBuilder::new("sh")
            .args(["-c", "echo out; echo err 1>&2"])
            .exec_with_timeout(Duration::from_secs(10))
            .unwrap();
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "out");
        assert_eq!(String::from_utf8_lossy(&output.stderr).trim(), "err");
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_with_timeout_kills_slow_child() {
        let start = Instant::now();
        let err = ProcessBuilder::new("sleep")
            .arg("5")
            .exec_with_timeout(Duration::from_millis(100))
            .unwrap_err();
        assert!(matches!(err, ProcessError::TimedOut { .. }));
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
