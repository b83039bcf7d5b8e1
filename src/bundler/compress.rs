//! External compressor invocation
//!
//! A [`Compressor`] turns input files into one output file. Two
//! implementations exist:
//! - [`CommandCompressor`] runs a shell template with `{from}` / `{to}`
//!   placeholders, bounded by a timeout
//! - [`FnCompressor`] calls an in-process function

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

/// Interval between checks on a running compressor
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Why a compressor run failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompressFailure {
    /// The tool could not run or exited unsuccessfully
    Failed(String),
    /// The tool was killed after running longer than allowed
    TimedOut { command: String, seconds: u64 },
}

impl fmt::Display for CompressFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressFailure::Failed(reason) => f.write_str(reason),
            CompressFailure::TimedOut { command, seconds } => {
                write!(f, "'{command}' timed out after {seconds}s")
            }
        }
    }
}

/// Compress `inputs` into `output`
pub trait Compressor: Send + Sync {
    /// Produce `output` from `inputs`; the output must exist on success
    ///
    /// # Errors
    ///
    /// Returns a [`CompressFailure`] describing what went wrong.
    fn compress(&self, inputs: &[PathBuf], output: &Path) -> Result<(), CompressFailure>;

    /// Short description for logs
    fn describe(&self) -> String;
}

/// Runs a shell command template
#[derive(Debug, Clone)]
pub struct CommandCompressor {
    template: String,
    timeout: Duration,
}

impl CommandCompressor {
    /// Create a compressor from a `{from}` / `{to}` template
    pub fn new(template: impl Into<String>, timeout: Duration) -> Self {
        Self {
            template: template.into(),
            timeout,
        }
    }

    /// The command line for the given files, with paths shell-quoted
    pub fn command_line(&self, inputs: &[PathBuf], output: &Path) -> String {
        let from = inputs
            .iter()
            .map(|path| shell_quote(&path.to_string_lossy()))
            .collect::<Vec<_>>()
            .join(" ");
        let to = shell_quote(&output.to_string_lossy());

        self.template.replace("{from}", &from).replace("{to}", &to)
    }
}

impl Compressor for CommandCompressor {
    fn compress(&self, inputs: &[PathBuf], output: &Path) -> Result<(), CompressFailure> {
        let command_line = self.command_line(inputs, output);
        debug!(command = %command_line, "running compressor");

        let mut child = shell(&command_line)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| CompressFailure::Failed(format!("failed to start '{command_line}': {e}")))?;

        let stderr_reader = child.stderr.take().map(|mut stderr| {
            thread::spawn(move || {
                let mut buffer = String::new();
                let _ = stderr.read_to_string(&mut buffer);
                buffer
            })
        });

        let started = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if started.elapsed() >= self.timeout => {
                    warn!(command = %command_line, "compressor timed out, killing it");
                    kill_tree(&mut child);
                    let _ = child.wait();
                    return Err(CompressFailure::TimedOut {
                        command: command_line,
                        seconds: self.timeout.as_secs(),
                    });
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    return Err(CompressFailure::Failed(format!(
                        "failed to wait for '{command_line}': {e}"
                    )));
                }
            }
        };

        let stderr = stderr_reader
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();

        if !status.success() {
            return Err(CompressFailure::Failed(format!(
                "'{command_line}' exited with {status}: {}",
                stderr.trim()
            )));
        }

        Ok(())
    }

    fn describe(&self) -> String {
        self.template.clone()
    }
}

/// The shell leads its own process group so a timeout reaches every tool the
/// template started
#[cfg(unix)]
fn shell(command_line: &str) -> Command {
    use std::os::unix::process::CommandExt;

    let mut command = Command::new("sh");
    command.arg("-c").arg(command_line).process_group(0);
    command
}

#[cfg(windows)]
fn shell(command_line: &str) -> Command {
    let mut command = Command::new("cmd");
    command.arg("/C").arg(command_line);
    command
}

#[cfg(unix)]
fn kill_tree(child: &mut Child) {
    match libc::pid_t::try_from(child.id()) {
        // SAFETY: kill(2) with a negative pid signals the process group the
        // child leads; it touches no memory.
        Ok(pid) if unsafe { libc::kill(-pid, libc::SIGKILL) } == 0 => {}
        _ => {
            let _ = child.kill();
        }
    }
}

#[cfg(windows)]
fn kill_tree(child: &mut Child) {
    let _ = child.kill();
}

#[cfg(unix)]
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

#[cfg(windows)]
fn shell_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

type CompressFn = dyn Fn(&[PathBuf], &Path) -> std::io::Result<()> + Send + Sync;

/// Calls an in-process function
pub struct FnCompressor {
    name: String,
    function: Box<CompressFn>,
}

impl FnCompressor {
    /// Wrap a function taking the input files and the output path
    pub fn new<F>(name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&[PathBuf], &Path) -> std::io::Result<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            function: Box::new(function),
        }
    }

    /// Writes the inputs unchanged, one after the other
    pub fn passthrough() -> Self {
        Self::new("passthrough", |inputs, output| {
            let mut content = Vec::new();
            for input in inputs {
                content.extend(std::fs::read(input)?);
            }
            std::fs::write(output, content)
        })
    }
}

impl fmt::Debug for FnCompressor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnCompressor")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Compressor for FnCompressor {
    fn compress(&self, inputs: &[PathBuf], output: &Path) -> Result<(), CompressFailure> {
        (self.function)(inputs, output)
            .map_err(|e| CompressFailure::Failed(format!("{} failed: {e}", self.name)))
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}

/// Compressor for an optional shell template; no template means pass-through
pub fn from_template(template: Option<&str>, timeout: Duration) -> Box<dyn Compressor> {
    match template {
        Some(template) => Box::new(CommandCompressor::new(template, timeout)),
        None => Box::new(FnCompressor::passthrough()),
    }
}
