//! Runs one diagnostic invocation and classifies what came back.

use log::{debug, trace};
use std::io;
use std::process::Command;

use super::grammar::Grammar;
use crate::error::{DetectorError, Result};

/// Captured result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Something that can run a program to completion.
///
/// The production implementation spawns a real process; tests plug in canned output.
pub trait Executor {
    fn execute(&self, program: &str, args: &[&str]) -> io::Result<CommandOutput>;
}

/// Spawns the program with `std::process::Command` and waits for it
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn execute(&self, program: &str, args: &[&str]) -> io::Result<CommandOutput> {
        let output = Command::new(program).args(args).output()?;
        Ok(CommandOutput {
            success: output.status.success(),
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Classified outcome of one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Output(String),
    /// The tool reported that it sees no devices. Not an error.
    NoDevices,
}

#[derive(Debug, Clone)]
pub struct CommandRunner<E = SystemExecutor> {
    program: String,
    executor: E,
}

impl CommandRunner<SystemExecutor> {
    pub fn new<S: Into<String>>(program: S) -> Self {
        Self::with_executor(program, SystemExecutor)
    }
}

impl<E: Executor> CommandRunner<E> {
    pub fn with_executor<S: Into<String>>(program: S, executor: E) -> Self {
        Self {
            program: program.into(),
            executor,
        }
    }

    /// Whether the program resolves on `PATH`, or exists when given as a path
    pub fn is_available(&self) -> bool {
        match which::which(&self.program) {
            Ok(path) => {
                trace!("Resolved {} to {}", self.program, path.display());
                true
            }
            Err(e) => {
                debug!("{} is not available: {}", self.program, e);
                false
            }
        }
    }

    /// Run once, no retries
    pub fn run(&self, args: &[&str], grammar: &Grammar) -> Result<RunOutcome> {
        let command = self.command_line(args);
        debug!("Running {}", command);

        let output = self
            .executor
            .execute(&self.program, args)
            .map_err(|e| DetectorError::Execution {
                command: command.clone(),
                reason: format!("failed to spawn: {}", e),
                exit_code: None,
                stdout: String::new(),
                stderr: String::new(),
            })?;

        classify(command, output, grammar)
    }

    fn command_line(&self, args: &[&str]) -> String {
        std::iter::once(self.program.as_str())
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Decide what a finished invocation means.
///
/// A "no devices" report wins over the exit status, since the tool exits
/// non-zero when it finds nothing on some driver releases.
pub fn classify(command: String, output: CommandOutput, grammar: &Grammar) -> Result<RunOutcome> {
    if grammar.reports_no_devices(&output.stdout) {
        debug!("{} reported no devices", command);
        return Ok(RunOutcome::NoDevices);
    }

    let reason = if !output.success {
        match output.exit_code {
            Some(code) => format!("unexpected return code {}", code),
            None => "terminated by signal".to_string(),
        }
    } else if output.stdout.is_empty() {
        "output is empty".to_string()
    } else {
        return Ok(RunOutcome::Output(output.stdout));
    };

    Err(DetectorError::Execution {
        command,
        reason,
        exit_code: output.exit_code,
        stdout: output.stdout,
        stderr: output.stderr,
    })
}
