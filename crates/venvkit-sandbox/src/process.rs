//! Child process seam.
//!
//! Every external command (venv creation, pip, the app runner) is described
//! by a [`ProcessSpec`] and executed through a [`ProcessRunner`], so the
//! bootstrap sequence can be driven by a fake in tests.

use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Child shares the launcher's console.
    Inherit,
    /// stdout/stderr are captured; stderr is returned in [`ProcessOutcome`].
    Capture,
}

#[derive(Debug, Clone)]
pub struct ProcessSpec {
    program: PathBuf,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    envs: Vec<(OsString, OsString)>,
    env_removals: Vec<OsString>,
    output: OutputMode,
    shield_interrupt: bool,
}

impl ProcessSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            envs: Vec::new(),
            env_removals: Vec::new(),
            output: OutputMode::Inherit,
            shield_interrupt: false,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        let key = key.into();
        self.env_removals.retain(|k| *k != key);
        self.envs.push((key, value.into()));
        self
    }

    pub fn env_remove(mut self, key: impl Into<OsString>) -> Self {
        self.env_removals.push(key.into());
        self
    }

    pub fn capture_output(mut self) -> Self {
        self.output = OutputMode::Capture;
        self
    }

    /// While the child runs, the launcher ignores console interrupts so that
    /// Ctrl+C stops only the child and the launcher can finish its shutdown.
    pub fn shield_interrupt(mut self) -> Self {
        self.shield_interrupt = true;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    pub fn envs(&self) -> &[(OsString, OsString)] {
        &self.envs
    }

    pub fn env_removals(&self) -> &[OsString] {
        &self.env_removals
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output
    }

    pub fn is_interrupt_shielded(&self) -> bool {
        self.shield_interrupt
    }

    /// Arguments as lossy UTF-8, for logs and assertions.
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// Human-readable command line.
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.to_string_lossy().into_owned()];
        parts.extend(self.args_lossy());
        parts.join(" ")
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }
        for key in &self.env_removals {
            cmd.env_remove(key);
        }
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }
        cmd
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// Exit code; `None` when the child was terminated by a signal.
    pub code: Option<i32>,
    /// Captured stderr (empty for [`OutputMode::Inherit`]).
    pub stderr: String,
}

impl ProcessOutcome {
    pub fn exited(code: i32) -> Self {
        Self {
            code: Some(code),
            stderr: String::new(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Short description for error messages: captured stderr or the exit status.
    pub fn describe(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        match self.code {
            Some(code) => format!("exited with status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Runs a [`ProcessSpec`] to completion. `Err` only when the process could not be spawned.
pub trait ProcessRunner {
    fn run(&self, spec: &ProcessSpec) -> io::Result<ProcessOutcome>;
}

/// Runs processes on the host with `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, spec: &ProcessSpec) -> io::Result<ProcessOutcome> {
        tracing::debug!("exec: {}", spec.display());
        let mut cmd = spec.to_command();
        match spec.output {
            OutputMode::Capture => {
                let out = cmd.stdin(Stdio::null()).output()?;
                Ok(ProcessOutcome {
                    code: out.status.code(),
                    stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
                })
            }
            OutputMode::Inherit => {
                let mut child = cmd.spawn()?;
                // Engaged after spawn: an ignored SIGINT would otherwise be inherited.
                let _shield = spec.shield_interrupt.then(InterruptShield::engage);
                let status = child.wait()?;
                Ok(ProcessOutcome {
                    code: status.code(),
                    stderr: String::new(),
                })
            }
        }
    }
}

/// Ignores console interrupts in the launcher until dropped.
struct InterruptShield {
    #[cfg(unix)]
    previous: libc::sighandler_t,
}

#[cfg(unix)]
impl InterruptShield {
    fn engage() -> Self {
        #[allow(unsafe_code)]
        let previous = unsafe { libc::signal(libc::SIGINT, libc::SIG_IGN) };
        Self { previous }
    }
}

#[cfg(unix)]
impl Drop for InterruptShield {
    fn drop(&mut self) {
        #[allow(unsafe_code)]
        unsafe {
            libc::signal(libc::SIGINT, self.previous);
        }
    }
}

#[cfg(windows)]
impl InterruptShield {
    fn engage() -> Self {
        #[allow(unsafe_code)]
        unsafe {
            windows_sys::Win32::System::Console::SetConsoleCtrlHandler(None, 1);
        }
        Self {}
    }
}

#[cfg(windows)]
impl Drop for InterruptShield {
    fn drop(&mut self) {
        #[allow(unsafe_code)]
        unsafe {
            windows_sys::Win32::System::Console::SetConsoleCtrlHandler(None, 0);
        }
    }
}

#[cfg(not(any(unix, windows)))]
impl InterruptShield {
    fn engage() -> Self {
        Self {}
    }
}
