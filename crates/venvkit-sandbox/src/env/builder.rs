//! Build the Python sandbox and install packages into it.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::activation::SandboxEnv;
use crate::error::BootstrapError;
use crate::process::{ProcessRunner, ProcessSpec};

/// Host interpreters tried, in order, when none is configured.
#[cfg(windows)]
pub const HOST_PYTHON_CANDIDATES: &[&str] = &["python", "py", "python3"];
#[cfg(not(windows))]
pub const HOST_PYTHON_CANDIDATES: &[&str] = &["python3", "python"];

/// Resolve the host interpreter used to create the sandbox.
///
/// An explicitly configured interpreter is used as given; otherwise the
/// candidates are looked up on `PATH`.
pub fn which_python(explicit: Option<&Path>, sandbox_dir: &Path) -> Result<PathBuf, BootstrapError> {
    if let Some(p) = explicit {
        return Ok(p.to_path_buf());
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    which_python_in(
        HOST_PYTHON_CANDIDATES,
        std::env::var_os("PATH").as_deref(),
        &cwd,
        sandbox_dir,
    )
}

pub(crate) fn which_python_in(
    candidates: &[&str],
    paths: Option<&OsStr>,
    cwd: &Path,
    sandbox_dir: &Path,
) -> Result<PathBuf, BootstrapError> {
    candidates
        .iter()
        .find_map(|name| which::which_in(name, paths, cwd).ok())
        .ok_or_else(|| BootstrapError::SandboxCreation {
            dir: sandbox_dir.to_path_buf(),
            reason: format!(
                "no Python interpreter found on PATH (tried: {})",
                candidates.join(", ")
            ),
        })
}

/// `<host-python> -m venv <sandbox_dir>`.
pub fn create_sandbox(
    runner: &dyn ProcessRunner,
    host_python: &Path,
    sandbox_dir: &Path,
    cwd: &Path,
) -> Result<(), BootstrapError> {
    let spec = ProcessSpec::new(host_python)
        .args(["-m", "venv"])
        .arg(sandbox_dir)
        .current_dir(cwd)
        .capture_output();

    let started = Instant::now();
    let outcome = runner
        .run(&spec)
        .map_err(|e| BootstrapError::SandboxCreation {
            dir: sandbox_dir.to_path_buf(),
            reason: format!("cannot run {}: {}", host_python.display(), e),
        })?;
    if !outcome.success() {
        return Err(BootstrapError::SandboxCreation {
            dir: sandbox_dir.to_path_buf(),
            reason: format!("venv failed: {}", outcome.describe()),
        });
    }

    venvkit_core::observability::audit_sandbox_created(
        &sandbox_dir.to_string_lossy(),
        &host_python.to_string_lossy(),
        started.elapsed().as_millis() as u64,
    );
    Ok(())
}

/// `<sandbox-python> -m pip install --upgrade pip`.
pub fn upgrade_installer(
    runner: &dyn ProcessRunner,
    env: &SandboxEnv,
    cwd: &Path,
) -> Result<(), BootstrapError> {
    run_pip(runner, env, cwd, &["install", "--upgrade", "pip"])
}

/// `<sandbox-python> -m pip install <packages...>`. No-op for an empty list.
pub fn install_packages(
    runner: &dyn ProcessRunner,
    env: &SandboxEnv,
    packages: &[String],
    cwd: &Path,
) -> Result<(), BootstrapError> {
    if packages.is_empty() {
        return Ok(());
    }
    let mut args = vec!["install"];
    args.extend(packages.iter().map(String::as_str));
    run_pip(runner, env, cwd, &args)
}

fn run_pip(
    runner: &dyn ProcessRunner,
    env: &SandboxEnv,
    cwd: &Path,
    pip_args: &[&str],
) -> Result<(), BootstrapError> {
    let spec = env.apply(
        ProcessSpec::new(env.interpreter())
            .args(["-m", "pip"])
            .args(pip_args)
            .current_dir(cwd),
    );
    let outcome = runner.run(&spec).map_err(|e| BootstrapError::Install {
        reason: format!("cannot run pip: {}", e),
    })?;
    if !outcome.success() {
        return Err(BootstrapError::Install {
            reason: format!("`pip {}` {}", pip_args.join(" "), outcome.describe()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activate;
    use crate::layout::{LayoutFlavor, SandboxLayout};
    use crate::process::ProcessOutcome;
    use std::cell::RefCell;
    use std::io;

    struct Recorder {
        calls: RefCell<Vec<ProcessSpec>>,
        code: i32,
    }

    impl Recorder {
        fn new(code: i32) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                code,
            }
        }
    }

    impl ProcessRunner for Recorder {
        fn run(&self, spec: &ProcessSpec) -> io::Result<ProcessOutcome> {
            self.calls.borrow_mut().push(spec.clone());
            Ok(ProcessOutcome::exited(self.code))
        }
    }

    struct Unspawnable;

    impl ProcessRunner for Unspawnable {
        fn run(&self, _spec: &ProcessSpec) -> io::Result<ProcessOutcome> {
            Err(io::Error::new(io::ErrorKind::NotFound, "no such file"))
        }
    }

    fn activated(root: &Path) -> SandboxEnv {
        let layout = SandboxLayout::with_flavor(root, LayoutFlavor::native());
        std::fs::create_dir_all(layout.scripts_dir()).unwrap();
        std::fs::write(layout.interpreter(), b"").unwrap();
        std::fs::write(layout.activation_script(), b"").unwrap();
        activate(&layout).unwrap()
    }

    #[test]
    fn test_which_python_explicit_is_trusted() {
        let found = which_python(Some(Path::new("/opt/python3.12")), Path::new("venv")).unwrap();
        assert_eq!(found, PathBuf::from("/opt/python3.12"));
    }

    #[test]
    fn test_which_python_in_empty_path_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let err = which_python_in(
            &["python3", "python"],
            Some(tmp.path().as_os_str()),
            tmp.path(),
            Path::new("venv"),
        )
        .unwrap_err();
        assert!(matches!(err, BootstrapError::SandboxCreation { .. }));
        assert!(err.to_string().contains("tried: python3, python"));
    }

    #[cfg(unix)]
    #[test]
    fn test_which_python_in_finds_second_candidate() {
        use std::os::unix::fs::PermissionsExt;
        let tmp = tempfile::tempdir().unwrap();
        let python = tmp.path().join("python");
        std::fs::write(&python, b"#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&python, std::fs::Permissions::from_mode(0o755)).unwrap();

        let found = which_python_in(
            &["python3", "python"],
            Some(tmp.path().as_os_str()),
            tmp.path(),
            Path::new("venv"),
        )
        .unwrap();
        assert_eq!(found, python);
    }

    #[test]
    fn test_create_sandbox_command_line() {
        let runner = Recorder::new(0);
        create_sandbox(&runner, Path::new("python3"), Path::new("/work/venv"), Path::new("/work")).unwrap();
        let calls = runner.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program(), Path::new("python3"));
        assert_eq!(calls[0].args_lossy(), vec!["-m", "venv", "/work/venv"]);
        assert_eq!(calls[0].cwd(), Some(Path::new("/work")));
    }

    #[test]
    fn test_create_sandbox_failures() {
        let err = create_sandbox(&Recorder::new(1), Path::new("python3"), Path::new("venv"), Path::new(".")).unwrap_err();
        assert!(matches!(err, BootstrapError::SandboxCreation { .. }));
        assert!(err.to_string().contains("exited with status 1"));

        let err = create_sandbox(&Unspawnable, Path::new("python3"), Path::new("venv"), Path::new(".")).unwrap_err();
        assert!(err.to_string().contains("cannot run python3"));
    }

    #[test]
    fn test_pip_commands_use_sandbox_interpreter() {
        let tmp = tempfile::tempdir().unwrap();
        let env = activated(tmp.path());
        let runner = Recorder::new(0);
        upgrade_installer(&runner, &env, tmp.path()).unwrap();
        install_packages(&runner, &env, &["pandas".to_string(), "requests".to_string()], tmp.path()).unwrap();

        let calls = runner.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].program(), env.interpreter());
        assert_eq!(calls[0].args_lossy(), vec!["-m", "pip", "install", "--upgrade", "pip"]);
        assert_eq!(calls[1].args_lossy(), vec!["-m", "pip", "install", "pandas", "requests"]);
        assert!(calls[1].envs().iter().any(|(k, _)| k == "VIRTUAL_ENV"));
    }

    #[test]
    fn test_install_packages_empty_is_noop() {
        let tmp = tempfile::tempdir().unwrap();
        let env = activated(tmp.path());
        let runner = Recorder::new(1);
        install_packages(&runner, &env, &[], tmp.path()).unwrap();
        assert!(runner.calls.borrow().is_empty());
    }

    #[test]
    fn test_install_packages_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let env = activated(tmp.path());
        let err = install_packages(&Recorder::new(1), &env, &["nope".to_string()], tmp.path()).unwrap_err();
        assert!(matches!(err, BootstrapError::Install { .. }));
        assert!(err.to_string().contains("pip install nope"));
    }
}
