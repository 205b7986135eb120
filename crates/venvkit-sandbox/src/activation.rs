//! Sandbox activation as an explicit value.
//!
//! Instead of sourcing `activate` into the launcher's own environment,
//! [`activate`] checks the sandbox and returns a [`SandboxEnv`] whose
//! overrides are applied to each child process spawned afterwards.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::error::BootstrapError;
use crate::layout::SandboxLayout;
use crate::process::ProcessSpec;

/// Variables a venv activation script unsets.
const ENV_REMOVALS: &[&str] = &["PYTHONHOME", "__PYVENV_LAUNCHER__"];

#[derive(Debug, Clone)]
pub struct SandboxEnv {
    layout: SandboxLayout,
    path_var: OsString,
}

/// Activate the sandbox at `layout`. Fails when the activation script or the
/// interpreter is missing.
pub fn activate(layout: &SandboxLayout) -> Result<SandboxEnv, BootstrapError> {
    activate_with_path(layout, std::env::var_os("PATH"))
}

pub(crate) fn activate_with_path(
    layout: &SandboxLayout,
    inherited_path: Option<OsString>,
) -> Result<SandboxEnv, BootstrapError> {
    let script = layout.activation_script();
    if !script.is_file() {
        return Err(BootstrapError::Activation {
            dir: layout.root().to_path_buf(),
            reason: format!("activation script {} not found", script.display()),
        });
    }
    let interpreter = layout.interpreter();
    if !interpreter.is_file() {
        return Err(BootstrapError::Activation {
            dir: layout.root().to_path_buf(),
            reason: format!("interpreter {} not found", interpreter.display()),
        });
    }

    let scripts_dir = absolute(&layout.scripts_dir());
    let inherited = inherited_path.unwrap_or_default();
    let path_var = std::env::join_paths(
        std::iter::once(scripts_dir).chain(std::env::split_paths(&inherited)),
    )
    .map_err(|e| BootstrapError::Activation {
        dir: layout.root().to_path_buf(),
        reason: format!("cannot build PATH: {}", e),
    })?;

    tracing::debug!("Activated sandbox {}", layout.root().display());
    Ok(SandboxEnv {
        layout: layout.clone(),
        path_var,
    })
}

impl SandboxEnv {
    pub fn layout(&self) -> &SandboxLayout {
        &self.layout
    }

    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    pub fn interpreter(&self) -> PathBuf {
        absolute(&self.layout.interpreter())
    }

    /// `PATH` value with the sandbox scripts dir first.
    pub fn path_var(&self) -> &OsStr {
        &self.path_var
    }

    /// An executable installed into the sandbox, if present.
    pub fn installed_executable(&self, stem: &str) -> Option<PathBuf> {
        let candidate = self.layout.executable(stem);
        candidate.is_file().then(|| absolute(&candidate))
    }

    /// Environment a child sees after activation.
    pub fn env_overrides(&self) -> Vec<(OsString, OsString)> {
        vec![
            (
                OsString::from("VIRTUAL_ENV"),
                absolute(self.layout.root()).into_os_string(),
            ),
            (OsString::from("PATH"), self.path_var.clone()),
            (OsString::from("PYTHONUTF8"), OsString::from("1")),
            (OsString::from("PYTHONIOENCODING"), OsString::from("utf-8")),
        ]
    }

    /// Attach the activation environment to `spec`.
    pub fn apply(&self, mut spec: ProcessSpec) -> ProcessSpec {
        for (key, value) in self.env_overrides() {
            spec = spec.env(key, value);
        }
        for key in ENV_REMOVALS {
            spec = spec.env_remove(key);
        }
        spec
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
