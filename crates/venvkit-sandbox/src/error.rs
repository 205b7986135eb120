//! Bootstrap error taxonomy. Every variant is fatal and maps to exit code 1.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BootstrapError {
    /// No host interpreter resolvable, or `python -m venv` failed.
    #[error("failed to create sandbox at {}: {reason}", dir.display())]
    SandboxCreation { dir: PathBuf, reason: String },

    /// Activation script or sandbox interpreter missing.
    #[error("cannot activate sandbox at {}: {reason}", dir.display())]
    Activation { dir: PathBuf, reason: String },

    /// Package install failed under the strict install policy.
    #[error("package installation failed: {reason}")]
    Install { reason: String },

    /// The app runner could not be spawned.
    #[error("failed to launch '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },
}

impl BootstrapError {
    /// Stable name used in audit records.
    pub fn kind(&self) -> &'static str {
        match self {
            BootstrapError::SandboxCreation { .. } => "sandbox_creation",
            BootstrapError::Activation { .. } => "activation",
            BootstrapError::Install { .. } => "install",
            BootstrapError::Launch { .. } => "launch",
        }
    }

    pub fn exit_code(&self) -> i32 {
        1
    }
}
