//! Fixed on-disk layout of a Python sandbox (venv).
//!
//! Windows venvs keep executables under `Scripts\` with `.exe` suffixes and a
//! `activate.bat`; everything else uses `bin/` and a POSIX `activate`. The
//! layout is detected from what is on disk, falling back to the host flavor
//! for a sandbox that does not exist yet.

use std::path::{Path, PathBuf};

/// Conventional sandbox directory name, relative to the project directory.
pub const DEFAULT_SANDBOX_DIR: &str = "venv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutFlavor {
    Windows,
    Unix,
}

impl LayoutFlavor {
    pub fn native() -> Self {
        if cfg!(windows) {
            LayoutFlavor::Windows
        } else {
            LayoutFlavor::Unix
        }
    }

    pub fn scripts_dir_name(self) -> &'static str {
        match self {
            LayoutFlavor::Windows => "Scripts",
            LayoutFlavor::Unix => "bin",
        }
    }

    pub fn activation_script_name(self) -> &'static str {
        match self {
            LayoutFlavor::Windows => "activate.bat",
            LayoutFlavor::Unix => "activate",
        }
    }

    /// Executable file name for `stem` (`python` -> `python.exe` on Windows).
    pub fn executable_name(self, stem: &str) -> String {
        match self {
            LayoutFlavor::Windows if !stem.to_lowercase().ends_with(".exe") => {
                format!("{}.exe", stem)
            }
            _ => stem.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxLayout {
    root: PathBuf,
    flavor: LayoutFlavor,
}

impl SandboxLayout {
    /// Detect the layout of `root` from its interpreter; host flavor if neither exists.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let flavor = [LayoutFlavor::Windows, LayoutFlavor::Unix]
            .into_iter()
            .find(|f| interpreter_path(&root, *f).is_file())
            .unwrap_or_else(LayoutFlavor::native);
        Self { root, flavor }
    }

    pub fn with_flavor(root: impl Into<PathBuf>, flavor: LayoutFlavor) -> Self {
        Self {
            root: root.into(),
            flavor,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn flavor(&self) -> LayoutFlavor {
        self.flavor
    }

    pub fn scripts_dir(&self) -> PathBuf {
        self.root.join(self.flavor.scripts_dir_name())
    }

    pub fn interpreter(&self) -> PathBuf {
        interpreter_path(&self.root, self.flavor)
    }

    pub fn activation_script(&self) -> PathBuf {
        self.scripts_dir().join(self.flavor.activation_script_name())
    }

    /// Path an executable named `stem` would have inside the scripts dir.
    pub fn executable(&self, stem: &str) -> PathBuf {
        self.scripts_dir().join(self.flavor.executable_name(stem))
    }

    /// The sandbox counts as present once its interpreter binary exists.
    pub fn exists(&self) -> bool {
        self.interpreter().is_file()
    }
}

fn interpreter_path(root: &Path, flavor: LayoutFlavor) -> PathBuf {
    root.join(flavor.scripts_dir_name())
        .join(flavor.executable_name("python"))
}
