//! What a launcher run does: where the sandbox lives, what goes into it, what gets launched.

use std::path::{Path, PathBuf};

use venvkit_core::config::{InstallPolicy, LauncherConfig};

use crate::layout::{SandboxLayout, DEFAULT_SANDBOX_DIR};

/// Web framework, data handling, HTTP, HTML parsing, PDF generation, table formatting.
pub const DEFAULT_PACKAGES: &[&str] = &[
    "streamlit",
    "pandas",
    "requests",
    "beautifulsoup4",
    "reportlab",
    "tabulate",
];

pub const DEFAULT_RUNNER: &str = "streamlit";
pub const DEFAULT_RUNNER_ARGS: &[&str] = &["run"];
pub const DEFAULT_ENTRY: &str = "scraper.py";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    /// Working directory for every child; relative paths resolve against it.
    pub project_dir: PathBuf,
    pub sandbox_dir: PathBuf,
    pub packages: Vec<String>,
    pub runner: String,
    pub runner_args: Vec<String>,
    pub entry: String,
    pub install_policy: InstallPolicy,
    /// Host interpreter for `-m venv`; looked up on PATH when `None`.
    pub host_python: Option<PathBuf>,
}

impl LaunchPlan {
    /// Built-in defaults rooted at `project_dir`.
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        let project_dir = project_dir.into();
        Self {
            sandbox_dir: project_dir.join(DEFAULT_SANDBOX_DIR),
            project_dir,
            packages: DEFAULT_PACKAGES.iter().map(|s| s.to_string()).collect(),
            runner: DEFAULT_RUNNER.to_string(),
            runner_args: DEFAULT_RUNNER_ARGS.iter().map(|s| s.to_string()).collect(),
            entry: DEFAULT_ENTRY.to_string(),
            install_policy: InstallPolicy::default(),
            host_python: None,
        }
    }

    /// Defaults overlaid with whatever `cfg` sets.
    pub fn from_config(project_dir: impl Into<PathBuf>, cfg: &LauncherConfig) -> Self {
        let mut plan = Self::new(project_dir);
        if let Some(ref dir) = cfg.venv_dir {
            plan = plan.with_sandbox_dir(dir);
        }
        if let Some(ref entry) = cfg.entry {
            plan.entry = entry.clone();
        }
        if let Some(ref runner) = cfg.runner {
            plan.runner = runner.clone();
        }
        if let Some(ref packages) = cfg.packages {
            plan.packages = packages.clone();
        }
        plan.install_policy = cfg.install_policy;
        plan.host_python = cfg.python.as_ref().map(PathBuf::from);
        plan
    }

    /// Relative sandbox dirs are taken relative to the project dir.
    pub fn with_sandbox_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.sandbox_dir = self.project_dir.join(dir);
        self
    }

    pub fn layout(&self) -> SandboxLayout {
        SandboxLayout::new(&self.sandbox_dir)
    }

    pub fn entry_path(&self) -> PathBuf {
        self.project_dir.join(&self.entry)
    }
}
