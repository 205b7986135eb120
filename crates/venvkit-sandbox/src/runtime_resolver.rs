//! Resolve the web-app runner (e.g. `streamlit`) inside an activated sandbox.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::activation::SandboxEnv;

/// Program plus leading arguments that invoke the runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRunner {
    pub program: PathBuf,
    pub args_prefix: Vec<OsString>,
}

/// Resolution order:
/// 1. `runner` given as a path to an existing file: used as-is.
/// 2. The runner's console script in the sandbox scripts dir.
/// 3. `<sandbox-python> -m <runner>`.
pub fn resolve_runner(env: &SandboxEnv, runner: &str) -> ResolvedRunner {
    let as_path = Path::new(runner);
    if as_path.components().count() > 1 && as_path.is_file() {
        return ResolvedRunner {
            program: as_path.to_path_buf(),
            args_prefix: Vec::new(),
        };
    }
    if let Some(exe) = env.installed_executable(runner) {
        return ResolvedRunner {
            program: exe,
            args_prefix: Vec::new(),
        };
    }
    tracing::debug!(
        "{} not installed in {}; falling back to `python -m {}`",
        runner,
        env.root().display(),
        runner
    );
    ResolvedRunner {
        program: env.interpreter(),
        args_prefix: vec![OsString::from("-m"), OsString::from(runner)],
    }
}
