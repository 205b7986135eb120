//! The launcher sequence:
//!
//! ```text
//! sandbox present? ── no ──> create ─> activate ─> upgrade pip ─> install packages ─┐
//!        └──────── yes ──> activate ──────────────────────────────────────────────┤
//!                                                                                 v
//!                                                       launch runner <entry>, wait
//! ```
//!
//! Creation and activation failures are fatal. The pip upgrade is always
//! best-effort; package install failures are fatal only under
//! [`InstallPolicy::Strict`].

use std::time::Instant;

use venvkit_core::config::InstallPolicy;
use venvkit_core::observability;

use crate::activation::{activate, SandboxEnv};
use crate::env::builder;
use crate::error::BootstrapError;
use crate::plan::LaunchPlan;
use crate::process::{ProcessOutcome, ProcessRunner, ProcessSpec};
use crate::runtime_resolver::resolve_runner;
use crate::{info_log, status};

/// An activated sandbox, plus what provisioning had to do to get there.
#[derive(Debug, Clone)]
pub struct Provisioned {
    pub env: SandboxEnv,
    /// True when this run created the sandbox.
    pub created: bool,
    /// False when a pip step failed and the policy let the run continue.
    pub install_ok: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapOutcome {
    pub created: bool,
    pub install_ok: bool,
    /// The app's exit code; `None` if it was terminated by a signal.
    pub app_exit_code: Option<i32>,
}

/// Ensure the sandbox exists and is activated. Creation and installation run
/// only when the sandbox interpreter is absent.
pub fn provision(plan: &LaunchPlan, runner: &dyn ProcessRunner) -> Result<Provisioned, BootstrapError> {
    provision_sandbox(plan, runner).inspect_err(audit_failure)
}

fn audit_failure(err: &BootstrapError) {
    observability::audit_bootstrap_failed(err.kind(), &err.to_string());
}

fn provision_sandbox(plan: &LaunchPlan, runner: &dyn ProcessRunner) -> Result<Provisioned, BootstrapError> {
    let layout = plan.layout();
    if layout.exists() {
        status!("✅ Sandbox found at {}, activating...", layout.root().display());
        let env = activate(&layout)?;
        info_log!("Reusing sandbox {}", layout.root().display());
        return Ok(Provisioned {
            env,
            created: false,
            install_ok: true,
        });
    }

    status!("📦 No sandbox at {}, creating one...", layout.root().display());
    let host_python = builder::which_python(plan.host_python.as_deref(), &plan.sandbox_dir)?;
    info_log!("Creating sandbox with {}", host_python.display());
    builder::create_sandbox(runner, &host_python, &plan.sandbox_dir, &plan.project_dir)?;

    // Re-detect: the venv module decides the on-disk flavor.
    let layout = plan.layout();
    let env = activate(&layout)?;
    status!("✅ Sandbox created at {}", layout.root().display());

    let install_ok = install_dependencies(plan, &env, runner)?;
    Ok(Provisioned {
        env,
        created: true,
        install_ok,
    })
}

fn install_dependencies(
    plan: &LaunchPlan,
    env: &SandboxEnv,
    runner: &dyn ProcessRunner,
) -> Result<bool, BootstrapError> {
    let mut ok = true;

    status!("⬆️  Upgrading pip...");
    if let Err(e) = builder::upgrade_installer(runner, env, &plan.project_dir) {
        tracing::warn!("{}; continuing", e);
        ok = false;
    }

    status!("📥 Installing packages: {}", plan.packages.join(" "));
    match builder::install_packages(runner, env, &plan.packages, &plan.project_dir) {
        Ok(()) => {}
        Err(e) if plan.install_policy == InstallPolicy::Strict => {
            observability::audit_install_completed(&plan.packages, false, plan.install_policy.as_str());
            return Err(e);
        }
        Err(e) => {
            tracing::warn!("{}; continuing (install policy: {})", e, plan.install_policy);
            ok = false;
        }
    }

    observability::audit_install_completed(&plan.packages, ok, plan.install_policy.as_str());
    Ok(ok)
}

/// Run the app runner with the entry script and block until it exits.
///
/// The app's own exit status is reported, not treated as an error; only a
/// failure to spawn the runner is.
pub fn launch(
    plan: &LaunchPlan,
    env: &SandboxEnv,
    runner: &dyn ProcessRunner,
) -> Result<ProcessOutcome, BootstrapError> {
    if !plan.entry_path().is_file() {
        tracing::warn!(
            "Entry script {} not found; launching anyway",
            plan.entry_path().display()
        );
    }

    let resolved = resolve_runner(env, &plan.runner);
    let spec = env.apply(
        ProcessSpec::new(&resolved.program)
            .args(&resolved.args_prefix)
            .args(&plan.runner_args)
            .arg(&plan.entry)
            .current_dir(&plan.project_dir)
            .shield_interrupt(),
    );

    status!("🚀 Launching: {}", spec.display());
    observability::audit_app_launched(
        &spec.program().to_string_lossy(),
        &spec.args_lossy(),
        &plan.project_dir.to_string_lossy(),
    );
    let started = Instant::now();
    let outcome = runner.run(&spec).map_err(|source| BootstrapError::Launch {
        program: spec.program().display().to_string(),
        source,
    })?;
    observability::audit_app_exited(outcome.code, started.elapsed().as_millis() as u64);

    match outcome.code {
        Some(0) => info_log!("Application exited cleanly"),
        Some(code) => tracing::warn!("Application exited with status {}", code),
        None => tracing::warn!("Application terminated by signal"),
    }
    Ok(outcome)
}

/// Provision, then launch.
pub fn run(plan: &LaunchPlan, runner: &dyn ProcessRunner) -> Result<BootstrapOutcome, BootstrapError> {
    let provisioned = provision(plan, runner)?;
    let outcome = launch(plan, &provisioned.env, runner).inspect_err(audit_failure)?;
    Ok(BootstrapOutcome {
        created: provisioned.created,
        install_ok: provisioned.install_ok,
        app_exit_code: outcome.code,
    })
}
