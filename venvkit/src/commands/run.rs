//! `venvkit run` (also the bare `venvkit`): provision, launch, wait.

use anyhow::Result;
use venvkit_sandbox::{LaunchPlan, SystemRunner};

pub fn cmd_run(plan: &LaunchPlan) -> Result<()> {
    let outcome = venvkit_sandbox::run(plan, &SystemRunner)?;

    eprintln!();
    if !outcome.install_ok {
        eprintln!("⚠️  Some packages failed to install during setup; the app may not work correctly.");
    }
    match outcome.app_exit_code {
        Some(0) => eprintln!("Application stopped."),
        Some(code) => eprintln!("Application stopped (exit status {}).", code),
        None => eprintln!("Application stopped (interrupted)."),
    }
    Ok(())
}
