//! `venvkit setup`: provision only.

use anyhow::Result;
use venvkit_sandbox::{LaunchPlan, SystemRunner};

pub fn cmd_setup(plan: &LaunchPlan) -> Result<()> {
    let provisioned = venvkit_sandbox::provision(plan, &SystemRunner)?;

    eprintln!();
    if !provisioned.created {
        eprintln!(
            "Sandbox already present at {}; nothing to install.",
            provisioned.env.root().display()
        );
    } else if provisioned.install_ok {
        eprintln!("✓ Sandbox ready at {}", provisioned.env.root().display());
    } else {
        eprintln!(
            "⚠️  Sandbox created at {}, but some packages failed to install.",
            provisioned.env.root().display()
        );
    }
    Ok(())
}
