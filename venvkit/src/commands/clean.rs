//! `venvkit clean`: remove the sandbox so the next run provisions from scratch.
//!
//! Only directories that look like a venv (a `pyvenv.cfg` or a sandbox
//! interpreter) are removed.

use anyhow::{Context, Result};
use std::fs;
use std::io::BufRead;
use std::path::Path;

use venvkit_sandbox::layout::SandboxLayout;
use venvkit_sandbox::LaunchPlan;

pub fn cmd_clean(plan: &LaunchPlan, dry_run: bool, force: bool) -> Result<()> {
    let stdin = std::io::stdin();
    clean_with_confirm(plan, dry_run, force, &mut stdin.lock())
}

fn clean_with_confirm(
    plan: &LaunchPlan,
    dry_run: bool,
    force: bool,
    input: &mut dyn BufRead,
) -> Result<()> {
    let dir = &plan.sandbox_dir;
    if !dir.exists() {
        eprintln!("No sandbox found at {}", dir.display());
        return Ok(());
    }
    if !looks_like_sandbox(dir) {
        anyhow::bail!(
            "{} does not look like a Python sandbox (no pyvenv.cfg or interpreter); refusing to remove it",
            dir.display()
        );
    }

    let size = dir_size(dir);
    eprintln!("🗂  Sandbox at {} ({})", dir.display(), format_size(size));

    if dry_run {
        eprintln!("(Dry run, nothing removed. Drop --dry-run to delete.)");
        return Ok(());
    }

    if !force {
        eprint!("Remove this sandbox? [y/N] ");
        let mut answer = String::new();
        input.read_line(&mut answer)?;
        if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            eprintln!("Cancelled.");
            return Ok(());
        }
    }

    fs::remove_dir_all(dir).with_context(|| format!("Remove {}", dir.display()))?;
    eprintln!("✓ Removed sandbox, freed {}", format_size(size));
    Ok(())
}

fn looks_like_sandbox(dir: &Path) -> bool {
    dir.join("pyvenv.cfg").is_file() || SandboxLayout::new(dir).exists()
}

/// Total size of a directory. Symlinks (venv interpreters usually are) are not followed.
fn dir_size(path: &Path) -> u64 {
    let mut total: u64 = 0;
    if let Ok(entries) = fs::read_dir(path) {
        for entry in entries.flatten() {
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_dir() {
                total += dir_size(&entry.path());
            } else if let Ok(meta) = entry.metadata() {
                total += meta.len();
            }
        }
    }
    total
}

/// Format byte size to human-readable string.
fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
