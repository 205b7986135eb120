//! `venvkit info`: show what a run would use. Read-only.

use anyhow::Result;
use venvkit_sandbox::env::builder;
use venvkit_sandbox::layout::LayoutFlavor;
use venvkit_sandbox::LaunchPlan;

pub fn cmd_info(plan: &LaunchPlan) -> Result<()> {
    print!("{}", render_info(plan));
    Ok(())
}

fn render_info(plan: &LaunchPlan) -> String {
    let layout = plan.layout();
    let presence = |ok: bool, yes: &str, no: &str| if ok { yes.to_string() } else { no.to_string() };
    let host_python = match builder::which_python(plan.host_python.as_deref(), &plan.sandbox_dir) {
        Ok(p) => p.display().to_string(),
        Err(_) => "not found".to_string(),
    };
    let flavor = match layout.flavor() {
        LayoutFlavor::Windows => "windows",
        LayoutFlavor::Unix => "unix",
    };

    let rows = [
        ("Project dir", plan.project_dir.display().to_string()),
        (
            "Sandbox dir",
            format!(
                "{} ({})",
                layout.root().display(),
                presence(layout.exists(), "present", "absent")
            ),
        ),
        ("Layout", flavor.to_string()),
        ("Interpreter", layout.interpreter().display().to_string()),
        ("Activation script", layout.activation_script().display().to_string()),
        ("Host Python", host_python),
        (
            "Entry script",
            format!(
                "{} ({})",
                plan.entry_path().display(),
                presence(plan.entry_path().is_file(), "found", "missing")
            ),
        ),
        (
            "Runner",
            format!("{} {} {}", plan.runner, plan.runner_args.join(" "), plan.entry),
        ),
        ("Packages", plan.packages.join(" ")),
        ("Install policy", plan.install_policy.to_string()),
    ];

    let mut out = String::new();
    for (label, value) in rows {
        out.push_str(&format!("{:<18} {}\n", format!("{}:", label), value));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_render_info_fresh_project() {
        let tmp = tempfile::tempdir().unwrap();
        let mut plan = LaunchPlan::new(tmp.path());
        plan.host_python = Some(PathBuf::from("/opt/python3"));
        let text = render_info(&plan);
        assert!(text.contains("(absent)"));
        assert!(text.contains("scraper.py (missing)"));
        assert!(text.contains("streamlit run scraper.py"));
        assert!(text.contains("Host Python:       /opt/python3"));
        assert!(text.contains("best-effort"));
        assert!(!tmp.path().join("venv").exists(), "info never creates anything");
    }

    #[test]
    fn test_render_info_present_sandbox() {
        let tmp = tempfile::tempdir().unwrap();
        let plan = LaunchPlan::new(tmp.path());
        let layout = plan.layout();
        std::fs::create_dir_all(layout.scripts_dir()).unwrap();
        std::fs::write(layout.interpreter(), b"").unwrap();
        std::fs::write(plan.entry_path(), b"").unwrap();

        let text = render_info(&plan);
        assert!(text.contains("(present)"));
        assert!(text.contains("scraper.py (found)"));
    }
}
