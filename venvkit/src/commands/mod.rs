//! Subcommand implementations. Each takes a fully resolved [`LaunchPlan`].

pub mod clean;
pub mod info;
pub mod run;
pub mod setup;

use anyhow::{Context, Result};
use venvkit_core::config::{InstallPolicy, LauncherConfig};
use venvkit_sandbox::LaunchPlan;

use crate::cli::{Cli, Commands, ProvisionArgs, RunArgs};

pub fn dispatch(cli: &Cli, config: &LauncherConfig) -> Result<()> {
    match cli.command {
        None => run::cmd_run(&build_plan(cli, config, Some(&cli.run))?),
        Some(Commands::Run(ref args)) => run::cmd_run(&build_plan(cli, config, Some(args))?),
        Some(Commands::Setup(ref args)) => {
            let run_args = RunArgs {
                provision: args.clone(),
                ..RunArgs::default()
            };
            setup::cmd_setup(&build_plan(cli, config, Some(&run_args))?)
        }
        Some(Commands::Info) => info::cmd_info(&build_plan(cli, config, None)?),
        Some(Commands::Clean { dry_run, force }) => {
            clean::cmd_clean(&build_plan(cli, config, None)?, dry_run, force)
        }
    }
}

/// Built-in defaults, then env config, then CLI flags.
pub fn build_plan(cli: &Cli, config: &LauncherConfig, args: Option<&RunArgs>) -> Result<LaunchPlan> {
    let project_dir = match cli.project_dir {
        Some(ref dir) => dir.clone(),
        None => std::env::current_dir().context("Resolve current directory")?,
    };
    let project_dir = std::path::absolute(&project_dir)
        .with_context(|| format!("Resolve project directory {}", project_dir.display()))?;

    let mut plan = LaunchPlan::from_config(project_dir, config);
    if let Some(ref dir) = cli.venv_dir {
        plan = plan.with_sandbox_dir(dir);
    }
    if let Some(args) = args {
        if let Some(ref entry) = args.entry {
            plan.entry = entry.clone();
        }
        if let Some(ref runner) = args.runner {
            plan.runner = runner.clone();
        }
        apply_provision_args(&mut plan, &args.provision);
    }
    Ok(plan)
}

fn apply_provision_args(plan: &mut LaunchPlan, args: &ProvisionArgs) {
    if !args.packages.is_empty() {
        plan.packages = args.packages.clone();
    }
    if args.strict_install {
        plan.install_policy = InstallPolicy::Strict;
    }
    if let Some(ref python) = args.python {
        plan.host_python = Some(python.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_build_plan_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let cli = Cli::parse_from(["venvkit", "--project-dir", tmp.path().to_str().unwrap()]);
        let plan = build_plan(&cli, &LauncherConfig::default(), Some(&RunArgs::default())).unwrap();
        assert_eq!(plan, LaunchPlan::new(std::path::absolute(tmp.path()).unwrap()));
    }

    #[test]
    fn test_cli_overrides_env_config() {
        let tmp = tempfile::tempdir().unwrap();
        let config = LauncherConfig {
            venv_dir: Some("env-from-config".into()),
            entry: Some("config.py".into()),
            packages: Some(vec!["from-config".into()]),
            ..LauncherConfig::default()
        };
        let cli = Cli::parse_from([
            "venvkit",
            "--project-dir",
            tmp.path().to_str().unwrap(),
            "--venv-dir",
            ".venv",
            "run",
            "cli.py",
            "--package",
            "from-cli",
            "--strict-install",
            "--python",
            "/usr/bin/python3",
        ]);
        let Some(Commands::Run(ref args)) = cli.command else {
            panic!("expected run");
        };
        let plan = build_plan(&cli, &config, Some(args)).unwrap();
        assert!(plan.sandbox_dir.ends_with(".venv"));
        assert_eq!(plan.entry, "cli.py");
        assert_eq!(plan.packages, vec!["from-cli"]);
        assert_eq!(plan.install_policy, InstallPolicy::Strict);
        assert_eq!(plan.host_python, Some(PathBuf::from("/usr/bin/python3")));
    }

    #[test]
    fn test_bare_invocation_builds_plan_from_run_flags() {
        let tmp = tempfile::tempdir().unwrap();
        let cli = Cli::parse_from([
            "venvkit",
            "--project-dir",
            tmp.path().to_str().unwrap(),
            "app.py",
            "--package",
            "gradio",
        ]);
        assert!(cli.command.is_none());
        let plan = build_plan(&cli, &LauncherConfig::default(), Some(&cli.run)).unwrap();
        assert_eq!(plan.entry, "app.py");
        assert_eq!(plan.packages, vec!["gradio"]);
    }

    #[test]
    fn test_env_config_applies_without_flags() {
        let tmp = tempfile::tempdir().unwrap();
        let config = LauncherConfig {
            entry: Some("config.py".into()),
            install_policy: InstallPolicy::Strict,
            ..LauncherConfig::default()
        };
        let cli = Cli::parse_from(["venvkit", "--project-dir", tmp.path().to_str().unwrap(), "info"]);
        let plan = build_plan(&cli, &config, None).unwrap();
        assert_eq!(plan.entry, "config.py");
        assert_eq!(plan.install_policy, InstallPolicy::Strict);
    }
}
