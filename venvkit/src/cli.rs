use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// venvkit - provision a Python sandbox for a web app and launch it
#[derive(Parser, Debug)]
#[command(name = "venvkit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project directory holding the entry script (default: current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub project_dir: Option<PathBuf>,

    /// Sandbox directory, relative to the project directory (default: venv)
    #[arg(long, global = true, value_name = "DIR")]
    pub venv_dir: Option<String>,

    /// Defaults to `run` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// `run` arguments accepted without the subcommand name
    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the sandbox if missing, install packages, then launch the app
    Run(RunArgs),

    /// Create the sandbox and install packages without launching the app
    Setup(ProvisionArgs),

    /// Show the resolved sandbox layout and launch settings
    Info,

    /// Remove the sandbox directory
    Clean {
        /// Only show what would be removed
        #[arg(long)]
        dry_run: bool,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

#[derive(Args, Debug, Default, Clone)]
pub struct ProvisionArgs {
    /// Package to install on first run (repeatable; replaces the default list)
    #[arg(long = "package", value_name = "PKG")]
    pub packages: Vec<String>,

    /// Abort when package installation fails instead of continuing
    #[arg(long)]
    pub strict_install: bool,

    /// Host Python used to create the sandbox (default: first of python3/python on PATH)
    #[arg(long, value_name = "PATH")]
    pub python: Option<PathBuf>,

    /// Exit without waiting for a keypress
    #[arg(long)]
    pub no_pause: bool,
}

#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Entry script handed to the runner (default: scraper.py)
    #[arg(value_name = "ENTRY")]
    pub entry: Option<String>,

    /// Web-app runner executable or module (default: streamlit)
    #[arg(long, value_name = "RUNNER")]
    pub runner: Option<String>,

    #[command(flatten)]
    pub provision: ProvisionArgs,
}

impl Cli {
    /// `run` and `setup` hold the console open at the end, like a double-clicked script.
    pub fn wants_acknowledgment(&self) -> bool {
        matches!(
            self.command,
            None | Some(Commands::Run(_)) | Some(Commands::Setup(_))
        )
    }

    pub fn no_pause(&self) -> bool {
        match self.command {
            None => self.run.provision.no_pause,
            Some(Commands::Run(ref args)) => self.run.provision.no_pause || args.provision.no_pause,
            Some(Commands::Setup(ref args)) => args.no_pause,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_bare_invocation_means_run() {
        let cli = Cli::parse_from(["venvkit"]);
        assert!(cli.command.is_none());
        assert!(cli.wants_acknowledgment());
        assert!(!cli.no_pause());
    }

    #[test]
    fn test_bare_invocation_takes_run_flags() {
        let cli = Cli::parse_from(["venvkit", "--no-pause"]);
        assert!(cli.command.is_none());
        assert!(cli.no_pause());

        let cli = Cli::parse_from(["venvkit", "app.py", "--runner", "gradio", "--strict-install"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.run.entry.as_deref(), Some("app.py"));
        assert_eq!(cli.run.runner.as_deref(), Some("gradio"));
        assert!(cli.run.provision.strict_install);
        assert!(cli.wants_acknowledgment());
    }

    #[test]
    fn test_subcommand_still_wins_after_global_flags() {
        let cli = Cli::parse_from(["venvkit", "--project-dir", "/tmp/app", "run", "app.py"]);
        assert!(cli.run.entry.is_none());
        let Some(Commands::Run(args)) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.entry.as_deref(), Some("app.py"));
    }

    #[test]
    fn test_run_args() {
        let cli = Cli::parse_from([
            "venvkit",
            "run",
            "app.py",
            "--runner",
            "gradio",
            "--package",
            "gradio",
            "--package",
            "pandas",
            "--strict-install",
            "--no-pause",
            "--venv-dir",
            ".venv",
        ]);
        assert_eq!(cli.venv_dir.as_deref(), Some(".venv"));
        let Some(Commands::Run(args)) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.entry.as_deref(), Some("app.py"));
        assert_eq!(args.runner.as_deref(), Some("gradio"));
        assert_eq!(args.provision.packages, vec!["gradio", "pandas"]);
        assert!(args.provision.strict_install);
        assert!(args.provision.no_pause);
    }

    #[test]
    fn test_info_and_clean_do_not_pause() {
        assert!(!Cli::parse_from(["venvkit", "info"]).wants_acknowledgment());
        let cli = Cli::parse_from(["venvkit", "clean", "--dry-run", "-f"]);
        assert!(!cli.wants_acknowledgment());
        assert!(matches!(
            cli.command,
            Some(Commands::Clean {
                dry_run: true,
                force: true
            })
        ));
    }
}
