mod cli;
mod commands;
mod console;
mod observability;

use std::process::ExitCode;

use clap::Parser;
use cli::Cli;
use venvkit_core::config::LauncherConfig;
use venvkit_sandbox::BootstrapError;

fn main() -> ExitCode {
    console::force_utf8();
    observability::init_tracing();
    let cli = Cli::parse();
    let config = LauncherConfig::from_env();

    let acknowledge =
        cli.wants_acknowledgment() && console::should_pause(cli.no_pause() || config.no_pause);

    let code = match commands::dispatch(&cli, &config) {
        Ok(()) => 0,
        Err(e) => report_failure(&e),
    };

    if acknowledge {
        console::wait_for_ack();
    }
    ExitCode::from(code)
}

/// Print the fatal banner and pick the exit code.
fn report_failure(err: &anyhow::Error) -> u8 {
    eprintln!();
    eprintln!("❌ {}", err);
    for cause in err.chain().skip(1) {
        eprintln!("   caused by: {}", cause);
    }
    match err.downcast_ref::<BootstrapError>() {
        Some(e) => {
            if let Some(hint) = hint(e) {
                eprintln!("   {}", hint);
            }
            u8::try_from(e.exit_code()).unwrap_or(1)
        }
        None => 1,
    }
}

fn hint(err: &BootstrapError) -> Option<&'static str> {
    match err {
        BootstrapError::SandboxCreation { .. } => Some(
            "Is Python 3 installed and on PATH? Set VENVKIT_PYTHON or pass --python to pick one.",
        ),
        BootstrapError::Activation { .. } => {
            Some("The sandbox looks incomplete; run `venvkit clean` and try again.")
        }
        BootstrapError::Install { .. } => {
            Some("Check the pip output above, or rerun without --strict-install.")
        }
        BootstrapError::Launch { .. } => None,
    }
}
