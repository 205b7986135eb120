pub mod activation;
pub mod bootstrap;
pub mod env;
pub mod error;
pub mod layout;
pub mod log;
pub mod plan;
pub mod process;
pub mod runtime_resolver;

pub use bootstrap::{launch, provision, run, BootstrapOutcome, Provisioned};
pub use error::BootstrapError;
pub use plan::LaunchPlan;
pub use process::{ProcessOutcome, ProcessRunner, ProcessSpec, SystemRunner};
