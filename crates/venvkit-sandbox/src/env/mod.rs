//! Sandbox provisioning: host interpreter lookup, `venv` creation, pip installs.
//!
//! Callers (bootstrap) decide what a failure means; this module only runs
//! the commands and reports what happened.

pub mod builder;
