//! Quiet-mode aware console output. When VENVKIT_QUIET=1, suppress [INFO] and status banners.

#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {{
        if !$crate::log::is_quiet() {
            tracing::info!($($arg)*);
        }
    }};
}

/// User-facing status banner on stderr.
#[macro_export]
macro_rules! status {
    ($($arg:tt)*) => {{
        if !$crate::log::is_quiet() {
            eprintln!($($arg)*);
        }
    }};
}

pub fn is_quiet() -> bool {
    venvkit_core::config::ObservabilityConfig::from_env().quiet
}
