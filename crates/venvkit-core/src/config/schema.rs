//! 按领域分组的配置结构体
//!
//! 从环境变量加载，统一 fallback 逻辑。

use super::env_keys::{launcher as launch_keys, observability as obv_keys};
use super::loader::{env_bool, env_optional, env_or};
use std::fmt;
use std::str::FromStr;

/// What to do when the installer upgrade or package install step fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstallPolicy {
    /// Log the failure and keep going.
    #[default]
    BestEffort,
    /// Abort the bootstrap on the first failed package install.
    Strict,
}

impl InstallPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            InstallPolicy::BestEffort => "best-effort",
            InstallPolicy::Strict => "strict",
        }
    }
}

impl fmt::Display for InstallPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown install policy '{0}' (expected 'best-effort' or 'strict')")]
pub struct UnknownInstallPolicy(pub String);

impl FromStr for InstallPolicy {
    type Err = UnknownInstallPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "best-effort" | "besteffort" | "lenient" => Ok(InstallPolicy::BestEffort),
            "strict" => Ok(InstallPolicy::Strict),
            _ => Err(UnknownInstallPolicy(s.to_string())),
        }
    }
}

/// 启动配置：均为可选覆盖项，未设置时由调用方使用内置默认值
#[derive(Debug, Clone, Default)]
pub struct LauncherConfig {
    pub venv_dir: Option<String>,
    pub entry: Option<String>,
    pub runner: Option<String>,
    pub packages: Option<Vec<String>>,
    pub install_policy: InstallPolicy,
    pub no_pause: bool,
    pub python: Option<String>,
}

impl LauncherConfig {
    /// 从环境变量加载（会自动加载 .env）
    pub fn from_env() -> Self {
        super::loader::load_dotenv();
        let install_policy = match env_optional(launch_keys::VENVKIT_INSTALL_POLICY, &[]) {
            Some(raw) => raw.parse::<InstallPolicy>().unwrap_or_else(|e: UnknownInstallPolicy| {
                tracing::warn!("{}; falling back to best-effort", e);
                InstallPolicy::BestEffort
            }),
            None => InstallPolicy::default(),
        };
        Self {
            venv_dir: env_optional(launch_keys::VENVKIT_VENV_DIR, &[]),
            entry: env_optional(launch_keys::VENVKIT_ENTRY, &[]),
            runner: env_optional(launch_keys::VENVKIT_RUNNER, &[]),
            packages: env_optional(launch_keys::VENVKIT_PACKAGES, &[])
                .map(|raw| parse_package_list(&raw))
                .filter(|pkgs| !pkgs.is_empty()),
            install_policy,
            no_pause: env_bool(launch_keys::VENVKIT_NO_PAUSE, &[], false),
            python: env_optional(launch_keys::VENVKIT_PYTHON, &[]),
        }
    }
}

/// Split a package list on whitespace and commas, dropping empty items.
pub fn parse_package_list(raw: &str) -> Vec<String> {
    raw.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// 可观测性配置：quiet、log_level、log_json、audit_log
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub quiet: bool,
    pub log_level: String,
    pub log_json: bool,
    pub audit_log: Option<String>,
}

impl ObservabilityConfig {
    pub fn from_env() -> &'static Self {
        use std::sync::OnceLock;
        static CACHE: OnceLock<ObservabilityConfig> = OnceLock::new();
        CACHE.get_or_init(|| {
            super::loader::load_dotenv();
            Self {
                quiet: env_bool(obv_keys::VENVKIT_QUIET, &[], false),
                log_level: env_or(obv_keys::VENVKIT_LOG_LEVEL, &[], || {
                    "venvkit=info".to_string()
                }),
                log_json: env_bool(obv_keys::VENVKIT_LOG_JSON, &[], false),
                audit_log: env_optional(obv_keys::VENVKIT_AUDIT_LOG, &[]),
            }
        })
    }
}
