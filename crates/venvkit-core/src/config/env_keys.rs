//! 环境变量 key 常量
//!
//! 所有变量均以 `VENVKIT_*` 为前缀；未设置时使用内置默认值，行为与原始启动脚本一致。

/// 启动流程：沙箱目录、入口脚本、运行器、依赖列表
pub mod launcher {
    /// Sandbox directory, relative to the project directory (default `venv`).
    pub const VENVKIT_VENV_DIR: &str = "VENVKIT_VENV_DIR";

    /// Entry script handed to the runner (default `scraper.py`).
    pub const VENVKIT_ENTRY: &str = "VENVKIT_ENTRY";

    /// Web-app runner executable (default `streamlit`).
    pub const VENVKIT_RUNNER: &str = "VENVKIT_RUNNER";

    /// Space- or comma-separated package list; replaces the built-in list.
    pub const VENVKIT_PACKAGES: &str = "VENVKIT_PACKAGES";

    /// `best-effort` (default) or `strict`.
    pub const VENVKIT_INSTALL_POLICY: &str = "VENVKIT_INSTALL_POLICY";

    /// Skip the final acknowledgment pause.
    pub const VENVKIT_NO_PAUSE: &str = "VENVKIT_NO_PAUSE";

    /// Explicit host interpreter used to create the sandbox.
    pub const VENVKIT_PYTHON: &str = "VENVKIT_PYTHON";
}

/// 可观测性与日志
pub mod observability {
    pub const VENVKIT_QUIET: &str = "VENVKIT_QUIET";
    pub const VENVKIT_LOG_LEVEL: &str = "VENVKIT_LOG_LEVEL";
    pub const VENVKIT_LOG_JSON: &str = "VENVKIT_LOG_JSON";
    pub const VENVKIT_AUDIT_LOG: &str = "VENVKIT_AUDIT_LOG";
}
