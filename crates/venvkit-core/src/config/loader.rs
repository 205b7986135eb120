//! 统一环境变量加载逻辑
//!
//! 集中维护 fallback 链，避免在业务代码中重复 `or_else` 调用。

use std::env;
use std::path::Path;

/// 加载当前目录下的 `.env` 到环境变量（不覆盖已存在的变量）
///
/// 只执行一次；必须在创建任何子进程或线程之前调用。
pub fn load_dotenv() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let dir = env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from("."));
        let loaded = load_dotenv_from_dir(&dir);
        if loaded > 0 {
            tracing::debug!("Loaded {} variable(s) from {}", loaded, dir.join(".env").display());
        }
    });
}

/// 从指定目录的 `.env` 加载变量，返回实际写入的变量数
pub fn load_dotenv_from_dir(dir: &Path) -> usize {
    let Ok(content) = std::fs::read_to_string(dir.join(".env")) else {
        return 0;
    };
    let mut applied = 0;
    for (key, value) in parse_dotenv(&content) {
        if env::var_os(&key).is_none() {
            env::set_var(&key, &value);
            applied += 1;
        }
    }
    applied
}

/// 解析 `.env` 内容：`KEY=VALUE`，支持 `#` 注释、行尾注释与成对引号
pub fn parse_dotenv(content: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some(eq_pos) = line.find('=') else {
            continue;
        };
        let key = line[..eq_pos].trim();
        let mut value = line[eq_pos + 1..].trim();
        // Strip inline comment (# not inside quotes)
        if let Some(hash_pos) = value.find('#') {
            let before_hash = value[..hash_pos].trim_end();
            if !before_hash.contains('"') && !before_hash.contains('\'') {
                value = before_hash;
            }
        }
        if value.len() >= 2
            && ((value.starts_with('"') && value.ends_with('"'))
                || (value.starts_with('\'') && value.ends_with('\'')))
        {
            value = &value[1..value.len() - 1];
        }
        if !key.is_empty() {
            pairs.push((key.to_string(), value.to_string()));
        }
    }
    pairs
}

/// 从主变量或别名链读取环境变量，失败时使用默认值
pub fn env_or<F>(primary: &str, aliases: &[&str], default: F) -> String
where
    F: FnOnce() -> String,
{
    env_optional(primary, aliases).unwrap_or_else(default)
}

/// 从主变量或别名链读取，返回 Option（空值视为未设置）
pub fn env_optional(primary: &str, aliases: &[&str]) -> Option<String> {
    env::var(primary)
        .ok()
        .or_else(|| aliases.iter().find_map(|a| env::var(a).ok()))
        .and_then(|s| {
            let s = s.trim().to_string();
            if s.is_empty() {
                None
            } else {
                Some(s)
            }
        })
}

/// 解析布尔型环境变量：0/false/no/off 为 false，其他非空值为 true
pub fn env_bool(primary: &str, aliases: &[&str], default: bool) -> bool {
    match env_optional(primary, aliases) {
        Some(s) => !matches!(
            s.to_lowercase().as_str(),
            "0" | "false" | "no" | "off"
        ),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dotenv_basic() {
        let pairs = parse_dotenv("A=1\n# comment\n\nB = two \nexport C=3\n");
        assert_eq!(
            pairs,
            vec![
                ("A".to_string(), "1".to_string()),
                ("B".to_string(), "two".to_string()),
                ("C".to_string(), "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_dotenv_quotes_and_inline_comment() {
        let pairs = parse_dotenv("A=\"hello world\"\nB=value # trailing\nC='x#y'\nD=\"\n");
        assert_eq!(pairs[0].1, "hello world");
        assert_eq!(pairs[1].1, "value");
        assert_eq!(pairs[2].1, "x#y");
        // A lone quote is kept verbatim rather than sliced.
        assert_eq!(pairs[3].1, "\"");
    }

    #[test]
    fn test_parse_dotenv_skips_malformed() {
        let pairs = parse_dotenv("NOEQUALS\n=novalue\n");
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_env_helpers() {
        env::set_var("VENVKIT_TEST_LOADER_PRIMARY", "  ");
        env::set_var("VENVKIT_TEST_LOADER_ALIAS", "alias-value");
        assert_eq!(
            env_optional("VENVKIT_TEST_LOADER_PRIMARY", &[]),
            None,
            "blank values count as unset"
        );
        assert_eq!(
            env_or("VENVKIT_TEST_LOADER_MISSING", &["VENVKIT_TEST_LOADER_ALIAS"], String::new),
            "alias-value"
        );
        env::set_var("VENVKIT_TEST_LOADER_BOOL", "off");
        assert!(!env_bool("VENVKIT_TEST_LOADER_BOOL", &[], true));
        assert!(env_bool("VENVKIT_TEST_LOADER_BOOL_MISSING", &[], true));
    }

    #[test]
    fn test_load_dotenv_from_dir_does_not_override() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join(".env"),
            "VENVKIT_TEST_DOTENV_NEW=fresh\nVENVKIT_TEST_DOTENV_SET=from-file\n",
        )
        .unwrap();
        env::set_var("VENVKIT_TEST_DOTENV_SET", "from-process");
        let applied = load_dotenv_from_dir(tmp.path());
        assert_eq!(applied, 1);
        assert_eq!(env::var("VENVKIT_TEST_DOTENV_NEW").unwrap(), "fresh");
        assert_eq!(env::var("VENVKIT_TEST_DOTENV_SET").unwrap(), "from-process");
    }
}
