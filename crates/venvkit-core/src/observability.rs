//! Audit log: JSONL records for bootstrap milestones.
//!
//! Enabled by `VENVKIT_AUDIT_LOG=<path>`; every record carries an RFC3339 `ts`
//! and an `event` name. Write failures never affect the bootstrap.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use serde_json::{json, Value};

/// Where audit records go. `Unresolved` defers to `VENVKIT_AUDIT_LOG` on first use.
enum AuditTarget {
    Unresolved,
    Disabled,
    File(String),
}

static AUDIT_TARGET: Mutex<AuditTarget> = Mutex::new(AuditTarget::Unresolved);

fn get_audit_path() -> Option<String> {
    let mut guard = AUDIT_TARGET.lock().ok()?;
    match *guard {
        AuditTarget::Disabled => return None,
        AuditTarget::File(ref p) => return Some(p.clone()),
        AuditTarget::Unresolved => {}
    }
    let Some(path) = crate::config::ObservabilityConfig::from_env().audit_log.clone() else {
        *guard = AuditTarget::Disabled;
        return None;
    };
    if let Some(parent) = Path::new(&path).parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    *guard = AuditTarget::File(path.clone());
    Some(path)
}

/// Redirect audit records to `path`, or turn them off with `None`. Overrides `VENVKIT_AUDIT_LOG`.
pub fn set_audit_path(path: Option<&Path>) {
    if let Ok(mut guard) = AUDIT_TARGET.lock() {
        *guard = match path {
            Some(p) => AuditTarget::File(p.to_string_lossy().into_owned()),
            None => AuditTarget::Disabled,
        };
    }
}

fn append_jsonl(path: &str, record: &Value) {
    if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(path) {
        if let Ok(line) = serde_json::to_string(record) {
            let _ = writeln!(f, "{}", line);
        }
    }
}

fn emit(event: &str, fields: Value) {
    let Some(path) = get_audit_path() else {
        return;
    };
    let mut record = json!({
        "ts": Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        "event": event,
    });
    if let (Some(obj), Value::Object(extra)) = (record.as_object_mut(), fields) {
        obj.extend(extra);
    }
    append_jsonl(&path, &record);
}

/// Audit: sandbox_created
pub fn audit_sandbox_created(sandbox_dir: &str, host_python: &str, duration_ms: u64) {
    emit(
        "sandbox_created",
        json!({
            "sandbox_dir": sandbox_dir,
            "host_python": host_python,
            "duration_ms": duration_ms,
        }),
    );
}

/// Audit: install_completed (`success` is false when any step failed, regardless of policy)
pub fn audit_install_completed(packages: &[String], success: bool, policy: &str) {
    emit(
        "install_completed",
        json!({
            "packages": packages,
            "success": success,
            "policy": policy,
        }),
    );
}

/// Audit: app_launched (right before spawn)
pub fn audit_app_launched(cmd: &str, args: &[String], cwd: &str) {
    emit(
        "app_launched",
        json!({
            "cmd": cmd,
            "args": args,
            "cwd": cwd,
        }),
    );
}

/// Audit: app_exited. `exit_code` is None when the child was killed by a signal.
pub fn audit_app_exited(exit_code: Option<i32>, duration_ms: u64) {
    emit(
        "app_exited",
        json!({
            "exit_code": exit_code,
            "duration_ms": duration_ms,
        }),
    );
}

/// Audit: bootstrap_failed
pub fn audit_bootstrap_failed(kind: &str, message: &str) {
    emit(
        "bootstrap_failed",
        json!({
            "kind": kind,
            "message": message,
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_records(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    // Single test: the audit target is process-wide.
    #[test]
    fn test_audit_records_are_jsonl_and_can_be_disabled() {
        let tmp = tempfile::tempdir().unwrap();
        let log = tmp.path().join("audit").join("venvkit.jsonl");
        std::fs::create_dir_all(log.parent().unwrap()).unwrap();
        set_audit_path(Some(&log));

        audit_sandbox_created("venv", "python3", 42);
        audit_app_exited(None, 7);

        let records = read_records(&log);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["event"], "sandbox_created");
        assert_eq!(records[0]["duration_ms"], 42);
        assert!(records[0]["ts"].is_string());
        assert_eq!(records[1]["event"], "app_exited");
        assert!(records[1]["exit_code"].is_null());

        set_audit_path(None);
        audit_bootstrap_failed("install", "pip exited with 1");
        audit_app_exited(Some(0), 1);
        assert_eq!(read_records(&log).len(), 2);
        assert!(get_audit_path().is_none());
    }
}
