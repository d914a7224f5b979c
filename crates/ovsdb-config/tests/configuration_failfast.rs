//! Integration tests for configuration fail-fast behaviour.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;
use ortho_config::OrthoConfig;
use ovsdb_config::Config;
use rstest::rstest;
use tempfile::TempDir;

static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Serialises tests that read the process environment.
fn env_lock() -> MutexGuard<'static, ()> {
    ENV_MUTEX.lock().unwrap_or_else(PoisonError::into_inner)
}

struct EnvOverride {
    key: &'static str,
    previous: Option<OsString>,
    guard: Option<MutexGuard<'static, ()>>,
}

impl EnvOverride {
    fn set_var(key: &'static str, value: &OsStr) -> Self {
        let guard = env_lock();
        let previous = std::env::var_os(key);
        unsafe { std::env::set_var(key, value) };
        Self {
            key,
            previous,
            guard: Some(guard),
        }
    }
}

impl Drop for EnvOverride {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(value) => unsafe { std::env::set_var(self.key, value) },
            None => unsafe { std::env::remove_var(self.key) },
        }
        drop(self.guard.take());
    }
}

fn args_with_file(path: &Path) -> Vec<OsString> {
    vec![
        OsString::from("ovsdb-client"),
        OsString::from("--config-path"),
        path.as_os_str().to_owned(),
    ]
}

#[rstest]
#[case("set_encoding = \"bare\"\n")]
#[case("set_encoding = 1\n")]
#[case("log_filter = debug\n")]
#[case("log_format = \"pretty\"\n")]
fn invalid_file_values_fail_loading(#[case] contents: &str) {
    let _lock = env_lock();
    let temp_dir = TempDir::new().expect("create temp dir");
    let path = temp_dir.path().join("ovsdb.toml");
    fs::write(&path, contents).expect("write config");

    let error = Config::load_from_iter(args_with_file(&path)).expect_err("loading must fail");
    assert!(!error.to_string().is_empty());
}

#[test]
fn invalid_environment_encoding_fails_loading() {
    let _env = EnvOverride::set_var("OVSDB_SET_ENCODING", OsStr::new("bare"));
    let error = Config::load_from_iter([OsString::from("ovsdb-client")])
        .expect_err("loading must fail");
    let message = error.to_string();
    assert!(message.contains("bare"), "expected the bad value in {message:?}");
}

#[test]
fn invalid_cli_encoding_fails_loading() {
    let _lock = env_lock();
    let args = ["ovsdb-client", "--set-encoding", "bare"].map(OsString::from);
    let error = Config::load_from_iter(args).expect_err("loading must fail");
    let message = error.to_string();
    assert!(message.contains("bare"), "expected the bad value in {message:?}");
}

#[test]
fn unquoted_environment_filter_lists_are_rejected() {
    let _env = EnvOverride::set_var("OVSDB_LOG_FILTER", OsStr::new("warn,ovsdb_client=debug"));
    let _error = Config::load_from_iter([OsString::from("ovsdb-client")])
        .expect_err("a comma list is not a filter string");
}

#[test]
fn quoted_environment_filter_lists_load() {
    let _env = EnvOverride::set_var(
        "OVSDB_LOG_FILTER",
        OsStr::new("\"warn,ovsdb_client=debug\""),
    );
    let config = Config::load_from_iter([OsString::from("ovsdb-client")]).expect("config loads");
    assert_eq!(config.log_filter(), "warn,ovsdb_client=debug");
}
