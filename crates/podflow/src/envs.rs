//! セッション環境変数テーブル
//!
//! 起動イメージや公開ポートなど、launch ヘルパーが参照する値を持つ。
//! グローバルではなく明示的に構築してセッションに渡す。

use std::collections::HashMap;
use std::sync::Mutex;

/// デフォルトで設定される変数と値
const DEFAULTS: &[(&str, &str)] = &[
    ("SERVICE_PORT", "80"),
    ("BINARY_IMAGE", "alpine:3.7"),
    ("NODE_IMAGE", "node:9.4-alpine"),
    ("PYTHON_IMAGE", "python:3.6-alpine3.7"),
    ("RUBY_IMAGE", "ruby:2.5-alpine3.7"),
];

/// 親シェルから引き継ぐ変数
const INHERITED: &[&str] = &["KUBECTL_BINARY", "PATH", "HOME"];

#[derive(Debug, Default)]
pub struct EnvVarTable {
    inner: Mutex<HashMap<String, String>>,
}

impl EnvVarTable {
    /// デフォルト値を設定し、親シェルの変数があれば引き継ぐ。
    pub fn with_defaults() -> Self {
        let table = Self::default();
        for (key, value) in DEFAULTS {
            table.set(*key, *value);
        }
        for key in INHERITED {
            if let Ok(value) = std::env::var(key) {
                table.set(*key, value);
            }
        }
        table
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.inner.lock().unwrap().insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.lock().unwrap().get(key).cloned()
    }

    pub fn unset(&self, key: &str) {
        self.inner.lock().unwrap().remove(key);
    }

    /// `env` 表示用の一覧 (キー順で安定)
    pub fn dump(&self) -> Vec<(String, String)> {
        let mut entries: Vec<(String, String)> = self
            .inner
            .lock()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        entries.sort();
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_set() {
        let envs = EnvVarTable::with_defaults();
        assert_eq!(envs.get("SERVICE_PORT").as_deref(), Some("80"));
        assert_eq!(envs.get("NODE_IMAGE").as_deref(), Some("node:9.4-alpine"));
    }

    #[test]
    fn test_set_get_unset() {
        let envs = EnvVarTable::default();
        assert_eq!(envs.get("FOO"), None);

        envs.set("FOO", "bar");
        assert_eq!(envs.get("FOO").as_deref(), Some("bar"));

        envs.set("FOO", "baz");
        assert_eq!(envs.get("FOO").as_deref(), Some("baz"));

        envs.unset("FOO");
        assert_eq!(envs.get("FOO"), None);

        // 未設定キーの unset は no-op
        envs.unset("FOO");
    }

    #[test]
    fn test_dump_is_sorted() {
        let envs = EnvVarTable::default();
        envs.set("B", "2");
        envs.set("A", "1");

        let entries = envs.dump();
        assert_eq!(
            entries,
            vec![
                ("A".to_string(), "1".to_string()),
                ("B".to_string(), "2".to_string())
            ]
        );
    }
}
