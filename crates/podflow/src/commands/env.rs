use crate::envs::EnvVarTable;
use colored::Colorize;

/// セッション環境変数の一覧を表示
pub fn handle_list(envs: &EnvVarTable) {
    for (key, value) in envs.dump() {
        println!("{}={}", key.cyan(), value);
    }
}

/// `set KEY=VALUE`
pub fn handle_set(envs: &EnvVarTable, line: &str) {
    let arg = line.split_whitespace().nth(1);
    match arg.and_then(|a| a.split_once('=')) {
        Some((key, value)) if !key.is_empty() => {
            envs.set(key, value);
        }
        _ => {
            println!("{}", "使い方: set KEY=VALUE".yellow());
        }
    }
}

/// `unset KEY`
pub fn handle_unset(envs: &EnvVarTable, line: &str) {
    match line.split_whitespace().nth(1) {
        Some(key) => envs.unset(key),
        None => println!("{}", "使い方: unset KEY".yellow()),
    }
}
