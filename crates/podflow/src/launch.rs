//! launch ヘルパー
//!
//! 対話シェルの入力行をクラスタ上のワークロードに変換する。行が既知の
//! ランタイム (node / python / ruby) で始まればスクリプト起動、それ以外は
//! バイナリ起動とみなす。末尾の `&` はバックグラウンド起動の印で、
//! その場合にのみレジストリに `LongRunning` レコードを登録する。

use crate::envs::EnvVarTable;
use colored::Colorize;
use podflow_controlplane::ControlPlane;
use podflow_core::lifecycle::{self, service_name};
use podflow_core::{DProcKind, DProcTable};
use std::path::Path;

/// 対応ランタイムとそのイメージ設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Runtime {
    Node,
    Python,
    Ruby,
    Binary,
}

impl Runtime {
    fn detect(line: &str) -> Runtime {
        match line.split_whitespace().next() {
            Some("node") => Runtime::Node,
            Some("python") => Runtime::Python,
            Some("ruby") => Runtime::Ruby,
            _ => Runtime::Binary,
        }
    }

    fn image_var(self) -> &'static str {
        match self {
            Runtime::Node => "NODE_IMAGE",
            Runtime::Python => "PYTHON_IMAGE",
            Runtime::Ruby => "RUBY_IMAGE",
            Runtime::Binary => "BINARY_IMAGE",
        }
    }

    fn default_image(self) -> &'static str {
        match self {
            Runtime::Node => "node:9.4-alpine",
            Runtime::Python => "python:3.6-alpine3.7",
            Runtime::Ruby => "ruby:2.5-alpine3.7",
            Runtime::Binary => "alpine:3.7",
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            Runtime::Node => "node",
            Runtime::Python => "python",
            Runtime::Ruby => "ruby",
            Runtime::Binary => "binary",
        }
    }
}

/// 末尾の `&` を落とした起動行を返す。
fn strip_background_marker(line: &str) -> (&str, bool) {
    let trimmed = line.trim();
    match trimmed.strip_suffix('&') {
        Some(rest) => (rest.trim_end(), true),
        None => (trimmed, false),
    }
}

/// 起動行から `runtime:path` 形式のソース記述子を作る。
///
/// `node app.js &` → `node:app.js`、`./mytool` → `binary:./mytool`。
pub fn extract_src(line: &str) -> Option<String> {
    let (line, _) = strip_background_marker(line);
    let runtime = Runtime::detect(line);
    let mut tokens = line.split_whitespace();
    let script = match runtime {
        Runtime::Binary => tokens.next()?,
        _ => tokens.nth(1)?,
    };
    Some(format!("{}:{}", runtime.prefix(), script))
}

/// deployment 名を払い出す。スクリプト名の stem + ミリ秒時刻で、
/// 同じスクリプトを繰り返し起動しても衝突しない。
fn deployment_id(script: &str) -> String {
    let stem = Path::new(script)
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_else(|| "proc".to_string());
    format!("podflow-{}-{}", stem, chrono::Utc::now().timestamp_millis())
}

fn launch_fail(line: &str, reason: &str) {
    tracing::warn!("couldn't launch {line:?}: {reason}");
    eprintln!();
    eprintln!(
        "{} {:?} のクラスタ起動に失敗しました:",
        "⚠".yellow(),
        line
    );
    eprintln!("{reason}");
    eprintln!();
    crate::commands::usage::print();
}

/// 起動行を処理する。クラスタ操作の失敗は診断と usage を表示して打ち切る。
pub async fn handle<C: ControlPlane>(
    table: &DProcTable,
    cp: &C,
    envs: &EnvVarTable,
    line: &str,
) {
    let (cleaned, backgrounded) = strip_background_marker(line);

    let Some(src) = extract_src(cleaned) else {
        launch_fail(line, "起動対象のスクリプトが指定されていません");
        return;
    };

    let runtime = Runtime::detect(cleaned);
    let script = src.split_once(':').map(|(_, p)| p).unwrap_or(&src);
    let image = envs
        .get(runtime.image_var())
        .unwrap_or_else(|| runtime.default_image().to_string());

    let kind = if backgrounded {
        DProcKind::LongRunning
    } else {
        DProcKind::Terminating
    };

    let id = deployment_id(script);
    // バイナリ起動は行全体 (引数込み) をそのまま渡す
    let command: Vec<String> = match runtime {
        Runtime::Binary => cleaned.split_whitespace().map(str::to_string).collect(),
        _ => vec![runtime.prefix().to_string(), script.to_string()],
    };

    if let Err(e) = cp
        .run_deployment(&id, &image, &kind.to_string(), &command)
        .await
    {
        launch_fail(line, &e.to_string());
        return;
    }

    if !backgrounded {
        // フォアグラウンド起動は追跡しない。実行が終われば pod は消え、
        // 長引いた場合は terminating ラベル経由で reaper が回収する。
        println!("{} {} を起動しました", "✓".green(), script.cyan());
        return;
    }

    let port: u16 = envs
        .get("SERVICE_PORT")
        .and_then(|p| p.parse().ok())
        .unwrap_or(80);
    let svc = service_name(&src);
    if let Err(e) = cp.expose_deployment(&id, &svc, port).await {
        launch_fail(line, &e.to_string());
        return;
    }

    match lifecycle::register_launch(table, cp, &id, &src).await {
        Ok(dproc) => {
            println!(
                "{} {} をバックグラウンド起動しました (dpid: {})",
                "✓".green(),
                script.cyan(),
                dproc.id.cyan()
            );
            println!(
                "  service {} をポート {} で公開中",
                svc.cyan(),
                port.to_string().cyan()
            );
        }
        Err(e) => launch_fail(line, &e.to_string()),
    }
}
