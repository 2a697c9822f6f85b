//! 対話シェル
//!
//! フォアグラウンドは逐次的なコマンドループ、バックグラウンドには
//! orphan reaper が一つ。reaper はセッションの生存期間中走り続け、
//! 終了時にハンドル経由で明示的に停止される。

use crate::commands;
use crate::envs::EnvVarTable;
use crate::launch;
use anyhow::Context as _;
use colored::Colorize;
use podflow_controlplane::{ControlPlane, Kubectl};
use podflow_core::{DProcTable, Reaper};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

fn prompt(context: &str) -> String {
    format!("[{}]$ ", context.green())
}

pub async fn run() -> anyhow::Result<()> {
    let envs = EnvVarTable::with_defaults();
    let kubectl = match envs.get("KUBECTL_BINARY") {
        Some(binary) => Kubectl::with_binary(binary),
        None => Kubectl::new(),
    };

    // kubectl が使えなければセッション自体が成立しない
    let mut context = kubectl
        .current_context()
        .await
        .context("現在のクラスタコンテキストを取得できません。kubectl の設定を確認してください")?;

    let table = Arc::new(DProcTable::new());
    let reaper = Reaper::new(kubectl.clone()).spawn();

    println!(
        "{} context {} に接続しました。{} でコマンド一覧を表示します。",
        "✓".green(),
        context.cyan(),
        "help".cyan()
    );

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        stdout.write_all(prompt(&context).as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break; // EOF
        };
        let line = line.trim().to_string();

        match line.split_whitespace().next() {
            None => continue,
            Some("exit") | Some("quit") => break,
            Some("help") => commands::usage::print(),
            Some("ps") => commands::ps::handle(&table),
            Some("kill") => commands::kill::handle(&table, &kubectl, &line).await,
            Some("use") => {
                if let Some(new_context) = commands::context::handle_use(&kubectl, &line).await {
                    context = new_context;
                }
            }
            Some("contexts") => commands::context::handle_list(&kubectl).await,
            Some("env") => commands::env::handle_list(&envs),
            Some("set") => commands::env::handle_set(&envs, &line),
            Some("unset") => commands::env::handle_unset(&envs, &line),
            Some("kubectl") => commands::raw::handle(&kubectl, &line).await,
            Some(_) => launch::handle(&table, &kubectl, &envs, &line).await,
        }
    }

    // セッション終了時に reaper を決定的に止める
    reaper.shutdown().await;
    println!("{}", "さようなら!".dimmed());
    Ok(())
}
