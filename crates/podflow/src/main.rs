mod commands;
mod envs;
mod launch;
mod shell;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "podflow")]
#[command(
    about = "スクリプトをそのままクラスタへ。Kubernetes 上で分散プロセスを起動・追跡する対話シェル",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// バージョン情報を表示
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if matches!(cli.command, Some(Commands::Version)) {
        println!("podflow {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    shell::run().await
}
