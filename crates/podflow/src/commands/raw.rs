use colored::Colorize;
use podflow_controlplane::ControlPlane;

/// `kubectl …` をそのままコントロールプレーンに渡す
pub async fn handle<C: ControlPlane>(cp: &C, line: &str) {
    let args: Vec<String> = line
        .split_whitespace()
        .skip(1)
        .map(str::to_string)
        .collect();
    if args.is_empty() {
        println!(
            "{}",
            "kubectl コマンドとして実行するには引数が足りません".yellow()
        );
        return;
    }

    match cp.raw(&args).await {
        Ok(res) => print!("{res}"),
        Err(e) => {
            eprintln!();
            eprintln!(
                "{} kubectl {} の実行に失敗しました:",
                "⚠".yellow(),
                args.join(" ")
            );
            eprintln!("{e}");
            eprintln!();
        }
    }
}
