use colored::Colorize;
use podflow_controlplane::ControlPlane;

/// コンテキストを切り替える。成功したら新しいコンテキスト名を返す
/// (プロンプト更新用)。
pub async fn handle_use<C: ControlPlane>(cp: &C, line: &str) -> Option<String> {
    let Some(target) = line.split_whitespace().nth(1) else {
        println!("{}", "切り替え先のクラスタを指定してください".yellow());
        println!("  使い方: use <context>");
        return None;
    };

    match cp.use_context(target).await {
        Ok(res) => {
            print!("{res}");
            Some(target.to_string())
        }
        Err(e) => {
            eprintln!();
            eprintln!("{} コンテキストの切り替えに失敗しました:", "⚠".yellow());
            eprintln!("{e}");
            eprintln!();
            None
        }
    }
}

/// 既知のコンテキストを一覧表示
pub async fn handle_list<C: ControlPlane>(cp: &C) {
    match cp.get_contexts().await {
        Ok(res) => print!("{res}"),
        Err(e) => {
            eprintln!();
            eprintln!("{} コンテキスト一覧の取得に失敗しました:", "⚠".yellow());
            eprintln!("{e}");
            eprintln!();
        }
    }
}
