use colored::Colorize;

/// 組み込みコマンドと対応ランタイムの一覧を表示
pub fn print() {
    println!("{}", "podflow の組み込みコマンド:".bold());
    println!("  {:<24} 追跡中の分散プロセス一覧", "ps".cyan());
    println!("  {:<24} 分散プロセスを停止", "kill <dpid>".cyan());
    println!("  {:<24} クラスタコンテキストを切り替え", "use <context>".cyan());
    println!("  {:<24} 既知のコンテキスト一覧", "contexts".cyan());
    println!("  {:<24} セッション環境変数の一覧", "env".cyan());
    println!("  {:<24} セッション環境変数を設定", "set KEY=VALUE".cyan());
    println!("  {:<24} セッション環境変数を削除", "unset KEY".cyan());
    println!("  {:<24} kubectl をそのまま実行", "kubectl <args…>".cyan());
    println!("  {:<24} この一覧を表示", "help".cyan());
    println!("  {:<24} シェルを終了", "exit".cyan());
    println!();
    println!("クラスタ上でプログラムを走らせるには、バイナリを直接指定するか");
    println!("対応インタプリタ経由で起動します (末尾の {} でバックグラウンド起動):", "&".cyan());
    println!("  - Node.js … node script.js (デフォルト: 9.4)");
    println!("  - Python … python script.py (デフォルト: 3.6)");
    println!("  - Ruby … ruby script.rb (デフォルト: 2.5)");
}
