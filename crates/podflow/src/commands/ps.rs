use colored::Colorize;
use podflow_core::DProcTable;

/// 追跡中の分散プロセス一覧を表示
pub fn handle(table: &DProcTable) {
    if table.is_empty() {
        println!("{}", "追跡中の分散プロセスはありません".dimmed());
        return;
    }
    let dump = table.dump();
    let mut lines = dump.lines();
    if let Some(header) = lines.next() {
        println!("{}", header.bold());
    }
    for line in lines {
        println!("{line}");
    }
}
