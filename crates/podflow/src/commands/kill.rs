use colored::Colorize;
use podflow_controlplane::ControlPlane;
use podflow_core::{DProcTable, lifecycle};

/// 分散プロセスを停止する。
///
/// scale→0、deployment 削除、service 削除がすべて成功した場合にのみ
/// レジストリからレコードが外れる。失敗時は診断と usage を表示する。
pub async fn handle<C: ControlPlane>(table: &DProcTable, cp: &C, line: &str) {
    let Some(id) = line.split_whitespace().nth(1) else {
        println!("{}", "停止する分散プロセスを指定してください".yellow());
        println!("  使い方: kill <dpid>");
        return;
    };

    match lifecycle::kill(table, cp, id).await {
        Ok(()) => {
            println!("{} {} を停止しました", "✓".green(), id.cyan());
        }
        Err(e) => {
            tracing::warn!("couldn't tear down {id}: {e}");
            eprintln!();
            eprintln!("{} {} の停止に失敗しました:", "⚠".yellow(), id.cyan());
            eprintln!("{e}");
            eprintln!();
            crate::commands::usage::print();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use podflow_controlplane::mock::MockControlPlane;
    use podflow_core::{DProc, DProcKind};

    #[tokio::test]
    async fn test_kill_removes_record_on_success() {
        let cp = MockControlPlane::new("prod");
        let table = DProcTable::new();
        table.add(DProc::new(
            "podflow-app-1",
            DProcKind::LongRunning,
            "prod",
            "node:app.js",
        ));

        handle(&table, &cp, "kill podflow-app-1").await;

        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn test_failed_kill_keeps_record() {
        let cp = MockControlPlane::new("prod");
        cp.fail_on("scale");
        let table = DProcTable::new();
        table.add(DProc::new(
            "podflow-app-1",
            DProcKind::LongRunning,
            "prod",
            "node:app.js",
        ));

        handle(&table, &cp, "kill podflow-app-1").await;

        assert_eq!(table.len(), 1);
    }

    #[tokio::test]
    async fn test_kill_without_target_issues_nothing() {
        let cp = MockControlPlane::new("prod");
        let table = DProcTable::new();

        handle(&table, &cp, "kill").await;

        assert!(cp.calls().is_empty());
    }
}
