//! ライフサイクル制御
//!
//! ユーザ操作 (launch / kill) をレジストリ更新とクラスタ操作に変換する。
//! クラスタ操作が一つでも失敗したらその時点で中断してエラーを返し、
//! レジストリには手を付けない。発行済みの操作のロールバックはしない
//! (at-least-once セマンティクス)。リトライはこの層の仕事ではなく
//! reaper 側の再評価に任せる。

use crate::dproc::{DProc, DProcKind};
use crate::error::Result;
use crate::table::DProcTable;
use podflow_controlplane::ControlPlane;
use std::path::Path;

/// ソース記述子から teardown 対象の service 名を導出する。
///
/// `runtime:path` の path 部分から最後の拡張子だけを取り除く。
/// `node:server.js` → `server`、`python:app.py` → `app`。
pub fn service_name(src: &str) -> String {
    let path = src.split_once(':').map(|(_, p)| p).unwrap_or(src);
    let ext_len = Path::new(path)
        .extension()
        .map(|ext| ext.len() + 1)
        .unwrap_or(0);
    path[..path.len() - ext_len].to_string()
}

/// バックグラウンド起動されたワークロードをレジストリに登録する。
///
/// 現在のコンテキストを解決し、`LongRunning` のレコードを追加して返す。
/// 明示的に `&` 付きで起動された場合にのみ呼ばれる。フォアグラウンド
/// 起動はレジストリの関知外。
pub async fn register_launch<C: ControlPlane>(
    table: &DProcTable,
    cp: &C,
    id: impl Into<String>,
    src: impl Into<String>,
) -> Result<DProc> {
    let context = cp.current_context().await?;
    let dproc = DProc::new(id, DProcKind::LongRunning, context, src);
    table.add(dproc.clone());
    Ok(dproc)
}

/// 分散プロセスを停止し、関連リソースを削除する。
///
/// scale→0、deployment 削除、service 削除の順で発行し、全て成功した
/// 場合にのみレジストリからレコードを外す。途中で失敗したらレコードは
/// 残る — レコードの存在は「teardown の発行が未確認」を意味する。
pub async fn kill<C: ControlPlane>(table: &DProcTable, cp: &C, id: &str) -> Result<()> {
    let context = cp.current_context().await?;
    cp.scale_deployment(id, 0).await?;
    cp.delete_deployment(id).await?;
    let dproc = table.get(id, &context)?;
    let svc = service_name(&dproc.src);
    cp.delete_service(&svc).await?;
    table.remove(&dproc);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use podflow_controlplane::mock::MockControlPlane;

    #[test]
    fn test_service_name_strips_final_extension() {
        assert_eq!(service_name("node:server.js"), "server");
        assert_eq!(service_name("python:app.py"), "app");
        assert_eq!(service_name("ruby:worker.rb"), "worker");
    }

    #[test]
    fn test_service_name_without_extension() {
        assert_eq!(service_name("binary:mytool"), "mytool");
    }

    #[test]
    fn test_service_name_strips_only_last_extension() {
        assert_eq!(service_name("node:server.test.js"), "server.test");
    }

    #[test]
    fn test_service_name_without_runtime_prefix() {
        assert_eq!(service_name("app.py"), "app");
    }

    #[tokio::test]
    async fn test_register_launch_records_current_context() {
        let cp = MockControlPlane::new("prod");
        let table = DProcTable::new();

        let dproc = register_launch(&table, &cp, "podflow-app-1", "node:app.js")
            .await
            .unwrap();

        assert_eq!(dproc.kind, DProcKind::LongRunning);
        assert_eq!(dproc.context, "prod");
        let got = table.get("podflow-app-1", "prod").unwrap();
        assert_eq!(got.src, "node:app.js");
    }

    #[tokio::test]
    async fn test_register_launch_fails_without_context() {
        let cp = MockControlPlane::new("prod");
        cp.fail_on("config current-context");
        let table = DProcTable::new();

        let res = register_launch(&table, &cp, "podflow-app-1", "node:app.js").await;

        assert!(res.is_err());
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn test_kill_issues_mutations_in_order_then_removes() {
        let cp = MockControlPlane::new("prod");
        let table = DProcTable::new();
        table.add(DProc::new(
            "podflow-app-1",
            DProcKind::LongRunning,
            "prod",
            "node:server.js",
        ));

        kill(&table, &cp, "podflow-app-1").await.unwrap();

        assert_eq!(
            cp.calls(),
            vec![
                "config current-context".to_string(),
                "scale --replicas=0 deployment podflow-app-1".to_string(),
                "delete deployment podflow-app-1".to_string(),
                "delete service server".to_string(),
            ]
        );
        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn test_kill_scale_failure_leaves_registry_untouched() {
        let cp = MockControlPlane::new("prod");
        cp.fail_on("scale");
        let table = DProcTable::new();
        table.add(DProc::new(
            "podflow-app-1",
            DProcKind::LongRunning,
            "prod",
            "node:server.js",
        ));

        assert!(kill(&table, &cp, "podflow-app-1").await.is_err());

        assert_eq!(table.len(), 1);
        // deployment 削除まで進んでいないこと
        assert!(
            !cp.calls()
                .iter()
                .any(|c| c.starts_with("delete deployment"))
        );
    }

    #[tokio::test]
    async fn test_kill_service_delete_failure_leaves_registry_untouched() {
        let cp = MockControlPlane::new("prod");
        cp.fail_on("delete service");
        let table = DProcTable::new();
        table.add(DProc::new(
            "podflow-app-1",
            DProcKind::LongRunning,
            "prod",
            "node:server.js",
        ));

        assert!(kill(&table, &cp, "podflow-app-1").await.is_err());

        assert_eq!(table.len(), 1);
        assert!(table.get("podflow-app-1", "prod").is_ok());
    }

    #[tokio::test]
    async fn test_kill_unknown_id_is_not_found() {
        let cp = MockControlPlane::new("prod");
        let table = DProcTable::new();

        let err = kill(&table, &cp, "no-such-id").await.unwrap_err();

        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_kill_only_sees_records_of_current_context() {
        let cp = MockControlPlane::new("staging");
        let table = DProcTable::new();
        table.add(DProc::new(
            "podflow-app-1",
            DProcKind::LongRunning,
            "prod",
            "node:server.js",
        ));

        let err = kill(&table, &cp, "podflow-app-1").await.unwrap_err();

        assert!(matches!(err, CoreError::NotFound { .. }));
        assert_eq!(table.len(), 1);
    }
}
