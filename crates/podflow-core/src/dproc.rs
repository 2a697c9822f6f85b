//! 分散プロセスのレコード定義

use chrono::{DateTime, Utc};
use std::fmt;

/// 宣言されたライフサイクル状態。
///
/// クラスタが観測した phase ではなく、起動時に意図として付与される状態。
/// pod の `dproctype` ラベル値としてそのまま使われる。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DProcKind {
    /// バックグラウンド起動された常駐ワークロード
    LongRunning,
    /// 実行完了とともに消えるべきワークロード (reaper の回収対象)
    Terminating,
}

impl fmt::Display for DProcKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DProcKind::LongRunning => write!(f, "longrunning"),
            DProcKind::Terminating => write!(f, "terminating"),
        }
    }
}

/// 分散プロセスのレコード。振る舞いは持たない、追跡用の純データ。
///
/// `(id, context)` の組がレジストリ内で一意。別コンテキストなら同じ id を
/// 衝突なく再利用できる。
#[derive(Debug, Clone, PartialEq)]
pub struct DProc {
    /// 起動ヘルパーが払い出した不透明な識別子 (deployment 名)
    pub id: String,
    pub kind: DProcKind,
    /// レコードが属するクラスタコンテキスト
    pub context: String,
    /// `runtime:path` 形式のソース記述子 (例: `node:server.js`)
    pub src: String,
    pub created_at: DateTime<Utc>,
}

impl DProc {
    pub fn new(
        id: impl Into<String>,
        kind: DProcKind,
        context: impl Into<String>,
        src: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            context: context.into(),
            src: src.into(),
            created_at: Utc::now(),
        }
    }
}
