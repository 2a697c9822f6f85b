//! Orphan reaper
//!
//! クラスタ自身が報告する状態だけを根拠に、宣言上 `terminating` なのに
//! 動き続けている pod を回収する常駐ループ。DProcTable は一切読まない。
//! レジストリはメモリ常駐で使い捨て (セッション終了やクラッシュで消える)
//! という前提なので、掃除の正しさをレジストリの生存に依存させない。
//! 候補はラベルセレクタで毎サイクル導出し直すため、一時的な失敗で
//! 候補が「失われる」ことはない。

use crate::error::{CoreError, Result};
use chrono::{DateTime, Duration as ChronoDuration, NaiveDateTime, Utc};
use podflow_controlplane::ControlPlane;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// pod の startTime のワイヤフォーマット (UTC・秒精度・固定形式)
const START_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

const DEFAULT_PAUSE: Duration = Duration::from_secs(10);
const DEFAULT_MAX_ORPHAN_RUNTIME: Duration = Duration::from_secs(20);

/// startTime 文字列を厳密にパースする。
pub fn parse_start_time(raw: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, START_TIME_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|source| CoreError::InvalidStartTime {
            value: raw.to_string(),
            source,
        })
}

/// 経過時間が許容上限を「厳密に」超えたかどうか。
///
/// 境界ちょうど (経過 == 上限) は orphan とみなさない。
pub fn is_orphaned(start: DateTime<Utc>, now: DateTime<Utc>, max: ChronoDuration) -> bool {
    now.signed_duration_since(start) > max
}

/// Orphan reaper 本体。
///
/// `spawn` でバックグラウンドタスクとして動かし、[`ReaperHandle`] 経由で
/// 明示的に停止できる。個々のサイクルは [`Reaper::run_cycle`] として
/// 切り出してあり、テストでは時刻を固定して直接呼べる。
pub struct Reaper<C> {
    cp: C,
    pause: Duration,
    max_orphan_runtime: ChronoDuration,
}

impl<C: ControlPlane> Reaper<C> {
    pub fn new(cp: C) -> Self {
        Self {
            cp,
            pause: DEFAULT_PAUSE,
            max_orphan_runtime: ChronoDuration::from_std(DEFAULT_MAX_ORPHAN_RUNTIME)
                .expect("default orphan runtime fits in chrono::Duration"),
        }
    }

    /// サイクル間の休止時間 (デフォルト 10 秒)
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// orphan と判定するまでの最大許容稼働時間 (デフォルト 20 秒)
    pub fn with_max_orphan_runtime(mut self, max: Duration) -> Self {
        self.max_orphan_runtime =
            ChronoDuration::from_std(max).expect("orphan runtime fits in chrono::Duration");
        self
    }

    /// 現在時刻で 1 サイクル実行する。
    pub async fn run_cycle(&self) {
        self.run_cycle_at(Utc::now()).await;
    }

    /// `now` を基準に 1 サイクル実行する。
    ///
    /// あらゆる失敗はログに落として回収する。reaper の価値は走り続ける
    /// ことにあるので、一過性の障害でループを止めてはならない。
    pub async fn run_cycle_at(&self, now: DateTime<Utc>) {
        let pods = match self.cp.list_terminating_running_pods().await {
            Ok(pods) => pods,
            Err(e) => {
                tracing::debug!("orphan candidate query failed: {e}");
                return;
            }
        };

        for pod in pods {
            tracing::debug!("found candidate pod {}", pod.name);

            let Some(raw) = pod.start_time.as_deref() else {
                tracing::warn!("pod {} reports no start time, skipping", pod.name);
                continue;
            };
            let start = match parse_start_time(raw) {
                Ok(start) => start,
                Err(e) => {
                    // セレクタが真実源なので、この pod は次サイクルで再評価される
                    tracing::warn!("couldn't parse start time of pod {}: {e}", pod.name);
                    continue;
                }
            };

            if is_orphaned(start, now, self.max_orphan_runtime) {
                tracing::debug!("found orphaned pod {} started at {}", pod.name, start);
                if let Err(e) = self.cp.delete_pod(&pod.name).await {
                    // 削除に失敗しても pod はセレクタに残る。次サイクルで再試行。
                    tracing::warn!("couldn't garbage collect orphaned pod {}: {e}", pod.name);
                }
            }
        }
    }
}

impl<C: ControlPlane + Send + Sync + 'static> Reaper<C> {
    /// 常駐ループを起動する。
    pub fn spawn(self) -> ReaperHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(async move {
            loop {
                self.run_cycle().await;
                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    _ = tokio::time::sleep(self.pause) => {}
                }
            }
            tracing::debug!("reaper stopped");
        });
        ReaperHandle { shutdown_tx, task }
    }
}

/// 起動済み reaper の停止ハンドル。
pub struct ReaperHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ReaperHandle {
    /// ループに停止を通知し、終了を待つ。
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.task.await;
    }
}
