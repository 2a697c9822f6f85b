//! 分散プロセスレジストリ (DProcTable)
//!
//! `(id, context)` をキーとするメモリ常駐のテーブル。全操作を単一ロックで
//! 直列化する。セッション単発・低レコード数の規模ではこれで十分で、
//! reaper はこのテーブルを一切参照しないため、テーブルが失われても
//! クラスタ側の掃除は成立する。

use crate::dproc::DProc;
use crate::error::{CoreError, Result};
use std::collections::HashMap;
use std::sync::Mutex;

/// 分散プロセスレジストリ。グローバルではなく明示的に構築して
/// `Arc` で共有する。
#[derive(Debug, Default)]
pub struct DProcTable {
    inner: Mutex<HashMap<(String, String), DProc>>,
}

impl DProcTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// レコードを登録する。同じ `(id, context)` が既にあれば黙って
    /// 上書きする (last-writer-wins)。
    pub fn add(&self, dproc: DProc) {
        let mut map = self.inner.lock().unwrap();
        map.insert((dproc.id.clone(), dproc.context.clone()), dproc);
    }

    /// レコードを削除する。存在しないキーの削除は no-op。
    pub fn remove(&self, dproc: &DProc) {
        let mut map = self.inner.lock().unwrap();
        map.remove(&(dproc.id.clone(), dproc.context.clone()));
    }

    /// `(id, context)` のレコードを返す。
    pub fn get(&self, id: &str, context: &str) -> Result<DProc> {
        let map = self.inner.lock().unwrap();
        map.get(&(id.to_string(), context.to_string()))
            .cloned()
            .ok_or_else(|| CoreError::NotFound {
                id: id.to_string(),
                context: context.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }

    /// `ps` 表示用の一覧。順序は `(context, id)` でソートして
    /// 呼び出しごとに安定させる。
    pub fn dump(&self) -> String {
        let mut dprocs: Vec<DProc> = {
            let map = self.inner.lock().unwrap();
            map.values().cloned().collect()
        };
        dprocs.sort_by(|a, b| (&a.context, &a.id).cmp(&(&b.context, &b.id)));

        let mut out = format!(
            "{:<40} {:<15} {:<12} {:<20} {:<20}\n",
            "DPID", "CONTEXT", "TYPE", "SINCE", "SOURCE"
        );
        for dproc in dprocs {
            out.push_str(&format!(
                "{:<40} {:<15} {:<12} {:<20} {:<20}\n",
                dproc.id,
                dproc.context,
                dproc.kind.to_string(),
                dproc.created_at.format("%Y-%m-%d %H:%M:%S"),
                dproc.src
            ));
        }
        out
    }
}
