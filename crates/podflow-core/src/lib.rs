//! podflow core — 分散プロセスの追跡と回収
//!
//! インタラクティブセッションからクラスタに投げたワークロードを
//! 追跡するためのコア。三つの部品からなる:
//!
//! - [`DProcTable`] — `(id, context)` をキーにしたメモリ常駐レジストリ
//! - [`lifecycle`] — launch / kill をレジストリ更新とクラスタ操作に変換
//! - [`reaper::Reaper`] — クラスタ観測状態だけを根拠に orphan を回収する
//!   常駐ループ
//!
//! ローカルの「起動した」という記憶とクラスタの「まだ動いている」という
//! 現実はずれうる。そのずれを、レジストリの生存に依存せずに reaper が
//! 埋めるのがこの crate の要点。

pub mod dproc;
pub mod error;
pub mod lifecycle;
pub mod reaper;
pub mod table;

pub use dproc::{DProc, DProcKind};
pub use error::{CoreError, Result};
pub use reaper::{Reaper, ReaperHandle};
pub use table::DProcTable;
