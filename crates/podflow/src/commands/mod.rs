//! 対話シェルの組み込みコマンド

pub mod context;
pub mod env;
pub mod kill;
pub mod ps;
pub mod raw;
pub mod usage;
