use podflow_controlplane::ControlPlaneError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("分散プロセス '{id}' がコンテキスト '{context}' に見つかりません")]
    NotFound { id: String, context: String },

    #[error("pod の起動時刻 '{value}' をパースできません: {source}")]
    InvalidStartTime {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error(transparent)]
    ControlPlane(#[from] ControlPlaneError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
