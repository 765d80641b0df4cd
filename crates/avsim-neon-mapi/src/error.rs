use avsim_neon_core::CoreError;
use thiserror::Error;

pub type MapiResult<T> = Result<T, MapiError>;

/// Reasons an inbound message is dropped or a handler declines it.
#[derive(Debug, Error)]
pub enum MapiError {
    #[error("MAPI message payload cannot be converted: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("payload must be a dictionary type")]
    NotMapping,
    #[error("message payload does not contain the app")]
    MissingApp,
    #[error("unknown MAPI was called: {0}")]
    UnknownTopic(String),
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),
    #[error(transparent)]
    Core(#[from] CoreError),
}
