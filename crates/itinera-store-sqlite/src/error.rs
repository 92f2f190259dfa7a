//! Error type for `itinera-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Caller-visible protocol failures (`AlreadyActive`, `NotPending`, …)
  /// produced inside store transactions.
  #[error("core error: {0}")]
  Core(#[from] itinera_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown status discriminant: {0:?}")]
  UnknownStatus(String),

  #[error("unknown role discriminant: {0:?}")]
  UnknownRole(String),

  #[error("unknown audit action discriminant: {0:?}")]
  UnknownAction(String),
}

/// Protocol failures pass through unchanged so their payloads (e.g. the
/// live token carried by `AlreadyActive`) survive the crate boundary;
/// everything else is an opaque store error to callers.
impl From<Error> for itinera_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(core) => core,
      other => itinera_core::Error::Store(Box::new(other)),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
