//! Error types for `itinera-core`.
//!
//! Every variant except [`Error::Store`] and [`Error::Serialization`] is a
//! recoverable, caller-visible outcome of a sharing operation — none of them
//! is ever treated as fatal.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::{
  collaborator::{CollaboratorRole, CollaboratorStatus},
  token::InvitationToken,
};

#[derive(Debug, Error)]
pub enum Error {
  #[error("actor is not authorized for this operation")]
  NotAuthorized,

  #[error("invalid email address: {0:?}")]
  InvalidEmail(String),

  /// Only viewer grants can currently be issued through an invitation.
  #[error("role {0} cannot be granted via invitation")]
  UngrantableRole(CollaboratorRole),

  /// No collaborator row matches the presented token.
  #[error("no invitation matches the presented token")]
  InvalidToken,

  /// The token matched a row, but the row is no longer `pending` — covers
  /// double-accepts and accepts of declined or revoked links.
  #[error("invitation is {0}, not pending")]
  NotPending(CollaboratorStatus),

  /// The row is still `pending`; its status is left untouched on expiry.
  #[error("invitation token expired at {0}")]
  ExpiredToken(DateTime<Utc>),

  /// An invite hit an email that already holds a live grant. Carries the
  /// existing link so the caller can re-share it instead of guessing what
  /// went wrong.
  #[error("an invitation for this email is already active (expires {expires_at})")]
  AlreadyActive {
    token:      InvitationToken,
    expires_at: DateTime<Utc>,
  },

  #[error("collaborator not found: {0}")]
  CollaboratorNotFound(Uuid),

  #[error("journey not found: {0}")]
  JourneyNotFound(Uuid),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Convert a backend error through its `Into<Error>` bound. Protocol
  /// failures produced inside a backend pass through intact, where a
  /// blanket [`Error::Store`] wrap would hide them.
  pub(crate) fn backend<E: Into<Error>>(e: E) -> Error { e.into() }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
