//! Audit log types — the append-only record of sharing lifecycle events.
//!
//! The log exists for after-the-fact review. Enforcement is the access
//! gate's job, driven by current row status; the log is never consulted to
//! answer an authorization question.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The lifecycle events recorded against a journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
  InviteSent,
  InviteAccepted,
  InviteDeclined,
  AccessRevoked,
}

impl AuditAction {
  /// Discriminant stored in the `action` column.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::InviteSent => "invite_sent",
      Self::InviteAccepted => "invite_accepted",
      Self::InviteDeclined => "invite_declined",
      Self::AccessRevoked => "access_revoked",
    }
  }
}

/// One appended record. Immutable once written; there is no update or
/// delete surface anywhere in the subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
  pub id:          Uuid,
  pub journey_id:  Uuid,
  /// `None` when the action was performed by an unauthenticated link
  /// holder (declining does not require sign-in).
  pub actor_id:    Option<Uuid>,
  pub action:      AuditAction,
  /// Free-form key/value context, e.g. the invitee email.
  pub details:     serde_json::Value,
  pub recorded_at: DateTime<Utc>,
}
