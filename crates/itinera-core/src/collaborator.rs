//! Collaborator — the stored grant/invitation record and its state machine.
//!
//! Each row is keyed by `(journey_id, email)` in practice: a declined or
//! revoked row is reused ("reinstated") by a later invite for the same
//! email instead of inserting a duplicate, so at most one row per invitee
//! exists and the one-active-grant rule reduces to a single uniqueness
//! check. Full history lives in the audit log, not the mutable row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Result, email::EmailAddress, error::Error, token::InvitationToken};

// ─── Role ────────────────────────────────────────────────────────────────────

/// Access level held on a journey.
///
/// `Owner` is implicit for the journey's creator and is never stored as a
/// collaborator row; invitations can currently grant only `Viewer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollaboratorRole {
  Owner,
  Viewer,
}

impl std::fmt::Display for CollaboratorRole {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(match self {
      Self::Owner => "owner",
      Self::Viewer => "viewer",
    })
  }
}

// ─── Status ──────────────────────────────────────────────────────────────────

/// Lifecycle state of an invitation/grant row.
///
/// `Declined` and `Revoked` are not terminal: a later invite for the same
/// email reinstates the row to `Pending` with a fresh token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollaboratorStatus {
  Pending,
  Accepted,
  Declined,
  Revoked,
}

impl CollaboratorStatus {
  /// Whether a row in this state counts against the one-active-grant-per-
  /// email rule.
  pub fn is_active(self) -> bool {
    matches!(self, Self::Pending | Self::Accepted)
  }

  /// Whether an invite for the same email may reuse this row.
  pub fn is_reinstatable(self) -> bool { !self.is_active() }
}

impl std::fmt::Display for CollaboratorStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(match self {
      Self::Pending => "pending",
      Self::Accepted => "accepted",
      Self::Declined => "declined",
      Self::Revoked => "revoked",
    })
  }
}

// ─── Collaborator ────────────────────────────────────────────────────────────

/// A stored grant binding an email (and, once accepted, an identity) to
/// view access on one journey.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collaborator {
  pub id:               Uuid,
  pub journey_id:       Uuid,
  pub email:            EmailAddress,
  pub role:             CollaboratorRole,
  pub status:           CollaboratorStatus,
  /// Unique across all rows and all reinstatements.
  pub invitation_token: InvitationToken,
  /// Set to issuance time + TTL on every (re-)issuance.
  pub token_expires_at: DateTime<Utc>,
  pub invited_by:       Uuid,
  /// Timestamp of the last issuance; updated on reinstatement.
  pub invited_at:       DateTime<Utc>,
  /// Null unless `status` is `accepted`; cleared on reinstatement.
  pub accepted_at:      Option<DateTime<Utc>>,
  /// Actor bound at acceptance; null unless `status` is `accepted`.
  pub user_id:          Option<Uuid>,
}

// ─── NewInvitation ───────────────────────────────────────────────────────────

/// Input to [`ShareStore::create_invitation`](crate::store::ShareStore).
/// Token and expiry are issued by the caller so the store stays free of
/// randomness.
#[derive(Debug, Clone)]
pub struct NewInvitation {
  pub journey_id: Uuid,
  pub email:      EmailAddress,
  pub role:       CollaboratorRole,
  pub token:      InvitationToken,
  pub expires_at: DateTime<Utc>,
  pub invited_by: Uuid,
}

// ─── Transition guard ────────────────────────────────────────────────────────

/// Guard applied before the `accept` and `decline` transitions.
///
/// Expiry is checked at use time, never swept proactively: an expired row
/// keeps its `Pending` status until the owner re-invites.
pub fn acceptance_guard(
  status: CollaboratorStatus,
  expires_at: DateTime<Utc>,
  now: DateTime<Utc>,
) -> Result<()> {
  if status != CollaboratorStatus::Pending {
    return Err(Error::NotPending(status));
  }
  if now > expires_at {
    return Err(Error::ExpiredToken(expires_at));
  }
  Ok(())
}
