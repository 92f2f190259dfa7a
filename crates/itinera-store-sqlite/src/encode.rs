//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. UUIDs are stored as
//! hyphenated lowercase strings. Enumerations are stored as their wire
//! discriminants.

use chrono::{DateTime, Utc};
use itinera_core::{
  audit::{AuditAction, AuditEntry},
  collaborator::{Collaborator, CollaboratorRole, CollaboratorStatus},
  email::EmailAddress,
  journey::JourneySummary,
  token::InvitationToken,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── CollaboratorStatus ──────────────────────────────────────────────────────
// Statuses are written as literals inside the transition SQL; only decoding
// needs a helper.

pub fn decode_status(s: &str) -> Result<CollaboratorStatus> {
  match s {
    "pending" => Ok(CollaboratorStatus::Pending),
    "accepted" => Ok(CollaboratorStatus::Accepted),
    "declined" => Ok(CollaboratorStatus::Declined),
    "revoked" => Ok(CollaboratorStatus::Revoked),
    other => Err(Error::UnknownStatus(other.to_owned())),
  }
}

// ─── CollaboratorRole ────────────────────────────────────────────────────────

pub fn encode_role(r: CollaboratorRole) -> &'static str {
  match r {
    CollaboratorRole::Owner => "owner",
    CollaboratorRole::Viewer => "viewer",
  }
}

pub fn decode_role(s: &str) -> Result<CollaboratorRole> {
  match s {
    "owner" => Ok(CollaboratorRole::Owner),
    "viewer" => Ok(CollaboratorRole::Viewer),
    other => Err(Error::UnknownRole(other.to_owned())),
  }
}

// ─── AuditAction ─────────────────────────────────────────────────────────────

pub fn decode_action(s: &str) -> Result<AuditAction> {
  match s {
    "invite_sent" => Ok(AuditAction::InviteSent),
    "invite_accepted" => Ok(AuditAction::InviteAccepted),
    "invite_declined" => Ok(AuditAction::InviteDeclined),
    "access_revoked" => Ok(AuditAction::AccessRevoked),
    other => Err(Error::UnknownAction(other.to_owned())),
  }
}

// ─── In-closure decode helpers ───────────────────────────────────────────────
// For use inside `rusqlite` row mappers and transaction closures, where the
// error channel is `rusqlite::Error`.

pub fn decode_dt_sql(s: &str, col: usize) -> rusqlite::Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| {
      rusqlite::Error::FromSqlConversionFailure(
        col,
        rusqlite::types::Type::Text,
        Box::new(e),
      )
    })
}

pub fn decode_status_sql(s: &str, col: usize) -> rusqlite::Result<CollaboratorStatus> {
  decode_status(s).map_err(|e| {
    rusqlite::Error::FromSqlConversionFailure(
      col,
      rusqlite::types::Type::Text,
      Box::new(e),
    )
  })
}

// ─── Raw row types ───────────────────────────────────────────────────────────

/// A `collaborators` row as read from SQLite, before decoding.
pub struct RawCollaborator {
  pub id:               String,
  pub journey_id:       String,
  pub email:            String,
  pub role:             String,
  pub status:           String,
  pub invitation_token: String,
  pub token_expires_at: String,
  pub invited_by:       String,
  pub invited_at:       String,
  pub accepted_at:      Option<String>,
  pub user_id:          Option<String>,
}

impl RawCollaborator {
  pub fn into_collaborator(self) -> Result<Collaborator> {
    Ok(Collaborator {
      id:               decode_uuid(&self.id)?,
      journey_id:       decode_uuid(&self.journey_id)?,
      email:            EmailAddress::parse(&self.email)?,
      role:             decode_role(&self.role)?,
      status:           decode_status(&self.status)?,
      invitation_token: InvitationToken::from(self.invitation_token),
      token_expires_at: decode_dt(&self.token_expires_at)?,
      invited_by:       decode_uuid(&self.invited_by)?,
      invited_at:       decode_dt(&self.invited_at)?,
      accepted_at:      self.accepted_at.as_deref().map(decode_dt).transpose()?,
      user_id:          self.user_id.as_deref().map(decode_uuid).transpose()?,
    })
  }
}

/// An `audit_log` row as read from SQLite, before decoding.
pub struct RawAuditEntry {
  pub id:          String,
  pub journey_id:  String,
  pub actor_id:    Option<String>,
  pub action:      String,
  pub details:     String,
  pub recorded_at: String,
}

impl RawAuditEntry {
  pub fn into_entry(self) -> Result<AuditEntry> {
    Ok(AuditEntry {
      id:          decode_uuid(&self.id)?,
      journey_id:  decode_uuid(&self.journey_id)?,
      actor_id:    self.actor_id.as_deref().map(decode_uuid).transpose()?,
      action:      decode_action(&self.action)?,
      details:     serde_json::from_str(&self.details)?,
      recorded_at: decode_dt(&self.recorded_at)?,
    })
  }
}

/// A `journeys` row as read from SQLite, before decoding.
pub struct RawJourney {
  pub journey_id:  String,
  pub owner_id:    String,
  pub title:       String,
  pub procedure:   Option<String>,
  pub destination: Option<String>,
}

impl RawJourney {
  pub fn into_summary(self) -> Result<JourneySummary> {
    Ok(JourneySummary {
      journey_id:  decode_uuid(&self.journey_id)?,
      owner_id:    decode_uuid(&self.owner_id)?,
      title:       self.title,
      procedure:   self.procedure,
      destination: self.destination,
    })
  }
}
