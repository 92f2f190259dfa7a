//! [`SqliteStore`] — the SQLite implementation of [`ShareStore`] and
//! [`JourneyDirectory`].
//!
//! Each transition runs inside a single transaction on the store's one
//! serialised connection: the guard checks, the conditional row update,
//! and the audit append commit together or not at all. Caller-visible
//! protocol failures are threaded out of the transaction closures as a
//! nested `Result` so they stay distinct from database errors.

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use itinera_core::{
  actor::Actor,
  audit::{AuditAction, AuditEntry},
  collaborator::{Collaborator, NewInvitation, acceptance_guard},
  error::Error as CoreError,
  journey::{JourneyDirectory, JourneySummary},
  store::ShareStore,
  token::InvitationToken,
};

use crate::{
  Error, Result,
  encode::{
    RawAuditEntry, RawCollaborator, RawJourney, decode_dt_sql,
    decode_status_sql, decode_uuid, encode_dt, encode_role, encode_uuid,
  },
  schema::SCHEMA,
};

const COLLABORATOR_COLUMNS: &str = "id, journey_id, email, role, status, \
   invitation_token, token_expires_at, invited_by, invited_at, accepted_at, \
   user_id";

// ─── Row helpers ─────────────────────────────────────────────────────────────

fn read_collaborator(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawCollaborator> {
  Ok(RawCollaborator {
    id:               row.get(0)?,
    journey_id:       row.get(1)?,
    email:            row.get(2)?,
    role:             row.get(3)?,
    status:           row.get(4)?,
    invitation_token: row.get(5)?,
    token_expires_at: row.get(6)?,
    invited_by:       row.get(7)?,
    invited_at:       row.get(8)?,
    accepted_at:      row.get(9)?,
    user_id:          row.get(10)?,
  })
}

fn fetch_collaborator(
  tx: &rusqlite::Transaction<'_>,
  id: &str,
) -> rusqlite::Result<RawCollaborator> {
  tx.query_row(
    &format!("SELECT {COLLABORATOR_COLUMNS} FROM collaborators WHERE id = ?1"),
    rusqlite::params![id],
    read_collaborator,
  )
}

fn append_audit(
  tx: &rusqlite::Transaction<'_>,
  journey_id: &str,
  actor_id: Option<&str>,
  action: AuditAction,
  details: &str,
  recorded_at: &str,
) -> rusqlite::Result<()> {
  tx.execute(
    "INSERT INTO audit_log (id, journey_id, actor_id, action, details, recorded_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    rusqlite::params![
      encode_uuid(Uuid::new_v4()),
      journey_id,
      actor_id,
      action.as_str(),
      details,
      recorded_at
    ],
  )?;
  Ok(())
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An Itinera share store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Mirror a journey's summary fields from the owning application.
  ///
  /// The sharing subsystem only ever reads this table; this is the sync
  /// point for the application that owns the journey records.
  pub async fn upsert_journey(&self, journey: &JourneySummary) -> Result<()> {
    let journey_id  = encode_uuid(journey.journey_id);
    let owner_id    = encode_uuid(journey.owner_id);
    let title       = journey.title.clone();
    let procedure   = journey.procedure.clone();
    let destination = journey.destination.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR REPLACE INTO journeys
             (journey_id, owner_id, title, procedure, destination)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![journey_id, owner_id, title, procedure, destination],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ShareStore impl ─────────────────────────────────────────────────────────

impl ShareStore for SqliteStore {
  type Error = Error;

  async fn create_invitation(
    &self,
    new: NewInvitation,
  ) -> Result<(Collaborator, bool)> {
    let journey_str    = encode_uuid(new.journey_id);
    let email_str      = new.email.as_str().to_owned();
    let role_str       = encode_role(new.role).to_owned();
    let token_str      = new.token.as_str().to_owned();
    let expires_str    = encode_dt(new.expires_at);
    let invited_by_str = encode_uuid(new.invited_by);
    let now_str        = encode_dt(Utc::now());
    let details = serde_json::json!({
      "email": new.email.as_str(),
      "role":  encode_role(new.role),
    })
    .to_string();

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        // The partial unique index over active rows backs this check at
        // the schema level; inside the transaction the read is consistent
        // with the write below.
        let existing: Option<(String, String, String, String)> = tx
          .query_row(
            "SELECT id, status, invitation_token, token_expires_at
               FROM collaborators
              WHERE journey_id = ?1 AND email = ?2",
            rusqlite::params![journey_str, email_str],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
          )
          .optional()?;

        let (row_id, reinstated) = match existing {
          Some((_, status, token, expires))
            if status == "pending" || status == "accepted" =>
          {
            let expires_at = decode_dt_sql(&expires, 3)?;
            return Ok(Err(CoreError::AlreadyActive {
              token: InvitationToken::from(token),
              expires_at,
            }));
          }
          Some((id, _, _, _)) => {
            // Reinstate: same row, fresh token, acceptance binding cleared.
            tx.execute(
              "UPDATE collaborators
                  SET status = 'pending', invitation_token = ?2,
                      token_expires_at = ?3, invited_by = ?4, invited_at = ?5,
                      accepted_at = NULL, user_id = NULL
                WHERE id = ?1",
              rusqlite::params![id, token_str, expires_str, invited_by_str, now_str],
            )?;
            (id, true)
          }
          None => {
            let id = encode_uuid(Uuid::new_v4());
            tx.execute(
              "INSERT INTO collaborators
                 (id, journey_id, email, role, status, invitation_token,
                  token_expires_at, invited_by, invited_at)
               VALUES (?1, ?2, ?3, ?4, 'pending', ?5, ?6, ?7, ?8)",
              rusqlite::params![
                id,
                journey_str,
                email_str,
                role_str,
                token_str,
                expires_str,
                invited_by_str,
                now_str
              ],
            )?;
            (id, false)
          }
        };

        append_audit(
          &tx,
          &journey_str,
          Some(&invited_by_str),
          AuditAction::InviteSent,
          &details,
          &now_str,
        )?;

        let raw = fetch_collaborator(&tx, &row_id)?;
        tx.commit()?;
        Ok(Ok((raw, reinstated)))
      })
      .await?;

    let (raw, reinstated) = outcome.map_err(Error::Core)?;
    Ok((raw.into_collaborator()?, reinstated))
  }

  async fn accept_invitation(
    &self,
    token: &InvitationToken,
    actor: &Actor,
  ) -> Result<Collaborator> {
    let token_str = token.as_str().to_owned();
    let user_str  = encode_uuid(actor.actor_id);
    let now       = Utc::now();
    let now_str   = encode_dt(now);
    let details = serde_json::json!({
      "accepted_by_email": actor.email.as_str(),
    })
    .to_string();

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let row: Option<(String, String, String, String)> = tx
          .query_row(
            "SELECT id, journey_id, status, token_expires_at
               FROM collaborators
              WHERE invitation_token = ?1",
            rusqlite::params![token_str],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
          )
          .optional()?;

        let Some((id, journey_id, status, expires)) = row else {
          return Ok(Err(CoreError::InvalidToken));
        };

        let status     = decode_status_sql(&status, 2)?;
        let expires_at = decode_dt_sql(&expires, 3)?;
        if let Err(guard) = acceptance_guard(status, expires_at, now) {
          // Expiry and state failures leave the row untouched.
          return Ok(Err(guard));
        }

        // Compare-and-set: the transition only lands if the row is still
        // pending at commit time.
        let updated = tx.execute(
          "UPDATE collaborators
              SET status = 'accepted', user_id = ?2, accepted_at = ?3
            WHERE id = ?1 AND status = 'pending'",
          rusqlite::params![id, user_str, now_str],
        )?;
        if updated == 0 {
          let current: String = tx.query_row(
            "SELECT status FROM collaborators WHERE id = ?1",
            rusqlite::params![id],
            |r| r.get(0),
          )?;
          return Ok(Err(CoreError::NotPending(decode_status_sql(&current, 0)?)));
        }

        append_audit(
          &tx,
          &journey_id,
          Some(&user_str),
          AuditAction::InviteAccepted,
          &details,
          &now_str,
        )?;

        let raw = fetch_collaborator(&tx, &id)?;
        tx.commit()?;
        Ok(Ok(raw))
      })
      .await?;

    Ok(outcome.map_err(Error::Core)?.into_collaborator()?)
  }

  async fn decline_invitation(
    &self,
    token: &InvitationToken,
  ) -> Result<Collaborator> {
    let token_str = token.as_str().to_owned();
    let now       = Utc::now();
    let now_str   = encode_dt(now);

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let row: Option<(String, String, String, String, String)> = tx
          .query_row(
            "SELECT id, journey_id, email, status, token_expires_at
               FROM collaborators
              WHERE invitation_token = ?1",
            rusqlite::params![token_str],
            |row| {
              Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
            },
          )
          .optional()?;

        let Some((id, journey_id, email, status, expires)) = row else {
          return Ok(Err(CoreError::InvalidToken));
        };

        let status     = decode_status_sql(&status, 3)?;
        let expires_at = decode_dt_sql(&expires, 4)?;
        if let Err(guard) = acceptance_guard(status, expires_at, now) {
          return Ok(Err(guard));
        }

        let updated = tx.execute(
          "UPDATE collaborators SET status = 'declined'
            WHERE id = ?1 AND status = 'pending'",
          rusqlite::params![id],
        )?;
        if updated == 0 {
          let current: String = tx.query_row(
            "SELECT status FROM collaborators WHERE id = ?1",
            rusqlite::params![id],
            |r| r.get(0),
          )?;
          return Ok(Err(CoreError::NotPending(decode_status_sql(&current, 0)?)));
        }

        // Declines need no sign-in, so no actor is recorded.
        let details = serde_json::json!({ "email": email }).to_string();
        append_audit(&tx, &journey_id, None, AuditAction::InviteDeclined, &details, &now_str)?;

        let raw = fetch_collaborator(&tx, &id)?;
        tx.commit()?;
        Ok(Ok(raw))
      })
      .await?;

    Ok(outcome.map_err(Error::Core)?.into_collaborator()?)
  }

  async fn revoke_collaborator(
    &self,
    id: Uuid,
    revoked_by: Uuid,
  ) -> Result<Collaborator> {
    let id_str         = encode_uuid(id);
    let revoked_by_str = encode_uuid(revoked_by);
    let now_str        = encode_dt(Utc::now());

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let row: Option<(String, String)> = tx
          .query_row(
            "SELECT journey_id, email FROM collaborators WHERE id = ?1",
            rusqlite::params![id_str],
            |row| Ok((row.get(0)?, row.get(1)?)),
          )
          .optional()?;

        let Some((journey_id, email)) = row else {
          return Ok(Err(CoreError::CollaboratorNotFound(id)));
        };

        // Unconditional: revoking an already-revoked row is a no-op
        // success. Clearing the acceptance binding makes the lost grant
        // visible to the access gate immediately.
        tx.execute(
          "UPDATE collaborators
              SET status = 'revoked', accepted_at = NULL, user_id = NULL
            WHERE id = ?1",
          rusqlite::params![id_str],
        )?;

        let details = serde_json::json!({ "email": email }).to_string();
        append_audit(
          &tx,
          &journey_id,
          Some(&revoked_by_str),
          AuditAction::AccessRevoked,
          &details,
          &now_str,
        )?;

        let raw = fetch_collaborator(&tx, &id_str)?;
        tx.commit()?;
        Ok(Ok(raw))
      })
      .await?;

    Ok(outcome.map_err(Error::Core)?.into_collaborator()?)
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  async fn get_collaborator(&self, id: Uuid) -> Result<Option<Collaborator>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawCollaborator> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {COLLABORATOR_COLUMNS} FROM collaborators WHERE id = ?1"),
              rusqlite::params![id_str],
              read_collaborator,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCollaborator::into_collaborator).transpose()
  }

  async fn find_by_token(
    &self,
    token: &InvitationToken,
  ) -> Result<Option<Collaborator>> {
    let token_str = token.as_str().to_owned();

    let raw: Option<RawCollaborator> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {COLLABORATOR_COLUMNS} FROM collaborators
                  WHERE invitation_token = ?1"
              ),
              rusqlite::params![token_str],
              read_collaborator,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCollaborator::into_collaborator).transpose()
  }

  async fn list_for_journey(&self, journey_id: Uuid) -> Result<Vec<Collaborator>> {
    let journey_str = encode_uuid(journey_id);

    let raws: Vec<RawCollaborator> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {COLLABORATOR_COLUMNS} FROM collaborators
            WHERE journey_id = ?1 AND status != 'declined'
            ORDER BY invited_at"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![journey_str], read_collaborator)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCollaborator::into_collaborator).collect()
  }

  async fn accepted_grant_exists(
    &self,
    journey_id: Uuid,
    user_id: Uuid,
  ) -> Result<bool> {
    let journey_str = encode_uuid(journey_id);
    let user_str    = encode_uuid(user_id);

    let exists: bool = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM collaborators
                WHERE journey_id = ?1 AND user_id = ?2 AND status = 'accepted'",
              rusqlite::params![journey_str, user_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;

    Ok(exists)
  }

  async fn audit_for(&self, journey_id: Uuid) -> Result<Vec<AuditEntry>> {
    let journey_str = encode_uuid(journey_id);

    let raws: Vec<RawAuditEntry> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, journey_id, actor_id, action, details, recorded_at
             FROM audit_log
            WHERE journey_id = ?1
            ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![journey_str], |row| {
            Ok(RawAuditEntry {
              id:          row.get(0)?,
              journey_id:  row.get(1)?,
              actor_id:    row.get(2)?,
              action:      row.get(3)?,
              details:     row.get(4)?,
              recorded_at: row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAuditEntry::into_entry).collect()
  }
}

// ─── JourneyDirectory impl ───────────────────────────────────────────────────

impl JourneyDirectory for SqliteStore {
  type Error = Error;

  async fn owner_of(&self, journey_id: Uuid) -> Result<Option<Uuid>> {
    let journey_str = encode_uuid(journey_id);

    let owner: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT owner_id FROM journeys WHERE journey_id = ?1",
              rusqlite::params![journey_str],
              |r| r.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    owner.as_deref().map(decode_uuid).transpose()
  }

  async fn summary(&self, journey_id: Uuid) -> Result<Option<JourneySummary>> {
    let journey_str = encode_uuid(journey_id);

    let raw: Option<RawJourney> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT journey_id, owner_id, title, procedure, destination
                 FROM journeys WHERE journey_id = ?1",
              rusqlite::params![journey_str],
              |row| {
                Ok(RawJourney {
                  journey_id:  row.get(0)?,
                  owner_id:    row.get(1)?,
                  title:       row.get(2)?,
                  procedure:   row.get(3)?,
                  destination: row.get(4)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawJourney::into_summary).transpose()
  }
}
