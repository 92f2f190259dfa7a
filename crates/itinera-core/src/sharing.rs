//! The sharing service — orchestration around the invitation state machine.
//!
//! Owns the owner-authorization checks, email normalisation, token
//! issuance, and the best-effort notification dispatch that surround the
//! store's atomic transitions. Acting identities are explicit parameters
//! throughout; nothing here reads ambient session state.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::{
  Error, Result,
  actor::Actor,
  audit::AuditEntry,
  authz::AccessGate,
  collaborator::{Collaborator, CollaboratorRole, CollaboratorStatus, NewInvitation},
  email::EmailAddress,
  journey::{JourneyDirectory, JourneySummary},
  notify::InvitationNotifier,
  store::ShareStore,
  token::{InvitationToken, TokenIssuer},
};

// ─── Outputs ─────────────────────────────────────────────────────────────────

/// What the owner needs to share a freshly issued link. Returned even
/// though an email was (best-effort) dispatched, since delivery is not
/// guaranteed.
#[derive(Debug, Clone, Serialize)]
pub struct InviteReceipt {
  pub collaborator_id: Uuid,
  pub token:           InvitationToken,
  pub expires_at:      DateTime<Utc>,
  /// Whether an earlier declined/revoked row was reinstated.
  pub reinstated:      bool,
}

/// Pre-authentication view of an invitation, used to render the landing
/// page before the invitee signs in.
#[derive(Debug, Clone, Serialize)]
pub struct InvitationPreview {
  pub journey:          JourneySummary,
  pub email:            EmailAddress,
  pub status:           CollaboratorStatus,
  pub token_expires_at: DateTime<Utc>,
}

// ─── Service ─────────────────────────────────────────────────────────────────

/// The owner- and invitee-facing operations of the sharing subsystem.
pub struct Sharing<S, D, N> {
  store:    Arc<S>,
  journeys: Arc<D>,
  notifier: Arc<N>,
  issuer:   TokenIssuer,
}

impl<S, D, N> Clone for Sharing<S, D, N> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      journeys: Arc::clone(&self.journeys),
      notifier: Arc::clone(&self.notifier),
      issuer:   self.issuer.clone(),
    }
  }
}

impl<S, D, N> Sharing<S, D, N>
where
  S: ShareStore,
  D: JourneyDirectory,
  N: InvitationNotifier,
{
  pub fn new(
    store: Arc<S>,
    journeys: Arc<D>,
    notifier: Arc<N>,
    issuer: TokenIssuer,
  ) -> Self {
    Self { store, journeys, notifier, issuer }
  }

  /// The gate consulted by every journey read/write on behalf of a
  /// non-owner actor.
  pub fn gate(&self) -> AccessGate<'_, S, D> {
    AccessGate::new(self.store.as_ref(), self.journeys.as_ref())
  }

  // ── Owner-facing operations ───────────────────────────────────────────

  /// Issue (or reinstate) an invitation and dispatch the email.
  ///
  /// The grant and its audit entry commit first; the email is fire-and-
  /// forget afterwards, so a delivery failure still yields a receipt the
  /// owner can share manually.
  pub async fn invite(
    &self,
    journey_id: Uuid,
    inviter: &Actor,
    invitee_email: &str,
    role: CollaboratorRole,
  ) -> Result<InviteReceipt> {
    self.require_owner(journey_id, inviter.actor_id).await?;

    if role != CollaboratorRole::Viewer {
      return Err(Error::UngrantableRole(role));
    }

    let email = EmailAddress::parse(invitee_email)?;
    let (token, expires_at) = self.issuer.issue();

    let (collaborator, reinstated) = self
      .store
      .create_invitation(NewInvitation {
        journey_id,
        email,
        role,
        token,
        expires_at,
        invited_by: inviter.actor_id,
      })
      .await
      .map_err(Error::backend)?;

    self.dispatch_email(&collaborator).await;

    Ok(InviteReceipt {
      collaborator_id: collaborator.id,
      token: collaborator.invitation_token,
      expires_at: collaborator.token_expires_at,
      reinstated,
    })
  }

  /// All non-declined collaborators on a journey.
  pub async fn list_collaborators(
    &self,
    journey_id: Uuid,
    owner: &Actor,
  ) -> Result<Vec<Collaborator>> {
    self.require_owner(journey_id, owner.actor_id).await?;
    self.store.list_for_journey(journey_id).await.map_err(Error::backend)
  }

  /// Revoke a collaborator's access, effective immediately. Idempotent, so
  /// retrying after a network timeout is always safe.
  pub async fn revoke(
    &self,
    collaborator_id: Uuid,
    owner: &Actor,
  ) -> Result<Collaborator> {
    let row = self
      .store
      .get_collaborator(collaborator_id)
      .await
      .map_err(Error::backend)?
      .ok_or(Error::CollaboratorNotFound(collaborator_id))?;

    self.require_owner(row.journey_id, owner.actor_id).await?;

    self
      .store
      .revoke_collaborator(collaborator_id, owner.actor_id)
      .await
      .map_err(Error::backend)
  }

  /// The journey's audit trail, oldest entry first.
  pub async fn audit_trail(
    &self,
    journey_id: Uuid,
    owner: &Actor,
  ) -> Result<Vec<AuditEntry>> {
    self.require_owner(journey_id, owner.actor_id).await?;
    self.store.audit_for(journey_id).await.map_err(Error::backend)
  }

  // ── Invitee-facing operations ─────────────────────────────────────────

  /// Accept the invitation behind `token`, binding the grant to `actor`.
  /// Returns the updated row; its `journey_id` is the redirect target.
  pub async fn accept(
    &self,
    token: &InvitationToken,
    actor: &Actor,
  ) -> Result<Collaborator> {
    self.store.accept_invitation(token, actor).await.map_err(Error::backend)
  }

  /// Decline the invitation behind `token`. No sign-in required — the link
  /// itself is the capability.
  pub async fn decline(&self, token: &InvitationToken) -> Result<Collaborator> {
    self.store.decline_invitation(token).await.map_err(Error::backend)
  }

  /// Pre-authentication invitation preview.
  pub async fn preview(&self, token: &InvitationToken) -> Result<InvitationPreview> {
    let row = self
      .store
      .find_by_token(token)
      .await
      .map_err(Error::backend)?
      .ok_or(Error::InvalidToken)?;

    let journey = self
      .journeys
      .summary(row.journey_id)
      .await
      .map_err(Error::backend)?
      .ok_or(Error::JourneyNotFound(row.journey_id))?;

    Ok(InvitationPreview {
      journey,
      email: row.email,
      status: row.status,
      token_expires_at: row.token_expires_at,
    })
  }

  /// Journey summary read on behalf of `actor`, enforced by the gate.
  pub async fn journey_for(
    &self,
    journey_id: Uuid,
    actor: &Actor,
  ) -> Result<JourneySummary> {
    if !self.gate().can_read(journey_id, actor.actor_id).await? {
      return Err(Error::NotAuthorized);
    }

    self
      .journeys
      .summary(journey_id)
      .await
      .map_err(Error::backend)?
      .ok_or(Error::JourneyNotFound(journey_id))
  }

  // ── Internals ─────────────────────────────────────────────────────────

  async fn require_owner(&self, journey_id: Uuid, actor_id: Uuid) -> Result<()> {
    let owner = self
      .journeys
      .owner_of(journey_id)
      .await
      .map_err(Error::backend)?
      .ok_or(Error::JourneyNotFound(journey_id))?;

    if owner != actor_id {
      return Err(Error::NotAuthorized);
    }
    Ok(())
  }

  /// Best-effort email dispatch. The grant is already committed; any
  /// failure here is logged and swallowed.
  async fn dispatch_email(&self, collaborator: &Collaborator) {
    let summary = match self.journeys.summary(collaborator.journey_id).await {
      Ok(Some(summary)) => summary,
      Ok(None) => return,
      Err(error) => {
        warn!(
          journey_id = %collaborator.journey_id,
          error = %error,
          "journey summary lookup failed; skipping invitation email"
        );
        return;
      }
    };

    if let Err(error) = self
      .notifier
      .send_invitation(&collaborator.email, &summary, &collaborator.invitation_token)
      .await
    {
      warn!(
        journey_id = %collaborator.journey_id,
        email = %collaborator.email,
        error = %error,
        "invitation email delivery failed; owner can share the link manually"
      );
    }
  }
}
