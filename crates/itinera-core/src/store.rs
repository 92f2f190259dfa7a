//! The `ShareStore` trait — the persistence contract for the sharing
//! subsystem.
//!
//! The trait is implemented by storage backends (e.g.
//! `itinera-store-sqlite`). Higher layers depend on this abstraction, not
//! on any concrete backend.
//!
//! Every transition method below executes as a single atomic store
//! transaction: its guard checks, the row update, and the audit append
//! either all happen or none do. The conditional updates are what make
//! concurrent accepts and invite/revoke races safe without any
//! application-level locking — a losing writer simply reports the
//! now-current status.
//!
//! All methods return `Send` futures so the trait can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use uuid::Uuid;

use crate::{
  actor::Actor,
  audit::AuditEntry,
  collaborator::{Collaborator, NewInvitation},
  token::InvitationToken,
};

pub trait ShareStore: Send + Sync {
  /// Backend error type. Must be convertible into the core taxonomy so
  /// protocol failures (`AlreadyActive`, `NotPending`, …) surface to
  /// callers with their payloads intact.
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  // ── Invitation lifecycle ──────────────────────────────────────────────

  /// Create a pending invitation, or reinstate a `declined`/`revoked` row
  /// for the same `(journey_id, email)`. Returns the row and whether it
  /// was reinstated.
  ///
  /// Fails `AlreadyActive` (carrying the live token and expiry) when a
  /// `pending` or `accepted` row exists for the email. The
  /// one-active-row-per-email rule must be enforced inside the transaction
  /// — backed by a store-level uniqueness constraint, not a separate read —
  /// so two concurrent invites for a never-seen email cannot both insert.
  /// Appends the `invite_sent` audit entry atomically with the write.
  fn create_invitation(
    &self,
    new: NewInvitation,
  ) -> impl Future<Output = Result<(Collaborator, bool), Self::Error>> + Send + '_;

  /// Accept the pending invitation identified by `token`, binding it to
  /// the accepting actor.
  ///
  /// Fails `InvalidToken` if no row matches, `NotPending` if the row is
  /// not currently pending, `ExpiredToken` if past expiry (the row is left
  /// untouched). The `pending -> accepted` update is conditioned on the
  /// status still being `pending` at commit time: of two concurrent
  /// accepts exactly one wins, and the loser observes `NotPending`.
  /// Appends the `invite_accepted` audit entry atomically.
  fn accept_invitation<'a>(
    &'a self,
    token: &'a InvitationToken,
    actor: &'a Actor,
  ) -> impl Future<Output = Result<Collaborator, Self::Error>> + Send + 'a;

  /// Decline the pending invitation identified by `token`.
  ///
  /// Same guards as [`accept_invitation`](Self::accept_invitation); the
  /// audit entry records no actor, since declining does not require
  /// sign-in. Appends the `invite_declined` audit entry atomically.
  fn decline_invitation<'a>(
    &'a self,
    token: &'a InvitationToken,
  ) -> impl Future<Output = Result<Collaborator, Self::Error>> + Send + 'a;

  /// Transition a collaborator to `revoked` regardless of prior status.
  ///
  /// Idempotent: revoking an already-revoked row is a no-op success. The
  /// acceptance binding (`user_id`, `accepted_at`) is cleared so the
  /// access gate observes the loss of the grant immediately. Fails
  /// `CollaboratorNotFound` for an unknown id. Appends the
  /// `access_revoked` audit entry atomically.
  fn revoke_collaborator(
    &self,
    id: Uuid,
    revoked_by: Uuid,
  ) -> impl Future<Output = Result<Collaborator, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Retrieve a collaborator by id. Returns `None` if not found.
  fn get_collaborator(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Collaborator>, Self::Error>> + Send + '_;

  /// Retrieve a collaborator by its current invitation token.
  fn find_by_token<'a>(
    &'a self,
    token: &'a InvitationToken,
  ) -> impl Future<Output = Result<Option<Collaborator>, Self::Error>> + Send + 'a;

  /// All rows for a journey except `declined` ones — declined invitations
  /// are not shown as "shared with" entries but remain stored for
  /// reinstatement and audit purposes.
  fn list_for_journey(
    &self,
    journey_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Collaborator>, Self::Error>> + Send + '_;

  /// Whether `user_id` holds an `accepted` grant on the journey. Consulted
  /// by the access gate on every non-owner read.
  fn accepted_grant_exists(
    &self,
    journey_id: Uuid,
    user_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Audit log ─────────────────────────────────────────────────────────

  /// The append-only audit trail for a journey, oldest first. Appends
  /// happen inside the transition transactions above; there is no public
  /// append, update, or delete.
  fn audit_for(
    &self,
    journey_id: Uuid,
  ) -> impl Future<Output = Result<Vec<AuditEntry>, Self::Error>> + Send + '_;
}
