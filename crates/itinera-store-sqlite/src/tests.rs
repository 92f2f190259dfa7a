//! Integration tests for `SqliteStore` against an in-memory database,
//! exercised through the `Sharing` service.

use std::sync::Arc;

use chrono::{Duration, Utc};
use itinera_core::{
  actor::Actor,
  audit::AuditAction,
  collaborator::{CollaboratorRole, CollaboratorStatus},
  email::EmailAddress,
  error::Error as CoreError,
  journey::JourneySummary,
  notify::InvitationNotifier,
  sharing::Sharing,
  store::ShareStore,
  token::{InvitationToken, TokenIssuer},
};
use uuid::Uuid;

use crate::SqliteStore;

// ─── Fixtures ────────────────────────────────────────────────────────────────

struct NoopNotifier;

impl InvitationNotifier for NoopNotifier {
  type Error = std::convert::Infallible;

  async fn send_invitation(
    &self,
    _to: &EmailAddress,
    _journey: &JourneySummary,
    _token: &InvitationToken,
  ) -> Result<(), Self::Error> {
    Ok(())
  }
}

#[derive(Debug, thiserror::Error)]
#[error("smtp relay unreachable")]
struct RelayDown;

struct FailingNotifier;

impl InvitationNotifier for FailingNotifier {
  type Error = RelayDown;

  async fn send_invitation(
    &self,
    _to: &EmailAddress,
    _journey: &JourneySummary,
    _token: &InvitationToken,
  ) -> Result<(), Self::Error> {
    Err(RelayDown)
  }
}

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory().await.expect("in-memory store")
}

fn actor(email: &str) -> Actor {
  Actor {
    actor_id: Uuid::new_v4(),
    email:    EmailAddress::parse(email).unwrap(),
  }
}

async fn seed_journey(s: &SqliteStore, owner: &Actor) -> Uuid {
  let journey_id = Uuid::new_v4();
  s.upsert_journey(&JourneySummary {
    journey_id,
    owner_id: owner.actor_id,
    title: "Hip resurfacing in Istanbul".into(),
    procedure: Some("hip resurfacing".into()),
    destination: Some("Istanbul".into()),
  })
  .await
  .unwrap();
  journey_id
}

fn sharing_with(
  s: &SqliteStore,
  issuer: TokenIssuer,
) -> Sharing<SqliteStore, SqliteStore, NoopNotifier> {
  Sharing::new(
    Arc::new(s.clone()),
    Arc::new(s.clone()),
    Arc::new(NoopNotifier),
    issuer,
  )
}

fn sharing(s: &SqliteStore) -> Sharing<SqliteStore, SqliteStore, NoopNotifier> {
  sharing_with(s, TokenIssuer::default())
}

// ─── Invite ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn invite_creates_a_pending_grant_with_a_week_long_token() {
  let s = store().await;
  let owner = actor("owner@example.com");
  let journey = seed_journey(&s, &owner).await;
  let svc = sharing(&s);

  let receipt = svc
    .invite(journey, &owner, "family@example.com", CollaboratorRole::Viewer)
    .await
    .unwrap();

  assert!(!receipt.reinstated);
  let now = Utc::now();
  assert!(receipt.expires_at > now + Duration::days(6));
  assert!(receipt.expires_at < now + Duration::days(8));

  let row = s.get_collaborator(receipt.collaborator_id).await.unwrap().unwrap();
  assert_eq!(row.status, CollaboratorStatus::Pending);
  assert_eq!(row.email.as_str(), "family@example.com");
  assert_eq!(row.invited_by, owner.actor_id);
  assert_eq!(row.invitation_token, receipt.token);
  assert!(row.user_id.is_none());
  assert!(row.accepted_at.is_none());
}

#[tokio::test]
async fn invite_requires_the_journey_owner() {
  let s = store().await;
  let owner = actor("owner@example.com");
  let journey = seed_journey(&s, &owner).await;
  let svc = sharing(&s);

  let stranger = actor("stranger@example.com");
  let result = svc
    .invite(journey, &stranger, "family@example.com", CollaboratorRole::Viewer)
    .await;
  assert!(matches!(result, Err(CoreError::NotAuthorized)));
}

#[tokio::test]
async fn invite_fails_for_an_unknown_journey() {
  let s = store().await;
  let owner = actor("owner@example.com");
  let svc = sharing(&s);

  let result = svc
    .invite(Uuid::new_v4(), &owner, "family@example.com", CollaboratorRole::Viewer)
    .await;
  assert!(matches!(result, Err(CoreError::JourneyNotFound(_))));
}

#[tokio::test]
async fn invite_rejects_a_malformed_email() {
  let s = store().await;
  let owner = actor("owner@example.com");
  let journey = seed_journey(&s, &owner).await;
  let svc = sharing(&s);

  let result = svc
    .invite(journey, &owner, "not-an-address", CollaboratorRole::Viewer)
    .await;
  assert!(matches!(result, Err(CoreError::InvalidEmail(_))));
}

#[tokio::test]
async fn invite_rejects_a_non_viewer_role() {
  let s = store().await;
  let owner = actor("owner@example.com");
  let journey = seed_journey(&s, &owner).await;
  let svc = sharing(&s);

  let result = svc
    .invite(journey, &owner, "family@example.com", CollaboratorRole::Owner)
    .await;
  assert!(matches!(
    result,
    Err(CoreError::UngrantableRole(CollaboratorRole::Owner))
  ));
}

#[tokio::test]
async fn re_invite_of_a_live_grant_surfaces_the_existing_link() {
  let s = store().await;
  let owner = actor("owner@example.com");
  let journey = seed_journey(&s, &owner).await;
  let svc = sharing(&s);

  let first = svc
    .invite(journey, &owner, "family@example.com", CollaboratorRole::Viewer)
    .await
    .unwrap();

  // Different casing and surrounding whitespace hits the same invitee.
  let result = svc
    .invite(journey, &owner, " Family@Example.COM ", CollaboratorRole::Viewer)
    .await;

  match result {
    Err(CoreError::AlreadyActive { token, expires_at }) => {
      assert_eq!(token, first.token);
      assert_eq!(expires_at, first.expires_at);
    }
    other => panic!("expected AlreadyActive, got {other:?}"),
  }

  // Still a single row for the invitee.
  let rows = svc.list_collaborators(journey, &owner).await.unwrap();
  assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn invite_succeeds_even_when_email_delivery_fails() {
  let s = store().await;
  let owner = actor("owner@example.com");
  let journey = seed_journey(&s, &owner).await;

  let svc: Sharing<SqliteStore, SqliteStore, FailingNotifier> = Sharing::new(
    Arc::new(s.clone()),
    Arc::new(s.clone()),
    Arc::new(FailingNotifier),
    TokenIssuer::default(),
  );

  let receipt = svc
    .invite(journey, &owner, "family@example.com", CollaboratorRole::Viewer)
    .await
    .expect("delivery failure must not fail the invitation");

  let row = s.get_collaborator(receipt.collaborator_id).await.unwrap().unwrap();
  assert_eq!(row.status, CollaboratorStatus::Pending);
}

// ─── Accept ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn accept_binds_the_grant_to_the_accepting_identity() {
  let s = store().await;
  let owner = actor("owner@example.com");
  let journey = seed_journey(&s, &owner).await;
  let svc = sharing(&s);

  let receipt = svc
    .invite(journey, &owner, "family@example.com", CollaboratorRole::Viewer)
    .await
    .unwrap();

  let invitee = actor("family@example.com");
  let row = svc.accept(&receipt.token, &invitee).await.unwrap();

  assert_eq!(row.status, CollaboratorStatus::Accepted);
  assert_eq!(row.user_id, Some(invitee.actor_id));
  assert!(row.accepted_at.is_some());
  assert_eq!(row.journey_id, journey);

  assert!(svc.gate().can_read(journey, invitee.actor_id).await.unwrap());
}

#[tokio::test]
async fn accept_does_not_require_the_invited_address() {
  // Invitation links get forwarded between a person's own mailboxes; the
  // link is the capability, and the grant binds to whoever signed in. The
  // audit trail records the address that actually accepted.
  let s = store().await;
  let owner = actor("owner@example.com");
  let journey = seed_journey(&s, &owner).await;
  let svc = sharing(&s);

  let receipt = svc
    .invite(journey, &owner, "family@example.com", CollaboratorRole::Viewer)
    .await
    .unwrap();

  let other_mailbox = actor("family.other@provider.example");
  let row = svc.accept(&receipt.token, &other_mailbox).await.unwrap();
  assert_eq!(row.user_id, Some(other_mailbox.actor_id));

  let trail = svc.audit_trail(journey, &owner).await.unwrap();
  let accepted = trail
    .iter()
    .find(|e| e.action == AuditAction::InviteAccepted)
    .unwrap();
  assert_eq!(
    accepted.details["accepted_by_email"],
    "family.other@provider.example"
  );
}

#[tokio::test]
async fn accept_fails_for_an_unknown_token() {
  let s = store().await;
  let svc = sharing(&s);

  let bogus = InvitationToken::from("does-not-exist".to_owned());
  let result = svc.accept(&bogus, &actor("family@example.com")).await;
  assert!(matches!(result, Err(CoreError::InvalidToken)));
}

#[tokio::test]
async fn double_accept_reports_not_pending() {
  let s = store().await;
  let owner = actor("owner@example.com");
  let journey = seed_journey(&s, &owner).await;
  let svc = sharing(&s);

  let receipt = svc
    .invite(journey, &owner, "family@example.com", CollaboratorRole::Viewer)
    .await
    .unwrap();

  let invitee = actor("family@example.com");
  svc.accept(&receipt.token, &invitee).await.unwrap();

  let again = svc.accept(&receipt.token, &invitee).await;
  assert!(matches!(
    again,
    Err(CoreError::NotPending(CollaboratorStatus::Accepted))
  ));
}

#[tokio::test]
async fn concurrent_accepts_let_exactly_one_win() {
  let s = store().await;
  let owner = actor("owner@example.com");
  let journey = seed_journey(&s, &owner).await;
  let svc = sharing(&s);

  let receipt = svc
    .invite(journey, &owner, "family@example.com", CollaboratorRole::Viewer)
    .await
    .unwrap();

  let first = actor("family@example.com");
  let second = actor("family@example.com");

  let (a, b) = tokio::join!(
    svc.accept(&receipt.token, &first),
    svc.accept(&receipt.token, &second),
  );

  let a_won = a.is_ok();
  let winners = [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count();
  assert_eq!(winners, 1, "exactly one concurrent accept must win");

  let loser = if a_won { b } else { a };
  assert!(matches!(
    loser,
    Err(CoreError::NotPending(CollaboratorStatus::Accepted))
  ));

  let winner_id = if a_won { first.actor_id } else { second.actor_id };
  let row = s.get_collaborator(receipt.collaborator_id).await.unwrap().unwrap();
  assert_eq!(row.user_id, Some(winner_id));
}

#[tokio::test]
async fn expired_token_fails_without_mutating_the_row() {
  let s = store().await;
  let owner = actor("owner@example.com");
  let journey = seed_journey(&s, &owner).await;
  let svc = sharing_with(&s, TokenIssuer::with_ttl(Duration::seconds(-1)));

  let receipt = svc
    .invite(journey, &owner, "family@example.com", CollaboratorRole::Viewer)
    .await
    .unwrap();

  let accept = svc.accept(&receipt.token, &actor("family@example.com")).await;
  assert!(matches!(accept, Err(CoreError::ExpiredToken(_))));

  let decline = svc.decline(&receipt.token).await;
  assert!(matches!(decline, Err(CoreError::ExpiredToken(_))));

  // Expiry is checked at use time; the row stays pending until the owner
  // re-invites.
  let row = s.get_collaborator(receipt.collaborator_id).await.unwrap().unwrap();
  assert_eq!(row.status, CollaboratorStatus::Pending);
}

// ─── Decline ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn decline_marks_the_row_and_hides_it_from_the_listing() {
  let s = store().await;
  let owner = actor("owner@example.com");
  let journey = seed_journey(&s, &owner).await;
  let svc = sharing(&s);

  let kept = svc
    .invite(journey, &owner, "kept@example.com", CollaboratorRole::Viewer)
    .await
    .unwrap();
  let declined = svc
    .invite(journey, &owner, "declined@example.com", CollaboratorRole::Viewer)
    .await
    .unwrap();

  let row = svc.decline(&declined.token).await.unwrap();
  assert_eq!(row.status, CollaboratorStatus::Declined);

  // Declined invitations are not "shared with" entries, but the row
  // survives in storage for reinstatement.
  let listed = svc.list_collaborators(journey, &owner).await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].id, kept.collaborator_id);
  assert!(
    s.get_collaborator(declined.collaborator_id).await.unwrap().is_some()
  );
}

#[tokio::test]
async fn decline_of_an_accepted_grant_reports_not_pending() {
  let s = store().await;
  let owner = actor("owner@example.com");
  let journey = seed_journey(&s, &owner).await;
  let svc = sharing(&s);

  let receipt = svc
    .invite(journey, &owner, "family@example.com", CollaboratorRole::Viewer)
    .await
    .unwrap();
  svc.accept(&receipt.token, &actor("family@example.com")).await.unwrap();

  let result = svc.decline(&receipt.token).await;
  assert!(matches!(
    result,
    Err(CoreError::NotPending(CollaboratorStatus::Accepted))
  ));
}

// ─── Revoke ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn revoke_cuts_access_immediately() {
  let s = store().await;
  let owner = actor("owner@example.com");
  let journey = seed_journey(&s, &owner).await;
  let svc = sharing(&s);

  let receipt = svc
    .invite(journey, &owner, "family@example.com", CollaboratorRole::Viewer)
    .await
    .unwrap();
  let invitee = actor("family@example.com");
  svc.accept(&receipt.token, &invitee).await.unwrap();
  assert!(svc.gate().can_read(journey, invitee.actor_id).await.unwrap());

  let row = svc.revoke(receipt.collaborator_id, &owner).await.unwrap();
  assert_eq!(row.status, CollaboratorStatus::Revoked);
  assert!(row.user_id.is_none());
  assert!(row.accepted_at.is_none());

  // The very next gate check observes the revocation.
  assert!(!svc.gate().can_read(journey, invitee.actor_id).await.unwrap());

  // Revoked rows stay visible to the owner.
  let listed = svc.list_collaborators(journey, &owner).await.unwrap();
  assert_eq!(listed.len(), 1);
  assert_eq!(listed[0].status, CollaboratorStatus::Revoked);
}

#[tokio::test]
async fn revoke_is_idempotent() {
  let s = store().await;
  let owner = actor("owner@example.com");
  let journey = seed_journey(&s, &owner).await;
  let svc = sharing(&s);

  let receipt = svc
    .invite(journey, &owner, "family@example.com", CollaboratorRole::Viewer)
    .await
    .unwrap();

  let first = svc.revoke(receipt.collaborator_id, &owner).await.unwrap();
  assert_eq!(first.status, CollaboratorStatus::Revoked);

  // Retrying after a timeout must always be safe.
  let second = svc.revoke(receipt.collaborator_id, &owner).await.unwrap();
  assert_eq!(second.status, CollaboratorStatus::Revoked);
}

#[tokio::test]
async fn revoke_requires_the_journey_owner() {
  let s = store().await;
  let owner = actor("owner@example.com");
  let journey = seed_journey(&s, &owner).await;
  let svc = sharing(&s);

  let receipt = svc
    .invite(journey, &owner, "family@example.com", CollaboratorRole::Viewer)
    .await
    .unwrap();

  let stranger = actor("stranger@example.com");
  let result = svc.revoke(receipt.collaborator_id, &stranger).await;
  assert!(matches!(result, Err(CoreError::NotAuthorized)));
}

#[tokio::test]
async fn revoke_of_an_unknown_collaborator_fails() {
  let s = store().await;
  let owner = actor("owner@example.com");
  seed_journey(&s, &owner).await;
  let svc = sharing(&s);

  let result = svc.revoke(Uuid::new_v4(), &owner).await;
  assert!(matches!(result, Err(CoreError::CollaboratorNotFound(_))));
}

// ─── Reinstatement ───────────────────────────────────────────────────────────

#[tokio::test]
async fn re_invite_reinstates_a_revoked_row_with_a_fresh_token() {
  let s = store().await;
  let owner = actor("owner@example.com");
  let journey = seed_journey(&s, &owner).await;
  let svc = sharing(&s);

  let first = svc
    .invite(journey, &owner, "family@example.com", CollaboratorRole::Viewer)
    .await
    .unwrap();
  let invitee = actor("family@example.com");
  svc.accept(&first.token, &invitee).await.unwrap();
  svc.revoke(first.collaborator_id, &owner).await.unwrap();

  let before =
    s.get_collaborator(first.collaborator_id).await.unwrap().unwrap();

  let second = svc
    .invite(journey, &owner, "family@example.com", CollaboratorRole::Viewer)
    .await
    .unwrap();

  // Same row, reused; fresh credential; acceptance binding cleared.
  assert!(second.reinstated);
  assert_eq!(second.collaborator_id, first.collaborator_id);
  assert_ne!(second.token, first.token);

  let row = s.get_collaborator(first.collaborator_id).await.unwrap().unwrap();
  assert_eq!(row.status, CollaboratorStatus::Pending);
  assert!(row.user_id.is_none());
  assert!(row.accepted_at.is_none());
  assert_eq!(row.invitation_token, second.token);
  assert!(row.invited_at >= before.invited_at);
}

#[tokio::test]
async fn a_rotated_token_no_longer_identifies_the_grant() {
  let s = store().await;
  let owner = actor("owner@example.com");
  let journey = seed_journey(&s, &owner).await;
  let svc = sharing(&s);

  let first = svc
    .invite(journey, &owner, "family@example.com", CollaboratorRole::Viewer)
    .await
    .unwrap();
  svc.decline(&first.token).await.unwrap();
  let second = svc
    .invite(journey, &owner, "family@example.com", CollaboratorRole::Viewer)
    .await
    .unwrap();

  // The old link is dead: reinstatement rotated the row's token, so the
  // stale credential matches nothing and grants nothing.
  let invitee = actor("family@example.com");
  let stale = svc.accept(&first.token, &invitee).await;
  assert!(matches!(stale, Err(CoreError::InvalidToken)));

  let row = s.get_collaborator(first.collaborator_id).await.unwrap().unwrap();
  assert_eq!(row.status, CollaboratorStatus::Pending);
  assert!(row.user_id.is_none());

  // The fresh link works.
  svc.accept(&second.token, &invitee).await.unwrap();
}

#[tokio::test]
async fn tokens_are_never_reused_across_reinstatements() {
  let s = store().await;
  let owner = actor("owner@example.com");
  let journey = seed_journey(&s, &owner).await;
  let svc = sharing(&s);

  let mut seen = std::collections::HashSet::new();
  for _ in 0..5 {
    let receipt = svc
      .invite(journey, &owner, "family@example.com", CollaboratorRole::Viewer)
      .await
      .unwrap();
    assert!(seen.insert(receipt.token.clone()), "token reused");
    svc.decline(&receipt.token).await.unwrap();
  }
}

// ─── Authorization gate ──────────────────────────────────────────────────────

#[tokio::test]
async fn write_capability_is_owner_only() {
  let s = store().await;
  let owner = actor("owner@example.com");
  let journey = seed_journey(&s, &owner).await;
  let svc = sharing(&s);

  let receipt = svc
    .invite(journey, &owner, "family@example.com", CollaboratorRole::Viewer)
    .await
    .unwrap();
  let invitee = actor("family@example.com");
  svc.accept(&receipt.token, &invitee).await.unwrap();

  let gate = svc.gate();
  assert!(gate.can_write(journey, owner.actor_id).await.unwrap());
  assert!(gate.can_read(journey, owner.actor_id).await.unwrap());

  // An accepted viewer reads but never writes.
  assert!(gate.can_read(journey, invitee.actor_id).await.unwrap());
  assert!(!gate.can_write(journey, invitee.actor_id).await.unwrap());

  let stranger = actor("stranger@example.com");
  assert!(!gate.can_read(journey, stranger.actor_id).await.unwrap());
  assert!(!gate.can_write(journey, stranger.actor_id).await.unwrap());
}

#[tokio::test]
async fn an_unknown_journey_grants_nothing() {
  let s = store().await;
  let svc = sharing(&s);

  let gate = svc.gate();
  let nobody = Uuid::new_v4();
  assert!(!gate.can_read(Uuid::new_v4(), nobody).await.unwrap());
  assert!(!gate.can_write(Uuid::new_v4(), nobody).await.unwrap());
}

#[tokio::test]
async fn guarded_journey_read_follows_the_grant() {
  let s = store().await;
  let owner = actor("owner@example.com");
  let journey = seed_journey(&s, &owner).await;
  let svc = sharing(&s);

  let invitee = actor("family@example.com");
  assert!(matches!(
    svc.journey_for(journey, &invitee).await,
    Err(CoreError::NotAuthorized)
  ));

  let receipt = svc
    .invite(journey, &owner, "family@example.com", CollaboratorRole::Viewer)
    .await
    .unwrap();
  svc.accept(&receipt.token, &invitee).await.unwrap();

  let summary = svc.journey_for(journey, &invitee).await.unwrap();
  assert_eq!(summary.title, "Hip resurfacing in Istanbul");

  svc.revoke(receipt.collaborator_id, &owner).await.unwrap();
  assert!(matches!(
    svc.journey_for(journey, &invitee).await,
    Err(CoreError::NotAuthorized)
  ));
}

#[tokio::test]
async fn listing_collaborators_requires_the_owner() {
  let s = store().await;
  let owner = actor("owner@example.com");
  let journey = seed_journey(&s, &owner).await;
  let svc = sharing(&s);

  let result = svc
    .list_collaborators(journey, &actor("stranger@example.com"))
    .await;
  assert!(matches!(result, Err(CoreError::NotAuthorized)));
}

// ─── Preview ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn preview_shows_the_invitation_before_sign_in() {
  let s = store().await;
  let owner = actor("owner@example.com");
  let journey = seed_journey(&s, &owner).await;
  let svc = sharing(&s);

  let receipt = svc
    .invite(journey, &owner, "family@example.com", CollaboratorRole::Viewer)
    .await
    .unwrap();

  let preview = svc.preview(&receipt.token).await.unwrap();
  assert_eq!(preview.journey.journey_id, journey);
  assert_eq!(preview.journey.title, "Hip resurfacing in Istanbul");
  assert_eq!(preview.email.as_str(), "family@example.com");
  assert_eq!(preview.status, CollaboratorStatus::Pending);
  assert_eq!(preview.token_expires_at, receipt.expires_at);

  let bogus = InvitationToken::from("nope".to_owned());
  assert!(matches!(svc.preview(&bogus).await, Err(CoreError::InvalidToken)));
}

// ─── Audit log ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn the_audit_trail_records_the_full_lifecycle() {
  let s = store().await;
  let owner = actor("owner@example.com");
  let journey = seed_journey(&s, &owner).await;
  let svc = sharing(&s);

  let receipt = svc
    .invite(journey, &owner, "family@example.com", CollaboratorRole::Viewer)
    .await
    .unwrap();
  let invitee = actor("family@example.com");
  svc.accept(&receipt.token, &invitee).await.unwrap();
  svc.revoke(receipt.collaborator_id, &owner).await.unwrap();
  svc
    .invite(journey, &owner, "family@example.com", CollaboratorRole::Viewer)
    .await
    .unwrap();

  let trail = svc.audit_trail(journey, &owner).await.unwrap();
  let actions: Vec<_> = trail.iter().map(|e| e.action).collect();
  assert_eq!(
    actions,
    [
      AuditAction::InviteSent,
      AuditAction::InviteAccepted,
      AuditAction::AccessRevoked,
      AuditAction::InviteSent,
    ]
  );

  assert_eq!(trail[0].actor_id, Some(owner.actor_id));
  assert_eq!(trail[0].details["email"], "family@example.com");
  assert_eq!(trail[0].details["role"], "viewer");
  assert_eq!(trail[1].actor_id, Some(invitee.actor_id));
  assert_eq!(trail[2].actor_id, Some(owner.actor_id));

  assert!(trail.iter().all(|e| e.journey_id == journey));
}

#[tokio::test]
async fn declines_are_audited_without_an_actor() {
  let s = store().await;
  let owner = actor("owner@example.com");
  let journey = seed_journey(&s, &owner).await;
  let svc = sharing(&s);

  let receipt = svc
    .invite(journey, &owner, "family@example.com", CollaboratorRole::Viewer)
    .await
    .unwrap();
  svc.decline(&receipt.token).await.unwrap();

  let trail = svc.audit_trail(journey, &owner).await.unwrap();
  let declined = trail
    .iter()
    .find(|e| e.action == AuditAction::InviteDeclined)
    .unwrap();
  assert_eq!(declined.actor_id, None);
  assert_eq!(declined.details["email"], "family@example.com");
}

#[tokio::test]
async fn reading_the_audit_trail_requires_the_owner() {
  let s = store().await;
  let owner = actor("owner@example.com");
  let journey = seed_journey(&s, &owner).await;
  let svc = sharing(&s);

  let result = svc.audit_trail(journey, &actor("stranger@example.com")).await;
  assert!(matches!(result, Err(CoreError::NotAuthorized)));
}

#[tokio::test]
async fn idempotent_revokes_are_each_audited() {
  let s = store().await;
  let owner = actor("owner@example.com");
  let journey = seed_journey(&s, &owner).await;
  let svc = sharing(&s);

  let receipt = svc
    .invite(journey, &owner, "family@example.com", CollaboratorRole::Viewer)
    .await
    .unwrap();
  svc.revoke(receipt.collaborator_id, &owner).await.unwrap();
  svc.revoke(receipt.collaborator_id, &owner).await.unwrap();

  let trail = svc.audit_trail(journey, &owner).await.unwrap();
  let revokes = trail
    .iter()
    .filter(|e| e.action == AuditAction::AccessRevoked)
    .count();
  assert_eq!(revokes, 2);
}
