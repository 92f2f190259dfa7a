//! The authorization gate — the enforcement point in front of every
//! journey read or write by a non-owner actor.
//!
//! Role semantics live here and nowhere else: a viewer-role collaborator
//! never passes `can_write`, so introducing an `editor` role later touches
//! only this type.

use uuid::Uuid;

use crate::{Error, Result, journey::JourneyDirectory, store::ShareStore};

/// Answers capability questions from current grant state.
///
/// Decisions are made against the store's present view on every call — no
/// caching — so a revocation is observed by the very next check.
pub struct AccessGate<'a, S, D> {
  store:    &'a S,
  journeys: &'a D,
}

impl<'a, S, D> AccessGate<'a, S, D>
where
  S: ShareStore,
  D: JourneyDirectory,
{
  pub fn new(store: &'a S, journeys: &'a D) -> Self {
    Self { store, journeys }
  }

  /// True for the journey's owner, or for an actor holding an `accepted`
  /// grant. Unknown journeys grant nothing.
  pub async fn can_read(&self, journey_id: Uuid, actor_id: Uuid) -> Result<bool> {
    match self.journeys.owner_of(journey_id).await.map_err(Error::backend)? {
      Some(owner) if owner == actor_id => return Ok(true),
      Some(_) => {}
      None => return Ok(false),
    }

    self
      .store
      .accepted_grant_exists(journey_id, actor_id)
      .await
      .map_err(Error::backend)
  }

  /// True only for the journey's owner. Viewer-role collaborators never
  /// gain write capability, regardless of acceptance status.
  pub async fn can_write(&self, journey_id: Uuid, actor_id: Uuid) -> Result<bool> {
    let owner = self.journeys.owner_of(journey_id).await.map_err(Error::backend)?;
    Ok(owner == Some(actor_id))
  }
}
