//! Handlers for gate-guarded journey reads.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/journeys/:id` | Owner or accepted collaborator |
//! | `GET`  | `/journeys/:id/audit` | Owner only |

use axum::{
  Json,
  extract::{Path, State},
};
use itinera_core::{
  audit::AuditEntry,
  journey::{JourneyDirectory, JourneySummary},
  notify::InvitationNotifier,
  store::ShareStore,
};
use uuid::Uuid;

use crate::{AppState, auth::AuthenticatedActor, error::ApiError};

/// `GET /journeys/:id` — summary read, enforced through the access gate so
/// a revocation is observed by the very next request.
pub async fn get_one<S, D, N>(
  State(state): State<AppState<S, D, N>>,
  Path(journey_id): Path<Uuid>,
  AuthenticatedActor(actor): AuthenticatedActor,
) -> Result<Json<JourneySummary>, ApiError>
where
  S: ShareStore + 'static,
  D: JourneyDirectory + 'static,
  N: InvitationNotifier + 'static,
{
  let journey = state.sharing.journey_for(journey_id, &actor).await?;
  Ok(Json(journey))
}

/// `GET /journeys/:id/audit` — the append-only sharing trail, oldest first.
pub async fn audit<S, D, N>(
  State(state): State<AppState<S, D, N>>,
  Path(journey_id): Path<Uuid>,
  AuthenticatedActor(actor): AuthenticatedActor,
) -> Result<Json<Vec<AuditEntry>>, ApiError>
where
  S: ShareStore + 'static,
  D: JourneyDirectory + 'static,
  N: InvitationNotifier + 'static,
{
  let entries = state.sharing.audit_trail(journey_id, &actor).await?;
  Ok(Json(entries))
}
