//! Handlers for owner-facing collaborator management.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/journeys/:id/collaborators` | Body: [`InviteBody`]; 201 + receipt |
//! | `GET`  | `/journeys/:id/collaborators` | Excludes declined invitations |
//! | `POST` | `/collaborators/:id/revoke` | Idempotent |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use itinera_core::{
  collaborator::{Collaborator, CollaboratorRole},
  journey::JourneyDirectory,
  notify::InvitationNotifier,
  sharing::InviteReceipt,
  store::ShareStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, auth::AuthenticatedActor, error::ApiError};

// ─── Invite ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /journeys/:id/collaborators`.
#[derive(Debug, Deserialize)]
pub struct InviteBody {
  pub email: String,
  #[serde(default = "default_role")]
  pub role:  CollaboratorRole,
}

fn default_role() -> CollaboratorRole { CollaboratorRole::Viewer }

/// `POST /journeys/:id/collaborators` — returns 201 + [`InviteReceipt`].
pub async fn invite<S, D, N>(
  State(state): State<AppState<S, D, N>>,
  Path(journey_id): Path<Uuid>,
  AuthenticatedActor(actor): AuthenticatedActor,
  Json(body): Json<InviteBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ShareStore + 'static,
  D: JourneyDirectory + 'static,
  N: InvitationNotifier + 'static,
{
  let receipt: InviteReceipt = state
    .sharing
    .invite(journey_id, &actor, &body.email, body.role)
    .await?;
  Ok((StatusCode::CREATED, Json(receipt)))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /journeys/:id/collaborators`
pub async fn list<S, D, N>(
  State(state): State<AppState<S, D, N>>,
  Path(journey_id): Path<Uuid>,
  AuthenticatedActor(actor): AuthenticatedActor,
) -> Result<Json<Vec<Collaborator>>, ApiError>
where
  S: ShareStore + 'static,
  D: JourneyDirectory + 'static,
  N: InvitationNotifier + 'static,
{
  let collaborators = state.sharing.list_collaborators(journey_id, &actor).await?;
  Ok(Json(collaborators))
}

// ─── Revoke ───────────────────────────────────────────────────────────────────

/// `POST /collaborators/:id/revoke` — idempotent; retrying after a timeout
/// is always safe.
pub async fn revoke<S, D, N>(
  State(state): State<AppState<S, D, N>>,
  Path(collaborator_id): Path<Uuid>,
  AuthenticatedActor(actor): AuthenticatedActor,
) -> Result<Json<Collaborator>, ApiError>
where
  S: ShareStore + 'static,
  D: JourneyDirectory + 'static,
  N: InvitationNotifier + 'static,
{
  let collaborator = state.sharing.revoke(collaborator_id, &actor).await?;
  Ok(Json(collaborator))
}
