//! Handlers for invitee-facing invitation endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/invitations/:token` | Pre-authentication preview |
//! | `POST` | `/invitations/:token/accept` | Requires sign-in; binds the grant |
//! | `POST` | `/invitations/:token/decline` | No sign-in — the link is the capability |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use itinera_core::{
  journey::JourneyDirectory,
  notify::InvitationNotifier,
  sharing::InvitationPreview,
  store::ShareStore,
  token::InvitationToken,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{AppState, auth::AuthenticatedActor, error::ApiError};

// ─── Preview ──────────────────────────────────────────────────────────────────

/// `GET /invitations/:token` — renders the invitation landing page data
/// before the invitee signs in.
pub async fn preview<S, D, N>(
  State(state): State<AppState<S, D, N>>,
  Path(token): Path<String>,
) -> Result<Json<InvitationPreview>, ApiError>
where
  S: ShareStore + 'static,
  D: JourneyDirectory + 'static,
  N: InvitationNotifier + 'static,
{
  let token = InvitationToken::from(token);
  let preview = state.sharing.preview(&token).await?;
  Ok(Json(preview))
}

// ─── Accept ───────────────────────────────────────────────────────────────────

/// Where to send the invitee after a successful accept.
#[derive(Debug, Serialize)]
pub struct AcceptedResponse {
  pub journey_id: Uuid,
}

/// `POST /invitations/:token/accept`
pub async fn accept<S, D, N>(
  State(state): State<AppState<S, D, N>>,
  Path(token): Path<String>,
  AuthenticatedActor(actor): AuthenticatedActor,
) -> Result<Json<AcceptedResponse>, ApiError>
where
  S: ShareStore + 'static,
  D: JourneyDirectory + 'static,
  N: InvitationNotifier + 'static,
{
  let token = InvitationToken::from(token);
  let collaborator = state.sharing.accept(&token, &actor).await?;
  Ok(Json(AcceptedResponse { journey_id: collaborator.journey_id }))
}

// ─── Decline ──────────────────────────────────────────────────────────────────

/// `POST /invitations/:token/decline`
pub async fn decline<S, D, N>(
  State(state): State<AppState<S, D, N>>,
  Path(token): Path<String>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ShareStore + 'static,
  D: JourneyDirectory + 'static,
  N: InvitationNotifier + 'static,
{
  let token = InvitationToken::from(token);
  state.sharing.decline(&token).await?;
  Ok(StatusCode::NO_CONTENT)
}
