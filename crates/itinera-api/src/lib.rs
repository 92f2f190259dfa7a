//! JSON REST API for the Itinera sharing subsystem.
//!
//! Exposes an axum [`Router`] backed by any
//! [`itinera_core::store::ShareStore`] + journey directory + notifier.
//! TLS and transport concerns are the caller's responsibility; actor
//! identity comes from a bearer credential resolved through an
//! [`IdentityProvider`].
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", itinera_api::api_router(state))
//! ```

pub mod auth;
pub mod collaborators;
pub mod error;
pub mod invitations;
pub mod journeys;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use itinera_core::{
  journey::JourneyDirectory, notify::InvitationNotifier, sharing::Sharing,
  store::ShareStore,
};

pub use auth::IdentityProvider;
pub use error::ApiError;

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, D, N> {
  pub sharing:  Sharing<S, D, N>,
  pub identity: Arc<dyn IdentityProvider>,
}

impl<S, D, N> Clone for AppState<S, D, N> {
  fn clone(&self) -> Self {
    Self {
      sharing:  self.sharing.clone(),
      identity: Arc::clone(&self.identity),
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for the sharing subsystem.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn api_router<S, D, N>(state: AppState<S, D, N>) -> Router<()>
where
  S: ShareStore + 'static,
  D: JourneyDirectory + 'static,
  N: InvitationNotifier + 'static,
{
  Router::new()
    // Owner-facing
    .route("/journeys/{id}", get(journeys::get_one::<S, D, N>))
    .route("/journeys/{id}/audit", get(journeys::audit::<S, D, N>))
    .route(
      "/journeys/{id}/collaborators",
      get(collaborators::list::<S, D, N>).post(collaborators::invite::<S, D, N>),
    )
    .route(
      "/collaborators/{id}/revoke",
      post(collaborators::revoke::<S, D, N>),
    )
    // Invitee-facing
    .route("/invitations/{token}", get(invitations::preview::<S, D, N>))
    .route(
      "/invitations/{token}/accept",
      post(invitations::accept::<S, D, N>),
    )
    .route(
      "/invitations/{token}/decline",
      post(invitations::decline::<S, D, N>),
    )
    .with_state(state)
}
