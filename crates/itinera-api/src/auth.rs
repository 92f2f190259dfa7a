//! Bearer-credential actor extraction.
//!
//! The identity platform itself (sessions, passwords, SSO) lives outside
//! this subsystem. Anything that can map a presented credential to a
//! stable `(actor_id, email)` pair can stand behind [`IdentityProvider`];
//! the server binary ships a config-backed implementation.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, request::Parts},
};
use itinera_core::actor::Actor;

use crate::{AppState, error::ApiError};

/// Resolves a presented API credential to an authenticated actor.
pub trait IdentityProvider: Send + Sync {
  fn resolve(&self, credential: &str) -> Option<Actor>;
}

/// Extractor: the authenticated actor behind `Authorization: Bearer …`.
/// Present in a handler's signature means the request was authenticated.
pub struct AuthenticatedActor(pub Actor);

/// Verify the bearer header directly — also usable outside extractors.
pub fn resolve_bearer(
  headers: &HeaderMap,
  identity: &dyn IdentityProvider,
) -> Result<Actor, ApiError> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthenticated)?;

  let credential = header_val
    .strip_prefix("Bearer ")
    .ok_or(ApiError::Unauthenticated)?;

  identity.resolve(credential).ok_or(ApiError::Unauthenticated)
}

impl<S, D, N> FromRequestParts<AppState<S, D, N>> for AuthenticatedActor
where
  S: Send + Sync + 'static,
  D: Send + Sync + 'static,
  N: Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S, D, N>,
  ) -> Result<Self, Self::Rejection> {
    resolve_bearer(&parts.headers, state.identity.as_ref()).map(Self)
  }
}

#[cfg(test)]
mod tests {
  use axum::http::header;
  use itinera_core::email::EmailAddress;
  use uuid::Uuid;

  use super::*;

  struct StaticProvider {
    credential: &'static str,
    actor:      Actor,
  }

  impl IdentityProvider for StaticProvider {
    fn resolve(&self, credential: &str) -> Option<Actor> {
      (credential == self.credential).then(|| self.actor.clone())
    }
  }

  fn provider() -> StaticProvider {
    StaticProvider {
      credential: "s3cret",
      actor:      Actor {
        actor_id: Uuid::new_v4(),
        email:    EmailAddress::parse("owner@example.com").unwrap(),
      },
    }
  }

  fn headers_with(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, value.parse().unwrap());
    headers
  }

  #[test]
  fn resolves_a_known_bearer_token() {
    let provider = provider();
    let actor = resolve_bearer(&headers_with("Bearer s3cret"), &provider).unwrap();
    assert_eq!(actor, provider.actor);
  }

  #[test]
  fn rejects_a_missing_header() {
    assert!(matches!(
      resolve_bearer(&HeaderMap::new(), &provider()),
      Err(ApiError::Unauthenticated)
    ));
  }

  #[test]
  fn rejects_a_non_bearer_scheme() {
    assert!(matches!(
      resolve_bearer(&headers_with("Basic czNjcmV0"), &provider()),
      Err(ApiError::Unauthenticated)
    ));
  }

  #[test]
  fn rejects_an_unknown_credential() {
    assert!(matches!(
      resolve_bearer(&headers_with("Bearer wrong"), &provider()),
      Err(ApiError::Unauthenticated)
    ));
  }
}
