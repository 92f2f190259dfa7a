//! Actor identity, as yielded by the external identity provider.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::email::EmailAddress;

/// The authenticated identity on whose behalf an operation runs.
///
/// Always threaded through as an explicit parameter — core components never
/// read ambient session state, so they stay testable without a live
/// identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
  pub actor_id: Uuid,
  pub email:    EmailAddress,
}
