//! Invitation notification dispatch.
//!
//! Delivery is best-effort and decoupled from the transactional core:
//! [`Sharing::invite`](crate::sharing::Sharing::invite) commits the grant
//! first, then calls the notifier, and logs rather than propagates a
//! failure. Implementations should therefore not retry indefinitely.

use std::future::Future;

use crate::{
  email::EmailAddress, journey::JourneySummary, token::InvitationToken,
};

/// Delivers invitation emails for the platform.
pub trait InvitationNotifier: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn send_invitation<'a>(
    &'a self,
    to: &'a EmailAddress,
    journey: &'a JourneySummary,
    token: &'a InvitationToken,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
