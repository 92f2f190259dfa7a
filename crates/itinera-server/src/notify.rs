//! Invitation notifier stand-in.
//!
//! Real delivery belongs to the platform's mail dispatcher. This
//! implementation logs the invitation link at `info` level so an operator
//! (or a log-tailing relay) can deliver it; it never fails.

use std::convert::Infallible;

use itinera_core::{
  email::EmailAddress, journey::JourneySummary, notify::InvitationNotifier,
  token::InvitationToken,
};

pub struct LogNotifier {
  base_url: String,
}

impl LogNotifier {
  pub fn new(base_url: &str) -> Self {
    Self { base_url: base_url.trim_end_matches('/').to_owned() }
  }
}

impl InvitationNotifier for LogNotifier {
  type Error = Infallible;

  async fn send_invitation(
    &self,
    to: &EmailAddress,
    journey: &JourneySummary,
    token: &InvitationToken,
  ) -> Result<(), Infallible> {
    tracing::info!(
      to = %to,
      journey = %journey.title,
      link = %format!("{}/invitations/{}", self.base_url, token),
      "invitation ready for delivery"
    );
    Ok(())
  }
}
