//! Journey directory — the read-only window onto the externally-owned
//! journey store.
//!
//! The sharing subsystem never writes journeys. It needs the owner for
//! authorization decisions and the summary fields for invitation pages and
//! notification emails, nothing more.

use std::future::Future;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The journey fields this subsystem is allowed to see.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JourneySummary {
  pub journey_id:  Uuid,
  pub owner_id:    Uuid,
  pub title:       String,
  /// Procedure the journey is planned around, e.g. "dental implants".
  pub procedure:   Option<String>,
  pub destination: Option<String>,
}

/// Lookup interface over the external journey store.
pub trait JourneyDirectory: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  /// The journey's owning actor, or `None` for an unknown journey.
  fn owner_of(
    &self,
    journey_id: Uuid,
  ) -> impl Future<Output = Result<Option<Uuid>, Self::Error>> + Send + '_;

  /// Summary fields for invitation pages and emails.
  fn summary(
    &self,
    journey_id: Uuid,
  ) -> impl Future<Output = Result<Option<JourneySummary>, Self::Error>> + Send + '_;
}
