//! Invitation token issuance.
//!
//! A token is the capability that identifies one pending grant: whoever
//! holds the link can accept or decline it. Tokens are therefore drawn from
//! a cryptographically secure source and never reused — every reinstatement
//! issues a fresh one.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration, Utc};
use rand_core::{OsRng, RngCore as _};
use serde::{Deserialize, Serialize};

/// Random bytes per token; 32 bytes = 256 bits of entropy.
const TOKEN_BYTES: usize = 32;

/// Default validity window for a freshly issued invitation link.
pub const DEFAULT_TOKEN_TTL_DAYS: i64 = 7;

/// An opaque, unguessable credential identifying one pending grant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvitationToken(String);

impl InvitationToken {
  pub fn as_str(&self) -> &str { &self.0 }
}

impl From<String> for InvitationToken {
  fn from(s: String) -> Self { Self(s) }
}

impl std::fmt::Display for InvitationToken {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

/// Issues invitation tokens and their absolute expiry timestamps.
///
/// Pure apart from randomness; holds no persistent state. The TTL is
/// configurable so tests can manufacture already-expired invitations
/// without a clock abstraction.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
  ttl: Duration,
}

impl Default for TokenIssuer {
  fn default() -> Self {
    Self { ttl: Duration::days(DEFAULT_TOKEN_TTL_DAYS) }
  }
}

impl TokenIssuer {
  pub fn with_ttl(ttl: Duration) -> Self { Self { ttl } }

  /// Issue a fresh token and its expiry (`now + ttl`). Rendered URL-safe so
  /// the token can be embedded in a link path without escaping.
  pub fn issue(&self) -> (InvitationToken, DateTime<Utc>) {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    (InvitationToken(URL_SAFE_NO_PAD.encode(bytes)), Utc::now() + self.ttl)
  }
}
