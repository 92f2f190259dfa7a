//! Invitee email addresses.
//!
//! Addresses identify invitees case-insensitively, so normalisation happens
//! once, at construction — the store's uniqueness rule over
//! `(journey_id, email)` never sees two casings of the same address.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A normalised (trimmed, lowercased) email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
  /// Parse with a basic shape check: exactly one `@`, a non-empty local
  /// part, and a dotted domain. Full RFC 5321 validation is the mail
  /// provider's problem, not ours.
  pub fn parse(raw: &str) -> Result<Self> {
    let normalized = raw.trim().to_lowercase();

    let Some((local, domain)) = normalized.split_once('@') else {
      return Err(Error::InvalidEmail(raw.to_owned()));
    };

    if local.is_empty()
      || domain.is_empty()
      || domain.contains('@')
      || !domain.contains('.')
      || domain.starts_with('.')
      || domain.ends_with('.')
      || normalized.chars().any(char::is_whitespace)
    {
      return Err(Error::InvalidEmail(raw.to_owned()));
    }

    Ok(Self(normalized))
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl std::fmt::Display for EmailAddress {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}
