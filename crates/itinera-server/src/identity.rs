//! Config-backed identity provider.
//!
//! Stands in for the platform's identity service: bearer tokens are stored
//! as SHA-256 hex digests in the config file and matched by digest, so the
//! config file never holds a usable credential.

use itinera_api::IdentityProvider;
use itinera_core::{actor::Actor, email::EmailAddress};
use sha2::{Digest as _, Sha256};

use crate::settings::ActorEntry;

pub struct ConfigIdentity {
  /// `(token digest, actor)` pairs.
  actors: Vec<(String, Actor)>,
}

impl ConfigIdentity {
  pub fn from_entries(entries: &[ActorEntry]) -> anyhow::Result<Self> {
    let mut actors = Vec::with_capacity(entries.len());
    for entry in entries {
      let email = EmailAddress::parse(&entry.email)
        .map_err(|e| anyhow::anyhow!("actor {}: {e}", entry.actor_id))?;
      actors.push((
        entry.token_sha256.to_lowercase(),
        Actor { actor_id: entry.actor_id, email },
      ));
    }
    Ok(Self { actors })
  }
}

impl IdentityProvider for ConfigIdentity {
  fn resolve(&self, credential: &str) -> Option<Actor> {
    let digest = hex::encode(Sha256::digest(credential.as_bytes()));
    self
      .actors
      .iter()
      .find(|(hash, _)| *hash == digest)
      .map(|(_, actor)| actor.clone())
  }
}

#[cfg(test)]
mod tests {
  use uuid::Uuid;

  use super::*;

  fn entry(token: &str) -> ActorEntry {
    ActorEntry {
      token_sha256: hex::encode(Sha256::digest(token.as_bytes())),
      actor_id:     Uuid::new_v4(),
      email:        "owner@example.com".into(),
    }
  }

  #[test]
  fn resolves_by_digest() {
    let e = entry("correct-horse");
    let identity = ConfigIdentity::from_entries(&[e.clone()]).unwrap();

    let actor = identity.resolve("correct-horse").unwrap();
    assert_eq!(actor.actor_id, e.actor_id);
    assert!(identity.resolve("battery-staple").is_none());
  }

  #[test]
  fn rejects_an_invalid_email_at_load_time() {
    let mut e = entry("tok");
    e.email = "not-an-email".into();
    assert!(ConfigIdentity::from_entries(&[e]).is_err());
  }
}
