//! Runtime server configuration, deserialised from `config.toml` (or the
//! `ITINERA_`-prefixed environment).

use std::path::PathBuf;

use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host:            String,
  pub port:            u16,
  /// Base URL embedded in invitation links,
  /// e.g. `https://app.itinera.example`.
  pub public_base_url: String,
  pub store_path:      PathBuf,
  /// Credentials accepted by the config-backed identity provider.
  #[serde(default)]
  pub actors:          Vec<ActorEntry>,
}

/// One accepted API credential and the actor it authenticates as.
#[derive(Debug, Clone, Deserialize)]
pub struct ActorEntry {
  /// Hex SHA-256 of the bearer token; generate with `--hash-token`.
  pub token_sha256: String,
  pub actor_id:     Uuid,
  pub email:        String,
}
