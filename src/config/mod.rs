//! Runtime settings, sourced from the environment with sane defaults.

use std::env;
use std::path::PathBuf;

use crate::auth::{TokenAuthority, DEFAULT_TOKEN_TTL_DAYS};
use crate::blob::LocalBlobStore;

const ENV_TOKEN_SECRET: &str = "TAKEBACK_TOKEN_SECRET";
const ENV_TOKEN_TTL_DAYS: &str = "TAKEBACK_TOKEN_TTL_DAYS";
const ENV_BLOB_ROOT: &str = "TAKEBACK_BLOB_ROOT";
const ENV_BLOB_PUBLIC_BASE: &str = "TAKEBACK_BLOB_PUBLIC_BASE";

/// Settings for the core: token signing and blob placement.
#[derive(Debug, Clone)]
pub struct Settings {
    pub token_secret: String,
    pub token_ttl_days: i64,
    pub blob_root: PathBuf,
    pub blob_public_base: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            token_secret: "change-me".to_string(),
            token_ttl_days: DEFAULT_TOKEN_TTL_DAYS,
            blob_root: PathBuf::from("./data/blobs"),
            blob_public_base: "http://localhost:8000/blobs".to_string(),
        }
    }
}

impl Settings {
    /// Reads settings from the environment, falling back to defaults for
    /// anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            token_secret: env::var(ENV_TOKEN_SECRET).unwrap_or(defaults.token_secret),
            token_ttl_days: env::var(ENV_TOKEN_TTL_DAYS)
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(defaults.token_ttl_days),
            blob_root: env::var(ENV_BLOB_ROOT)
                .map(PathBuf::from)
                .unwrap_or(defaults.blob_root),
            blob_public_base: env::var(ENV_BLOB_PUBLIC_BASE)
                .unwrap_or(defaults.blob_public_base),
        }
    }

    pub fn token_authority(&self) -> TokenAuthority {
        TokenAuthority::new(self.token_secret.as_bytes(), self.token_ttl_days)
    }

    pub fn blob_store(&self) -> LocalBlobStore {
        LocalBlobStore::new(&self.blob_root, self.blob_public_base.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let settings = Settings::default();
        assert_eq!(settings.token_ttl_days, DEFAULT_TOKEN_TTL_DAYS);
        assert!(!settings.blob_public_base.is_empty());
    }
}
