use log::error;

use crate::storage::{KeyValueStore, Result};

pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Bearer token persisted under a single fixed key.
pub struct TokenStore<S> {
    storage: S,
}

impl<S: KeyValueStore> TokenStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// A read failure is logged and treated as "no token".
    pub fn get(&self) -> Option<String> {
        match self.storage.get(ACCESS_TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                error!("❌ Failed to read access token: {}", e);
                None
            }
        }
    }

    pub fn set(&self, token: &str) -> Result<()> {
        self.storage.set(ACCESS_TOKEN_KEY, token)
    }

    pub fn clear(&self) -> Result<()> {
        self.storage.remove(ACCESS_TOKEN_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_token_round_trip() {
        let storage = MemoryStore::new();
        let tokens = TokenStore::new(storage.clone());

        assert_eq!(tokens.get(), None);
        tokens.set("jwt-123").unwrap();
        assert_eq!(tokens.get(), Some("jwt-123".to_string()));
        assert_eq!(storage.get(ACCESS_TOKEN_KEY).unwrap(), Some("jwt-123".to_string()));

        tokens.clear().unwrap();
        assert_eq!(tokens.get(), None);
    }

    #[test]
    fn test_read_failure_means_no_token() {
        let storage = MemoryStore::new();
        let tokens = TokenStore::new(storage.clone());
        tokens.set("jwt-123").unwrap();

        storage.set_failing(true);
        assert_eq!(tokens.get(), None);
        assert!(tokens.set("other").is_err());
    }
}
