use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

const ANONYMOUS_NAME: &str = "John Doe";
const ANONYMOUS_INITIALS: &str = "JD";

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct UserDetails {
    #[serde(default, alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl UserDetails {
    pub fn display_name(&self) -> &str {
        let name = self.name.trim();
        if name.is_empty() {
            ANONYMOUS_NAME
        } else {
            name
        }
    }

    pub fn initials(&self) -> String {
        let name = self.name.trim();
        if name.is_empty() {
            return ANONYMOUS_INITIALS.to_string();
        }
        name.split_whitespace()
            .take(2)
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }
}

/// One immutable view of who is signed in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub authenticated: bool,
    /// Set once authentication has been decided either way.
    pub updated: bool,
    pub user_details: Option<UserDetails>,
    pub token: Option<String>,
}

impl AuthState {
    pub fn with_authenticated(&self, authenticated: bool) -> Self {
        Self {
            authenticated,
            updated: true,
            ..self.clone()
        }
    }

    pub fn with_user_details(&self, user_details: Option<UserDetails>) -> Self {
        Self {
            user_details,
            ..self.clone()
        }
    }

    pub fn with_token(&self, token: Option<String>) -> Self {
        Self {
            token,
            ..self.clone()
        }
    }
}

/// Shared handle to the current [`AuthState`]. Setters swap in a new
/// snapshot; anyone holding an older `Arc` keeps seeing the old one.
#[derive(Clone, Default)]
pub struct AuthContext {
    current: Arc<RwLock<Arc<AuthState>>>,
}

impl AuthContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Arc<AuthState> {
        self.current.read().clone()
    }

    pub fn set_authenticated(&self, authenticated: bool) -> Arc<AuthState> {
        self.update(|state| state.with_authenticated(authenticated))
    }

    pub fn set_user_details(&self, user_details: Option<UserDetails>) -> Arc<AuthState> {
        self.update(|state| state.with_user_details(user_details))
    }

    pub fn set_token(&self, token: Option<String>) -> Arc<AuthState> {
        self.update(|state| state.with_token(token))
    }

    fn update(&self, f: impl FnOnce(&AuthState) -> AuthState) -> Arc<AuthState> {
        let mut current = self.current.write();
        let next = Arc::new(f(&current));
        *current = next.clone();
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initials_and_display_name() {
        let user = UserDetails {
            id: "1".to_string(),
            name: "  ada lovelace byron ".to_string(),
            email: "ada@example.com".to_string(),
        };
        assert_eq!(user.display_name(), "ada lovelace byron");
        assert_eq!(user.initials(), "AL");

        let single = UserDetails {
            name: "grace".to_string(),
            ..Default::default()
        };
        assert_eq!(single.initials(), "G");

        let blank = UserDetails::default();
        assert_eq!(blank.display_name(), "John Doe");
        assert_eq!(blank.initials(), "JD");
    }

    #[test]
    fn test_setters_produce_new_snapshots() {
        let context = AuthContext::new();
        let before = context.snapshot();
        assert!(!before.updated);

        context.set_token(Some("tok".to_string()));
        let after = context.set_authenticated(true);

        assert!(after.authenticated);
        assert!(after.updated);
        assert_eq!(after.token.as_deref(), Some("tok"));

        assert!(!before.authenticated);
        assert_eq!(before.token, None);
    }

    #[test]
    fn test_user_details_accepts_mongo_id() {
        let user: UserDetails =
            serde_json::from_str(r#"{"_id":"abc","name":"Sam","email":"sam@example.com"}"#).unwrap();
        assert_eq!(user.id, "abc");
    }
}
