//! Bearer token storage
//!
//! The browser original keeps the token in `localStorage["token"]`; here the
//! seam is a trait so hosts can back it with whatever persistence they have.

use std::sync::RwLock;

/// Storage for the backend bearer token.
pub trait TokenStore: Send + Sync {
    /// The current token, if any.
    fn token(&self) -> Option<String>;

    /// Replace the token; `None` clears it.
    fn set_token(&self, token: Option<String>);
}

/// In-memory token store, scoped to the process lifetime.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap_or_else(|p| p.into_inner()) = token;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_clear() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.token(), None);

        store.set_token(Some("abc123".into()));
        assert_eq!(store.token().as_deref(), Some("abc123"));

        store.set_token(None);
        assert_eq!(store.token(), None);
    }
}
