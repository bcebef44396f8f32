//! Token storage.
//!
//! The manager only talks to [`TokenStore`], so a test can hand it a store
//! it controls. [`MemoryTokenStore`] uses DashMap: every method is a single
//! atomic operation on one key's shard.

use crate::token::CsrfToken;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::trace;

/// Keyed storage for at most one token per session.
pub trait TokenStore: Send + Sync {
    /// Current record for a session
    fn get(&self, session_key: &str) -> Option<CsrfToken>;

    /// Insert or overwrite the record for `token.session_key`, returning
    /// the record it replaced
    fn set(&self, token: CsrfToken) -> Option<CsrfToken>;

    /// Remove the record for a session
    fn delete(&self, session_key: &str) -> Option<CsrfToken>;

    /// Remove the record only if `predicate` holds for it, atomically
    fn delete_if(
        &self,
        session_key: &str,
        predicate: &dyn Fn(&CsrfToken) -> bool,
    ) -> Option<CsrfToken>;

    /// Remove every record expired at `now`, returning how many went
    fn purge_expired(&self, now: DateTime<Utc>) -> usize;

    /// Number of stored records
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory token store
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: DashMap<String, CsrfToken>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, session_key: &str) -> Option<CsrfToken> {
        self.tokens.get(session_key).map(|entry| entry.value().clone())
    }

    fn set(&self, token: CsrfToken) -> Option<CsrfToken> {
        trace!(session = %token.session_key, "Storing CSRF token");
        self.tokens.insert(token.session_key.clone(), token)
    }

    fn delete(&self, session_key: &str) -> Option<CsrfToken> {
        self.tokens.remove(session_key).map(|(_, token)| token)
    }

    fn delete_if(
        &self,
        session_key: &str,
        predicate: &dyn Fn(&CsrfToken) -> bool,
    ) -> Option<CsrfToken> {
        self.tokens
            .remove_if(session_key, |_, token| predicate(token))
            .map(|(_, token)| token)
    }

    fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut purged = 0;
        self.tokens.retain(|_, token| {
            let keep = !token.is_expired_at(now);
            if !keep {
                purged += 1;
            }
            keep
        });
        purged
    }

    fn len(&self) -> usize {
        self.tokens.len()
    }
}
