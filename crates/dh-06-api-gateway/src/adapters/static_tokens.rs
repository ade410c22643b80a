//! Token-table authenticator.
//!
//! Maps configured opaque tokens to user ids and loads the user from the
//! store on every call, so role changes take effect immediately.

use crate::middleware::auth::constant_time_compare;
use crate::ports::outbound::{AuthError, Authenticator};
use async_trait::async_trait;
use dh_01_entity_store::EntityStore;
use shared_types::{Deadline, User, UserId};
use std::sync::Arc;
use tracing::debug;

pub struct StaticTokenAuthenticator {
    tokens: Vec<(String, UserId)>,
    store: Arc<dyn EntityStore>,
}

impl StaticTokenAuthenticator {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self {
            tokens: Vec::new(),
            store,
        }
    }

    /// Register `token` for `user`. Blank tokens are ignored.
    pub fn with_token(mut self, token: impl Into<String>, user: UserId) -> Self {
        let token = token.into();
        if !token.trim().is_empty() {
            self.tokens.push((token, user));
        }
        self
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Scans the whole table so lookup time does not depend on which entry
    /// matched.
    fn lookup(&self, credential: &str) -> Option<UserId> {
        let mut found = None;
        for (token, user) in &self.tokens {
            if constant_time_compare(credential, token) && found.is_none() {
                found = Some(*user);
            }
        }
        found
    }
}

#[async_trait]
impl Authenticator for StaticTokenAuthenticator {
    async fn resolve(&self, credential: &str, deadline: Deadline) -> Result<User, AuthError> {
        let Some(user_id) = self.lookup(credential) else {
            debug!("unknown bearer token");
            return Err(AuthError::Invalid);
        };
        match self.store.get_user(user_id, deadline).await? {
            Some(user) => Ok(user),
            None => {
                debug!(user_id = %user_id, "token maps to a missing user");
                Err(AuthError::Invalid)
            }
        }
    }
}
