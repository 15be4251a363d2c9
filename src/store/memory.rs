use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use color_eyre::Result;

use crate::{
    schema::User,
    token::{AccessToken, UserId},
};

use super::{TokenStore, UserStore};

#[derive(Default)]
pub struct MemoryTokenStore {
    tokens: HashMap<String, UserId>,
}

impl MemoryTokenStore {
    pub fn with_token(mut self, token: &str, user_id: impl Into<UserId>) -> Self {
        self.tokens.insert(token.to_string(), user_id.into());
        self
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn find(&self, token: &AccessToken) -> Result<Option<UserId>> {
        Ok(self.tokens.get(token.secret()).cloned())
    }
}

/// User store keyed by the external identifier, counting every lookup.
#[derive(Default)]
pub struct MemoryUserStore {
    users: HashMap<UserId, User>,
    lookups: AtomicUsize,
}

impl MemoryUserStore {
    pub fn with_user(mut self, id: impl Into<UserId>, user: User) -> Self {
        self.users.insert(id.into(), user);
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_uuid(&self, id: &UserId) -> Result<Option<User>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.users.get(id).cloned())
    }
}
