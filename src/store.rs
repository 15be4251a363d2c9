#[cfg(test)]
pub mod memory;
mod surreal;

use async_trait::async_trait;
use color_eyre::{Report, Result};
use thiserror::Error;

use crate::{
    schema::User,
    token::{AccessToken, UserId},
};

pub use surreal::SurrealStore;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("access token not found")]
    NotFound,

    #[error(transparent)]
    Backend(#[from] Report),
}

/// Resolves access tokens to the user they were issued for.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn find(&self, token: &AccessToken) -> Result<Option<UserId>>;

    /// Lookup-or-fail variant of [`TokenStore::find`].
    async fn resolve(&self, token: &AccessToken) -> Result<UserId, TokenError> {
        self.find(token).await?.ok_or(TokenError::NotFound)
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_uuid(&self, id: &UserId) -> Result<Option<User>>;
}
