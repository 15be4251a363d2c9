use async_trait::async_trait;
use color_eyre::{eyre::WrapErr, Result};
use tracing::{debug, instrument};

use crate::{
    schema::{Oauth2Token, User, OAUTH2_TOKEN, USER},
    state::SurrealDb,
    token::{AccessToken, UserId},
};

use super::{TokenStore, UserStore};

/// Both stores backed by one SurrealDB connection.
#[derive(Clone)]
pub struct SurrealStore {
    db: SurrealDb,
}

impl SurrealStore {
    pub fn new(db: SurrealDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TokenStore for SurrealStore {
    #[instrument(skip_all)]
    async fn find(&self, token: &AccessToken) -> Result<Option<UserId>> {
        let row: Option<Oauth2Token> = self
            .db
            .query("SELECT * OMIT id FROM ONLY type::table($table) WHERE token = $token LIMIT 1")
            .bind(("table", OAUTH2_TOKEN))
            .bind(("token", token.secret().to_string()))
            .await
            .wrap_err("failed to query access tokens")?
            .take(0)
            .wrap_err("failed to decode access token row")?;

        debug!(found = row.is_some(), "Looked up access token");

        Ok(row.map(|row| row.user_id))
    }
}

#[async_trait]
impl UserStore for SurrealStore {
    // Other columns may hold record links, datetimes or durations that do not
    // decode into JSON values, so only the public fields are selected.
    #[instrument(skip(self), fields(user_id = %id))]
    async fn find_by_uuid(&self, id: &UserId) -> Result<Option<User>> {
        self.db
            .query(
                "SELECT name, email, uuid FROM ONLY type::table($table) WHERE uuid = $uuid LIMIT 1",
            )
            .bind(("table", USER))
            .bind(("uuid", id.to_string()))
            .await
            .wrap_err("failed to query users")?
            .take(0)
            .wrap_err("failed to decode user row")
    }
}
