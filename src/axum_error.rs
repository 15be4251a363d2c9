use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use color_eyre::Report;
use strum::IntoStaticStr;
use thiserror::Error;
use tracing::{error, warn};

use crate::store::TokenError;

#[derive(Debug, Error, IntoStaticStr)]
pub enum AxumError {
    #[error("neither access_token nor oauth_token was supplied")]
    MissingToken,

    #[error("access token not found")]
    TokenNotFound,

    #[error(transparent)]
    Internal(#[from] Report),
}

impl From<TokenError> for AxumError {
    fn from(error: TokenError) -> Self {
        match error {
            TokenError::NotFound => Self::TokenNotFound,
            TokenError::Backend(report) => Self::Internal(report),
        }
    }
}

impl AxumError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingToken | Self::TokenNotFound => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AxumError {
    fn into_response(self) -> Response {
        let kind: &'static str = (&self).into();

        match self {
            Self::MissingToken => {
                warn!(kind, "Rejecting request without an access token");
                (
                    self.status(),
                    [(header::WWW_AUTHENTICATE, "Bearer")],
                    "Missing access token",
                )
                    .into_response()
            }
            Self::TokenNotFound => {
                warn!(kind, "Rejecting request with an unknown access token");
                (
                    self.status(),
                    [(header::WWW_AUTHENTICATE, r#"Bearer error="invalid_token""#)],
                    "Invalid access token",
                )
                    .into_response()
            }
            Self::Internal(ref report) => {
                error!(kind, error = ?report, "An internal error occurred");
                (self.status(), "Internal server error").into_response()
            }
        }
    }
}

pub type AxumResult<T, E = AxumError> = std::result::Result<T, E>;
