use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, info, instrument};
use utoipa_axum::routes;

use crate::{
    axum_error::AxumResult,
    profile::Profile,
    state::AppState,
    token::AccessToken,
    token_extractor::{RequestToken, TokenParams},
};

use super::Route;

const PATH: &str = "/profile";

pub fn routes() -> Vec<Route> {
    vec![routes!(get_profile, post_profile)]
}

/// Get the public profile of the user owning the access token
#[utoipa::path(
    method(get),
    path = PATH,
    params(TokenParams),
    responses(
        (status = OK, description = "Success", body = Profile, content_type = "application/json"),
        (status = BAD_REQUEST, description = "The token belongs to a user that does not exist"),
        (status = UNAUTHORIZED, description = "Access token missing or unknown", body = str, content_type = "text/plain")
    )
)]
async fn get_profile(
    State(state): State<AppState>,
    RequestToken(token): RequestToken,
) -> AxumResult<Response> {
    show_profile(&state, token).await
}

/// Get the public profile of the user owning the access token, passed as a form field
#[utoipa::path(
    method(post),
    path = PATH,
    params(TokenParams),
    request_body(content = TokenParams, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = OK, description = "Success", body = Profile, content_type = "application/json"),
        (status = BAD_REQUEST, description = "The token belongs to a user that does not exist"),
        (status = UNAUTHORIZED, description = "Access token missing or unknown", body = str, content_type = "text/plain")
    )
)]
async fn post_profile(
    State(state): State<AppState>,
    RequestToken(token): RequestToken,
) -> AxumResult<Response> {
    show_profile(&state, token).await
}

#[instrument(skip_all)]
async fn show_profile(state: &AppState, token: AccessToken) -> AxumResult<Response> {
    let user_id = state.tokens.resolve(&token).await?;

    match state.users.find_by_uuid(&user_id).await? {
        Some(user) => {
            info!(%user_id, "Serving profile");
            Ok(Json(Profile::from(user)).into_response())
        }
        None => {
            debug!(%user_id, "Token refers to a missing user");
            Ok(StatusCode::BAD_REQUEST.into_response())
        }
    }
}
