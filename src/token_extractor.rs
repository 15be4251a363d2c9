use axum::{
    extract::{rejection::FormRejection, FromRequest, FromRequestParts, Query, Request},
    http::Method,
    response::{IntoResponse, Response},
    Form,
};
use utoipa::{IntoParams, ToSchema};

use crate::{axum_error::AxumError, token::AccessToken};

const ACCESS_TOKEN: &str = "access_token";
const OAUTH_TOKEN: &str = "oauth_token";

/// Token-carrying request parameters. Any other parameters are ignored.
#[derive(Debug, Default, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct TokenParams {
    /// OAuth2 access token
    pub access_token: Option<String>,

    /// Legacy name of `access_token`, used only when `access_token` is absent
    pub oauth_token: Option<String>,
}

impl TokenParams {
    /// Picks the token parameters out of url-encoded pairs. A repeated key
    /// keeps its last value.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        pairs
            .into_iter()
            .fold(Self::default(), |mut params, (key, value)| {
                match key.as_str() {
                    ACCESS_TOKEN => params.access_token = Some(value),
                    OAUTH_TOKEN => params.oauth_token = Some(value),
                    _ => {}
                }
                params
            })
    }

    /// Overlays `other` on top of `self`, key by key.
    pub fn merge(self, other: Self) -> Self {
        Self {
            access_token: other.access_token.or(self.access_token),
            oauth_token: other.oauth_token.or(self.oauth_token),
        }
    }

    pub fn into_token(self) -> Result<AccessToken, AxumError> {
        self.access_token
            .or(self.oauth_token)
            .map(AccessToken::new)
            .ok_or(AxumError::MissingToken)
    }
}

/// The access token presented with a request, taken from the query string or,
/// for POST requests, from a url-encoded form body. The query string wins
/// when both carry the same key.
#[derive(Debug)]
pub struct RequestToken(pub AccessToken);

impl<S> FromRequest<S> for RequestToken
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = request.into_parts();

        let Query(query) = Query::<Vec<(String, String)>>::from_request_parts(&mut parts, state)
            .await
            .map_err(IntoResponse::into_response)?;
        let query = TokenParams::from_pairs(query);

        let params = if parts.method == Method::POST {
            match Form::<Vec<(String, String)>>::from_request(
                Request::from_parts(parts, body),
                state,
            )
            .await
            {
                Ok(Form(form)) => TokenParams::from_pairs(form).merge(query),
                Err(FormRejection::InvalidFormContentType(_)) => query,
                Err(rejection) => return Err(rejection.into_response()),
            }
        } else {
            query
        };

        params
            .into_token()
            .map(Self)
            .map_err(IntoResponse::into_response)
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{self, StatusCode},
    };

    use super::*;

    fn params(access_token: Option<&str>, oauth_token: Option<&str>) -> TokenParams {
        TokenParams {
            access_token: access_token.map(str::to_string),
            oauth_token: oauth_token.map(str::to_string),
        }
    }

    async fn extract(request: Request) -> Result<RequestToken, Response> {
        RequestToken::from_request(request, &()).await
    }

    #[test]
    fn access_token_wins_over_oauth_token() {
        let token = params(Some("primary"), Some("legacy")).into_token().unwrap();

        assert_eq!(token.secret(), "primary");
    }

    #[test]
    fn oauth_token_is_the_fallback() {
        let token = params(None, Some("legacy")).into_token().unwrap();

        assert_eq!(token.secret(), "legacy");
    }

    #[test]
    fn empty_value_still_counts_as_present() {
        let token = params(Some(""), Some("legacy")).into_token().unwrap();

        assert_eq!(token.secret(), "");
    }

    #[test]
    fn no_token_is_missing_token() {
        let result = params(None, None).into_token();

        assert!(matches!(result, Err(AxumError::MissingToken)));
    }

    #[test]
    fn merge_prefers_the_overlay_per_key() {
        let merged = params(Some("form"), Some("form-legacy")).merge(params(Some("query"), None));

        assert_eq!(merged.access_token.as_deref(), Some("query"));
        assert_eq!(merged.oauth_token.as_deref(), Some("form-legacy"));
    }

    #[test]
    fn repeated_key_keeps_last_value() {
        let params = TokenParams::from_pairs(vec![
            ("access_token".to_string(), "first".to_string()),
            ("foo".to_string(), "bar".to_string()),
            ("access_token".to_string(), "last".to_string()),
        ]);

        assert_eq!(params.access_token.as_deref(), Some("last"));
        assert_eq!(params.oauth_token, None);
    }

    #[tokio::test]
    async fn reads_token_from_query_string() {
        let request = http::Request::builder()
            .uri("/profile?foo=bar&oauth_token=abc123")
            .body(Body::empty())
            .unwrap();

        let RequestToken(token) = extract(request).await.unwrap();

        assert_eq!(token.secret(), "abc123");
    }

    #[tokio::test]
    async fn query_overrides_form_body_on_post() {
        let request = http::Request::builder()
            .method(Method::POST)
            .uri("/profile?access_token=from-query")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from("access_token=from-form&oauth_token=legacy-form"))
            .unwrap();

        let RequestToken(token) = extract(request).await.unwrap();

        assert_eq!(token.secret(), "from-query");
    }

    #[tokio::test]
    async fn form_body_is_used_when_query_lacks_the_key() {
        let request = http::Request::builder()
            .method(Method::POST)
            .uri("/profile?oauth_token=from-query")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from("access_token=from-form"))
            .unwrap();

        let RequestToken(token) = extract(request).await.unwrap();

        assert_eq!(token.secret(), "from-form");
    }

    #[tokio::test]
    async fn repeated_query_key_keeps_last_value() {
        let request = http::Request::builder()
            .uri("/profile?access_token=x&access_token=good")
            .body(Body::empty())
            .unwrap();

        let RequestToken(token) = extract(request).await.unwrap();

        assert_eq!(token.secret(), "good");
    }

    #[tokio::test]
    async fn post_without_form_falls_back_to_query() {
        let request = http::Request::builder()
            .method(Method::POST)
            .uri("/profile?access_token=from-query")
            .body(Body::empty())
            .unwrap();

        let RequestToken(token) = extract(request).await.unwrap();

        assert_eq!(token.secret(), "from-query");
    }

    #[tokio::test]
    async fn get_without_token_is_rejected() {
        let request = http::Request::builder()
            .uri("/profile")
            .body(Body::empty())
            .unwrap();

        let rejection = extract(request).await.unwrap_err();

        assert_eq!(rejection.status(), StatusCode::UNAUTHORIZED);
    }
}
