mod api;
mod oauth2;

use utoipa_axum::router::{OpenApiRouter, UtoipaMethodRouter};

use crate::state::AppState;

type Route = UtoipaMethodRouter<AppState>;

pub fn routes() -> Vec<Route> {
    [api::routes(), oauth2::routes()].concat()
}

pub fn router() -> OpenApiRouter<AppState> {
    routes()
        .into_iter()
        .fold(OpenApiRouter::new(), |router, route| router.routes(route))
}
