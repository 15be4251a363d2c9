mod axum_error;
mod profile;
mod routes;
mod schema;
mod settings;
mod state;
mod store;
mod token;
mod token_extractor;

use std::{net::SocketAddr, sync::Arc};

use axum::{http::StatusCode, response::IntoResponse, Router};
use color_eyre::{eyre::WrapErr, Result};
use surrealdb::{
    engine::any,
    opt::auth::{Database, Namespace, Root},
};
use tokio::net::TcpListener;
use tracing::{debug, info, instrument, level_filters::LevelFilter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_rapidoc::RapiDoc;
use utoipa_redoc::{Redoc, Servable};
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    settings::{env_name, DbSettings, Settings},
    state::{AppState, InnerState, SurrealDb},
    store::SurrealStore,
};

#[derive(OpenApi)]
#[openapi()]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    dotenvy::dotenv().ok();
    init_tracing().wrap_err("failed to set global tracing subscriber")?;

    info!(
        "Starting {} {}...",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
    );

    let settings = Arc::new(Settings::try_load().wrap_err("failed to load settings")?);

    let db = init_surrealdb(&settings.db).await?;
    let store = Arc::new(SurrealStore::new(db));

    let app_state = AppState::new(InnerState {
        settings: settings.clone(),
        tokens: store.clone(),
        users: store,
    });

    let app = init_axum(app_state);
    let listener = init_listener(&settings).await?;

    info!(
        "listening on {} ({})",
        listener
            .local_addr()
            .wrap_err("failed to get local address")?,
        settings.general.public_url
    );

    axum::serve(listener, app.into_make_service())
        .await
        .wrap_err("failed to run server")?;

    Ok(())
}

fn init_tracing() -> Result<()> {
    tracing_subscriber::Registry::default()
        .with(tracing_subscriber::fmt::layer().with_span_events(FmtSpan::NEW | FmtSpan::CLOSE))
        .with(ErrorLayer::default())
        .with(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var(env_name("LOG"))
                .from_env()?,
        )
        .try_init()?;

    Ok(())
}

const AUTH_FAILED: &str =
    "There was a problem with the database: There was a problem with authentication";

/// Only rejected credentials move the sign-in on to the next level.
fn is_auth_failure(error: &surrealdb::Error) -> bool {
    matches!(
        error,
        surrealdb::Error::Api(surrealdb::error::Api::Query(message)) if message == AUTH_FAILED
    )
}

#[instrument(skip(settings), fields(endpoint = %settings.endpoint))]
async fn init_surrealdb(settings: &DbSettings) -> Result<SurrealDb> {
    let db = any::connect(&settings.endpoint)
        .await
        .wrap_err("failed to connect to the database")?;

    if let Some(credentials) = settings.credentials.as_ref() {
        debug!("Trying to sign in as a database user");
        match db
            .signin(Database {
                namespace: &settings.namespace,
                database: &settings.database,
                username: &credentials.username,
                password: &credentials.password,
            })
            .await
        {
            Ok(_) => {}
            Err(e) if is_auth_failure(&e) => {
                debug!("Trying to sign in as a namespace user");
                match db
                    .signin(Namespace {
                        namespace: &settings.namespace,
                        username: &credentials.username,
                        password: &credentials.password,
                    })
                    .await
                {
                    Ok(_) => {}
                    Err(e) if is_auth_failure(&e) => {
                        debug!("Trying to sign in as a root user");
                        db.signin(Root {
                            username: &credentials.username,
                            password: &credentials.password,
                        })
                        .await
                        .wrap_err("failed to sign in to the database as a root user")?;
                    }
                    Err(e) => {
                        return Err(e).wrap_err("failed to sign in to the database as a namespace user")
                    }
                }
            }
            Err(e) => return Err(e).wrap_err("failed to sign in to the database as a database user"),
        }
    }

    db.use_ns(&settings.namespace)
        .use_db(&settings.database)
        .await?;

    db.query(include_str!("init.surrealql"))
        .await?
        .check()
        .wrap_err("failed to initialize the database schema")?;

    Ok(db)
}

#[instrument(skip(state))]
fn init_axum(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(routes::router())
        .with_state(state)
        .split_for_parts();

    let openapi_prefix = "/apidoc";
    let spec_path = format!("{openapi_prefix}/openapi.json");

    router
        .merge(
            SwaggerUi::new(format!("{openapi_prefix}/swagger-ui"))
                .url(spec_path.clone(), api.clone()),
        )
        .merge(Redoc::with_url(
            format!("{openapi_prefix}/redoc"),
            api.clone(),
        ))
        .merge(RapiDoc::new(spec_path).path(format!("{openapi_prefix}/rapidoc")))
        .merge(Scalar::with_url(format!("{openapi_prefix}/scalar"), api))
        .fallback(|| async { (StatusCode::NOT_FOUND, "Not found").into_response() })
}

async fn init_listener(settings: &Settings) -> Result<TcpListener> {
    let addr: Vec<SocketAddr> = settings.general.listen_address.clone().into();

    Ok(TcpListener::bind(addr.as_slice()).await?)
}
