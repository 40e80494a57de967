/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use daccord_api::{app::{build_router, AppState}, config::Config};
/// use daccord_shared::store::MemoryStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(Arc::new(MemoryStore::new()), config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use daccord_shared::store::Store;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{
    config::Config,
    error::ApiError,
    middleware::{auth::require_auth, security::SecurityHeadersLayer},
    routes,
};

/// Shared application state
///
/// Cloned into every handler through `State`; both fields are `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,

    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// HS256 secret used to issue and verify tokens
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── GET /health
/// └── /api
///     ├── /auth                              public
///     │   ├── POST /register
///     │   └── POST /login
///     ├── /communities                       bearer token
///     │   ├── GET, POST /
///     │   ├── GET /popular
///     │   ├── GET /category/:category
///     │   └── GET /:id
///     ├── /members                           bearer token
///     │   ├── GET, POST /
///     │   └── GET /new
///     ├── /music                             bearer token
///     │   ├── GET, POST /playlists
///     │   ├── GET, PUT, DELETE /playlists/:id
///     │   ├── POST /playlists/:id/tracks
///     │   └── GET, POST /tracks
///     └── /activities                        bearer token
///         ├── GET, POST /
///         └── GET /recent
/// ```
///
/// Layers, outermost first: security headers, CORS, request tracing. The
/// auth gate wraps only the protected sub-router.
pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    let protected = Router::new()
        .route(
            "/communities",
            get(routes::communities::list).post(routes::communities::create),
        )
        .route("/communities/popular", get(routes::communities::popular))
        .route(
            "/communities/category/:category",
            get(routes::communities::by_category),
        )
        .route("/communities/:id", get(routes::communities::get))
        .route(
            "/members",
            get(routes::members::list).post(routes::members::join),
        )
        .route("/members/new", get(routes::members::newest))
        .route(
            "/music/playlists",
            get(routes::music::list_playlists).post(routes::music::create_playlist),
        )
        .route(
            "/music/playlists/:id",
            get(routes::music::get_playlist)
                .put(routes::music::update_playlist)
                .delete(routes::music::delete_playlist),
        )
        .route(
            "/music/playlists/:id/tracks",
            post(routes::music::add_playlist_track),
        )
        .route(
            "/music/tracks",
            get(routes::music::list_tracks).post(routes::music::create_track),
        )
        .route(
            "/activities",
            get(routes::activities::list).post(routes::activities::create),
        )
        .route("/activities/recent", get(routes::activities::recent))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let api = Router::new().nest("/auth", auth_routes).merge(protected);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api)
        .fallback(|| async { ApiError::NotFound("Route not found".to_string()) })
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_permissive() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
