//! Web backend for looking up and searching Japanese postal codes.

pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod schema;
pub mod store;
pub mod utils;

use crate::handlers::{cities, offices, postal_codes, prefectures, stats};
use axum::{
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
        HeaderValue, StatusCode,
    },
    routing::get,
    Router,
};
use config::{Config, StoreSource};
use error::ApiError;
use moka::future::Cache;
use postcode_core::{CityRecord, PrefectureCode, PrefectureRecord};
use std::{fmt::Debug, ops::Deref, sync::Arc, time::Duration};
use store::{MemoryStore, PgStore, Store};
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

/// How long the prefecture and city lists are cached.
const LIST_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Clone)]
pub struct PostcodeState(Arc<PostcodeStateCore>);

impl Deref for PostcodeState {
    type Target = PostcodeStateCore;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Debug for PostcodeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Postcode({})", self.store.kind())
    }
}

pub struct PostcodeStateCore {
    pub store: Arc<dyn Store>,
    pub search_limit_max: usize,
    pub runtime_name: String,
    pub prefecture_cache: Cache<(), Arc<Vec<PrefectureRecord>>>,
    pub city_cache: Cache<PrefectureCode, Arc<Vec<CityRecord>>>,
}

impl PostcodeState {
    pub fn new(store: Arc<dyn Store>, search_limit_max: usize, runtime_name: String) -> Self {
        let prefecture_cache = Cache::builder()
            .max_capacity(1)
            .time_to_live(LIST_CACHE_TTL)
            .build();
        let city_cache = Cache::builder()
            .max_capacity(64)
            .time_to_live(LIST_CACHE_TTL)
            .build();
        Self(Arc::new(PostcodeStateCore {
            store,
            search_limit_max,
            runtime_name,
            prefecture_cache,
            city_cache,
        }))
    }
}

pub fn router(state: PostcodeState) -> Router<()> {
    let api = Router::new()
        .route("/", get(stats::info).options(preflight))
        .nest(
            "/postal-codes",
            Router::new()
                .route("/search", get(postal_codes::search).options(preflight))
                .route("/{code}", get(postal_codes::get_one).options(preflight)),
        )
        .nest(
            "/prefectures",
            Router::new()
                .route("/", get(prefectures::get_all).options(preflight))
                .route("/{code}/cities", get(prefectures::cities).options(preflight)),
        )
        .nest(
            "/cities",
            Router::new().route(
                "/{code}/postal-codes",
                get(cities::postal_codes).options(preflight),
            ),
        )
        .nest(
            "/offices",
            Router::new()
                .route("/search", get(offices::search).options(preflight))
                .route(
                    "/prefecture/{prefecture}",
                    get(offices::by_prefecture).options(preflight),
                )
                .route("/{code}", get(offices::get_one).options(preflight)),
        )
        .route("/stats", get(stats::stats).options(preflight))
        .route("/counter", get(stats::counter).options(preflight));

    Router::new()
        .nest("/api", api.clone())
        .merge(api)
        .fallback(not_found)
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Builds the store described by the configuration and the router on top of it.
pub async fn router_from_config(config: &Config) -> eyre::Result<Router<()>> {
    let store: Arc<dyn Store> = match &config.store {
        StoreSource::Postgres { database_url } => Arc::new(PgStore::connect(database_url)?),
        StoreSource::Fixture { path } => {
            let path = path.clone();
            Arc::new(tokio::task::spawn_blocking(move || MemoryStore::open(&path)).await??)
        }
    };
    tracing::info!("Using {} store", store.kind());

    let state = PostcodeState::new(
        store,
        config.search_limit_max,
        config.runtime_name.clone(),
    );
    Ok(router(state))
}

async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}
