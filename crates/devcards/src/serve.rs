use crate::block::render_block;
use crate::cache::ArticleCache;
use crate::preview::{preview_states, spawn_preview};
use crate::prelude::{eprintln, *};
use crate::source::{ArticleSource, HttpArticleSource};
use crate::store::store_from_settings;
use axum::{
    body::Bytes,
    extract::{Query, State},
    response::{
        sse::{Event, KeepAlive, Sse},
        Html,
    },
    routing::get,
    Router,
};
use devcards_core::config::{FallbackPolicy, RenderConfig};
use devcards_core::preview::PreviewFrame;
use futures::stream::{Stream, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Debug, Clone, clap::Args)]
pub struct ServeOptions {
    /// Port to listen on
    #[arg(short, long, env = "DEVCARDS_PORT", default_value = "3000")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, env = "DEVCARDS_HOST", default_value = "127.0.0.1")]
    pub host: String,
}

/// Shared server state
pub struct AppState<S> {
    pub cache: ArticleCache<S>,
    pub fallback: FallbackPolicy,
}

/// Build the router for the block and preview endpoints
pub fn router<S>(state: Arc<AppState<S>>) -> Router
where
    S: ArticleSource + Clone + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/block", get(block_query_handler::<S>).post(block_body_handler::<S>))
        .route("/preview", get(preview_handler::<S>))
        .layer(cors)
        .with_state(state)
}

pub async fn run(options: ServeOptions, global: crate::Global) -> Result<()> {
    let settings = global.settings()?;
    let addr = format!("{}:{}", options.host, options.port);

    let source = HttpArticleSource::from_settings(&settings)?;
    let state = Arc::new(AppState {
        cache: ArticleCache::new(source, store_from_settings(&settings), settings.cache_ttl_secs),
        fallback: settings.fallback,
    });

    if global.verbose {
        eprintln!("devcards listening on http://{}", addr);
        eprintln!("Block endpoint: http://{}/block", addr);
        eprintln!("Preview endpoint: http://{}/preview", addr);
    }
    log::info!("Listening on {addr} (endpoint {})", settings.endpoint);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("Failed to bind to {}: {}", addr, e))?;

    axum::serve(listener, router(state))
        .await
        .map_err(|e| eyre!("Server error: {e}"))?;

    Ok(())
}

/// Interpret query parameters as block attributes
fn config_from_query(params: HashMap<String, String>) -> RenderConfig {
    let attributes: serde_json::Map<String, serde_json::Value> = params
        .into_iter()
        .map(|(key, value)| (key, serde_json::Value::String(value)))
        .collect();
    RenderConfig::from_attributes(&serde_json::Value::Object(attributes))
}

async fn block_query_handler<S>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<HashMap<String, String>>,
) -> Html<String>
where
    S: ArticleSource + Clone + 'static,
{
    let config = config_from_query(params);
    Html(render_block(&state.cache, &config, state.fallback).await)
}

async fn block_body_handler<S>(State(state): State<Arc<AppState<S>>>, body: Bytes) -> Html<String>
where
    S: ArticleSource + Clone + 'static,
{
    // Unparseable attributes, including non UTF-8 bodies, render with defaults
    let attributes = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    let config = RenderConfig::from_attributes(&attributes);
    Html(render_block(&state.cache, &config, state.fallback).await)
}

async fn preview_handler<S>(
    State(state): State<Arc<AppState<S>>>,
    Query(params): Query<HashMap<String, String>>,
) -> Sse<impl Stream<Item = std::result::Result<Event, axum::Error>>>
where
    S: ArticleSource + Clone + 'static,
{
    let config = config_from_query(params);
    let source = Arc::new(state.cache.source().clone());

    let stream = preview_states(spawn_preview(source)).map(move |preview| {
        Event::default()
            .event("state")
            .json_data(PreviewFrame::new(&preview, &config))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
