use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{debug, info};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use crate::config::ServerConfig;
use crate::error::{ApiError, ModelError, StartupError};
use crate::fetcher::RequestFetcher;
use crate::model::RecipeRequest;
use crate::parser::{parse_reply, RecipeReply};
use crate::prompt::build_prompt;
use crate::providers::{GoogleProvider, LlmProvider};

const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
const RECIPE_ALLOWED_METHODS: &str = "POST, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type";

/// Shared per-process collaborators; nothing in here is mutated by requests.
#[derive(Clone)]
pub struct AppState {
    fetcher: Arc<RequestFetcher>,
    provider: Arc<dyn LlmProvider>,
    model_timeout: Duration,
}

impl AppState {
    pub fn new(
        fetcher: RequestFetcher,
        provider: Arc<dyn LlmProvider>,
        model_timeout: Duration,
    ) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            provider,
            model_timeout,
        }
    }

    /// Build the state from configuration, creating the Gemini client.
    pub fn from_config(config: &ServerConfig) -> Result<Self, StartupError> {
        let fetcher = RequestFetcher::new(Some(config.fetch_timeout()))?;
        let provider = GoogleProvider::new(config).map_err(StartupError::Provider)?;
        info!("Configured '{}' provider with model {}", provider.provider_name(), config.model);

        Ok(Self::new(fetcher, Arc::new(provider), config.model_timeout()))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home).options(preflight))
        .route("/api/test", get(api_test).options(preflight))
        .route(
            "/api/gemini",
            post(generate_recipe)
                .options(recipe_preflight)
                .layer(DefaultBodyLimit::disable()),
        )
        .layer(middleware::map_response(add_cors_headers))
        .with_state(state)
}

/// Bind the configured address and serve until the process is stopped.
pub async fn serve(config: &ServerConfig) -> Result<(), StartupError> {
    let state = AppState::from_config(config)?;
    let app = router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Starting server on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Run one request through scrape, prompt, model call and parsing.
pub async fn create_recipe(
    state: &AppState,
    request: &RecipeRequest,
) -> Result<RecipeReply, ApiError> {
    if request.is_empty() {
        return Err(ApiError::MissingInput);
    }

    let website_content = match request.website_url() {
        Some(url) => Some(state.fetcher.fetch(url).await?),
        None => None,
    };

    let prompt = build_prompt(request.user_input(), website_content.as_deref());

    let raw_reply = tokio::time::timeout(state.model_timeout, state.provider.generate(&prompt))
        .await
        .map_err(|_| ModelError::Timeout(state.model_timeout))??;
    debug!("Raw API response: \n{}", raw_reply);

    let parsed = parse_reply(&raw_reply);
    info!("{}", parsed.describe());

    Ok(parsed.into_reply())
}

async fn home() -> &'static str {
    "Bon AIppetit API is running!"
}

async fn api_test() -> Json<Value> {
    Json(json!({ "status": "API is working" }))
}

async fn generate_recipe(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<RecipeReply>, ApiError> {
    info!("Received request method: POST");
    debug!("Received headers: {:?}", headers);

    let request: RecipeRequest =
        serde_json::from_slice(&body).map_err(|e| ApiError::Internal(e.to_string()))?;
    debug!("Received data: {:?}", request);

    let reply = create_recipe(&state, &request).await?;

    Ok(Json(reply))
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn recipe_preflight() -> Response {
    info!("Received request method: OPTIONS");
    (
        [
            (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (ACCESS_CONTROL_ALLOW_METHODS, RECIPE_ALLOWED_METHODS),
            (ACCESS_CONTROL_ALLOW_HEADERS, ALLOWED_HEADERS),
        ],
        StatusCode::OK,
    )
        .into_response()
}

/// Fill in cross-origin headers a handler has not already set.
async fn add_cors_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers
        .entry(ACCESS_CONTROL_ALLOW_ORIGIN)
        .or_insert(HeaderValue::from_static("*"));
    headers
        .entry(ACCESS_CONTROL_ALLOW_METHODS)
        .or_insert(HeaderValue::from_static(ALLOWED_METHODS));
    headers
        .entry(ACCESS_CONTROL_ALLOW_HEADERS)
        .or_insert(HeaderValue::from_static(ALLOWED_HEADERS));
    response
}
