use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while scraping a recipe page
#[derive(Error, Debug)]
pub enum FetchError {
    /// The URL could not be parsed or uses an unsupported scheme
    #[error("Error fetching URL: invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Transport failure or non-success HTTP status
    #[error("Error fetching URL: {0}")]
    Request(#[from] reqwest::Error),
}

/// Errors returned by the generative model client
#[derive(Error, Debug)]
pub enum ModelError {
    /// Failed to reach the model endpoint or decode its response
    #[error("Model request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The model endpoint answered with an error object
    #[error("Google Gemini API error ({code}): {message}")]
    Api { code: i64, message: String },

    /// The response carried no candidate text
    #[error("Failed to extract content from Google Gemini response. Response: {0}")]
    EmptyResponse(String),

    /// The model did not answer within the configured timeout
    #[error("Model request timed out after {0:?}")]
    Timeout(Duration),
}

/// Errors surfaced by the HTTP API, each mapped to a status code
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("No user input or website URL provided")]
    MissingInput,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingInput => StatusCode::BAD_REQUEST,
            ApiError::Fetch(_) | ApiError::Model(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        error!("Error in API ({}): {}", status.as_u16(), message);
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Errors that prevent the server from starting
#[derive(Error, Debug)]
pub enum StartupError {
    /// Configuration could not be loaded or deserialized
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// No API credential was supplied
    #[error("GOOGLE_API_KEY not found in config or environment")]
    MissingApiKey,

    /// A configured value is out of range
    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: &'static str, reason: String },

    /// The model client could not be initialised
    #[error("Error configuring model client: {0}")]
    Provider(String),

    /// The outbound HTTP client could not be built
    #[error("Error creating HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Binding or serving the listener failed
    #[error("Error starting server: {0}")]
    Io(#[from] std::io::Error),
}
