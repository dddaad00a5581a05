use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use urltree_core::extract::extract_url;
use urltree_scanner::{Extraction, Fetcher, ScanError};

#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<Fetcher>,
}

impl AppState {
    pub fn new(fetcher: Fetcher) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    #[serde(default)]
    pub url: Option<String>,
}

/// Error body returned by the API: `{"statusCode": 404, "statusMessage": "URL not found"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub status_code: u16,
    pub status_message: String,
}

impl ApiError {
    pub fn bad_request(message: &str) -> Self {
        Self {
            status_code: StatusCode::BAD_REQUEST.as_u16(),
            status_message: message.to_string(),
        }
    }
}

impl From<ScanError> for ApiError {
    fn from(err: ScanError) -> Self {
        Self {
            status_code: err.status_code(),
            status_message: err.status_message(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

async fn extract_urls(
    State(state): State<AppState>,
    payload: Result<Json<ExtractRequest>, JsonRejection>,
) -> Result<Json<Extraction>, ApiError> {
    let url = match payload {
        Ok(Json(ExtractRequest { url: Some(url) })) if !url.is_empty() => url,
        Ok(_) => return Err(ApiError::bad_request("URL is required")),
        Err(rejection) => {
            warn!("Rejected request body: {}", rejection);
            return Err(ApiError::bad_request("URL is required"));
        }
    };

    match extract_url(&state.fetcher, &url).await {
        Ok(extraction) => Ok(Json(extraction)),
        Err(err) => {
            warn!("Extraction from {} failed: {}", url, err);
            Err(ApiError::from(err))
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/extract-urls", post(extract_urls))
        .with_state(state)
}

/// Bind `addr` and serve the API until the process is stopped.
pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
