//! The chart request handler and its error→response mapping.

use {
    axum::{
        Json,
        extract::{Path, State},
        http::StatusCode,
        response::{IntoResponse, Response},
    },
    serde::Serialize,
    tracing::{info, warn},
};

use chartrelay_browser::FetchError;

use crate::server::AppState;

/// JSON error payload relayed to callers.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

/// `GET /{pid}` — fetch historical chart data for an instrument.
pub async fn chart_handler(State(state): State<AppState>, Path(pid): Path<String>) -> Response {
    if pid.trim().is_empty() {
        return error_response(&FetchError::EmptyPid);
    }

    match state.source.fetch_chart(&pid).await {
        Ok(chart) => {
            info!(pid, "relayed chart data");
            (StatusCode::OK, Json(chart)).into_response()
        },
        Err(e) => {
            warn!(pid, error = %e, "chart fetch failed");
            error_response(&e)
        },
    }
}

/// `GET /` — a request with no PID at all.
pub async fn missing_pid_handler() -> Response {
    error_response(&FetchError::EmptyPid)
}

/// Map a fetch error onto the HTTP contract.
///
/// Missing input and the protection challenge are the caller's problem
/// (400); everything else is a server-side failure (500).
pub fn error_response(err: &FetchError) -> Response {
    let (status, error) = match err {
        FetchError::EmptyPid => (StatusCode::BAD_REQUEST, "Bad Request"),
        FetchError::ChallengeDetected => (StatusCode::BAD_REQUEST, "Error"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
    };

    let body = ErrorBody {
        error,
        message: err.to_string(),
    };
    (status, Json(body)).into_response()
}
