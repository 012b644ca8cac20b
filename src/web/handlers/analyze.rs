// POST /analyze: run the full pipeline for one topic.
//
// Request and data problems (empty topic, nothing fetched, nothing usable)
// answer 200 with `success: false`, the way the form-driven page expects.
// Configuration and unexpected faults answer 500 with a generic message.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::pipeline::response::AnalyzeResponse;
use crate::web::{api_error, AppState};

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub topic: String,
}

pub async fn analyze(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return api_error(rejection.status(), &rejection.body_text()),
    };

    let result = state.service.analyze(&request.topic).await;
    let status = match &result {
        Err(e) if e.is_internal() => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::OK,
    };

    (status, Json(AnalyzeResponse::from_result(result))).into_response()
}
