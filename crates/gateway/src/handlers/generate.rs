//! Article drafting via the generative-language service

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::STATUS_SUCCESS;
use crate::AppState;
use blogforge_common::{errors::Result, metrics::GenerationTimer};

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub topic: String,
}

#[derive(Serialize)]
pub struct GenerateResponse {
    pub status: &'static str,
    pub content: String,
}

/// Draft an article for the given topic
pub async fn generate(
    State(state): State<AppState>,
    payload: std::result::Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>> {
    let Json(request) = payload?;

    let timer = GenerationTimer::start(state.generator.model_name());
    let result = state.generator.generate(&request.topic).await;
    let elapsed = timer.finish(result.is_ok());
    let content = result?;

    tracing::info!(
        topic = %request.topic,
        model = state.generator.model_name(),
        elapsed_secs = elapsed,
        chars = content.chars().count(),
        "Article drafted"
    );

    Ok(Json(GenerateResponse {
        status: STATUS_SUCCESS,
        content,
    }))
}
