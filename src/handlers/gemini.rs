use axum::{extract::State, Json};
use serde::Deserialize;

use crate::error::AppResult;
use crate::AppState;

const JOURNAL_PROMPT: &str = "Generate 3 short, reflective journaling prompts to help a college student manage stress and anxiety.";
const JOURNAL_FALLBACK: &str = "What has been on your mind lately? Let's explore that.";

const MOTIVATION_PROMPT: &str = "Give a short, uplifting motivational quote for a college student who feels overwhelmed or self-doubting.";
const MOTIVATION_FALLBACK: &str = "Every step you take, no matter how small, is progress.";

const EMPATHETIC_FALLBACK: &str =
    "I'm still here for you. Even when the tech acts up, your feelings matter.";

#[derive(Debug, Deserialize)]
pub struct EmpatheticRequest {
    pub message: String,
}

/// All generation routes answer 200 with either live or fallback text.
pub async fn journal_prompts(
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let generated = state
        .generative
        .generate(JOURNAL_PROMPT, JOURNAL_FALLBACK)
        .await;
    Ok(Json(serde_json::json!({ "prompt": generated.into_text() })))
}

pub async fn motivation(State(state): State<AppState>) -> AppResult<Json<serde_json::Value>> {
    let generated = state
        .generative
        .generate(MOTIVATION_PROMPT, MOTIVATION_FALLBACK)
        .await;
    Ok(Json(serde_json::json!({ "quote": generated.into_text() })))
}

pub async fn empathetic_reply(
    State(state): State<AppState>,
    Json(body): Json<EmpatheticRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let prompt = format!(
        "You're a friendly and supportive mental wellness chatbot. Respond empathetically to the following user message: \"{}\"",
        body.message
    );

    let generated = state.generative.generate(&prompt, EMPATHETIC_FALLBACK).await;
    Ok(Json(serde_json::json!({ "reply": generated.into_text() })))
}
