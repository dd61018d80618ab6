use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderValue,
    response::{IntoResponse, Json, Response},
};

use crate::dto::quiz_dto::{GenerateQuizPayload, GenerateQuizResponse};
use crate::error::Result;
use crate::AppState;

/// Reports whether a quiz came from the model or is the placeholder fallback.
pub const QUIZ_SOURCE_HEADER: &str = "x-quiz-source";

#[axum::debug_handler]
pub async fn generate_quiz(
    State(state): State<AppState>,
    payload: std::result::Result<Json<GenerateQuizPayload>, JsonRejection>,
) -> Result<Response> {
    let Json(payload) = payload?;
    tracing::info!(
        topic = ?payload.topic,
        difficulty = ?payload.difficulty,
        num_questions = ?payload.num_questions,
        question_type = ?payload.question_type,
        "Quiz generation requested"
    );

    let req = payload.into_request(state.config.max_questions)?;
    let generated = state.quiz_service.generate(&req).await;
    tracing::info!(
        source = generated.source.as_str(),
        count = generated.questions.len(),
        "Returning quiz"
    );

    let mut response = Json(GenerateQuizResponse {
        quiz: generated.questions,
    })
    .into_response();
    response.headers_mut().insert(
        QUIZ_SOURCE_HEADER,
        HeaderValue::from_static(generated.source.as_str()),
    );
    Ok(response)
}
