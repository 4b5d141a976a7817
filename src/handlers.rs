use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    Json,
};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::chat::{AskRequest, AskResponse};
use crate::error::{AppError, AppResult};
use crate::guardrail::{is_agri_related, REFUSAL_REPLY};
use crate::prompt::{build_prompt, build_translation_prompt};
use crate::state::AppState;
use crate::translate::{TranslateRequest, TranslateResponse};

/// `POST /ask`: answer an agriculture question.
///
/// Off-topic questions get the refusal reply without a model call.
#[instrument(name = "ask", skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn ask(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> AppResult<Json<AskResponse>> {
    let request = AskRequest::from_slice(&read_body(body)?);
    let message = request.message();

    if message.is_empty() {
        return Err(AppError::validation("Empty message"));
    }

    if !is_agri_related(message) {
        info!("Guardrail rejected question: lang={}", request.input_lang());
        return Ok(Json(AskResponse::new(REFUSAL_REPLY)));
    }

    let prompt = build_prompt(message, request.input_lang(), request.response_lang());
    debug!(
        "Forwarding question: lang={}, resp_lang={}",
        request.input_lang(),
        request.response_lang()
    );

    let reply = state.gateway.generate(&prompt).await.map_err(|e| {
        error!("Failed to answer question: {}", e);
        AppError::from(e)
    })?;

    Ok(Json(AskResponse::new(reply)))
}

/// `POST /translate`: translate text to English or Kannada.
#[instrument(name = "translate", skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn translate(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> AppResult<Json<TranslateResponse>> {
    let request = TranslateRequest::from_slice(&read_body(body)?);
    let text = request.text();

    if text.is_empty() {
        return Err(AppError::validation("Empty text"));
    }

    let prompt = build_translation_prompt(text, request.target_lang());
    debug!("Translating {} chars to {}", text.chars().count(), request.target_lang());

    let translated = state.gateway.generate(&prompt).await.map_err(|e| {
        error!("Failed to translate: {}", e);
        AppError::from(e)
    })?;

    Ok(Json(TranslateResponse { translated }))
}

fn read_body(body: Result<Bytes, BytesRejection>) -> AppResult<Bytes> {
    body.map_err(|rejection| {
        warn!("Rejected request body: {}", rejection.body_text());
        AppError::from(rejection)
    })
}
