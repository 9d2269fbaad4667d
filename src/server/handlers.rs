use super::multipart::read_render_form;
use super::{AppState, MAX_UPLOAD_BYTES};
use crate::ai::mime::resolve_upload_mime;
use crate::models::{HealthResponse, ImageEdit, RenderResponse, TidyResponse};
use crate::validation::{RenderRequest, TidyRequest};
use crate::{prompts, Error, Result};
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use serde_json::Value;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

/// `POST /tidy`: rewrite a free-form prompt into a windows-only instruction.
pub async fn tidy(
    State(state): State<AppState>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<TidyResponse>> {
    let request_id = Uuid::new_v4();

    run_tidy(&state, body)
        .instrument(info_span!("tidy", %request_id))
        .await
        .map(Json)
        .map_err(|e| {
            error!(%request_id, error = %e, "tidy_failed");
            e
        })
}

async fn run_tidy(
    state: &AppState,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<TidyResponse> {
    let Json(body) = body.map_err(|e| Error::InvalidBody(e.body_text()))?;
    let fields = match body {
        Value::Object(fields) => fields,
        _ => return Err(Error::InvalidBody("expected a JSON object".to_string())),
    };

    let request = TidyRequest::validate(&fields)?;

    let text = state
        .ai
        .complete_text(prompts::tidy_system(), &request.prompt)
        .await?;

    Ok(TidyResponse {
        prompt: text.unwrap_or_else(|| prompts::TIDY_FALLBACK.to_string()),
    })
}

/// `POST /render`: edit the uploaded photo per the prompt.
pub async fn render(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<RenderResponse>> {
    let request_id = Uuid::new_v4();

    run_render(&state, multipart)
        .instrument(info_span!("render", %request_id))
        .await
        .map(Json)
        .map_err(|e| {
            error!(%request_id, error = %e, "render_failed");
            e
        })
}

async fn run_render(
    state: &AppState,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<RenderResponse> {
    let multipart = multipart.map_err(|e| Error::Multipart(e.body_text()))?;
    let form = read_render_form(multipart, MAX_UPLOAD_BYTES).await?;

    let request = RenderRequest::validate(&form.fields)?;
    let upload = form
        .image
        .filter(|upload| !upload.bytes.is_empty())
        .ok_or(Error::MissingFile)?;

    let mime_type = resolve_upload_mime(upload.content_type.as_deref(), &upload.bytes);

    info!(
        mime_type = %mime_type,
        bytes = upload.bytes.len(),
        prompt = %request.prompt,
        n = request.n,
        size = %request.size,
        "incoming_upload"
    );

    let edit = ImageEdit {
        model: state.render_model.to_string(),
        image: upload.bytes,
        file_name: prompts::UPLOAD_FILE_NAME.to_string(),
        mime_type,
        prompt: request.prompt,
        n: request.n,
        size: request.size,
    };

    let mut images = state.ai.edit_image(edit).await?;
    images.truncate(usize::from(request.n));

    Ok(RenderResponse { images })
}
