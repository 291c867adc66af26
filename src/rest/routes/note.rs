// rest/routes/note.rs — Scratch note REST routes.
//
// The note is a singleton: one row, created at startup, only ever replaced.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::error;

use crate::storage::NoteRow;
use crate::AppContext;

type ApiError = (StatusCode, Json<Value>);

fn db_error(op: &str, e: impl std::fmt::Display) -> ApiError {
    error!("{op} failed: {e}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Database error" })),
    )
}

pub async fn get_note(State(ctx): State<Arc<AppContext>>) -> Result<Json<NoteRow>, ApiError> {
    let note = ctx
        .storage
        .get_note()
        .await
        .map_err(|e| db_error("get note", e))?;
    Ok(Json(note))
}

#[derive(Deserialize)]
pub struct ReplaceNoteRequest {
    /// Full replacement content; empty text is allowed.
    pub content: String,
}

pub async fn replace_note(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<ReplaceNoteRequest>,
) -> Result<Json<NoteRow>, ApiError> {
    let note = ctx
        .storage
        .replace_note(&body.content)
        .await
        .map_err(|e| db_error("replace note", e))?;
    Ok(Json(note))
}
