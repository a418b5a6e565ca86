use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use readme_core::export::{self, MARKDOWN_MIME, README_FILENAME};

use super::with_controller;
use crate::error::AppError;
use crate::state::AppState;

/// GET /api/readme: the merged document as a Markdown download.
pub async fn get_readme(State(app): State<AppState>) -> Result<Response, AppError> {
    let (generated, file_name) = with_controller(&app, |ws, controller| {
        let file_name = ws
            .output_path()
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(README_FILENAME)
            .to_string();
        Ok((controller.generate(), file_name))
    })
    .await?;

    if let Some(notice) = &generated.notice {
        tracing::warn!(notice = %notice, "template fallback");
    }

    let headers = [
        (header::CONTENT_TYPE, format!("{MARKDOWN_MIME}; charset=utf-8")),
        (
            header::CONTENT_DISPOSITION,
            export::content_disposition(&file_name),
        ),
    ];
    Ok((headers, generated.text).into_response())
}
