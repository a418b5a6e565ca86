use axum::extract::State;
use axum::Json;
use readme_core::workspace::{AnalyzeReport, Workspace};
use serde::Deserialize;

use super::with_controller;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AnalyzeBody {
    url: String,
    #[serde(default)]
    confirmed: bool,
}

/// POST /api/analyze: fetch a public GitHub repository and pre-fill the
/// wizard from it. Switches the wizard into repository mode.
///
/// The fetch runs outside the write lock; only applying the result takes it.
/// Values land on whatever the record holds by then.
pub async fn analyze_repo(
    State(app): State<AppState>,
    Json(body): Json<AnalyzeBody>,
) -> Result<Json<AnalyzeReport>, AppError> {
    let root = app.root.clone();
    let url = body.url;
    let analysis = tokio::task::spawn_blocking(move || Workspace::open(&root)?.fetch(&url))
        .await
        .map_err(AppError::join)??;

    let confirmed = body.confirmed;
    let report = with_controller(&app, move |_, controller| {
        Ok(Workspace::apply_analysis(controller, analysis, confirmed))
    })
    .await?;
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;
    use tempfile::TempDir;

    #[tokio::test]
    async fn malformed_url_is_rejected_before_any_request() {
        let dir = TempDir::new().unwrap();
        let app = AppState::new(dir.path().to_path_buf());
        let body = AnalyzeBody {
            url: "not a repository".into(),
            confirmed: false,
        };
        let err = analyze_repo(State(app), Json(body)).await.unwrap_err();
        assert_eq!(
            err.into_response().status(),
            axum::http::StatusCode::BAD_REQUEST
        );
    }
}
