use axum::extract::{Path, State};
use axum::Json;
use readme_core::controller::{FormController, WizardState};
use serde::Deserialize;
use serde_json::json;

use super::with_controller;
use crate::error::AppError;
use crate::state::AppState;

fn state_json(controller: &FormController) -> readme_core::Result<serde_json::Value> {
    let step = controller.build_step(controller.current_step())?;
    Ok(json!({
        "status": controller.status(),
        "data": controller.record(),
        "step": step,
    }))
}

/// GET /api/schema: every step and field definition, without values.
pub async fn get_schema(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let result = with_controller(&app, |_, controller| {
        Ok(serde_json::to_value(controller.schema())?)
    })
    .await?;
    Ok(Json(result))
}

/// GET /api/state: status, the full record and the current step view.
pub async fn get_state(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let result = with_controller(&app, |_, controller| state_json(controller)).await?;
    Ok(Json(result))
}

/// GET /api/steps/{index}
pub async fn get_step(
    State(app): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = with_controller(&app, move |_, controller| {
        Ok(serde_json::to_value(controller.build_step(index)?)?)
    })
    .await?;
    Ok(Json(result))
}

/// POST /api/advance: validate the current step and move on. Leaving the
/// last step returns the generated document.
pub async fn advance(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let result = with_controller(&app, |_, controller| {
        let validation = controller.validate_step(controller.current_step())?;
        let advanced = controller.advance();
        let finished = controller.state() == WizardState::Result;
        let mut body = state_json(controller)?;
        body["advanced"] = json!(advanced);
        body["validation"] = serde_json::to_value(&validation)?;
        if finished {
            body["output"] = serde_json::to_value(controller.output())?;
        }
        Ok(body)
    })
    .await?;
    Ok(Json(result))
}

/// POST /api/retreat
pub async fn retreat(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let result = with_controller(&app, |_, controller| {
        controller.retreat();
        state_json(controller)
    })
    .await?;
    Ok(Json(result))
}

/// POST /api/restart: leave the finished state for the first step.
pub async fn restart(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let result = with_controller(&app, |_, controller| {
        let restarted = controller.restart();
        let mut body = state_json(controller)?;
        body["restarted"] = json!(restarted);
        Ok(body)
    })
    .await?;
    Ok(Json(result))
}

#[derive(Deserialize, Default)]
pub struct ResetBody {
    #[serde(default)]
    confirmed: bool,
}

/// POST /api/reset: discard all progress. Requires `{"confirmed": true}`.
pub async fn reset(
    State(app): State<AppState>,
    Json(body): Json<ResetBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let confirmed = body.confirmed;
    let result = with_controller(&app, move |_, controller| {
        let reset = controller.reset(confirmed)?;
        let mut body = state_json(controller)?;
        body["reset"] = json!(reset);
        Ok(body)
    })
    .await?;
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn state_starts_on_first_step() {
        let dir = TempDir::new().unwrap();
        let app = AppState::new(dir.path().to_path_buf());
        let Json(body) = get_state(State(app)).await.unwrap();
        assert_eq!(body["status"]["step_index"], 0);
        assert_eq!(body["step"]["title"], "Project Basics");
    }

    #[tokio::test]
    async fn advance_on_empty_first_step_is_blocked() {
        let dir = TempDir::new().unwrap();
        let app = AppState::new(dir.path().to_path_buf());
        let Json(body) = advance(State(app)).await.unwrap();
        assert_eq!(body["advanced"], false);
        let invalid = body["validation"]["invalid_field_ids"].as_array().unwrap();
        assert!(invalid.iter().any(|v| v == "projectTitle"));
        assert!(body.get("output").is_none());
    }

    #[tokio::test]
    async fn reset_without_confirmation_keeps_progress() {
        let dir = TempDir::new().unwrap();
        let app = AppState::new(dir.path().to_path_buf());
        let Json(body) = reset(State(app), Json(ResetBody::default())).await.unwrap();
        assert_eq!(body["reset"], false);
    }
}
