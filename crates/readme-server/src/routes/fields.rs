use axum::extract::{Path, State};
use axum::Json;
use readme_core::controller::SuggestionOutcome;
use readme_core::types::FieldValue;
use serde::Deserialize;
use serde_json::json;

use super::with_controller;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SetFieldBody {
    value: FieldValue,
}

/// PUT /api/fields/{id}: store a string, or a boolean for toggles.
///
/// Setting `projectType` also reports the suggestion outcome for the chosen
/// category; existing content is never overwritten here.
pub async fn set_field(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<SetFieldBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let result = with_controller(&app, move |_, controller| {
        let suggestions = controller.set_field(&id, body.value)?;
        let value = controller.record().get(&id).cloned();
        Ok(json!({
            "id": id,
            "value": value,
            "suggestions": suggestions,
        }))
    })
    .await?;
    Ok(Json(result))
}

#[derive(Deserialize)]
pub struct SuggestionsBody {
    category: String,
    #[serde(default)]
    confirmed: bool,
}

/// POST /api/suggestions: apply a category's canned values.
///
/// Answers `needs_confirmation` with the conflicting field ids when targets
/// already hold content; resend with `"confirmed": true` to overwrite.
pub async fn apply_suggestions(
    State(app): State<AppState>,
    Json(body): Json<SuggestionsBody>,
) -> Result<Json<SuggestionOutcome>, AppError> {
    let outcome = with_controller(&app, move |_, controller| {
        Ok(controller.apply_category_suggestions(&body.category, body.confirmed))
    })
    .await?;
    if let SuggestionOutcome::UnknownCategory { category } = &outcome {
        return Err(AppError::not_found(format!("unknown category: {category}")));
    }
    Ok(Json(outcome))
}

/// GET /api/categories: catalog labels in display order.
pub async fn list_categories(
    State(app): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    let labels = with_controller(&app, |_, controller| {
        Ok(controller.catalog().labels().map(str::to_string).collect())
    })
    .await?;
    Ok(Json(labels))
}
