use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use readme_core::ReadmeError;

/// Carries an explicit 404 through the `anyhow::Error` chain for lookups
/// that are not core errors (an unknown suggestion category).
#[derive(Debug)]
struct NotFoundError(String);

impl std::fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for NotFoundError {}

// ---------------------------------------------------------------------------
// AppError: unified error type for HTTP responses
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self(NotFoundError(msg.into()).into())
    }

    pub fn join(err: tokio::task::JoinError) -> Self {
        Self(anyhow::anyhow!("task join error: {err}"))
    }
}

fn status_for(err: &ReadmeError) -> StatusCode {
    match err {
        ReadmeError::UnknownField(_)
        | ReadmeError::StepOutOfRange { .. }
        | ReadmeError::FieldType { .. }
        | ReadmeError::InvalidTone(_)
        | ReadmeError::InvalidRepoUrl(_) => StatusCode::BAD_REQUEST,
        ReadmeError::RepoNotFound(_) => StatusCode::NOT_FOUND,
        ReadmeError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        ReadmeError::RemoteStatus(_) | ReadmeError::Http(_) => StatusCode::BAD_GATEWAY,
        ReadmeError::TemplateNotFound(_)
        | ReadmeError::Catalog(_)
        | ReadmeError::UnsupportedSnapshot { .. }
        | ReadmeError::Decode { .. }
        | ReadmeError::Io(_)
        | ReadmeError::Yaml(_)
        | ReadmeError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(n) = self.0.downcast_ref::<NotFoundError>() {
            let body = serde_json::json!({ "error": n.0.clone() });
            return (StatusCode::NOT_FOUND, axum::Json(body)).into_response();
        }

        let (status, message) = match self.0.downcast_ref::<ReadmeError>() {
            Some(e) => (status_for(e), e.user_message()),
            None => (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string()),
        };
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
