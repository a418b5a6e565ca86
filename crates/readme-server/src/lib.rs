pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post, put};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve_on()` and available for integration testing.
pub fn build_router(root: PathBuf) -> Router {
    let app_state = state::AppState::new(root);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Form
        .route("/api/schema", get(routes::wizard::get_schema))
        .route("/api/state", get(routes::wizard::get_state))
        .route("/api/steps/{index}", get(routes::wizard::get_step))
        .route("/api/advance", post(routes::wizard::advance))
        .route("/api/retreat", post(routes::wizard::retreat))
        .route("/api/restart", post(routes::wizard::restart))
        .route("/api/reset", post(routes::wizard::reset))
        // Fields and suggestions
        .route("/api/fields/{id}", put(routes::fields::set_field))
        .route("/api/suggestions", post(routes::fields::apply_suggestions))
        .route("/api/categories", get(routes::fields::list_categories))
        // Repository prefill
        .route("/api/analyze", post(routes::analyze::analyze_repo))
        // Output
        .route("/api/readme", get(routes::readme::get_readme))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Serve the wizard API on a pre-bound listener.
///
/// The caller binds the listener so it can read the actual port first
/// (useful when `port = 0` and the OS picks a free port).
pub async fn serve_on(
    root: PathBuf,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(root);

    tracing::info!("readme-wizard API listening on http://localhost:{actual_port}");

    if open_browser {
        let url = format!("http://localhost:{actual_port}/api/state");
        let _ = open::that(&url);
    }

    axum::serve(listener, app).await?;
    Ok(())
}
