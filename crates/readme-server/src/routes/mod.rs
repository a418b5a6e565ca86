pub mod analyze;
pub mod fields;
pub mod readme;
pub mod wizard;

use crate::error::AppError;
use crate::state::AppState;
use readme_core::controller::FormController;
use readme_core::workspace::Workspace;

/// Run `op` against a freshly restored controller on the blocking pool.
///
/// The write lock is held for the whole load-mutate-save cycle.
pub(crate) async fn with_controller<T, F>(app: &AppState, op: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&Workspace, &mut FormController) -> readme_core::Result<T> + Send + 'static,
{
    let root = app.root.clone();
    let lock = app.write_lock.clone();
    let result = tokio::task::spawn_blocking(move || {
        let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let ws = Workspace::open(&root)?;
        let mut controller = ws.controller()?;
        op(&ws, &mut controller)
    })
    .await
    .map_err(AppError::join)??;

    Ok(result)
}
