use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Shared application state passed to all route handlers.
///
/// Every request rebuilds the controller from the snapshot file, so the
/// lock serializes read-modify-write cycles across concurrent requests.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub write_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            write_lock: Arc::new(Mutex::new(())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_stores_root() {
        let state = AppState::new(PathBuf::from("/tmp/test"));
        assert_eq!(state.root, PathBuf::from("/tmp/test"));
    }

    #[test]
    fn clones_share_the_lock() {
        let state = AppState::new(PathBuf::from("/tmp/test"));
        let other = state.clone();
        assert!(Arc::ptr_eq(&state.write_lock, &other.write_lock));
    }
}
