pub mod analyze;
pub mod config;
pub mod field;
pub mod generate;
pub mod init;
pub mod nav;
pub mod status;
pub mod ui;
pub mod wizard;

use anyhow::Context;
use readme_core::controller::FormController;
use readme_core::workspace::Workspace;
use std::path::Path;

/// Open the workspace at `root` and restore its saved progress.
pub fn open(root: &Path) -> anyhow::Result<(Workspace, FormController)> {
    let ws = Workspace::open(root).context("failed to load config")?;
    let controller = ws.controller().context("failed to load wizard")?;
    Ok((ws, controller))
}
