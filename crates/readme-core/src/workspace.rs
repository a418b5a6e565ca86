//! Project-rooted entry point shared by the CLI and the HTTP server.

use crate::catalog::SuggestionCatalog;
use crate::config::Config;
use crate::controller::{FormController, PrefillReport};
use crate::error::Result;
use crate::github::{GithubClient, RepoAnalysis, RepoRef};
use crate::io;
use crate::paths;
use crate::prefill::Prefill;
use crate::snapshot::FileStore;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    config: Config,
}

/// Result of pre-filling the wizard from a repository.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeReport {
    pub repo: RepoRef,
    pub languages: Vec<String>,
    #[serde(flatten)]
    pub prefill: PrefillReport,
}

impl Workspace {
    /// Open the project at `root`, loading its config (or defaults).
    pub fn open(root: &Path) -> Result<Self> {
        Ok(Self {
            root: root.to_path_buf(),
            config: Config::load(root)?,
        })
    }

    /// Create `.readme-wizard/` with a default config. Returns false when a
    /// config already existed.
    pub fn init(root: &Path) -> Result<bool> {
        io::ensure_dir(&paths::state_dir(root))?;
        let data = serde_yaml::to_string(&Config::default())?;
        io::write_if_missing(&paths::config_path(root), data.as_bytes())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// A controller backed by the project's snapshot file, with any saved
    /// progress restored.
    pub fn controller(&self) -> Result<FormController> {
        let catalog = SuggestionCatalog::builtin()?;
        let store = FileStore::new(paths::snapshot_path(&self.root));
        let mut controller = FormController::new(
            catalog,
            self.config.template_set(&self.root),
            Box::new(store),
        )
        .with_default_tone(self.config.default_tone);
        controller.restore();
        Ok(controller)
    }

    pub fn github(&self) -> Result<GithubClient> {
        GithubClient::from_config(&self.config.github)
    }

    pub fn fetch(&self, input: &str) -> Result<RepoAnalysis> {
        let repo = RepoRef::parse(input)?;
        self.github()?.analyze(&repo)
    }

    /// Fetch `input` and apply the derived values to `controller`.
    pub fn analyze_into(
        &self,
        controller: &mut FormController,
        input: &str,
        overwrite_confirmed: bool,
    ) -> Result<AnalyzeReport> {
        let analysis = self.fetch(input)?;
        Ok(Self::apply_analysis(controller, analysis, overwrite_confirmed))
    }

    /// Apply an already fetched analysis to `controller`.
    pub fn apply_analysis(
        controller: &mut FormController,
        analysis: RepoAnalysis,
        overwrite_confirmed: bool,
    ) -> AnalyzeReport {
        let prefill = Prefill::from_analysis(&analysis, controller.catalog());
        let report = controller.apply_prefill(&prefill, overwrite_confirmed);
        tracing::info!(repo = %analysis.repo.full_name(), category = ?report.category, "repository analyzed");
        AnalyzeReport {
            repo: analysis.repo,
            languages: analysis.languages,
            prefill: report,
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.config.output_path(&self.root)
    }
}
