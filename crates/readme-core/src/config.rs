use crate::error::Result;
use crate::paths;
use crate::template::TemplateSet;
use crate::types::Tone;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// GithubConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Name of the environment variable holding an optional API token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            token_env: default_token_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GithubConfig {
    /// Token from the configured environment variable, if set and non-empty.
    pub fn token(&self) -> Option<String> {
        std::env::var(&self.token_env)
            .ok()
            .filter(|t| !t.trim().is_empty())
    }
}

// ---------------------------------------------------------------------------
// OutputConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

fn default_file_name() -> String {
    crate::export::README_FILENAME.to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub default_tone: Tone,
    /// Directory of `<tone>.md` overrides, relative to the project root.
    #[serde(default)]
    pub templates_dir: Option<PathBuf>,
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            default_tone: Tone::default(),
            templates_dir: None,
            github: GithubConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Load `.readme-wizard/config.yaml`, or defaults when it does not exist.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// Resolved override directory: the configured one, else
    /// `.readme-wizard/templates` when present.
    pub fn resolved_templates_dir(&self, root: &Path) -> Option<PathBuf> {
        match &self.templates_dir {
            Some(dir) => Some(root.join(dir)),
            None => {
                let conventional = paths::templates_dir(root);
                conventional.is_dir().then_some(conventional)
            }
        }
    }

    pub fn template_set(&self, root: &Path) -> TemplateSet {
        match self.resolved_templates_dir(root) {
            Some(dir) => TemplateSet::with_override_dir(dir),
            None => TemplateSet::embedded(),
        }
    }

    pub fn output_path(&self, root: &Path) -> PathBuf {
        root.join(&self.output.file_name)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self, root: &Path) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if let Some(dir) = &self.templates_dir {
            if !root.join(dir).is_dir() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!(
                        "templates_dir '{}' does not exist; bundled templates will be used",
                        dir.display()
                    ),
                });
            }
        }

        let base = self.github.api_base.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("github.api_base '{base}' is not an http(s) URL"),
            });
        }

        if self.github.timeout_secs == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "github.timeout_secs is 0; requests will fail immediately".to_string(),
            });
        }

        if self.output.file_name.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "output.file_name is empty".to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = Config::load(dir.path()).unwrap();
        assert_eq!(cfg.default_tone, Tone::Professional);
        assert_eq!(cfg.github.api_base, "https://api.github.com");
        assert_eq!(cfg.github.timeout_secs, 15);
        assert_eq!(cfg.output.file_name, "README.md");
    }

    #[test]
    fn config_roundtrip() {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::default();
        cfg.default_tone = Tone::Friendly;
        cfg.github.timeout_secs = 5;
        cfg.save(dir.path()).unwrap();

        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.default_tone, Tone::Friendly);
        assert_eq!(loaded.github.timeout_secs, 5);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let dir = TempDir::new().unwrap();
        crate::io::atomic_write(
            &paths::config_path(dir.path()),
            b"default_tone: concise\ngithub:\n  token_env: MY_TOKEN\n",
        )
        .unwrap();
        let cfg = Config::load(dir.path()).unwrap();
        assert_eq!(cfg.default_tone, Tone::Concise);
        assert_eq!(cfg.github.token_env, "MY_TOKEN");
        assert_eq!(cfg.github.api_base, "https://api.github.com");
    }

    #[test]
    fn validate_default_config_no_warnings() {
        let dir = TempDir::new().unwrap();
        assert!(Config::default().validate(dir.path()).is_empty());
    }

    #[test]
    fn validate_flags_bad_values() {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::default();
        cfg.templates_dir = Some(PathBuf::from("nope"));
        cfg.github.api_base = "ftp://example.com".to_string();
        cfg.github.timeout_secs = 0;
        cfg.output.file_name = " ".to_string();

        let warnings = cfg.validate(dir.path());
        assert_eq!(warnings.len(), 4);
        assert!(warnings
            .iter()
            .any(|w| w.level == WarnLevel::Error && w.message.contains("api_base")));
        assert!(warnings.iter().any(|w| w.message.contains("templates_dir 'nope'")));
    }

    #[test]
    fn conventional_templates_dir_is_picked_up() {
        let dir = TempDir::new().unwrap();
        let cfg = Config::default();
        assert!(cfg.resolved_templates_dir(dir.path()).is_none());

        std::fs::create_dir_all(paths::templates_dir(dir.path())).unwrap();
        assert_eq!(
            cfg.resolved_templates_dir(dir.path()),
            Some(paths::templates_dir(dir.path()))
        );
    }
}
