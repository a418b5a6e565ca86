use crate::assets;
use crate::error::{ReadmeError, Result};
use crate::types::Tone;
use std::path::{Path, PathBuf};

/// One Markdown template per tone. Files in the override directory shadow the
/// bundled templates of the same name.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    override_dir: Option<PathBuf>,
}

/// Outcome of picking a template for a requested tone.
#[derive(Debug, Clone)]
pub struct TemplateChoice {
    pub tone: Tone,
    /// `None` when neither the requested nor the default template could be
    /// loaded.
    pub text: Option<String>,
    pub notice: Option<String>,
}

impl TemplateSet {
    pub fn embedded() -> Self {
        Self::default()
    }

    pub fn with_override_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            override_dir: Some(dir.into()),
        }
    }

    pub fn override_dir(&self) -> Option<&Path> {
        self.override_dir.as_deref()
    }

    pub fn load(&self, tone: Tone) -> Result<String> {
        if let Some(dir) = &self.override_dir {
            let path = dir.join(format!("{}.md", tone.as_str()));
            if path.is_file() {
                return Ok(std::fs::read_to_string(path)?);
            }
        }
        assets::asset_text(&assets::template_asset(tone.as_str()))
            .ok_or_else(|| ReadmeError::TemplateNotFound(tone.as_str().to_string()))
    }

    /// Resolve `requested` (a tone label or stem) to a loaded template.
    /// Blank selects `fallback` silently; an unknown name or a template that
    /// fails to load falls back with a notice.
    pub fn select(&self, requested: &str, fallback: Tone) -> TemplateChoice {
        let mut notice = None;
        let tone = if requested.trim().is_empty() {
            fallback
        } else {
            match requested.parse::<Tone>() {
                Ok(tone) => tone,
                Err(_) => {
                    tracing::warn!(tone = requested, "unknown tone, using {}", fallback.label());
                    notice = Some(format!(
                        "Unknown tone '{requested}'; using the {} template.",
                        fallback.label()
                    ));
                    fallback
                }
            }
        };

        let text = match self.load(tone) {
            Ok(text) => text,
            Err(e) => return self.recover(tone, fallback, e),
        };
        TemplateChoice {
            tone,
            text: Some(text),
            notice,
        }
    }

    /// After `failed` would not load: try `fallback`, then the built-in
    /// default tone.
    fn recover(&self, failed: Tone, fallback: Tone, error: ReadmeError) -> TemplateChoice {
        tracing::warn!(tone = %failed, error = %error, "template load failed");
        let mut candidates = vec![fallback, Tone::default()];
        candidates.retain(|t| *t != failed);
        candidates.dedup();

        for candidate in candidates {
            match self.load(candidate) {
                Ok(text) => {
                    return TemplateChoice {
                        tone: candidate,
                        text: Some(text),
                        notice: Some(format!(
                            "Could not load the {} template; using {} instead.",
                            failed.label(),
                            candidate.label()
                        )),
                    }
                }
                Err(e) => tracing::warn!(tone = %candidate, error = %e, "template load failed"),
            }
        }
        TemplateChoice {
            tone: failed,
            text: None,
            notice: Some("Could not load any README template.".to_string()),
        }
    }
}
