use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReadmeError {
    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("step {index} is out of range (wizard has {total} steps)")]
    StepOutOfRange { index: usize, total: usize },

    #[error("field '{field}' expects {expected}")]
    FieldType { field: String, expected: String },

    #[error("invalid tone: {0}")]
    InvalidTone(String),

    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("suggestion catalog is malformed: {0}")]
    Catalog(String),

    #[error("snapshot version {found} is newer than supported version {supported}")]
    UnsupportedSnapshot { found: u32, supported: u32 },

    #[error("invalid GitHub repository URL: {0}")]
    InvalidRepoUrl(String),

    #[error("repository not found: {0}")]
    RepoNotFound(String),

    #[error("GitHub API rate limit exceeded")]
    RateLimited,

    #[error("GitHub API returned status {0}")]
    RemoteStatus(u16),

    #[error("could not decode {what}: {reason}")]
    Decode { what: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl ReadmeError {
    /// Short, human-readable message for status lines in the CLI and API.
    pub fn user_message(&self) -> String {
        match self {
            ReadmeError::RepoNotFound(_) => {
                "Repository not found. Check the URL and ensure it's public.".to_string()
            }
            ReadmeError::RateLimited => {
                "API rate limit exceeded. Please wait and try again later.".to_string()
            }
            ReadmeError::InvalidRepoUrl(_) => "Invalid GitHub repository URL.".to_string(),
            ReadmeError::RemoteStatus(code) => {
                format!("Failed to fetch repository data (Status: {code}).")
            }
            other => format!("An error occurred: {other}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReadmeError>;
