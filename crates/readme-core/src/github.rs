//! GitHub REST client used to pre-fill the wizard from a public repository.

use crate::config::GithubConfig;
use crate::error::{ReadmeError, Result};
use base64::Engine;
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;
use std::time::Duration;

pub const USER_AGENT: &str = concat!("readme-wizard/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// RepoRef
// ---------------------------------------------------------------------------

static URL_RE: OnceLock<Regex> = OnceLock::new();
static SHORT_RE: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Accepts `https://github.com/<owner>/<repo>` (optionally ending in `/`
    /// or `.git`) and the `<owner>/<repo>` shorthand.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let url_re = URL_RE.get_or_init(|| {
            Regex::new(r"^https?://(?:www\.)?github\.com/([A-Za-z0-9._-]+)/([A-Za-z0-9._-]+?)(?:\.git)?/?$")
                .unwrap()
        });
        let short_re =
            SHORT_RE.get_or_init(|| Regex::new(r"^([A-Za-z0-9_-][A-Za-z0-9._-]*)/([A-Za-z0-9._-]+)$").unwrap());

        let caps = url_re
            .captures(input)
            .or_else(|| short_re.captures(input))
            .ok_or_else(|| ReadmeError::InvalidRepoUrl(input.to_string()))?;
        Ok(Self::new(&caps[1], &caps[2]))
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    pub fn clone_url(&self) -> String {
        format!("https://github.com/{}/{}.git", self.owner, self.repo)
    }
}

// ---------------------------------------------------------------------------
// API payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepoSummary {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub html_url: String,
    pub owner: RepoOwner,
    #[serde(default)]
    pub license: Option<RepoLicense>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepoOwner {
    pub login: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepoLicense {
    #[serde(default)]
    pub spdx_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ContentEntry {
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct FileContent {
    #[serde(default)]
    content: String,
}

/// Everything fetched about one repository.
#[derive(Debug, Clone, Serialize)]
pub struct RepoAnalysis {
    pub repo: RepoRef,
    pub summary: RepoSummary,
    /// Language names ordered by byte count, largest first.
    pub languages: Vec<String>,
    /// Names of the entries in the repository root.
    pub files: Vec<String>,
    pub package_json: Option<serde_json::Value>,
    pub readme: Option<String>,
}

impl RepoAnalysis {
    pub fn has_file(&self, name: &str) -> bool {
        self.files.iter().any(|f| f == name)
    }

    pub fn has_file_ending(&self, suffix: &str) -> bool {
        self.files.iter().any(|f| f.ends_with(suffix))
    }
}

// ---------------------------------------------------------------------------
// GithubClient
// ---------------------------------------------------------------------------

pub struct GithubClient {
    http: Client,
    api_base: String,
}

impl GithubClient {
    pub fn new(api_base: &str, token: Option<&str>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        if let Some(token) = token {
            match HeaderValue::from_str(&format!("Bearer {token}")) {
                Ok(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => tracing::warn!("ignoring GitHub token with invalid characters"),
            }
        }
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .default_headers(headers)
            .build()?;
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(cfg: &GithubConfig) -> Result<Self> {
        let token = cfg.token();
        Self::new(
            &cfg.api_base,
            token.as_deref(),
            Duration::from_secs(cfg.timeout_secs),
        )
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, repo: &RepoRef) -> Result<T> {
        let url = format!("{}{}", self.api_base, path);
        tracing::debug!(%url, "github request");
        let resp = self.http.get(&url).send()?;
        match resp.status() {
            s if s.is_success() => Ok(resp.json()?),
            StatusCode::NOT_FOUND => Err(ReadmeError::RepoNotFound(repo.full_name())),
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => Err(ReadmeError::RateLimited),
            s => Err(ReadmeError::RemoteStatus(s.as_u16())),
        }
    }

    fn get_file(&self, path: &str, repo: &RepoRef) -> Result<String> {
        let file: FileContent = self.get_json(path, repo)?;
        decode_content(&file.content)
    }

    /// Fetch summary, languages and root listing concurrently, then the
    /// manifest and README when the listing has them. Only a failed summary
    /// request is an error; the rest degrade to empty.
    pub fn analyze(&self, repo: &RepoRef) -> Result<RepoAnalysis> {
        let base = format!("/repos/{}/{}", repo.owner, repo.repo);

        let (summary, languages, contents) = std::thread::scope(|s| {
            let languages = s.spawn(|| {
                self.get_json::<BTreeMap<String, u64>>(&format!("{base}/languages"), repo)
            });
            let contents =
                s.spawn(|| self.get_json::<Vec<ContentEntry>>(&format!("{base}/contents/"), repo));
            let summary = self.get_json::<RepoSummary>(&base, repo);
            (
                summary,
                join_auxiliary(languages.join(), "languages"),
                join_auxiliary(contents.join(), "contents"),
            )
        });
        let summary = summary?;

        let languages = sort_languages(languages);
        let files: Vec<String> = contents.into_iter().map(|e| e.name).collect();

        let package_json = if files.iter().any(|f| f == "package.json") {
            self.get_file(&format!("{base}/contents/package.json"), repo)
                .and_then(|text| Ok(serde_json::from_str::<serde_json::Value>(&text)?))
                .map_err(|e| tracing::warn!(error = %e, "package.json unavailable"))
                .ok()
        } else {
            None
        };

        let readme = if files.iter().any(|f| f.to_ascii_lowercase().starts_with("readme")) {
            self.get_file(&format!("{base}/readme"), repo)
                .map_err(|e| tracing::warn!(error = %e, "README unavailable"))
                .ok()
        } else {
            None
        };

        Ok(RepoAnalysis {
            repo: repo.clone(),
            summary,
            languages,
            files,
            package_json,
            readme,
        })
    }
}

fn join_auxiliary<T: Default>(
    joined: std::thread::Result<Result<T>>,
    what: &str,
) -> T {
    match joined {
        Ok(Ok(value)) => value,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "{what} request failed");
            T::default()
        }
        Err(_) => {
            tracing::warn!("{what} request panicked");
            T::default()
        }
    }
}

fn sort_languages(languages: BTreeMap<String, u64>) -> Vec<String> {
    let mut pairs: Vec<(String, u64)> = languages.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    pairs.into_iter().map(|(name, _)| name).collect()
}

/// Decode a contents-API payload: base64 wrapped at 60 columns.
fn decode_content(content: &str) -> Result<String> {
    let compact: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| ReadmeError::Decode {
            what: "file content".to_string(),
            reason: e.to_string(),
        })?;
    String::from_utf8(bytes).map_err(|e| ReadmeError::Decode {
        what: "file content".to_string(),
        reason: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn encode(text: &str) -> String {
        base64::engine::general_purpose::STANDARD.encode(text)
    }

    fn client(server: &Server) -> GithubClient {
        GithubClient::new(&server.url(), None, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn parse_accepts_urls_and_shorthand() {
        let expected = RepoRef::new("octo", "hello-world");
        assert_eq!(RepoRef::parse("https://github.com/octo/hello-world").unwrap(), expected);
        assert_eq!(RepoRef::parse("https://github.com/octo/hello-world/").unwrap(), expected);
        assert_eq!(RepoRef::parse("https://github.com/octo/hello-world.git").unwrap(), expected);
        assert_eq!(RepoRef::parse(" octo/hello-world ").unwrap(), expected);
        assert_eq!(
            RepoRef::parse("https://github.com/octo/site.github.io").unwrap(),
            RepoRef::new("octo", "site.github.io")
        );
    }

    #[test]
    fn parse_rejects_other_hosts_and_paths() {
        for bad in [
            "https://gitlab.com/octo/repo",
            "https://github.com/octo",
            "https://github.com/octo/repo/tree/main",
            "not a repo",
        ] {
            assert!(
                matches!(RepoRef::parse(bad), Err(ReadmeError::InvalidRepoUrl(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn decode_content_strips_line_breaks() {
        let wrapped = "eyJu\nYW1l\nIjoi\neCJ9\n";
        assert_eq!(decode_content(wrapped).unwrap(), r#"{"name":"x"}"#);
        assert!(decode_content("***").is_err());
    }

    #[test]
    fn analyze_collects_everything() {
        let mut server = Server::new();
        let _summary = server
            .mock("GET", "/repos/octo/hello")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"name":"hello","description":"A demo","homepage":"https://hello.dev",
                    "html_url":"https://github.com/octo/hello","owner":{"login":"octo"},
                    "license":{"spdx_id":"MIT"}}"#,
            )
            .create();
        let _languages = server
            .mock("GET", "/repos/octo/hello/languages")
            .with_status(200)
            .with_body(r#"{"CSS":10,"TypeScript":500,"JavaScript":500}"#)
            .create();
        let _contents = server
            .mock("GET", "/repos/octo/hello/contents/")
            .with_status(200)
            .with_body(r#"[{"name":"package.json","type":"file"},{"name":"README.md","type":"file"}]"#)
            .create();
        let pkg = encode(r#"{"dependencies":{"react":"18.0.0"}}"#);
        let _pkg = server
            .mock("GET", "/repos/octo/hello/contents/package.json")
            .with_status(200)
            .with_body(format!(r#"{{"content":"{pkg}","encoding":"base64"}}"#))
            .create();
        let readme = encode("# Hello\n\nFirst paragraph.\n");
        let _readme = server
            .mock("GET", "/repos/octo/hello/readme")
            .with_status(200)
            .with_body(format!(r#"{{"content":"{readme}","encoding":"base64"}}"#))
            .create();

        let analysis = client(&server).analyze(&RepoRef::new("octo", "hello")).unwrap();
        assert_eq!(analysis.summary.owner.login, "octo");
        assert_eq!(analysis.languages, ["JavaScript", "TypeScript", "CSS"]);
        assert!(analysis.has_file("package.json"));
        assert_eq!(
            analysis.package_json.unwrap()["dependencies"]["react"],
            "18.0.0"
        );
        assert!(analysis.readme.unwrap().contains("First paragraph."));
    }

    #[test]
    fn auxiliary_failures_degrade() {
        let mut server = Server::new();
        let _summary = server
            .mock("GET", "/repos/octo/bare")
            .with_status(200)
            .with_body(r#"{"name":"bare","owner":{"login":"octo"}}"#)
            .create();
        let _languages = server
            .mock("GET", "/repos/octo/bare/languages")
            .with_status(500)
            .create();
        let _contents = server
            .mock("GET", "/repos/octo/bare/contents/")
            .with_status(404)
            .create();

        let analysis = client(&server).analyze(&RepoRef::new("octo", "bare")).unwrap();
        assert!(analysis.languages.is_empty());
        assert!(analysis.files.is_empty());
        assert!(analysis.package_json.is_none());
        assert!(analysis.readme.is_none());
    }

    #[test]
    fn summary_status_maps_to_errors() {
        let mut server = Server::new();
        let _missing = server.mock("GET", "/repos/octo/missing").with_status(404).create();
        let _limited = server.mock("GET", "/repos/octo/limited").with_status(403).create();
        let _broken = server.mock("GET", "/repos/octo/broken").with_status(500).create();
        let gh = client(&server);

        assert!(matches!(
            gh.analyze(&RepoRef::new("octo", "missing")),
            Err(ReadmeError::RepoNotFound(name)) if name == "octo/missing"
        ));
        assert!(matches!(
            gh.analyze(&RepoRef::new("octo", "limited")),
            Err(ReadmeError::RateLimited)
        ));
        assert!(matches!(
            gh.analyze(&RepoRef::new("octo", "broken")),
            Err(ReadmeError::RemoteStatus(500))
        ));
    }
}
