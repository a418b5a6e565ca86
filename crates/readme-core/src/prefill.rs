//! Mapping of fetched repository metadata onto wizard fields.

use crate::catalog::SuggestionCatalog;
use crate::detect::{DetectionInput, Detector};
use crate::github::{RepoAnalysis, RepoRef};
use crate::types::DataRecord;
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use serde::Serialize;

pub const CONTRIBUTING_POINTER: &str =
    "Contributions are welcome! Please see the CONTRIBUTING.md file for guidelines.";

// ---------------------------------------------------------------------------
// RepoContext
// ---------------------------------------------------------------------------

/// Repository identity used to personalise canned setup instructions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoContext {
    pub owner: String,
    pub repo: String,
}

impl RepoContext {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Replace the clone placeholder with the real clone command and the
    /// project-name placeholder with the repository name.
    pub fn personalize_setup(&self, setup: &str) -> String {
        let clone = format!(
            "`git clone https://github.com/{}/{}.git`",
            self.owner, self.repo
        );
        setup
            .replacen("`git clone ...`", &clone, 1)
            .replacen("<project-name>", &self.repo, 1)
    }
}

impl From<&RepoRef> for RepoContext {
    fn from(r: &RepoRef) -> Self {
        Self::new(&r.owner, &r.repo)
    }
}

// ---------------------------------------------------------------------------
// Prefill
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct Prefill {
    /// Detected category label, if any rule matched.
    pub category: Option<String>,
    pub fields: DataRecord,
    pub context: Option<RepoContext>,
}

impl Prefill {
    pub fn from_analysis(analysis: &RepoAnalysis, catalog: &SuggestionCatalog) -> Self {
        let summary = &analysis.summary;
        let category = Detector::default()
            .classify(&DetectionInput::from_analysis(analysis))
            .map(str::to_string);

        let mut fields = DataRecord::new();
        if !analysis.languages.is_empty() {
            fields.set("techStack", analysis.languages.join(", "));
        }
        fields.set("projectTitle", title_case(&summary.name));
        fields.set("githubUsername", summary.owner.login.as_str());
        if let Some(homepage) = summary.homepage.as_deref().filter(|h| !h.trim().is_empty()) {
            fields.set("liveDemoUrl", homepage);
        }

        let readme = analysis.readme.as_deref();
        let description = summary
            .description
            .clone()
            .filter(|d| !d.trim().is_empty())
            .or_else(|| readme.and_then(first_paragraph));
        if let Some(description) = description {
            fields.set("projectDescription", description);
        }
        if let Some(usage) = readme.and_then(usage_section) {
            fields.set("usage", usage);
        }

        if let Some(license) = summary
            .license
            .as_ref()
            .and_then(|l| l.spdx_id.as_deref())
            .and_then(license_option)
        {
            fields.set("license", license);
        }

        let has_contributing = analysis
            .files
            .iter()
            .any(|f| f.eq_ignore_ascii_case("contributing.md"));
        if has_contributing {
            fields.set("contributing", CONTRIBUTING_POINTER);
        } else {
            fields.set("contributing", catalog.default_contributing());
        }

        Self {
            category,
            fields,
            context: Some(RepoContext::from(&analysis.repo)),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `my-cool_repo` → `My Cool Repo`.
pub fn title_case(name: &str) -> String {
    name.split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// License select option for an SPDX identifier.
pub fn license_option(spdx: &str) -> Option<&'static str> {
    match spdx.to_ascii_uppercase().as_str() {
        "MIT" => Some("MIT"),
        "GPL-3.0" | "GPL-3.0-ONLY" | "GPL-3.0-OR-LATER" => Some("GPLv3"),
        "APACHE-2.0" => Some("Apache 2.0"),
        "UNLICENSE" => Some("Unlicensed"),
        _ => None,
    }
}

/// First prose paragraph of a README. Headings, badge-only paragraphs and
/// HTML blocks are skipped.
pub fn first_paragraph(readme: &str) -> Option<String> {
    let mut text = String::new();
    let mut in_paragraph = false;
    let mut image_depth = 0usize;

    for event in Parser::new(readme) {
        match event {
            Event::Start(Tag::Paragraph) => {
                in_paragraph = true;
                text.clear();
            }
            Event::End(TagEnd::Paragraph) => {
                in_paragraph = false;
                let joined = text.split_whitespace().collect::<Vec<_>>().join(" ");
                if !joined.is_empty() {
                    return Some(joined);
                }
            }
            Event::Start(Tag::Image { .. }) => image_depth += 1,
            Event::End(TagEnd::Image) => image_depth = image_depth.saturating_sub(1),
            Event::Text(t) if in_paragraph && image_depth == 0 => text.push_str(&t),
            Event::Code(code) if in_paragraph && image_depth == 0 => {
                text.push('`');
                text.push_str(&code);
                text.push('`');
            }
            Event::SoftBreak | Event::HardBreak if in_paragraph => text.push(' '),
            _ => {}
        }
    }
    None
}

/// Body of the first `## Usage` section, up to the next heading of level two
/// or above. Code blocks are kept verbatim, whatever they contain.
pub fn usage_section(readme: &str) -> Option<String> {
    let mut heading: Option<String> = None;
    let mut start = None;
    let mut end = readme.len();

    for (event, range) in Parser::new(readme).into_offset_iter() {
        match event {
            Event::Start(Tag::Heading { level, .. }) if is_top_heading(level) => {
                if start.is_some() {
                    end = range.start;
                    break;
                }
                if level == HeadingLevel::H2 {
                    heading = Some(String::new());
                }
            }
            Event::Text(t) | Event::Code(t) => {
                if let Some(title) = heading.as_mut() {
                    title.push_str(&t);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(title) = heading.take() {
                    if is_usage_title(&title) {
                        start = Some(range.end);
                    }
                }
            }
            _ => {}
        }
    }

    let text = readme.get(start?..end)?.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn is_top_heading(level: HeadingLevel) -> bool {
    matches!(level, HeadingLevel::H1 | HeadingLevel::H2)
}

fn is_usage_title(title: &str) -> bool {
    title
        .trim()
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
        .starts_with("usage")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{RepoLicense, RepoOwner, RepoSummary};

    fn analysis() -> RepoAnalysis {
        RepoAnalysis {
            repo: RepoRef::new("octo", "hello-world_app"),
            summary: RepoSummary {
                name: "hello-world_app".to_string(),
                description: None,
                homepage: Some("https://hello.dev".to_string()),
                html_url: String::new(),
                owner: RepoOwner {
                    login: "octo".to_string(),
                },
                license: Some(RepoLicense {
                    spdx_id: Some("Apache-2.0".to_string()),
                }),
            },
            languages: vec!["Rust".to_string(), "Shell".to_string()],
            files: vec!["Cargo.toml".to_string(), "CONTRIBUTING.md".to_string()],
            package_json: None,
            readme: Some(
                "# Hello\n\n[![ci](x)](y)\n\nSays hello\nto everyone.\n\n## Usage\n\n```sh\n# greet\nhello\n```\n\n## License\nMIT\n"
                    .to_string(),
            ),
        }
    }

    #[test]
    fn maps_repository_metadata_onto_fields() {
        let catalog = SuggestionCatalog::builtin().unwrap();
        let prefill = Prefill::from_analysis(&analysis(), &catalog);
        let f = &prefill.fields;
        assert_eq!(prefill.category.as_deref(), Some("CLI Tool"));
        assert_eq!(f.text("projectTitle"), "Hello World App");
        assert_eq!(f.text("techStack"), "Rust, Shell");
        assert_eq!(f.text("githubUsername"), "octo");
        assert_eq!(f.text("liveDemoUrl"), "https://hello.dev");
        assert_eq!(f.text("license"), "Apache 2.0");
        assert_eq!(f.text("projectDescription"), "Says hello to everyone.");
        assert_eq!(f.text("usage"), "```sh\n# greet\nhello\n```");
        assert_eq!(f.text("contributing"), CONTRIBUTING_POINTER);
        assert_eq!(prefill.context, Some(RepoContext::new("octo", "hello-world_app")));
    }

    #[test]
    fn default_contributing_without_guide() {
        let catalog = SuggestionCatalog::builtin().unwrap();
        let mut a = analysis();
        a.files.clear();
        a.summary.description = Some("Given description".to_string());
        let prefill = Prefill::from_analysis(&a, &catalog);
        assert_eq!(prefill.fields.text("contributing"), catalog.default_contributing());
        assert_eq!(prefill.fields.text("projectDescription"), "Given description");
    }

    #[test]
    fn title_case_splits_on_separators() {
        assert_eq!(title_case("readme-wizard"), "Readme Wizard");
        assert_eq!(title_case("__x__y"), "X Y");
    }

    #[test]
    fn spdx_ids_map_to_options() {
        assert_eq!(license_option("MIT"), Some("MIT"));
        assert_eq!(license_option("GPL-3.0"), Some("GPLv3"));
        assert_eq!(license_option("Unlicense"), Some("Unlicensed"));
        assert_eq!(license_option("BSD-3-Clause"), None);
    }

    #[test]
    fn setup_is_personalized_once() {
        let ctx = RepoContext::new("o", "r");
        let out = ctx.personalize_setup("1. `git clone ...`\n2. `cd <project-name>`");
        assert_eq!(out, "1. `git clone https://github.com/o/r.git`\n2. `cd r`");
    }

    #[test]
    fn setext_heading_is_not_the_description() {
        let readme = "My Project\n==========\n\nReal description here.\n";
        assert_eq!(first_paragraph(readme).as_deref(), Some("Real description here."));
    }

    #[test]
    fn badges_and_html_are_skipped() {
        let readme = "<p align=\"center\"><img src=\"logo.png\"></p>\n\n\
            [![build](b.svg)](ci) ![cov](c.svg)\n\nUses `serde` under the hood.\n";
        assert_eq!(
            first_paragraph(readme).as_deref(),
            Some("Uses `serde` under the hood.")
        );
    }

    #[test]
    fn tilde_fences_stay_inside_usage() {
        let readme = "# T\n\n## Usage\n\n~~~\n## not a heading\nrun it\n~~~\n\n## License\nMIT\n";
        assert_eq!(
            usage_section(readme).as_deref(),
            Some("~~~\n## not a heading\nrun it\n~~~")
        );
    }

    #[test]
    fn setext_heading_ends_usage() {
        let readme = "## Usage\n\nRun `hello`.\n\nLicense\n-------\n\nMIT\n";
        assert_eq!(usage_section(readme).as_deref(), Some("Run `hello`."));
    }

    #[test]
    fn usage_keeps_subsections() {
        let readme = "## 🚀 Usage\n\n### Basic\n\nhello\n\n# Next\n";
        assert_eq!(usage_section(readme).as_deref(), Some("### Basic\n\nhello"));
    }

    #[test]
    fn usage_section_absent() {
        assert_eq!(usage_section("# T\n\n## Install\nfoo"), None);
        assert_eq!(first_paragraph("# Only a heading"), None);
    }
}
