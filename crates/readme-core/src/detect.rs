use crate::github::RepoAnalysis;

// ---------------------------------------------------------------------------
// DetectionInput
// ---------------------------------------------------------------------------

/// Signals a project category is inferred from.
#[derive(Debug, Clone, Default)]
pub struct DetectionInput {
    /// Names of the entries in the repository root.
    pub files: Vec<String>,
    /// Runtime and dev dependency names from `package.json`.
    pub dependencies: Vec<String>,
    pub description: String,
}

impl DetectionInput {
    pub fn from_analysis(analysis: &RepoAnalysis) -> Self {
        let mut dependencies = Vec::new();
        if let Some(pkg) = &analysis.package_json {
            for section in ["dependencies", "devDependencies"] {
                if let Some(map) = pkg.get(section).and_then(|v| v.as_object()) {
                    dependencies.extend(map.keys().cloned());
                }
            }
        }
        Self {
            files: analysis.files.clone(),
            dependencies,
            description: analysis.summary.description.clone().unwrap_or_default(),
        }
    }

    fn has_file(&self, name: &str) -> bool {
        self.files.iter().any(|f| f == name)
    }

    fn has_extension(&self, ext: &str) -> bool {
        self.files.iter().any(|f| f.ends_with(ext))
    }

    fn depends_on(&self, name: &str) -> bool {
        self.dependencies.iter().any(|d| d == name)
    }

    /// Whether the description contains any of `phrases` as whole words,
    /// ignoring case.
    fn mentions_any(&self, phrases: &[&str]) -> bool {
        let text = self.description.to_lowercase();
        phrases.iter().any(|phrase| contains_word(&text, phrase))
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// `needle` occurs in `haystack` with no word character on either side.
fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(at, _)| {
        let before = haystack[..at].chars().next_back();
        let after = haystack[at + needle.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

const MOBILE_WORDS: &[&str] = &["mobile", "ios app", "android app", "flutter", "react native"];
const DESKTOP_WORDS: &[&str] = &["desktop", "electron", "wpf", "winforms", "macos app"];
const CLI_WORDS: &[&str] = &["cli", "command-line", "terminal tool"];
const WEB_WORDS: &[&str] = &["web", "web app", "website", "spa"];
const LIBRARY_WORDS: &[&str] = &["library", "framework", "package", "module"];
const DATA_SCIENCE_WORDS: &[&str] = &["data science", "machine learning", "deep learning", "jupyter"];
const GAME_WORDS: &[&str] = &["game", "unity", "unreal engine"];

// ---------------------------------------------------------------------------
// DetectionRule
// ---------------------------------------------------------------------------

pub struct DetectionRule {
    pub id: &'static str,
    pub condition: fn(&DetectionInput) -> bool,
    pub category: &'static str,
}

/// Rules in precedence order: strong marker files, manifest dependencies,
/// weak marker files, then description keywords.
pub fn default_rules() -> Vec<DetectionRule> {
    vec![
        DetectionRule {
            id: "flutter_pubspec",
            condition: |i| i.has_file("pubspec.yaml"),
            category: "Mobile Application",
        },
        DetectionRule {
            id: "game_engine_project",
            condition: |i| i.has_extension(".uproject") || i.has_extension(".unity"),
            category: "Game",
        },
        DetectionRule {
            id: "visual_studio_solution",
            condition: |i| i.has_extension(".sln"),
            category: "Desktop Application",
        },
        DetectionRule {
            id: "systems_module",
            condition: |i| i.has_file("Cargo.toml") || i.has_file("go.mod"),
            category: "CLI Tool",
        },
        DetectionRule {
            id: "dep_next",
            condition: |i| i.depends_on("next"),
            category: "Next.js Web Application",
        },
        DetectionRule {
            id: "dep_react",
            condition: |i| i.depends_on("react"),
            category: "React Web Application",
        },
        DetectionRule {
            id: "dep_vue",
            condition: |i| i.depends_on("vue"),
            category: "Vue.js Web Application",
        },
        DetectionRule {
            id: "dep_angular",
            condition: |i| i.depends_on("@angular/core") || i.depends_on("angular"),
            category: "Angular Web Application",
        },
        DetectionRule {
            id: "dep_express",
            condition: |i| i.depends_on("express"),
            category: "API / Backend",
        },
        DetectionRule {
            id: "node_package",
            condition: |i| i.has_file("package.json"),
            category: "Web Application",
        },
        DetectionRule {
            id: "static_site",
            condition: |i| i.has_file("index.html"),
            category: "Static Web Application",
        },
        DetectionRule {
            id: "python_requirements",
            condition: |i| i.has_file("requirements.txt") || i.has_file("Pipfile"),
            category: "Data Science Project",
        },
        DetectionRule {
            id: "ruby_gemfile",
            condition: |i| i.has_file("Gemfile"),
            category: "Web Application",
        },
        DetectionRule {
            id: "mentions_mobile",
            condition: |i| i.mentions_any(MOBILE_WORDS),
            category: "Mobile Application",
        },
        DetectionRule {
            id: "mentions_desktop",
            condition: |i| i.mentions_any(DESKTOP_WORDS),
            category: "Desktop Application",
        },
        DetectionRule {
            id: "mentions_cli",
            condition: |i| i.mentions_any(CLI_WORDS),
            category: "CLI Tool",
        },
        DetectionRule {
            id: "mentions_web",
            condition: |i| i.mentions_any(WEB_WORDS),
            category: "Web Application",
        },
        DetectionRule {
            id: "mentions_library",
            condition: |i| i.mentions_any(LIBRARY_WORDS),
            category: "Library / Framework",
        },
        DetectionRule {
            id: "mentions_data_science",
            condition: |i| i.mentions_any(DATA_SCIENCE_WORDS),
            category: "Data Science Project",
        },
        DetectionRule {
            id: "mentions_game",
            condition: |i| i.mentions_any(GAME_WORDS),
            category: "Game",
        },
    ]
}

// ---------------------------------------------------------------------------
// Detector
// ---------------------------------------------------------------------------

pub struct Detector {
    rules: Vec<DetectionRule>,
}

impl Default for Detector {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl Detector {
    pub fn new(rules: Vec<DetectionRule>) -> Self {
        Self { rules }
    }

    /// Category of the first matching rule.
    pub fn classify(&self, input: &DetectionInput) -> Option<&'static str> {
        let rule = self.rules.iter().find(|rule| (rule.condition)(input))?;
        tracing::debug!(rule = rule.id, category = rule.category, "project type detected");
        Some(rule.category)
    }
}
