use crate::catalog::SuggestionCatalog;
use crate::types::Tone;
use serde::Serialize;

/// Deterministic, side-effect free transform applied to a raw value before it
/// reaches a template.
pub type Formatter = fn(&str) -> String;

pub const PROJECT_TYPE: &str = "projectType";
pub const README_TONE: &str = "readmeTone";

pub const LICENSE_OPTIONS: &[&str] = &["MIT", "GPLv3", "Apache 2.0", "Unlicensed"];

// ---------------------------------------------------------------------------
// FieldKind / FieldDefinition
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    SingleLine,
    MultiLine,
    Url,
    Select { options: Vec<String> },
    Toggle,
}

impl FieldKind {
    pub fn options(&self) -> &[String] {
        match self {
            FieldKind::Select { options } => options,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldDefinition {
    pub id: &'static str,
    pub label: &'static str,
    pub help_text: &'static str,
    pub placeholder: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    #[serde(skip)]
    pub formatter: Option<Formatter>,
}

impl FieldDefinition {
    fn new(id: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            id,
            label,
            help_text: "",
            placeholder: "",
            kind,
            required: false,
            formatter: None,
        }
    }

    fn help(mut self, text: &'static str) -> Self {
        self.help_text = text;
        self
    }

    fn placeholder(mut self, text: &'static str) -> Self {
        self.placeholder = text;
        self
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn formatted(mut self, f: Formatter) -> Self {
        self.formatter = Some(f);
        self
    }

    /// Raw value passed through the formatter, or unchanged when there is none.
    pub fn format(&self, raw: &str) -> String {
        match self.formatter {
            Some(f) => f(raw),
            None => raw.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FormStep {
    pub title: &'static str,
    pub fields: Vec<FieldDefinition>,
}

// ---------------------------------------------------------------------------
// FormSchema
// ---------------------------------------------------------------------------

/// Ordered wizard steps. Fixed for the lifetime of a controller.
#[derive(Debug, Clone, Serialize)]
pub struct FormSchema {
    steps: Vec<FormStep>,
}

impl FormSchema {
    pub fn new(steps: Vec<FormStep>) -> Self {
        Self { steps }
    }

    /// The four standard steps; `projectType` options come from the catalog.
    pub fn standard(catalog: &SuggestionCatalog) -> Self {
        use FieldKind::*;

        let mut categories = vec![String::new()];
        categories.extend(catalog.labels().map(str::to_string));
        let tones: Vec<&str> = Tone::all().iter().map(|t| t.label()).collect();

        Self::new(vec![
            FormStep {
                title: "Project Basics",
                fields: vec![
                    FieldDefinition::new("projectTitle", "Project Title", SingleLine)
                        .placeholder("e.g., Awesome Project")
                        .required(),
                    FieldDefinition::new("projectDescription", "Project Description", MultiLine)
                        .placeholder("A brief, one-paragraph description of your project.")
                        .required(),
                    FieldDefinition::new(PROJECT_TYPE, "Project Type", Select { options: categories })
                        .help("Selecting a type pre-fills the technical sections with suggestions."),
                    FieldDefinition::new("liveDemoUrl", "Live Demo URL", Url)
                        .placeholder("https://your-project-demo.com"),
                ],
            },
            FormStep {
                title: "Technical Details",
                fields: vec![
                    FieldDefinition::new("techStack", "Tech Stack", MultiLine)
                        .help("Comma-separated list. Each entry becomes a badge.")
                        .placeholder("e.g., React, Node.js, PostgreSQL")
                        .formatted(format_tech_badges),
                    FieldDefinition::new("projectTools", "Development Tools", MultiLine)
                        .help("Comma-separated list.")
                        .placeholder("e.g., VS Code, Git, Docker")
                        .formatted(format_bullet_list),
                    FieldDefinition::new("features", "Key Features", MultiLine)
                        .help("One feature per line.")
                        .formatted(format_feature_lines),
                ],
            },
            FormStep {
                title: "Setup and Usage",
                fields: vec![
                    FieldDefinition::new("installation", "Installation Steps", MultiLine)
                        .placeholder("1. Clone the repo\n2. Install dependencies"),
                    FieldDefinition::new("usage", "Usage Examples", MultiLine)
                        .help("Markdown is passed through unchanged."),
                ],
            },
            FormStep {
                title: "Final Touches",
                fields: vec![
                    FieldDefinition::new("contributing", "Contribution Guidelines", MultiLine),
                    FieldDefinition::new("githubUsername", "GitHub Username", SingleLine)
                        .placeholder("your-github-handle"),
                    FieldDefinition::new("license", "License", select(LICENSE_OPTIONS)),
                    FieldDefinition::new(README_TONE, "README Tone", select(&tones)),
                    FieldDefinition::new("includeRoadmap", "Include Roadmap", Toggle),
                    FieldDefinition::new("includeFaq", "Include FAQ", Toggle),
                    FieldDefinition::new("includeChangelog", "Include Changelog", Toggle),
                    FieldDefinition::new("includeAcknowledgments", "Include Acknowledgments", Toggle),
                ],
            },
        ])
    }

    pub fn steps(&self) -> &[FormStep] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&FormStep> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.steps.iter().flat_map(|s| s.fields.iter())
    }

    pub fn field(&self, id: &str) -> Option<&FieldDefinition> {
        self.fields().find(|f| f.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.field(id).is_some()
    }
}

// ---------------------------------------------------------------------------
// Formatters
// ---------------------------------------------------------------------------

fn select(options: &[&str]) -> FieldKind {
    FieldKind::Select {
        options: options.iter().map(|s| s.to_string()).collect(),
    }
}

fn comma_items(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Comma list → space-separated shields.io badges.
pub fn format_tech_badges(raw: &str) -> String {
    comma_items(raw)
        .map(|tech| {
            let label = urlencoding::encode(&tech.replace('-', "--")).into_owned();
            format!(
                "![{tech}](https://img.shields.io/badge/{label}-2d2d2d?style=for-the-badge&logo={}&logoColor=white)",
                badge_logo(tech)
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn badge_logo(tech: &str) -> String {
    tech.to_lowercase()
        .replace(' ', "")
        .replace('.', "dot")
        .replace('+', "plus")
        .replace('#', "sharp")
}

/// Comma list → `* item` lines.
pub fn format_bullet_list(raw: &str) -> String {
    comma_items(raw)
        .map(|tool| format!("* {tool}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One feature per line → `- item` lines; blank lines dropped.
pub fn format_feature_lines(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| format!("- {l}"))
        .collect::<Vec<_>>()
        .join("\n")
}
