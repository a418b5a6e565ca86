use crate::assets;
use crate::error::{ReadmeError, Result};
use serde::{Deserialize, Serialize};

/// Field ids a suggestion entry may fill, in application order.
pub const SUGGESTED_FIELDS: &[&str] = &[
    "techStack",
    "projectTools",
    "installation",
    "features",
    "usage",
];

// ---------------------------------------------------------------------------
// SuggestionEntry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionEntry {
    pub tech_stack: String,
    pub tools: String,
    pub setup: String,
    pub features: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
}

impl SuggestionEntry {
    /// `(field id, value)` pairs this entry would write into a record.
    pub fn field_values(&self) -> Vec<(&'static str, &str)> {
        let mut values = vec![
            ("techStack", self.tech_stack.as_str()),
            ("projectTools", self.tools.as_str()),
            ("installation", self.setup.as_str()),
            ("features", self.features.as_str()),
        ];
        if let Some(usage) = &self.usage {
            values.push(("usage", usage.as_str()));
        }
        values
    }
}

// ---------------------------------------------------------------------------
// SuggestionCatalog
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CatalogFile {
    default_contributing: String,
    categories: Vec<CategoryEntry>,
}

#[derive(Debug, Deserialize)]
struct CategoryEntry {
    label: String,
    #[serde(flatten)]
    suggestions: SuggestionEntry,
}

/// Category label → canned field values. Immutable once loaded; labels keep
/// their file order so select options are stable.
#[derive(Debug, Clone)]
pub struct SuggestionCatalog {
    default_contributing: String,
    entries: Vec<(String, SuggestionEntry)>,
}

impl SuggestionCatalog {
    /// The catalog bundled with the binary.
    pub fn builtin() -> Result<Self> {
        let text = assets::asset_text(assets::CATALOG_ASSET)
            .ok_or_else(|| ReadmeError::Catalog("bundled catalog is missing".to_string()))?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        let file: CatalogFile =
            serde_yaml::from_str(text).map_err(|e| ReadmeError::Catalog(e.to_string()))?;
        let mut entries: Vec<(String, SuggestionEntry)> = Vec::with_capacity(file.categories.len());
        for entry in file.categories {
            if entries.iter().any(|(label, _)| *label == entry.label) {
                return Err(ReadmeError::Catalog(format!(
                    "duplicate category '{}'",
                    entry.label
                )));
            }
            entries.push((entry.label, entry.suggestions));
        }
        Ok(Self {
            default_contributing: file.default_contributing,
            entries,
        })
    }

    pub fn get(&self, category: &str) -> Option<&SuggestionEntry> {
        self.entries
            .iter()
            .find(|(label, _)| label == category)
            .map(|(_, entry)| entry)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn default_contributing(&self) -> &str {
        &self.default_contributing
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_parses() {
        let catalog = SuggestionCatalog::builtin().unwrap();
        assert!(catalog.len() >= 10);
        assert_eq!(catalog.labels().next(), Some("Web Application"));
        assert!(catalog.default_contributing().contains("Fork the Project"));
    }

    #[test]
    fn entries_map_onto_form_fields() {
        let catalog = SuggestionCatalog::builtin().unwrap();
        let web = catalog.get("Web Application").unwrap();
        let fields: Vec<&str> = web.field_values().iter().map(|(id, _)| *id).collect();
        assert_eq!(fields, ["techStack", "projectTools", "installation", "features"]);

        let static_site = catalog.get("Static Web Application").unwrap();
        assert!(static_site
            .field_values()
            .iter()
            .any(|(id, _)| *id == "usage"));
    }

    #[test]
    fn every_suggested_field_is_known() {
        let catalog = SuggestionCatalog::builtin().unwrap();
        for label in catalog.labels() {
            for (id, _) in catalog.get(label).unwrap().field_values() {
                assert!(SUGGESTED_FIELDS.contains(&id));
            }
        }
    }

    #[test]
    fn duplicate_labels_are_rejected() {
        let yaml = r#"
default_contributing: hi
categories:
  - { label: Game, techStack: a, tools: b, setup: c, features: d }
  - { label: Game, techStack: a, tools: b, setup: c, features: d }
"#;
        assert!(matches!(
            SuggestionCatalog::from_yaml(yaml),
            Err(ReadmeError::Catalog(_))
        ));
    }

    #[test]
    fn unknown_category_is_none() {
        let catalog = SuggestionCatalog::builtin().unwrap();
        assert!(catalog.get("Spaceship Firmware").is_none());
    }
}
