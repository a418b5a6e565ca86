use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Tone
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    #[default]
    Professional,
    Friendly,
    Concise,
}

impl Tone {
    pub fn all() -> &'static [Tone] {
        &[Tone::Professional, Tone::Friendly, Tone::Concise]
    }

    /// Template resource stem, e.g. `professional` for `professional.md`.
    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Friendly => "friendly",
            Tone::Concise => "concise",
        }
    }

    /// Option label shown in the `readmeTone` select.
    pub fn label(self) -> &'static str {
        match self {
            Tone::Professional => "Professional",
            Tone::Friendly => "Friendly",
            Tone::Concise => "Concise",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Tone {
    type Err = crate::error::ReadmeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "professional" => Ok(Tone::Professional),
            "friendly" => Ok(Tone::Friendly),
            "concise" => Ok(Tone::Concise),
            _ => Err(crate::error::ReadmeError::InvalidTone(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// Entry path into the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Manual,
    /// Fields were pre-filled from repository metadata.
    Repository,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Manual => "manual",
            Mode::Repository => "repository",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FieldValue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
}

impl FieldValue {
    /// Text form used by validation and the merge engine. An unchecked flag
    /// reads as blank so conditional regions guarded by it are dropped.
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Flag(true) => "true".to_string(),
            FieldValue::Flag(false) => String::new(),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Flag(on) => !on,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Flag(b)
    }
}

// ---------------------------------------------------------------------------
// DataRecord
// ---------------------------------------------------------------------------

/// The user's in-progress answers, keyed by field id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataRecord(BTreeMap<String, FieldValue>);

impl DataRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&FieldValue> {
        self.0.get(id)
    }

    /// Text value of `id`, or an empty string when absent.
    pub fn text(&self, id: &str) -> String {
        self.0.get(id).map(FieldValue::as_text).unwrap_or_default()
    }

    pub fn is_blank(&self, id: &str) -> bool {
        self.0.get(id).map(FieldValue::is_blank).unwrap_or(true)
    }

    pub fn set(&mut self, id: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(id.into(), value.into());
    }

    pub fn remove(&mut self, id: &str) -> Option<FieldValue> {
        self.0.remove(id)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for DataRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_parses_labels_and_stems() {
        assert_eq!("Friendly".parse::<Tone>().unwrap(), Tone::Friendly);
        assert_eq!("concise".parse::<Tone>().unwrap(), Tone::Concise);
        assert!("sarcastic".parse::<Tone>().is_err());
    }

    #[test]
    fn record_json_is_a_flat_map() {
        let mut record = DataRecord::new();
        record.set("projectTitle", "Foo");
        record.set("includeFaq", true);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"includeFaq":true,"projectTitle":"Foo"}"#);
        let back: DataRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn unchecked_flag_is_blank() {
        let mut record = DataRecord::new();
        record.set("includeFaq", false);
        record.set("usage", "   \n");
        assert!(record.is_blank("includeFaq"));
        assert!(record.is_blank("usage"));
        assert!(record.is_blank("missing"));
        assert_eq!(record.text("includeFaq"), "");
    }
}
