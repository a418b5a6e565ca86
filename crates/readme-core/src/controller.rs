//! Multi-step form controller.
//!
//! Owns the wizard state explicitly: the record being edited, the current
//! step (or the terminal result state), the entry mode and the last generated
//! document. Every mutation is mirrored to the snapshot store on a best-effort
//! basis; a failed write is logged and never surfaces to the caller.

use crate::catalog::SuggestionCatalog;
use crate::error::{ReadmeError, Result};
use crate::merge::{self, EMPTY_DOCUMENT};
use crate::prefill::{Prefill, RepoContext};
use crate::schema::{FieldDefinition, FieldKind, FormSchema, PROJECT_TYPE, README_TONE};
use crate::snapshot::{Snapshot, SnapshotStore};
use crate::template::TemplateSet;
use crate::types::{DataRecord, FieldValue, Mode, Tone};
use crate::validation::{self, ValidationReport};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Views and outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "index", rename_all = "snake_case")]
pub enum WizardState {
    Step(usize),
    Result,
}

/// Everything a surface needs to render one step.
#[derive(Debug, Clone, Serialize)]
pub struct StepView {
    pub index: usize,
    pub total: usize,
    pub title: &'static str,
    pub is_last: bool,
    pub fields: Vec<FieldView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldView {
    pub id: &'static str,
    pub label: &'static str,
    pub help_text: &'static str,
    pub placeholder: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub value: FieldValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SuggestionOutcome {
    UnknownCategory { category: String },
    /// Nothing was written; these fields already hold content.
    NeedsConfirmation { conflicting: Vec<String> },
    Applied { fields: Vec<String> },
}

#[derive(Debug, Clone, Serialize)]
pub struct PrefillReport {
    pub category: Option<String>,
    pub suggestions: Option<SuggestionOutcome>,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Generated {
    pub tone: Tone,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Status {
    pub state: WizardState,
    pub step_index: usize,
    pub total_steps: usize,
    pub step_title: &'static str,
    pub mode: Mode,
    pub filled_fields: usize,
}

// ---------------------------------------------------------------------------
// FormController
// ---------------------------------------------------------------------------

pub struct FormController {
    schema: FormSchema,
    catalog: SuggestionCatalog,
    templates: TemplateSet,
    store: Box<dyn SnapshotStore>,
    default_tone: Tone,
    record: DataRecord,
    state: WizardState,
    mode: Mode,
    output: Option<Generated>,
}

impl FormController {
    pub fn new(
        catalog: SuggestionCatalog,
        templates: TemplateSet,
        store: Box<dyn SnapshotStore>,
    ) -> Self {
        let schema = FormSchema::standard(&catalog);
        Self {
            schema,
            catalog,
            templates,
            store,
            default_tone: Tone::default(),
            record: DataRecord::new(),
            state: WizardState::Step(0),
            mode: Mode::default(),
            output: None,
        }
    }

    pub fn with_default_tone(mut self, tone: Tone) -> Self {
        self.default_tone = tone;
        self
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn catalog(&self) -> &SuggestionCatalog {
        &self.catalog
    }

    pub fn record(&self) -> &DataRecord {
        &self.record
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn output(&self) -> Option<&Generated> {
        self.output.as_ref()
    }

    /// Step the pointer rests on. The result state reports the last step.
    pub fn current_step(&self) -> usize {
        match self.state {
            WizardState::Step(i) => i,
            WizardState::Result => self.last_step(),
        }
    }

    fn last_step(&self) -> usize {
        self.schema.len().saturating_sub(1)
    }

    pub fn status(&self) -> Status {
        let step_index = self.current_step();
        Status {
            state: self.state,
            step_index,
            total_steps: self.schema.len(),
            step_title: self.schema.step(step_index).map(|s| s.title).unwrap_or(""),
            mode: self.mode,
            filled_fields: self.record.iter().filter(|(_, v)| !v.is_blank()).count(),
        }
    }

    // -----------------------------------------------------------------------
    // Steps
    // -----------------------------------------------------------------------

    fn step_or_err(&self, index: usize) -> Result<&crate::schema::FormStep> {
        self.schema.step(index).ok_or(ReadmeError::StepOutOfRange {
            index,
            total: self.schema.len(),
        })
    }

    pub fn build_step(&self, index: usize) -> Result<StepView> {
        let step = self.step_or_err(index)?;
        let fields = step
            .fields
            .iter()
            .map(|field| FieldView {
                id: field.id,
                label: field.label,
                help_text: field.help_text,
                placeholder: field.placeholder,
                kind: field.kind.clone(),
                required: field.required,
                value: self.current_value(field),
            })
            .collect();
        Ok(StepView {
            index,
            total: self.schema.len(),
            title: step.title,
            is_last: index == self.last_step(),
            fields,
        })
    }

    fn current_value(&self, field: &FieldDefinition) -> FieldValue {
        match (self.record.get(field.id), &field.kind) {
            (Some(value), _) => value.clone(),
            (None, FieldKind::Toggle) => FieldValue::Flag(false),
            (None, _) => FieldValue::Text(String::new()),
        }
    }

    pub fn validate_step(&self, index: usize) -> Result<ValidationReport> {
        let step = self.step_or_err(index)?;
        Ok(validation::validate_step(step, &self.record))
    }

    /// Validate the current step and move forward. Leaving the last step
    /// generates the document and enters the result state. Returns false when
    /// the step is invalid or the wizard is already finished.
    pub fn advance(&mut self) -> bool {
        let WizardState::Step(index) = self.state else {
            return false;
        };
        let report = validation::validate_step(&self.schema.steps()[index], &self.record);
        if !report.valid {
            tracing::debug!(step = index, invalid = ?report.invalid_field_ids, "step blocked");
            return false;
        }

        if index < self.last_step() {
            self.state = WizardState::Step(index + 1);
        } else {
            self.output = Some(self.generate());
            self.state = WizardState::Result;
        }
        self.save();
        true
    }

    pub fn retreat(&mut self) {
        if let WizardState::Step(index) = self.state {
            if index > 0 {
                self.state = WizardState::Step(index - 1);
                self.save();
            }
        }
    }

    /// Leave the result state for the first step. Returns false elsewhere.
    pub fn restart(&mut self) -> bool {
        if self.state != WizardState::Result {
            return false;
        }
        self.state = WizardState::Step(0);
        self.output = None;
        self.save();
        true
    }

    // -----------------------------------------------------------------------
    // Field updates
    // -----------------------------------------------------------------------

    /// Store a value. Choosing a project type also offers that category's
    /// suggestions, without overwriting, and returns how that went.
    pub fn set_field(
        &mut self,
        id: &str,
        value: impl Into<FieldValue>,
    ) -> Result<Option<SuggestionOutcome>> {
        let value = value.into();
        let field = self
            .schema
            .field(id)
            .ok_or_else(|| ReadmeError::UnknownField(id.to_string()))?;
        match (&field.kind, &value) {
            (FieldKind::Toggle, FieldValue::Text(_)) => {
                return Err(ReadmeError::FieldType {
                    field: id.to_string(),
                    expected: "on or off".to_string(),
                })
            }
            (kind, FieldValue::Flag(_)) if *kind != FieldKind::Toggle => {
                return Err(ReadmeError::FieldType {
                    field: id.to_string(),
                    expected: "text".to_string(),
                })
            }
            _ => {}
        }

        let category = (id == PROJECT_TYPE && !value.is_blank()).then(|| value.as_text());
        self.record.set(id, value);
        self.save();

        Ok(category.map(|c| self.apply_category_suggestions(&c, false)))
    }

    pub fn apply_category_suggestions(
        &mut self,
        category: &str,
        overwrite_confirmed: bool,
    ) -> SuggestionOutcome {
        self.apply_suggestions(category, None, overwrite_confirmed)
    }

    /// Write the category's canned values into their target fields. Either
    /// every target is written or none is: when any target already holds
    /// content and the caller has not confirmed, nothing changes.
    pub fn apply_suggestions(
        &mut self,
        category: &str,
        context: Option<&RepoContext>,
        overwrite_confirmed: bool,
    ) -> SuggestionOutcome {
        let Some(entry) = self.catalog.get(category) else {
            return SuggestionOutcome::UnknownCategory {
                category: category.to_string(),
            };
        };

        let targets: Vec<(&'static str, String)> = entry
            .field_values()
            .into_iter()
            .filter(|(id, _)| self.schema.contains(id))
            .map(|(id, value)| {
                let value = match (id, context) {
                    ("installation", Some(ctx)) => ctx.personalize_setup(value),
                    _ => value.to_string(),
                };
                (id, value)
            })
            .collect();

        let conflicting: Vec<String> = targets
            .iter()
            .filter(|(id, _)| !self.record.is_blank(id))
            .map(|(id, _)| id.to_string())
            .collect();
        if !conflicting.is_empty() && !overwrite_confirmed {
            return SuggestionOutcome::NeedsConfirmation { conflicting };
        }

        let mut fields = Vec::with_capacity(targets.len());
        for (id, value) in targets {
            self.record.set(id, value);
            fields.push(id.to_string());
        }
        self.save();
        tracing::debug!(category, fields = fields.len(), "suggestions applied");
        SuggestionOutcome::Applied { fields }
    }

    /// Apply repository-derived values: the detected category and its
    /// suggestions first, then every non-empty prefilled field on top.
    pub fn apply_prefill(&mut self, prefill: &Prefill, overwrite_confirmed: bool) -> PrefillReport {
        let suggestions = prefill.category.as_deref().map(|category| {
            self.record.set(PROJECT_TYPE, category);
            self.apply_suggestions(category, prefill.context.as_ref(), overwrite_confirmed)
        });

        let mut fields = Vec::new();
        for (id, value) in prefill.fields.iter() {
            if value.is_blank() || !self.schema.contains(id) {
                continue;
            }
            self.record.set(id.as_str(), value.clone());
            fields.push(id.clone());
        }

        self.mode = Mode::Repository;
        self.save();
        PrefillReport {
            category: prefill.category.clone(),
            suggestions,
            fields,
        }
    }

    // -----------------------------------------------------------------------
    // Output
    // -----------------------------------------------------------------------

    /// Merge the record with the template for its chosen tone.
    pub fn generate(&self) -> Generated {
        let requested = self.record.text(README_TONE);
        let choice = self.templates.select(&requested, self.default_tone);
        let text = match &choice.text {
            Some(template) => merge::merge(template, &self.record, &self.schema),
            None => EMPTY_DOCUMENT.to_string(),
        };
        Generated {
            tone: choice.tone,
            text,
            notice: choice.notice,
        }
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.current_step(), self.record.clone(), self.mode)
            .finished(self.state == WizardState::Result)
    }

    pub fn persist(&self) -> Result<()> {
        self.store.write(&self.snapshot().to_json()?)
    }

    fn save(&self) {
        if let Err(e) = self.persist() {
            tracing::warn!(error = %e, "could not save wizard progress");
        }
    }

    /// Load progress from the store. Missing, unreadable or incompatible
    /// snapshots leave the controller untouched.
    pub fn restore(&mut self) {
        let text = match self.store.read() {
            Ok(Some(text)) => text,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!(error = %e, "could not read saved progress");
                return;
            }
        };
        match Snapshot::from_json(&text) {
            Ok(snapshot) => self.load_snapshot(snapshot),
            Err(e) => tracing::warn!(error = %e, "ignoring saved progress"),
        }
    }

    fn load_snapshot(&mut self, snapshot: Snapshot) {
        let index = if snapshot.step_index < self.schema.len() {
            snapshot.step_index
        } else {
            0
        };
        self.record = snapshot.data;
        self.mode = snapshot.mode.unwrap_or_default();
        if snapshot.finished && index == self.last_step() {
            self.state = WizardState::Result;
            self.output = Some(self.generate());
        } else {
            self.state = WizardState::Step(index);
            self.output = None;
        }
    }

    /// Discard all progress. Does nothing unless `confirmed`.
    pub fn reset(&mut self, confirmed: bool) -> Result<bool> {
        if !confirmed {
            return Ok(false);
        }
        self.record.clear();
        self.state = WizardState::Step(0);
        self.mode = Mode::default();
        self.output = None;
        self.store.clear()?;
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::MemoryStore;

    fn controller_with(store: MemoryStore) -> FormController {
        FormController::new(
            SuggestionCatalog::builtin().unwrap(),
            TemplateSet::embedded(),
            Box::new(store),
        )
    }

    fn controller() -> FormController {
        controller_with(MemoryStore::new())
    }

    fn fill_basics(c: &mut FormController) {
        c.set_field("projectTitle", "Foo Bar").unwrap();
        c.set_field("projectDescription", "Does things.").unwrap();
    }

    #[test]
    fn starts_on_first_step() {
        let c = controller();
        assert_eq!(c.state(), WizardState::Step(0));
        assert_eq!(c.mode(), Mode::Manual);
        assert!(c.record().is_empty());
    }

    #[test]
    fn build_step_reports_fields_and_values() {
        let mut c = controller();
        c.set_field("projectTitle", "Foo").unwrap();
        let view = c.build_step(0).unwrap();
        assert_eq!(view.title, "Project Basics");
        assert!(!view.is_last);
        let title = view.fields.iter().find(|f| f.id == "projectTitle").unwrap();
        assert!(title.required);
        assert_eq!(title.value, FieldValue::from("Foo"));

        let last = c.build_step(3).unwrap();
        assert!(last.is_last);
        let faq = last.fields.iter().find(|f| f.id == "includeFaq").unwrap();
        assert_eq!(faq.value, FieldValue::Flag(false));
    }

    #[test]
    fn build_step_out_of_range_errors() {
        let c = controller();
        assert!(matches!(
            c.build_step(9),
            Err(ReadmeError::StepOutOfRange { index: 9, total: 4 })
        ));
    }

    #[test]
    fn advance_blocks_on_invalid_step() {
        let mut c = controller();
        assert!(!c.advance());
        assert_eq!(c.state(), WizardState::Step(0));
        fill_basics(&mut c);
        c.set_field("liveDemoUrl", "not a url").unwrap();
        assert!(!c.advance());
        c.set_field("liveDemoUrl", "https://foo.dev").unwrap();
        assert!(c.advance());
        assert_eq!(c.state(), WizardState::Step(1));
    }

    #[test]
    fn retreat_never_goes_below_zero() {
        let mut c = controller();
        c.retreat();
        assert_eq!(c.state(), WizardState::Step(0));
        fill_basics(&mut c);
        c.advance();
        c.retreat();
        assert_eq!(c.state(), WizardState::Step(0));
    }

    #[test]
    fn finishing_the_last_step_generates_output() {
        let mut c = controller();
        fill_basics(&mut c);
        for _ in 0..4 {
            assert!(c.advance());
        }
        assert_eq!(c.state(), WizardState::Result);
        let out = c.output().unwrap();
        assert!(!out.text.is_empty());
        assert!(out.text.starts_with("# Foo Bar"));
        assert!(!c.advance());

        assert!(c.restart());
        assert_eq!(c.state(), WizardState::Step(0));
        assert!(c.output().is_none());
        assert!(!c.restart());
    }

    #[test]
    fn unknown_field_is_an_error() {
        let mut c = controller();
        assert!(matches!(
            c.set_field("nope", "x"),
            Err(ReadmeError::UnknownField(_))
        ));
    }

    #[test]
    fn toggles_only_take_flags() {
        let mut c = controller();
        assert!(c.set_field("includeFaq", "yes").is_err());
        assert!(c.set_field("projectTitle", true).is_err());
        c.set_field("includeFaq", true).unwrap();
        assert_eq!(c.record().text("includeFaq"), "true");
    }

    #[test]
    fn suggestions_do_not_overwrite_without_confirmation() {
        let mut c = controller();
        c.set_field("techStack", "Rust").unwrap();
        let before = c.record().clone();

        let outcome = c.apply_category_suggestions("Web Application", false);
        assert_eq!(
            outcome,
            SuggestionOutcome::NeedsConfirmation {
                conflicting: vec!["techStack".to_string()]
            }
        );
        assert_eq!(c.record(), &before);

        let outcome = c.apply_category_suggestions("Web Application", true);
        assert!(matches!(outcome, SuggestionOutcome::Applied { .. }));
        assert!(c.record().text("techStack").contains("React"));
        assert!(!c.record().is_blank("installation"));
    }

    #[test]
    fn selecting_project_type_fills_empty_targets() {
        let mut c = controller();
        let outcome = c.set_field("projectType", "CLI Tool").unwrap();
        assert!(matches!(outcome, Some(SuggestionOutcome::Applied { .. })));
        assert!(!c.record().is_blank("projectTools"));

        assert_eq!(c.set_field("projectType", "").unwrap(), None);
    }

    #[test]
    fn unknown_category_changes_nothing() {
        let mut c = controller();
        let outcome = c.apply_category_suggestions("Quantum Toaster", true);
        assert!(matches!(outcome, SuggestionOutcome::UnknownCategory { .. }));
        assert!(c.record().is_empty());
    }

    #[test]
    fn repo_context_personalizes_installation() {
        let mut c = controller();
        let ctx = RepoContext::new("octo", "hello-world");
        c.apply_suggestions("Web Application", Some(&ctx), false);
        let setup = c.record().text("installation");
        assert!(setup.contains("`git clone https://github.com/octo/hello-world.git`"));
        assert!(setup.contains("cd hello-world"));
        assert!(!setup.contains("<project-name>"));
    }

    #[test]
    fn prefill_sets_category_fields_and_mode() {
        let mut c = controller();
        let mut fields = DataRecord::new();
        fields.set("projectTitle", "Hello World");
        fields.set("liveDemoUrl", "");
        let prefill = Prefill {
            category: Some("CLI Tool".to_string()),
            fields,
            context: Some(RepoContext::new("octo", "hello-world")),
        };

        let report = c.apply_prefill(&prefill, false);
        assert_eq!(report.fields, vec!["projectTitle".to_string()]);
        assert!(matches!(report.suggestions, Some(SuggestionOutcome::Applied { .. })));
        assert_eq!(c.mode(), Mode::Repository);
        assert_eq!(c.record().text("projectType"), "CLI Tool");
        assert_eq!(c.record().text("projectTitle"), "Hello World");
        assert!(c.record().get("liveDemoUrl").is_none());
    }

    #[test]
    fn generate_uses_selected_tone() {
        let mut c = controller();
        fill_basics(&mut c);
        c.set_field("readmeTone", "Concise").unwrap();
        let out = c.generate();
        assert_eq!(out.tone, Tone::Concise);
        assert!(out.notice.is_none());

        let c = controller().with_default_tone(Tone::Friendly);
        assert_eq!(c.generate().tone, Tone::Friendly);
    }

    #[test]
    fn progress_round_trips_through_store() {
        let store = MemoryStore::new();
        let mut c = controller_with(store.clone());
        fill_basics(&mut c);
        c.set_field("includeRoadmap", true).unwrap();
        c.advance();
        let saved = c.snapshot();

        let mut restored = controller_with(store);
        restored.restore();
        let again = restored.snapshot();
        assert_eq!(again.step_index, saved.step_index);
        assert_eq!(again.data, saved.data);
        assert_eq!(again.mode, saved.mode);
        assert_eq!(restored.state(), WizardState::Step(1));
    }

    #[test]
    fn corrupt_snapshot_leaves_defaults() {
        let mut c = controller_with(MemoryStore::with_contents("{not json"));
        c.restore();
        assert_eq!(c.state(), WizardState::Step(0));
        assert!(c.record().is_empty());
        assert_eq!(c.mode(), Mode::Manual);
    }

    #[test]
    fn newer_snapshot_is_ignored() {
        let store = MemoryStore::with_contents(
            r#"{"version":7,"stepIndex":2,"data":{"projectTitle":"X"}}"#,
        );
        let mut c = controller_with(store);
        c.restore();
        assert!(c.record().is_empty());
    }

    #[test]
    fn out_of_range_step_clamps_to_zero() {
        let store =
            MemoryStore::with_contents(r#"{"stepIndex":42,"data":{"projectTitle":"X"}}"#);
        let mut c = controller_with(store);
        c.restore();
        assert_eq!(c.state(), WizardState::Step(0));
        assert_eq!(c.record().text("projectTitle"), "X");
    }

    #[test]
    fn reset_requires_confirmation() {
        let store = MemoryStore::new();
        let mut c = controller_with(store.clone());
        fill_basics(&mut c);
        assert!(!c.reset(false).unwrap());
        assert!(store.contents().is_some());

        assert!(c.reset(true).unwrap());
        assert!(c.record().is_empty());
        assert_eq!(c.state(), WizardState::Step(0));
        assert!(store.contents().is_none());
    }

    #[test]
    fn result_state_survives_restore() {
        let store = MemoryStore::new();
        let mut c = controller_with(store.clone());
        fill_basics(&mut c);
        while c.advance() {}
        assert_eq!(c.state(), WizardState::Result);

        let mut resumed = controller_with(store.clone());
        resumed.restore();
        assert_eq!(resumed.state(), WizardState::Result);
        assert_eq!(resumed.output(), c.output());

        assert!(resumed.restart());
        let mut again = controller_with(store);
        again.restore();
        assert_eq!(again.state(), WizardState::Step(0));
    }

    #[test]
    fn finished_flag_off_the_last_step_is_ignored() {
        let text = r#"{"version":1,"stepIndex":1,"finished":true,"data":{}}"#;
        let mut c = controller_with(MemoryStore::with_contents(text));
        c.restore();
        assert_eq!(c.state(), WizardState::Step(1));
        assert!(c.output().is_none());
    }
}
