//! Ralph Mode PRD document model.
//!
//! The wire field names (`pn`, `pd`, `sp`, `ts`, `fs`, `p`, and the short
//! task fields) are a compatibility contract with existing consumers of the
//! format and must not change. The five phase keys are a fixed ordered set;
//! [`PhaseMap`] models them as named struct fields so serialization order is
//! a property of the type rather than of any particular serializer.

use crate::error::{RalphError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ---------------------------------------------------------------------------
// PhaseKey
// ---------------------------------------------------------------------------

/// One of the five fixed phase identifiers, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseKey {
    Security,
    Setup,
    Core,
    Api,
    Test,
}

impl PhaseKey {
    pub fn all() -> [PhaseKey; 5] {
        [
            PhaseKey::Security,
            PhaseKey::Setup,
            PhaseKey::Core,
            PhaseKey::Api,
            PhaseKey::Test,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseKey::Security => "security",
            PhaseKey::Setup => "setup",
            PhaseKey::Core => "core",
            PhaseKey::Api => "api",
            PhaseKey::Test => "test",
        }
    }

    /// Display name used for the `n` field when scaffolding a phase.
    pub fn display_name(&self) -> &'static str {
        match self {
            PhaseKey::Security => "Security & Validation",
            PhaseKey::Setup => "Project Setup",
            PhaseKey::Core => "Core Features",
            PhaseKey::Api => "API & Integration",
            PhaseKey::Test => "Testing & Polish",
        }
    }
}

impl std::fmt::Display for PhaseKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

// ---------------------------------------------------------------------------
// Task / Phase / PhaseMap
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(rename = "ti")]
    pub title: String,
    #[serde(rename = "d")]
    pub description: String,
    #[serde(rename = "f")]
    pub file: String,
    #[serde(rename = "pr")]
    pub priority: Priority,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    #[serde(rename = "n")]
    pub name: String,
    #[serde(rename = "t")]
    pub tasks: Vec<Task>,
}

/// The five phases of a Ralph Mode PRD.
///
/// Field declaration order is the canonical phase order; serde emits JSON
/// object keys in that order, and a document missing any phase fails to
/// deserialize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseMap {
    pub security: Phase,
    pub setup: Phase,
    pub core: Phase,
    pub api: Phase,
    pub test: Phase,
}

impl PhaseMap {
    pub fn get(&self, key: PhaseKey) -> &Phase {
        match key {
            PhaseKey::Security => &self.security,
            PhaseKey::Setup => &self.setup,
            PhaseKey::Core => &self.core,
            PhaseKey::Api => &self.api,
            PhaseKey::Test => &self.test,
        }
    }

    pub fn get_mut(&mut self, key: PhaseKey) -> &mut Phase {
        match key {
            PhaseKey::Security => &mut self.security,
            PhaseKey::Setup => &mut self.setup,
            PhaseKey::Core => &mut self.core,
            PhaseKey::Api => &mut self.api,
            PhaseKey::Test => &mut self.test,
        }
    }

    /// Phases in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (PhaseKey, &Phase)> {
        PhaseKey::all().into_iter().map(move |k| (k, self.get(k)))
    }

    /// All tasks across all phases, in phase order then insertion order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.iter().flat_map(|(_, p)| p.tasks.iter())
    }

    pub fn task_count(&self) -> usize {
        self.iter().map(|(_, p)| p.tasks.len()).sum()
    }
}

// ---------------------------------------------------------------------------
// TechStack
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechStack {
    pub lang: String,
    pub fw: String,
    pub db: String,
    #[serde(default)]
    pub oth: Vec<String>,
}

/// Named tech-stack presets offered by the generation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TechStackPreset {
    PythonFlask,
    PythonFastapi,
    NodeExpress,
    RustAxum,
}

impl TechStackPreset {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "python-flask" => Ok(TechStackPreset::PythonFlask),
            "python-fastapi" => Ok(TechStackPreset::PythonFastapi),
            "node-express" => Ok(TechStackPreset::NodeExpress),
            "rust-axum" => Ok(TechStackPreset::RustAxum),
            other => Err(RalphError::UnknownPreset(other.to_string())),
        }
    }

    pub fn stack(&self) -> TechStack {
        match self {
            TechStackPreset::PythonFlask => TechStack {
                lang: "Python".into(),
                fw: "Flask".into(),
                db: "SQLite".into(),
                oth: vec!["Jinja2".into(), "Gunicorn".into()],
            },
            TechStackPreset::PythonFastapi => TechStack {
                lang: "Python".into(),
                fw: "FastAPI".into(),
                db: "PostgreSQL".into(),
                oth: vec!["Pydantic".into(), "Uvicorn".into()],
            },
            TechStackPreset::NodeExpress => TechStack {
                lang: "JavaScript".into(),
                fw: "Express".into(),
                db: "MongoDB".into(),
                oth: vec!["Mongoose".into()],
            },
            TechStackPreset::RustAxum => TechStack {
                lang: "Rust".into(),
                fw: "Axum".into(),
                db: "PostgreSQL".into(),
                oth: vec!["sqlx".into(), "Tokio".into()],
            },
        }
    }
}

// ---------------------------------------------------------------------------
// PrdDocument
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrdDocument {
    #[serde(rename = "pn")]
    pub project_name: String,
    #[serde(rename = "pd")]
    pub description: String,
    #[serde(rename = "sp")]
    pub starter_prompt: String,
    #[serde(rename = "ts")]
    pub tech_stack: TechStack,
    #[serde(rename = "fs")]
    pub file_structure: Vec<String>,
    #[serde(rename = "p")]
    pub phases: PhaseMap,
}

impl PrdDocument {
    /// Structural checks beyond what deserialization enforces.
    ///
    /// A phase may be empty when fewer tasks than phases were requested;
    /// otherwise every phase must carry at least one task.
    pub fn validate(&self, expected_tasks: u32) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if expected_tasks >= 5 {
            for (key, phase) in self.phases.iter() {
                if phase.tasks.is_empty() {
                    issues.push(ValidationIssue::EmptyPhase(key));
                }
            }
        }

        let mut seen = HashSet::new();
        for task in self.phases.tasks() {
            if !seen.insert(task.id.as_str()) {
                issues.push(ValidationIssue::DuplicateTaskId(task.id.clone()));
            }
        }

        let actual = self.phases.task_count() as u32;
        if actual != expected_tasks {
            issues.push(ValidationIssue::TaskCountMismatch {
                expected: expected_tasks,
                actual,
            });
        }

        issues
    }

    /// Renumber every task id as `<phase>-<n>`, eliminating duplicates.
    ///
    /// Returns the number of ids that changed. Applied before validation so a
    /// provider that reuses ids across phases doesn't force a re-prompt.
    pub fn renumber_task_ids(&mut self) -> usize {
        let mut changed = 0;
        for key in PhaseKey::all() {
            let phase = self.phases.get_mut(key);
            for (i, task) in phase.tasks.iter_mut().enumerate() {
                let id = format!("{}-{}", key.as_str(), i + 1);
                if task.id != id {
                    task.id = id;
                    changed += 1;
                }
            }
        }
        changed
    }
}

// ---------------------------------------------------------------------------
// ValidationIssue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    EmptyPhase(PhaseKey),
    DuplicateTaskId(String),
    TaskCountMismatch { expected: u32, actual: u32 },
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationIssue::EmptyPhase(key) => write!(f, "phase '{key}' has no tasks"),
            ValidationIssue::DuplicateTaskId(id) => write!(f, "duplicate task id '{id}'"),
            ValidationIssue::TaskCountMismatch { expected, actual } => {
                write!(f, "expected {expected} tasks total, got {actual}")
            }
        }
    }
}

/// Join issues into a single human-readable line for errors and re-prompts.
pub fn describe_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

// ---------------------------------------------------------------------------
// GenerateRequest
// ---------------------------------------------------------------------------

/// Validated user input to one PRD generation call.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub project_name: String,
    pub description: String,
    pub starter_prompt: String,
    pub tech_stack: TechStack,
    pub task_count: u32,
}

// ---------------------------------------------------------------------------
// Completion parsing
// ---------------------------------------------------------------------------

/// Extract the JSON object from a model completion.
///
/// Providers routinely wrap output in Markdown fences or surround it with
/// prose; the document is everything from the first `{` to the last `}`.
pub fn extract_json(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

/// Parse a provider completion into a typed document.
///
/// Falls back to parsing the raw text when no braces are found, so the
/// resulting error names the actual JSON defect.
pub fn parse_completion(raw: &str) -> Result<PrdDocument> {
    let json = extract_json(raw).unwrap_or(raw);
    Ok(serde_json::from_str(json)?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_doc(per_phase: usize) -> PrdDocument {
        let mut phases = PhaseMap::default();
        for key in PhaseKey::all() {
            let phase = phases.get_mut(key);
            phase.name = key.display_name().to_string();
            for i in 0..per_phase {
                phase.tasks.push(Task {
                    id: format!("{}-{}", key.as_str(), i + 1),
                    title: format!("Task {} {}", key.as_str(), i + 1),
                    description: "do the thing".into(),
                    file: "src/main.py".into(),
                    priority: Priority::Medium,
                });
            }
        }
        PrdDocument {
            project_name: "Demo".into(),
            description: "x".into(),
            starter_prompt: "Build a todo app".into(),
            tech_stack: TechStackPreset::PythonFlask.stack(),
            file_structure: vec!["app.py".into(), "templates/index.html".into()],
            phases,
        }
    }

    #[test]
    fn wire_field_names_are_preserved() {
        let doc = sample_doc(2);
        let value = serde_json::to_value(&doc).unwrap();
        for field in ["pn", "pd", "sp", "ts", "fs", "p"] {
            assert!(value.get(field).is_some(), "missing field {field}");
        }
        let task = &value["p"]["security"]["t"][0];
        for field in ["id", "ti", "d", "f", "pr"] {
            assert!(task.get(field).is_some(), "missing task field {field}");
        }
    }

    #[test]
    fn phase_keys_serialize_in_canonical_order() {
        let doc = sample_doc(1);
        let json = serde_json::to_string(&doc).unwrap();
        let positions: Vec<usize> = PhaseKey::all()
            .iter()
            .map(|k| json.find(&format!("\"{}\"", k.as_str())).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted, "phase keys out of order in {json}");
    }

    #[test]
    fn missing_phase_fails_to_deserialize() {
        let mut value = serde_json::to_value(sample_doc(1)).unwrap();
        value["p"].as_object_mut().unwrap().remove("api");
        let result: std::result::Result<PrdDocument, _> = serde_json::from_value(value);
        assert!(result.is_err());
    }

    #[test]
    fn validate_accepts_well_formed_document() {
        let doc = sample_doc(2);
        assert!(doc.validate(10).is_empty());
    }

    #[test]
    fn validate_flags_task_count_mismatch() {
        let doc = sample_doc(2);
        let issues = doc.validate(12);
        assert_eq!(
            issues,
            vec![ValidationIssue::TaskCountMismatch {
                expected: 12,
                actual: 10
            }]
        );
    }

    #[test]
    fn validate_flags_duplicate_ids() {
        let mut doc = sample_doc(1);
        doc.phases.setup.tasks[0].id = "security-1".into();
        let issues = doc.validate(5);
        assert!(issues
            .iter()
            .any(|i| matches!(i, ValidationIssue::DuplicateTaskId(id) if id == "security-1")));
    }

    #[test]
    fn validate_flags_empty_phase_when_enough_tasks_requested() {
        let mut doc = sample_doc(2);
        doc.phases.test.tasks.clear();
        let issues = doc.validate(8);
        assert!(issues.contains(&ValidationIssue::EmptyPhase(PhaseKey::Test)));
    }

    #[test]
    fn validate_tolerates_empty_phase_below_five_tasks() {
        let mut doc = sample_doc(1);
        doc.phases.test.tasks.clear();
        let issues = doc.validate(4);
        assert!(!issues
            .iter()
            .any(|i| matches!(i, ValidationIssue::EmptyPhase(_))));
    }

    #[test]
    fn renumber_eliminates_duplicates() {
        let mut doc = sample_doc(2);
        doc.phases.core.tasks[1].id = "core-1".into();
        let changed = doc.renumber_task_ids();
        assert_eq!(changed, 1);
        assert!(doc.validate(10).is_empty());
    }

    #[test]
    fn extract_json_strips_fences_and_prose() {
        let raw = "Here is your PRD:\n```json\n{\"a\": 1}\n```\nEnjoy!";
        assert_eq!(extract_json(raw), Some("{\"a\": 1}"));
    }

    #[test]
    fn extract_json_rejects_braceless_text() {
        assert_eq!(extract_json("no json here"), None);
    }

    #[test]
    fn parse_completion_round_trips_fenced_document() {
        let doc = sample_doc(2);
        let raw = format!("```json\n{}\n```", serde_json::to_string(&doc).unwrap());
        let parsed = parse_completion(&raw).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn parse_completion_reports_invalid_json() {
        assert!(parse_completion("not a document").is_err());
        assert!(parse_completion("{\"pn\": \"x\"}").is_err());
    }

    #[test]
    fn preset_parse_rejects_unknown() {
        assert!(TechStackPreset::parse("cobol-cics").is_err());
        assert!(TechStackPreset::parse("python-flask").is_ok());
    }

    #[test]
    fn serialization_is_deterministic() {
        let doc = sample_doc(3);
        let a = serde_json::to_vec(&doc).unwrap();
        let b = serde_json::to_vec(&serde_json::from_slice::<PrdDocument>(&a).unwrap()).unwrap();
        assert_eq!(a, b);
    }
}
