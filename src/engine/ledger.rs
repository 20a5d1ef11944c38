//! Step ledger
//!
//! Every step of a scenario appends a [`StepRecord`]; the ledger is written
//! as JSON for an external reporter at the end of the scenario.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::suite::Platform;

static UNSAFE_FILE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9\-_\.]").unwrap());

/// Replace anything outside `[a-zA-Z0-9-_.]` with `_`
pub fn sanitize_file_name(name: &str) -> String {
    UNSAFE_FILE_CHARS.replace_all(name, "_").into_owned()
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Started,
    Passed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    pub run_id: String,
    pub scenario: String,
    pub step: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    pub status: StepStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<PathBuf>,
    pub timestamp: DateTime<Utc>,
}

impl StepRecord {
    pub fn new(run_id: &str, scenario: &str, step: &str, status: StepStatus) -> Self {
        Self {
            run_id: run_id.to_string(),
            scenario: scenario.to_string(),
            step: step.to_string(),
            expected: None,
            actual: None,
            status,
            error: None,
            url: None,
            platform: None,
            screenshot: None,
            timestamp: Utc::now(),
        }
    }

    pub fn expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn actual(mut self, actual: impl Into<String>) -> Self {
        self.actual = Some(actual.into());
        self
    }

    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn url(mut self, url: Option<String>) -> Self {
        self.url = url;
        self
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn screenshot(mut self, path: PathBuf) -> Self {
        self.screenshot = Some(path);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ledger {
    run_id: String,
    records: Vec<StepRecord>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::with_run_id(uuid::Uuid::new_v4().to_string())
    }

    pub fn with_run_id(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            records: Vec::new(),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn record(&mut self, record: StepRecord) {
        info!(
            scenario = %record.scenario,
            step = %record.step,
            status = ?record.status,
            "Step recorded"
        );
        self.records.push(record);
    }

    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    pub fn has_failures(&self) -> bool {
        self.records.iter().any(|r| r.status == StepStatus::Failed)
    }

    pub fn count(&self, status: StepStatus) -> usize {
        self.records.iter().filter(|r| r.status == status).count()
    }

    /// Path of the report file inside `dir`
    pub fn report_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("report-{}.json", sanitize_file_name(&self.run_id)))
    }

    pub fn write_report(&self, dir: &Path) -> Result<PathBuf, LedgerError> {
        std::fs::create_dir_all(dir)?;
        let path = self.report_path(dir);
        std::fs::write(&path, serde_json::to_string_pretty(self)?)?;
        info!("Report written to {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(
            sanitize_file_name("Recherche de coiffeurs à Paris"),
            "Recherche_de_coiffeurs___Paris"
        );
        assert_eq!(sanitize_file_name("run-1_a.b"), "run-1_a.b");
    }

    #[test]
    fn test_record_builder() {
        let record = StepRecord::new("r1", "Search", "Saisie de la localisation", StepStatus::Passed)
            .expected("Le champ de recherche doit être rempli")
            .actual("Localisation saisie: Paris")
            .url(Some("https://www.planity.com/".to_string()))
            .platform(Platform::Web);

        assert_eq!(record.status, StepStatus::Passed);
        assert_eq!(record.platform, Some(Platform::Web));
        assert!(record.error.is_none());
    }

    #[test]
    fn test_record_serialization() {
        let record = StepRecord::new("r1", "Search", "Début du Test", StepStatus::Started)
            .platform(Platform::Ios);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["status"], "started");
        assert_eq!(json["platform"], "iOS");
        assert_eq!(json["runId"], "r1");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_failure_counts() {
        let mut ledger = Ledger::with_run_id("r1");
        ledger.record(StepRecord::new("r1", "s", "a", StepStatus::Started));
        ledger.record(StepRecord::new("r1", "s", "b", StepStatus::Passed));
        assert!(!ledger.has_failures());

        ledger.record(StepRecord::new("r1", "s", "c", StepStatus::Failed).error("boom"));
        assert!(ledger.has_failures());
        assert_eq!(ledger.count(StepStatus::Passed), 1);
        assert_eq!(ledger.count(StepStatus::Failed), 1);
    }

    #[test]
    fn test_write_report() {
        let dir = TempDir::new().unwrap();
        let mut ledger = Ledger::with_run_id("run-42");
        ledger.record(StepRecord::new("run-42", "s", "a", StepStatus::Passed));

        let path = ledger.write_report(&dir.path().join("nested")).unwrap();
        assert!(path.ends_with("report-run-42.json"));

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: Ledger = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.run_id(), "run-42");
        assert_eq!(parsed.records().len(), 1);
    }

    #[test]
    fn test_new_ledgers_have_distinct_run_ids() {
        assert_ne!(Ledger::new().run_id(), Ledger::new().run_id());
    }
}
