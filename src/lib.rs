//! # Threat Triage - Core Library
//!
//! Scores a batch of security threat records and picks which of them to
//! respond to under a fixed budget of response hours.
//!
//! Two selection strategies run against the same id-ordered batch:
//! - **Greedy**: severity-per-hour ratio heuristic, fast and approximate.
//! - **Optimal**: exact 0/1 knapsack dynamic program.
//!
//! Around that core sit the ordering, search and aggregation queries, the
//! intake adapters (batch files and interactive prompts) and the text
//! report sinks.

pub mod console;
pub mod intake;
pub mod ordering;
pub mod query;
pub mod report;
pub mod scoring;
pub mod selection;
pub mod session;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Unified error type for Threat Triage.
#[derive(Error, Debug)]
pub enum TriageError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid threat record #{index} ({field}): {reason}")]
    Validation {
        index: usize,
        field: &'static str,
        reason: String,
    },

    #[error("Invalid budget: {0}")]
    InvalidBudget(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Contract violation: {0}")]
    Contract(String),

    #[error("Report error: {0}")]
    Report(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

pub type TriageResult<T> = Result<T, TriageError>;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Top-level configuration for Threat Triage.
///
/// Loaded from `threat-triage.toml` in the working directory or a path
/// supplied via CLI flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageConfig {
    /// Severity formula settings.
    pub scoring: ScoringConfig,

    /// Selection strategy limits.
    pub selection: SelectionConfig,

    /// Report output settings.
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Which clamp/status rule set the scoring engine applies.
    pub policy: SeverityPolicy,

    /// Match the type bonus vocabulary ignoring ASCII case ("ddos" == "DDoS").
    /// Off by default: unknown spellings get no bonus.
    pub case_insensitive_types: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Selections using more hours than this raise the over-budget advisory.
    pub advisory_hours: u64,

    /// Upper bound on `(threats + 1) * (budget + 1)` knapsack table cells.
    /// Larger problems are refused instead of allocating.
    pub max_table_cells: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// File every rendered report block is appended to.
    pub report_path: PathBuf,

    /// File the full batch dump is written to after intake.
    pub export_path: PathBuf,

    /// Use ANSI colors for console box borders.
    pub color: bool,

    /// Empty the report file when a session starts.
    pub truncate_on_start: bool,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig {
                policy: SeverityPolicy::Clamped,
                case_insensitive_types: false,
            },
            selection: SelectionConfig {
                advisory_hours: 30,
                max_table_cells: 4_000_000,
            },
            report: ReportConfig {
                report_path: PathBuf::from("ThreatsReport.txt"),
                export_path: PathBuf::from("threat_data.txt"),
                color: true,
                truncate_on_start: true,
            },
        }
    }
}

impl TriageConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &std::path::Path) -> TriageResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: TriageConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default configuration to a TOML file.
    pub fn write_default(path: &std::path::Path) -> TriageResult<()> {
        let config = Self::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| TriageError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> TriageResult<()> {
        if self.selection.max_table_cells == 0 {
            return Err(TriageError::Config(
                "selection.max_table_cells must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Core Types
// ---------------------------------------------------------------------------

/// Rule set used to finish a severity value and derive the Critical status.
///
/// Both rule sets share the base formula and the type bonus table. They
/// disagree on the upper clamp and on what makes a threat Critical.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SeverityPolicy {
    /// Severity capped at 100; Critical when severity >= 90.
    #[default]
    Clamped,

    /// No cap; Critical when a Malware/Virus threat has pre-deformation > 40%.
    Legacy,
}

/// A scored security threat.
///
/// Built only by the intake layer, which validates the raw fields and runs
/// the scoring engine. `severity` is derived and never set by callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Threat {
    /// Caller-supplied identifier. Not required to be unique.
    pub id: i64,

    /// Raw severity before amplification, nominally 0-100.
    pub base_severity: u32,

    /// Hours needed to respond. Always >= 1 for ingested threats.
    pub resource_cost: u32,

    /// Severity amplification percentage.
    pub pre_deform_percent: u32,

    /// Computed severity.
    pub severity: u32,

    /// Source address as entered.
    pub ip: String,

    /// Threat category (Malware, Virus, DDoS, ...).
    #[serde(rename = "type")]
    pub threat_type: String,

    /// Reported origin.
    pub location: String,

    /// Response status (Detected, Active, Critical, ...).
    pub status: String,
}

/// The batch of threats a session works on.
pub type ThreatSet = Vec<Threat>;

/// Which algorithm produced a selection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SelectionStrategy {
    Greedy,
    Optimal,
}

/// The outcome of running a selection strategy against a batch and budget.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Selection {
    pub strategy: SelectionStrategy,

    /// Chosen threats. Greedy keeps acceptance order; optimal keeps batch order.
    pub chosen: Vec<Threat>,

    /// Sum of `severity` over `chosen`.
    pub total_severity: u64,

    /// Sum of `resource_cost` over `chosen`. Never exceeds the budget.
    pub total_hours: u64,

    /// The budget the selection was computed against.
    pub budget: u32,

    /// Set when `total_hours` exceeds the configured advisory threshold.
    pub over_budget_advisory: bool,
}

impl Selection {
    /// Ids of the chosen threats, in selection order.
    pub fn chosen_ids(&self) -> Vec<i64> {
        self.chosen.iter().map(|t| t.id).collect()
    }
}

/// Aggregate view of a batch against its budget.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Summary {
    pub count: usize,
    pub total_hours: u64,
    pub total_severity: u64,
    pub budget: u32,
}
