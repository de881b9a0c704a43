//! # Threat Intake
//!
//! The validation boundary between raw user input and the scoring core.
//!
//! Raw records carry signed integers exactly as entered. Intake checks
//! every field, fills in missing location/type/status from the
//! [`classify`] heuristics, runs the scoring engine and finally orders the
//! batch by id. A single invalid record rejects the whole batch, so a
//! session never holds a partially ingested set.
//!
//! Records arrive from two adapters:
//! - [`BatchFile`] - a TOML file with `budget` and `[[threats]]` entries.
//! - [`prompt::Prompter`] - interactive field-by-field prompting.

pub mod classify;
pub mod prompt;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ordering::sort_by_id;
use crate::scoring::ScoringEngine;
use crate::{Threat, ThreatSet, TriageError, TriageResult};

/// A threat record as entered, before validation and scoring.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawThreat {
    pub id: i64,
    pub base_severity: i64,
    pub resource_cost: i64,
    #[serde(default)]
    pub pre_deform_percent: i64,
    pub ip: String,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub threat_type: Option<String>,
    pub status: Option<String>,
}

/// On-disk batch for non-interactive runs.
///
/// ```toml
/// budget = 40
///
/// [[threats]]
/// id = 1
/// base_severity = 70
/// resource_cost = 6
/// pre_deform_percent = 20
/// ip = "10.0.0.4"
/// type = "Malware"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchFile {
    pub budget: i64,
    #[serde(default)]
    pub threats: Vec<RawThreat>,
}

impl BatchFile {
    /// Load a batch from a TOML file.
    pub fn from_file(path: &Path) -> TriageResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let batch: BatchFile = toml::from_str(&content)?;
        Ok(batch)
    }
}

/// Validate a response-hour budget. Must be a positive integer.
pub fn validate_budget(budget: i64) -> TriageResult<u32> {
    if budget <= 0 {
        return Err(TriageError::InvalidBudget(format!(
            "{} hours; the budget must be a positive integer",
            budget
        )));
    }
    u32::try_from(budget).map_err(|_| {
        TriageError::InvalidBudget(format!("{} hours exceeds the maximum of {}", budget, u32::MAX))
    })
}

/// Validate, classify and score a batch of raw records, then order it by id.
///
/// # Arguments
/// * `records` - Raw records in entry order.
/// * `engine` - The scoring engine to apply.
///
/// # Returns
/// The scored batch sorted by ascending id (stable for duplicate ids), or
/// the first validation error with the offending record's position.
pub fn ingest_batch(records: &[RawThreat], engine: &ScoringEngine) -> TriageResult<ThreatSet> {
    let mut threats = records
        .iter()
        .enumerate()
        .map(|(index, raw)| intake_threat(index, raw, engine))
        .collect::<TriageResult<ThreatSet>>()?;

    sort_by_id(&mut threats);

    log::info!(
        "[INTAKE] Ingested {} threats ({:?} scoring policy)",
        threats.len(),
        engine.policy(),
    );

    Ok(threats)
}

/// Validate and score a single raw record.
///
/// `index` is the record's position in the batch and only feeds the error
/// message.
pub fn intake_threat(index: usize, raw: &RawThreat, engine: &ScoringEngine) -> TriageResult<Threat> {
    let base_severity = non_negative(index, "base_severity", raw.base_severity)?;
    let pre_deform_percent = non_negative(index, "pre_deform_percent", raw.pre_deform_percent)?;
    if raw.resource_cost <= 0 {
        return Err(TriageError::Validation {
            index,
            field: "resource_cost",
            reason: format!("{} hours; the resource cost must be positive", raw.resource_cost),
        });
    }
    let resource_cost = non_negative(index, "resource_cost", raw.resource_cost)?;

    let ip = raw.ip.trim().to_string();
    if ip.is_empty() {
        return Err(TriageError::Validation {
            index,
            field: "ip",
            reason: "the IP address must not be empty".to_string(),
        });
    }

    let location = supplied(&raw.location)
        .unwrap_or_else(|| classify::infer_location(&ip).to_string());
    let threat_type = supplied(&raw.threat_type)
        .unwrap_or_else(|| classify::infer_type(&ip, base_severity, pre_deform_percent).to_string());

    // Status guessed before scoring uses the amplified severity without the
    // type bonus; it is re-guessed once the final severity is known.
    let supplied_status = supplied(&raw.status);
    let status_inferred = supplied_status.is_none();
    let mut status = supplied_status.unwrap_or_else(|| {
        let amplified = engine.score(base_severity, pre_deform_percent, "");
        classify::infer_status(amplified, pre_deform_percent).to_string()
    });

    let mut threat = Threat {
        id: raw.id,
        base_severity,
        resource_cost,
        pre_deform_percent,
        severity: 0,
        ip,
        threat_type,
        location,
        status: String::new(),
    };
    threat.severity = engine.score(base_severity, pre_deform_percent, &threat.threat_type);

    if let Some(critical) = engine.derive_status(&threat) {
        status = critical.to_string();
    } else if status_inferred {
        status = classify::infer_status(threat.severity, pre_deform_percent).to_string();
    }
    threat.status = status;

    log::debug!("[INTAKE] Scored {}", crate::scoring::format_threat(&threat));

    Ok(threat)
}

fn non_negative(index: usize, field: &'static str, value: i64) -> TriageResult<u32> {
    if value < 0 {
        return Err(TriageError::Validation {
            index,
            field,
            reason: format!("{} is negative", value),
        });
    }
    u32::try_from(value).map_err(|_| TriageError::Validation {
        index,
        field,
        reason: format!("{} exceeds the maximum of {}", value, u32::MAX),
    })
}

/// A caller-supplied optional field, treating blank strings as absent.
fn supplied(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
