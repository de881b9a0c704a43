//! # Severity Scoring Engine
//!
//! Turns the raw attributes of a threat record into its severity value.
//!
//! ## Scoring Model
//!
//! ```text
//! severity = base + floor(base * pre_deform_percent / 100) + type_bonus
//! ```
//!
//! Type bonuses:
//! - Malware, Virus, Ransomware: +15
//! - DDoS:                       +10
//! - Spyware:                    +5
//! - anything else:              +0
//!
//! The [`SeverityPolicy`] decides the rest. `Clamped` caps severity at 100
//! and marks threats Critical from 90 upward. `Legacy` leaves severity
//! uncapped and marks Malware/Virus threats Critical when their
//! pre-deformation exceeds 40%.

use crate::{ScoringConfig, SeverityPolicy, Threat};

/// Status label assigned when the policy flags a threat as critical.
pub const CRITICAL_STATUS: &str = "Critical";

/// Upper bound on severity under the clamped policy.
pub const SEVERITY_CAP: u32 = 100;

/// Severity at or above which the clamped policy flags Critical.
pub const CRITICAL_SEVERITY: u32 = 90;

/// Pre-deformation percentage above which the legacy policy flags
/// Malware/Virus threats Critical.
pub const LEGACY_CRITICAL_DEFORM: u32 = 40;

/// Pure severity calculator. Holds only its policy switches.
#[derive(Debug, Clone, Copy)]
pub struct ScoringEngine {
    policy: SeverityPolicy,
    case_insensitive_types: bool,
}

impl ScoringEngine {
    /// Create a scoring engine from configuration.
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            policy: config.policy,
            case_insensitive_types: config.case_insensitive_types,
        }
    }

    /// Create a scoring engine with the given policy and exact type
    /// matching.
    pub fn with_policy(policy: SeverityPolicy) -> Self {
        Self {
            policy,
            case_insensitive_types: false,
        }
    }

    pub fn policy(&self) -> SeverityPolicy {
        self.policy
    }

    /// Compute the severity of a threat.
    ///
    /// # Arguments
    /// * `base_severity` - Raw severity, nominally 0-100.
    /// * `pre_deform_percent` - Amplification percentage.
    /// * `threat_type` - Threat category used for the bonus lookup.
    ///
    /// # Returns
    /// The finished severity. Saturates at `u32::MAX` under the legacy
    /// policy rather than wrapping.
    pub fn score(&self, base_severity: u32, pre_deform_percent: u32, threat_type: &str) -> u32 {
        let base = u64::from(base_severity);
        let amplified = base + base * u64::from(pre_deform_percent) / 100;
        let raw = amplified + u64::from(self.type_bonus(threat_type));

        match self.policy {
            SeverityPolicy::Clamped => raw.min(u64::from(SEVERITY_CAP)) as u32,
            SeverityPolicy::Legacy => u32::try_from(raw).unwrap_or(u32::MAX),
        }
    }

    /// Additive bonus for the threat category. Unrecognized types get 0.
    pub fn type_bonus(&self, threat_type: &str) -> u32 {
        if self.type_is(threat_type, "Malware")
            || self.type_is(threat_type, "Virus")
            || self.type_is(threat_type, "Ransomware")
        {
            15
        } else if self.type_is(threat_type, "DDoS") {
            10
        } else if self.type_is(threat_type, "Spyware") {
            5
        } else {
            0
        }
    }

    /// Whether the policy flags this threat as Critical.
    pub fn is_critical(&self, severity: u32, pre_deform_percent: u32, threat_type: &str) -> bool {
        match self.policy {
            SeverityPolicy::Clamped => severity >= CRITICAL_SEVERITY,
            SeverityPolicy::Legacy => {
                (self.type_is(threat_type, "Malware") || self.type_is(threat_type, "Virus"))
                    && pre_deform_percent > LEGACY_CRITICAL_DEFORM
            }
        }
    }

    /// Re-evaluate status after scoring: returns `Some("Critical")` when the
    /// policy fires, `None` to leave the current status in place.
    pub fn derive_status(&self, threat: &Threat) -> Option<&'static str> {
        self.is_critical(threat.severity, threat.pre_deform_percent, &threat.threat_type)
            .then_some(CRITICAL_STATUS)
    }

    fn type_is(&self, threat_type: &str, name: &str) -> bool {
        if self.case_insensitive_types {
            threat_type.eq_ignore_ascii_case(name)
        } else {
            threat_type == name
        }
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::with_policy(SeverityPolicy::Clamped)
    }
}

/// Display band for a severity value.
pub fn severity_label(severity: u32) -> &'static str {
    match severity {
        s if s >= 90 => "CRITICAL",
        s if s >= 70 => "HIGH",
        s if s >= 50 => "MEDIUM",
        s if s >= 30 => "LOW",
        _ => "MINIMAL",
    }
}

/// Format a threat as a compact string for logging.
///
/// Example: "#7 10.0.0.4 Malware SEV 85 HIGH [4h]"
pub fn format_threat(threat: &Threat) -> String {
    format!(
        "#{} {} {} SEV {} {} [{}h]",
        threat.id,
        threat.ip,
        threat.threat_type,
        threat.severity,
        severity_label(threat.severity),
        threat.resource_cost,
    )
}
