//! # Triage Session
//!
//! Owns the current threat batch and its budget, and exposes every core
//! operation against them. A batch is replaced only by a fully valid new
//! batch; a rejected intake leaves the previous one untouched.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::intake::{self, RawThreat};
use crate::query;
use crate::report::writer;
use crate::scoring::ScoringEngine;
use crate::selection;
use crate::{
    Selection, SeverityPolicy, Summary, Threat, ThreatSet, TriageConfig, TriageError,
    TriageResult,
};

/// Machine-readable result of analysing a batch.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Utc>,
    pub policy: SeverityPolicy,
    pub summary: Summary,
    pub threats: ThreatSet,
    pub greedy: Selection,
    pub optimal: Selection,
}

/// The state of one interactive or batch run.
pub struct Session {
    config: TriageConfig,
    engine: ScoringEngine,
    threats: ThreatSet,
    budget: u32,
}

impl Session {
    /// Create an empty session.
    pub fn new(config: &TriageConfig) -> Self {
        Self {
            config: config.clone(),
            engine: ScoringEngine::new(&config.scoring),
            threats: Vec::new(),
            budget: 0,
        }
    }

    pub fn config(&self) -> &TriageConfig {
        &self.config
    }

    /// The current batch, ordered by id.
    pub fn threats(&self) -> &[Threat] {
        &self.threats
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }

    pub fn has_data(&self) -> bool {
        !self.threats.is_empty()
    }

    /// Validate, score and sort a new batch, replacing the current one.
    ///
    /// # Arguments
    /// * `records` - Raw records as entered.
    /// * `budget` - Response hours as entered; must be positive.
    ///
    /// # Returns
    /// The newly ingested batch. On error the session keeps its previous
    /// batch and budget.
    pub fn load_batch(&mut self, records: &[RawThreat], budget: i64) -> TriageResult<&[Threat]> {
        let budget = intake::validate_budget(budget)?;
        let threats = intake::ingest_batch(records, &self.engine)?;

        self.threats = threats;
        self.budget = budget;
        Ok(&self.threats)
    }

    /// Greedy ratio selection over the current batch.
    pub fn greedy(&self) -> TriageResult<Selection> {
        let selection = selection::select_greedy(&self.threats, self.budget, &self.config.selection)?;
        self.warn_if_advisory(&selection);
        Ok(selection)
    }

    /// Exact knapsack selection over the current batch.
    pub fn optimal(&self) -> TriageResult<Selection> {
        let selection =
            selection::select_optimal(&self.threats, self.budget, &self.config.selection)?;
        self.warn_if_advisory(&selection);
        Ok(selection)
    }

    fn warn_if_advisory(&self, selection: &Selection) {
        if selection.over_budget_advisory {
            log::warn!(
                "[SELECTION] {:?} selection uses {}h, above the {}h advisory threshold",
                selection.strategy,
                selection.total_hours,
                self.config.selection.advisory_hours,
            );
        }
    }

    /// The `n` most severe threats. `n` must be positive.
    pub fn top_n(&self, n: i64) -> TriageResult<Vec<Threat>> {
        if n <= 0 {
            return Err(TriageError::InvalidQuery(format!(
                "top-N count {} must be a positive integer",
                n
            )));
        }
        let n = usize::try_from(n).unwrap_or(usize::MAX);
        query::top_n(&self.threats, n)
    }

    pub fn find_by_ip(&self, ip: &str) -> Vec<Threat> {
        query::find_by_ip(&self.threats, ip)
    }

    pub fn count_by_type(&self) -> HashMap<String, usize> {
        query::count_by_type(&self.threats)
    }

    pub fn summary(&self) -> Summary {
        query::summary(&self.threats, self.budget)
    }

    /// Write the full batch dump to the configured export path.
    pub fn export(&self) -> TriageResult<()> {
        writer::export_batch(&self.config.report.export_path, &self.threats, self.budget)
    }

    /// Run both selections and gather everything into one report.
    pub fn analyze(&self) -> TriageResult<AnalysisReport> {
        Ok(AnalysisReport {
            generated_at: Utc::now(),
            policy: self.engine.policy(),
            summary: self.summary(),
            threats: self.threats.clone(),
            greedy: self.greedy()?,
            optimal: self.optimal()?,
        })
    }
}
