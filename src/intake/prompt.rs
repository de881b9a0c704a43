//! # Interactive Prompting
//!
//! Field-by-field entry of a threat batch over any line-oriented input.
//! Invalid answers (non-integers, out-of-range numbers, blank required
//! fields) are reported and the same question is asked again, so a typo
//! never throws away the records already entered.
//!
//! Every read returns `Ok(None)` once the input is exhausted.

use std::io::{BufRead, Write};

use super::{validate_budget, RawThreat};
use crate::TriageResult;

/// Line-oriented prompt adapter over an input and an output stream.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Mutable access to the output stream, for menus and notices.
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// Print `label` and read one trimmed line.
    pub fn ask_line(&mut self, label: &str) -> TriageResult<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Ask for an integer until one passes `accept`.
    ///
    /// # Arguments
    /// * `label` - The prompt text.
    /// * `retry` - The message shown before asking again.
    /// * `accept` - Range check applied to parsed integers.
    pub fn ask_integer(
        &mut self,
        label: &str,
        retry: &str,
        accept: impl Fn(i64) -> bool,
    ) -> TriageResult<Option<i64>> {
        let mut prompt = label.to_string();
        loop {
            let Some(answer) = self.ask_line(&prompt)? else {
                return Ok(None);
            };
            match answer.parse::<i64>() {
                Ok(value) if accept(value) => return Ok(Some(value)),
                _ => {
                    log::debug!("[PROMPT] Rejected answer {:?} for {:?}", answer, label);
                    prompt = retry.to_string();
                }
            }
        }
    }

    /// Ask for a non-empty string.
    pub fn ask_required(&mut self, label: &str, retry: &str) -> TriageResult<Option<String>> {
        let mut prompt = label.to_string();
        loop {
            match self.ask_line(&prompt)? {
                None => return Ok(None),
                Some(answer) if !answer.is_empty() => return Ok(Some(answer)),
                Some(_) => prompt = retry.to_string(),
            }
        }
    }

    /// Ask for an optional string; a blank answer means "infer it".
    pub fn ask_optional(&mut self, label: &str) -> TriageResult<Option<Option<String>>> {
        Ok(self
            .ask_line(label)?
            .map(|answer| (!answer.is_empty()).then_some(answer)))
    }

    /// Prompt for every field of one threat record.
    ///
    /// `ordinal` is the 1-based position shown in the header.
    pub fn read_record(&mut self, ordinal: usize) -> TriageResult<Option<RawThreat>> {
        writeln!(self.output, "\n--- Threat {} ---", ordinal)?;

        let Some(id) = self.ask_integer("ID: ", "Invalid ID. Enter integer: ", |_| true)? else {
            return Ok(None);
        };
        let Some(base_severity) = self.ask_integer(
            "Base Severity (0-100): ",
            "Invalid severity. Enter non-negative integer: ",
            fits_u32,
        )?
        else {
            return Ok(None);
        };
        let Some(resource_cost) = self.ask_integer(
            "Response Time (hours, positive): ",
            "Resource cost must be positive. Enter integer (>0): ",
            |v| v > 0 && fits_u32(v),
        )?
        else {
            return Ok(None);
        };
        let Some(ip) = self.ask_required("IP Address: ", "IP address is required. IP Address: ")?
        else {
            return Ok(None);
        };
        let Some(pre_deform_percent) = self.ask_integer(
            "Pre-Deformation Percentage (0 if none): ",
            "Invalid percentage. Enter non-negative integer: ",
            fits_u32,
        )?
        else {
            return Ok(None);
        };
        let Some(threat_type) = self.ask_optional("Type (Malware/DDoS/etc, blank to infer): ")?
        else {
            return Ok(None);
        };
        let Some(status) = self.ask_optional("Status (Detected/Responded/etc, blank to infer): ")?
        else {
            return Ok(None);
        };

        Ok(Some(RawThreat {
            id,
            base_severity,
            resource_cost,
            pre_deform_percent,
            ip,
            location: None,
            threat_type,
            status,
        }))
    }

    /// Prompt for a whole batch: the count, each record, then the budget.
    ///
    /// # Returns
    /// `Ok(None)` when the input ends before the batch is complete, or when
    /// the count is not a positive integer (the caller returns to its menu).
    pub fn read_batch(&mut self) -> TriageResult<Option<(Vec<RawThreat>, i64)>> {
        let Some(answer) = self.ask_line("Enter number of detected threats: ")? else {
            return Ok(None);
        };
        let count = match answer.parse::<usize>() {
            Ok(n) if n > 0 => n,
            _ => {
                writeln!(self.output, "Invalid number.")?;
                return Ok(None);
            }
        };

        let mut records = Vec::with_capacity(count);
        for ordinal in 1..=count {
            let Some(record) = self.read_record(ordinal)? else {
                return Ok(None);
            };
            records.push(record);
        }

        let Some(budget) = self.ask_integer(
            "Enter total available resource limit (hours): ",
            "Invalid resource limit. Enter positive integer: ",
            |v| validate_budget(v).is_ok(),
        )?
        else {
            return Ok(None);
        };

        Ok(Some((records, budget)))
    }
}

/// Non-negative and small enough to store; the same bound intake enforces.
fn fits_u32(value: i64) -> bool {
    u32::try_from(value).is_ok()
}
