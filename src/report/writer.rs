//! # Report Files
//!
//! Two flat text outputs:
//! - The running report: every rendered block appended after a
//!   `------------------------------` separator line.
//! - The batch export: every field and the computed severity of every
//!   threat, one record per block, each closed by a
//!   `-------------------------` separator line.
//!
//! Both are human-readable dumps. Nothing reads them back.

use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::{Threat, TriageResult};

/// Separator written before each appended report block.
pub const BLOCK_SEPARATOR: &str = "------------------------------";

/// Separator written after each threat in the batch export.
pub const RECORD_SEPARATOR: &str = "-------------------------";

/// Create the parent directory of `path` when it is missing.
fn ensure_parent(path: &Path) -> TriageResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Append one block of lines to the report file.
///
/// Creates the file and parent directories if they don't exist.
pub fn append_block(path: &Path, lines: &[String]) -> TriageResult<()> {
    ensure_parent(path)?;

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    writeln!(file, "{}", BLOCK_SEPARATOR)?;
    for line in lines {
        writeln!(file, "{}", line)?;
    }
    writeln!(file)?;
    file.flush()?;

    Ok(())
}

/// Empty the report file, creating it if needed.
pub fn truncate_report(path: &Path) -> TriageResult<()> {
    ensure_parent(path)?;
    std::fs::File::create(path)?;
    log::debug!("[REPORT] Truncated {}", path.display());
    Ok(())
}

/// Write the full batch dump to `path`, replacing any previous export.
pub fn export_batch(path: &Path, threats: &[Threat], budget: u32) -> TriageResult<()> {
    ensure_parent(path)?;

    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    write_export(&mut file, threats, budget, Utc::now())?;
    file.flush()?;

    log::info!(
        "[REPORT] Exported {} threats to {}",
        threats.len(),
        path.display()
    );
    Ok(())
}

/// Write the batch dump to any writer.
pub fn write_export<W: Write>(
    out: &mut W,
    threats: &[Threat],
    budget: u32,
    generated_at: DateTime<Utc>,
) -> TriageResult<()> {
    writeln!(out, "========= Threats Report =========")?;
    writeln!(out, "Generated: {}", generated_at.to_rfc3339())?;
    writeln!(out, "Total Available Resource Limit (hours): {}", budget)?;
    writeln!(out)?;

    for t in threats {
        writeln!(out, "ID: {}", t.id)?;
        writeln!(out, "Base Severity: {}", t.base_severity)?;
        writeln!(out, "Response Time (hours): {}", t.resource_cost)?;
        writeln!(out, "IP Address: {}", t.ip)?;
        writeln!(out, "Location: {}", t.location)?;
        writeln!(out, "Type: {}", t.threat_type)?;
        writeln!(out, "Pre-Deformation %: {}", t.pre_deform_percent)?;
        writeln!(out, "Computed Severity: {}", t.severity)?;
        writeln!(out, "Status: {}", t.status)?;
        writeln!(out, "{}", RECORD_SEPARATOR)?;
    }

    Ok(())
}
