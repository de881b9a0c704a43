//! # Report Rendering
//!
//! Builds the text blocks every report sink consumes, and draws them as
//! bordered console boxes:
//!
//! ```text
//! +------------------------------------------+
//! | Greedy Selection (Severity/Cost Ratio):  |
//! | Total Severity: 70, Hours Used: 10       |
//! +------------------------------------------+
//! ```
//!
//! Rendering is pure. Colors come from an injected [`Palette`], never from
//! global constants.

use std::collections::{BTreeMap, HashMap};

use crate::{Selection, SelectionStrategy, Summary, Threat};

/// Emphasis of a block or notice. Sinks map it to a color, or ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Warning,
    Danger,
    Highlight,
    Menu,
}

/// An ordered group of report lines with its emphasis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportBlock {
    pub tone: Tone,
    pub lines: Vec<String>,
}

impl ReportBlock {
    pub fn new(tone: Tone, title: impl Into<String>) -> Self {
        Self {
            tone,
            lines: vec![title.into()],
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }
}

/// Maps tones to terminal styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

const RESET: &str = "\x1b[0m";

impl Palette {
    /// ANSI bright colors.
    pub fn ansi() -> Self {
        Self { enabled: true }
    }

    /// No styling at all.
    pub fn plain() -> Self {
        Self { enabled: false }
    }

    pub fn from_flag(color: bool) -> Self {
        if color {
            Self::ansi()
        } else {
            Self::plain()
        }
    }

    /// Wrap `text` in the color for `tone`.
    pub fn paint(&self, tone: Tone, text: &str) -> String {
        if !self.enabled {
            return text.to_string();
        }
        let code = match tone {
            Tone::Info => "\x1b[96m",
            Tone::Success => "\x1b[92m",
            Tone::Warning => "\x1b[93m",
            Tone::Danger => "\x1b[91m",
            Tone::Highlight => "\x1b[94m",
            Tone::Menu => "\x1b[95m",
        };
        format!("{}{}{}", code, text, RESET)
    }
}

/// Draw `block` as a bordered box. Borders take the block's tone; the
/// text itself stays unstyled.
pub fn draw_box(block: &ReportBlock, palette: &Palette) -> String {
    let width = block
        .lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0);
    let border = format!("+{}+", "-".repeat(width + 2));

    let mut out = String::new();
    out.push_str(&palette.paint(block.tone, &border));
    out.push('\n');
    for line in &block.lines {
        let pad = width - line.chars().count();
        out.push_str(&palette.paint(block.tone, "| "));
        out.push_str(line);
        out.push_str(&" ".repeat(pad));
        out.push_str(&palette.paint(block.tone, " |"));
        out.push('\n');
    }
    out.push_str(&palette.paint(block.tone, &border));
    out.push_str("\n\n");
    out
}

fn cost_line(threat: &Threat) -> String {
    format!(
        "ID: {}, Severity: {}, Hours: {}",
        threat.id, threat.severity, threat.resource_cost
    )
}

fn attribute_line(threat: &Threat) -> String {
    format!(
        "IP: {}, Type: {}, Location: {}, Status: {}",
        threat.ip, threat.threat_type, threat.location, threat.status
    )
}

fn push_threats(block: &mut ReportBlock, threats: &[Threat]) {
    for threat in threats {
        block.push(cost_line(threat));
        block.push(attribute_line(threat));
    }
}

/// The batch listing, two lines per threat.
pub fn threat_list(header: &str, threats: &[Threat]) -> ReportBlock {
    let mut block = ReportBlock::new(Tone::Info, header);
    push_threats(&mut block, threats);
    block
}

/// A selection result with its totals and chosen threats.
pub fn selection_block(selection: &Selection) -> ReportBlock {
    let (tone, title, total_label) = match selection.strategy {
        SelectionStrategy::Greedy => (
            Tone::Warning,
            "Greedy Selection (Severity/Cost Ratio):",
            "Total Severity",
        ),
        SelectionStrategy::Optimal => (
            Tone::Success,
            "Dynamic Programming Optimization:",
            "Max Severity",
        ),
    };

    let mut block = ReportBlock::new(tone, title);
    block.push(format!(
        "{}: {}, Hours Used: {}",
        total_label, selection.total_severity, selection.total_hours
    ));
    block.push("Chosen Threats:");
    push_threats(&mut block, &selection.chosen);
    block
}

/// Advisory text for a selection over the hour threshold, if raised.
pub fn advisory_message(selection: &Selection, advisory_hours: u64) -> Option<String> {
    if !selection.over_budget_advisory {
        return None;
    }
    Some(match selection.strategy {
        SelectionStrategy::Greedy => format!(
            "ALERT: Greedy response takes more than {} hours! Consider reviewing selection.",
            advisory_hours
        ),
        SelectionStrategy::Optimal => format!(
            "ALERT: DP response takes more than {} hours! Consider revising resource allocation.",
            advisory_hours
        ),
    })
}

pub fn top_n_block(n: usize, threats: &[Threat]) -> ReportBlock {
    let mut block = ReportBlock::new(Tone::Highlight, format!("Top {} Most Severe Threats:", n));
    push_threats(&mut block, threats);
    block
}

/// Search hits. The IP is in the title, so each hit omits it.
pub fn search_block(ip: &str, threats: &[Threat]) -> ReportBlock {
    let mut block = ReportBlock::new(Tone::Success, format!("Search Results for IP: {}", ip));
    for threat in threats {
        block.push(cost_line(threat));
        block.push(format!(
            "Type: {}, Location: {}, Status: {}",
            threat.threat_type, threat.location, threat.status
        ));
    }
    block
}

/// Type counts, listed alphabetically.
pub fn type_counts_block(counts: &HashMap<String, usize>) -> ReportBlock {
    let mut block = ReportBlock::new(Tone::Highlight, "Threat Counts by Type:");
    let ordered: BTreeMap<&String, &usize> = counts.iter().collect();
    for (threat_type, count) in ordered {
        block.push(format!("{}: {}", threat_type, count));
    }
    block
}

pub fn summary_block(summary: &Summary) -> ReportBlock {
    let mut block = ReportBlock::new(Tone::Warning, "System Summary:");
    block.push(format!("Total Threats: {}", summary.count));
    block.push(format!("Total Response Hours Needed: {}", summary.total_hours));
    block.push(format!("Total Severity Score: {}", summary.total_severity));
    block.push(format!("Available Response Hours: {}", summary.budget));
    block
}
