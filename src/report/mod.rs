//! # Report Output
//!
//! Delivers rendered report blocks to their destinations.
//!
//! Sinks:
//! - [`ConsoleSink`] - bordered boxes on a terminal or any writer, colored
//!   through an injected [`Palette`].
//! - [`FileSink`] - appends every block to the report file.
//!
//! The [`Reporter`] fans each block out to all registered sinks, one at a
//! time. A failing sink is logged and skipped; it never aborts the report
//! or the session.

pub mod render;
pub mod writer;

use std::io::Write;
use std::path::{Path, PathBuf};

pub use render::{Palette, ReportBlock, Tone};

use crate::{ReportConfig, TriageResult};

/// A destination for report blocks.
pub trait ReportSink {
    fn name(&self) -> &str;

    /// Deliver one block.
    fn emit(&mut self, block: &ReportBlock) -> TriageResult<()>;

    /// Deliver a one-line notice (advisories, "no data" messages).
    /// Sinks that only keep full reports ignore notices.
    fn notice(&mut self, _tone: Tone, _message: &str) -> TriageResult<()> {
        Ok(())
    }
}

/// Draws blocks as boxes on a writer.
pub struct ConsoleSink<W: Write> {
    out: W,
    palette: Palette,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W, palette: Palette) -> Self {
        Self { out, palette }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for ConsoleSink<W> {
    fn name(&self) -> &str {
        "console"
    }

    fn emit(&mut self, block: &ReportBlock) -> TriageResult<()> {
        self.out
            .write_all(render::draw_box(block, &self.palette).as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    fn notice(&mut self, tone: Tone, message: &str) -> TriageResult<()> {
        writeln!(self.out, "{}", self.palette.paint(tone, message))?;
        self.out.flush()?;
        Ok(())
    }
}

/// Appends blocks to a report file.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for FileSink {
    fn name(&self) -> &str {
        "file"
    }

    fn emit(&mut self, block: &ReportBlock) -> TriageResult<()> {
        writer::append_block(&self.path, &block.lines)
    }
}

/// Fans report blocks out to every registered sink.
#[derive(Default)]
pub struct Reporter {
    sinks: Vec<Box<dyn ReportSink>>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard setup: colored console on stdout plus the report file,
    /// truncated first when configured.
    pub fn from_config(config: &ReportConfig) -> TriageResult<Self> {
        if config.truncate_on_start {
            writer::truncate_report(&config.report_path)?;
        }

        let mut reporter = Self::new();
        reporter.add_sink(ConsoleSink::new(
            std::io::stdout(),
            Palette::from_flag(config.color),
        ));
        reporter.add_sink(FileSink::new(config.report_path.clone()));
        Ok(reporter)
    }

    pub fn add_sink(&mut self, sink: impl ReportSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    /// Send a block to every sink. Returns how many sinks accepted it.
    pub fn emit(&mut self, block: &ReportBlock) -> usize {
        let mut delivered = 0;
        for sink in &mut self.sinks {
            match sink.emit(block) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    log::error!("[REPORT] {} sink failed to write block: {}", sink.name(), e);
                }
            }
        }
        delivered
    }

    /// Send a notice to every sink that shows notices.
    pub fn notice(&mut self, tone: Tone, message: &str) {
        for sink in &mut self.sinks {
            if let Err(e) = sink.notice(tone, message) {
                log::error!("[REPORT] {} sink failed to write notice: {}", sink.name(), e);
            }
        }
    }
}
