//! # Interactive Console
//!
//! The numbered text menu. Reads choices and fields through a
//! [`Prompter`], runs the requested operation on the [`Session`], and hands
//! the rendered blocks to the [`Reporter`].
//!
//! Input problems (bad menu choice, bad top-N count, rejected batch) are
//! shown as notices and the menu comes back. The loop ends on choice 9 or
//! when the input is exhausted.

use std::io::{BufRead, Write};

use crate::intake::prompt::Prompter;
use crate::report::{render, Palette, Reporter, Tone};
use crate::session::Session;
use crate::{Selection, TriageResult};

const MENU_TITLE: &str = "\n================= CYBER THREAT RESPONSE SYSTEM =================";

const MENU_ITEMS: [&str; 9] = [
    "1. Input Threat Data",
    "2. Display All Threats",
    "3. Run Greedy Optimization",
    "4. Run Dynamic Programming Optimization",
    "5. Show Top N Most Severe Threats",
    "6. Search Threat by IP Address",
    "7. Count Threats by Type",
    "8. Show System Summary",
    "9. Exit",
];

const NO_DATA: &str = "No threat data available. Please input data first.";

/// What the loop should do after handling a choice.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// The interactive menu loop.
pub struct Console<R, W> {
    prompter: Prompter<R, W>,
    session: Session,
    reporter: Reporter,
    palette: Palette,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(prompter: Prompter<R, W>, session: Session, reporter: Reporter) -> Self {
        let palette = Palette::from_flag(session.config().report.color);
        Self {
            prompter,
            session,
            reporter,
            palette,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Hand back the prompter and session once the loop is done.
    pub fn into_parts(self) -> (Prompter<R, W>, Session) {
        (self.prompter, self.session)
    }

    /// Run the menu until the user exits or the input ends.
    pub fn run(&mut self) -> TriageResult<()> {
        loop {
            self.print_menu()?;
            let Some(choice) = self.prompter.ask_line("Enter your choice: ")? else {
                log::info!("[CONSOLE] Input closed, leaving menu");
                return Ok(());
            };
            if self.handle(&choice)? == Flow::Exit {
                return Ok(());
            }
        }
    }

    fn print_menu(&mut self) -> TriageResult<()> {
        let title = self.palette.paint(Tone::Info, MENU_TITLE);
        let items = self.palette.paint(Tone::Menu, &MENU_ITEMS.join("\n"));
        let out = self.prompter.output();
        writeln!(out, "{}", title)?;
        writeln!(out, "{}", items)?;
        Ok(())
    }

    fn handle(&mut self, choice: &str) -> TriageResult<Flow> {
        match choice {
            "1" => self.input_batch()?,
            "9" => {
                self.reporter.notice(Tone::Highlight, "Exiting program. Goodbye!");
                return Ok(Flow::Exit);
            }
            "2" | "3" | "4" | "5" | "6" | "7" | "8" if !self.session.has_data() => {
                self.reporter.notice(Tone::Danger, NO_DATA);
            }
            "2" => self.show_threats(),
            "3" => self.run_greedy(),
            "4" => self.run_optimal(),
            "5" => self.show_top_n()?,
            "6" => self.search_ip()?,
            "7" => self.show_type_counts(),
            "8" => self.show_summary(),
            _ => {
                self.reporter
                    .notice(Tone::Danger, "Invalid choice! Please enter a valid option.");
            }
        }
        Ok(Flow::Continue)
    }

    fn input_batch(&mut self) -> TriageResult<()> {
        let Some((records, budget)) = self.prompter.read_batch()? else {
            return Ok(());
        };

        if let Err(e) = self.session.load_batch(&records, budget) {
            log::warn!("[CONSOLE] Batch rejected: {}", e);
            self.reporter.notice(Tone::Danger, &format!("Batch rejected: {}", e));
            return Ok(());
        }

        if let Err(e) = self.session.export() {
            log::error!("[CONSOLE] Export failed: {}", e);
            self.reporter
                .notice(Tone::Danger, &format!("Could not save threat data: {}", e));
        } else {
            let path = self.session.config().report.export_path.display().to_string();
            self.reporter
                .notice(Tone::Success, &format!("Threat data saved to {}", path));
        }

        self.show_threats();
        self.run_greedy();
        self.run_optimal();
        self.reporter
            .notice(Tone::Success, "Threat data input and analysis complete.");
        Ok(())
    }

    fn show_threats(&mut self) {
        let block = render::threat_list("Threats Sorted by ID:", self.session.threats());
        self.reporter.emit(&block);
    }

    fn run_greedy(&mut self) {
        let result = self.session.greedy();
        self.show_selection(result);
    }

    fn run_optimal(&mut self) {
        let result = self.session.optimal();
        self.show_selection(result);
    }

    fn show_selection(&mut self, result: TriageResult<Selection>) {
        match result {
            Ok(selection) => {
                self.reporter.emit(&render::selection_block(&selection));
                let threshold = self.session.config().selection.advisory_hours;
                if let Some(message) = render::advisory_message(&selection, threshold) {
                    self.reporter.notice(Tone::Danger, &message);
                }
            }
            Err(e) => {
                log::error!("[CONSOLE] Selection failed: {}", e);
                self.reporter.notice(Tone::Danger, &e.to_string());
            }
        }
    }

    fn show_top_n(&mut self) -> TriageResult<()> {
        let Some(answer) = self
            .prompter
            .ask_line("Enter N to show top N most severe threats: ")?
        else {
            return Ok(());
        };

        match answer.parse::<i64>().ok().map(|n| (n, self.session.top_n(n))) {
            Some((n, Ok(top))) => {
                let n = usize::try_from(n).unwrap_or(usize::MAX);
                self.reporter.emit(&render::top_n_block(n, &top));
            }
            _ => self.reporter.notice(Tone::Danger, "Invalid number."),
        }
        Ok(())
    }

    fn search_ip(&mut self) -> TriageResult<()> {
        let Some(ip) = self.prompter.ask_line("Enter IP Address to search: ")? else {
            return Ok(());
        };

        let found = self.session.find_by_ip(&ip);
        if found.is_empty() {
            self.reporter
                .notice(Tone::Warning, &format!("No threat found with IP {}.", ip));
        } else {
            self.reporter.emit(&render::search_block(&ip, &found));
        }
        Ok(())
    }

    fn show_type_counts(&mut self) {
        let counts = self.session.count_by_type();
        self.reporter.emit(&render::type_counts_block(&counts));
    }

    fn show_summary(&mut self) {
        let summary = self.session.summary();
        self.reporter.emit(&render::summary_block(&summary));
    }
}
