//! # Threat Triage - CLI Entry Point
//!
//! Commands:
//! - `interactive` - Numbered menu for entering and analysing a batch
//! - `analyze`     - Analyse a TOML batch file without prompting
//! - `init-config` - Generate a default configuration file

use clap::{Parser, Subcommand};
use log::{info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use threat_triage::console::Console;
use threat_triage::intake::prompt::Prompter;
use threat_triage::intake::BatchFile;
use threat_triage::report::{render, Reporter, Tone};
use threat_triage::session::Session;
use threat_triage::{TriageConfig, TriageError, TriageResult};

/// Threat Triage - score security threats and choose which to respond to
/// within a fixed budget of response hours.
#[derive(Parser, Debug)]
#[command(name = "threat-triage")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, default_value = "threat-triage.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the interactive menu (default).
    Interactive,

    /// Analyse a batch file: list, greedy, optimal, summary and export.
    Analyze {
        /// TOML file with `budget` and `[[threats]]` entries.
        batch: PathBuf,

        /// Print the analysis as JSON instead of boxed text.
        #[arg(long)]
        json: bool,
    },

    /// Generate a default configuration file.
    InitConfig,
}

fn main() -> TriageResult<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => cmd_interactive(&cli.config),
        Commands::Analyze { batch, json } => cmd_analyze(&cli.config, &batch, json),
        Commands::InitConfig => cmd_init_config(&cli.config),
    }
}

/// Load the configuration file, or fall back to defaults when it is absent.
fn load_config(config_path: &Path) -> TriageResult<TriageConfig> {
    if config_path.exists() {
        info!("Loading configuration from: {}", config_path.display());
        TriageConfig::from_file(config_path)
    } else {
        info!("No config file found, using defaults. Run 'init-config' to generate one.");
        Ok(TriageConfig::default())
    }
}

/// Run the numbered menu on stdin/stdout.
fn cmd_interactive(config_path: &Path) -> TriageResult<()> {
    let config = load_config(config_path)?;
    let reporter = Reporter::from_config(&config.report)?;
    let session = Session::new(&config);

    let stdin = std::io::stdin();
    let prompter = Prompter::new(stdin.lock(), std::io::stdout());

    let mut console = Console::new(prompter, session, reporter);
    console.run()?;

    info!(
        "Session ended with {} threats loaded",
        console.session().threats().len()
    );
    Ok(())
}

/// Analyse a batch file in one pass.
fn cmd_analyze(config_path: &Path, batch_path: &Path, json: bool) -> TriageResult<()> {
    let config = load_config(config_path)?;
    let batch = BatchFile::from_file(batch_path)?;
    info!(
        "Loaded {} records from {}",
        batch.threats.len(),
        batch_path.display()
    );

    let mut session = Session::new(&config);
    session.load_batch(&batch.threats, batch.budget)?;

    if let Err(e) = session.export() {
        warn!("Could not write export: {}", e);
    }

    let analysis = session.analyze()?;

    if json {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        serde_json::to_writer_pretty(&mut out, &analysis)?;
        writeln!(out)?;
        return Ok(());
    }

    let mut reporter = Reporter::from_config(&config.report)?;
    reporter.emit(&render::threat_list("Threats Sorted by ID:", session.threats()));
    for selection in [&analysis.greedy, &analysis.optimal] {
        reporter.emit(&render::selection_block(selection));
        if let Some(message) =
            render::advisory_message(selection, config.selection.advisory_hours)
        {
            reporter.notice(Tone::Danger, &message);
        }
    }
    reporter.emit(&render::type_counts_block(&session.count_by_type()));
    reporter.emit(&render::summary_block(&analysis.summary));

    Ok(())
}

/// Generate a default configuration file.
fn cmd_init_config(config_path: &Path) -> TriageResult<()> {
    if config_path.exists() {
        return Err(TriageError::Config(format!(
            "Configuration file already exists: {}. Remove it first or use a different path.",
            config_path.display()
        )));
    }

    TriageConfig::write_default(config_path)?;
    println!("Default configuration written to: {}", config_path.display());
    println!();
    println!("Key settings to configure:");
    println!("  [scoring]   - policy = \"clamped\" (cap 100, Critical at 90) or \"legacy\"");
    println!("  [selection] - advisory_hours (default 30), max_table_cells");
    println!("  [report]    - report_path, export_path, color, truncate_on_start");

    Ok(())
}
