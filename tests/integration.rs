//! # Threat Triage - Integration Tests
//!
//! End-to-end tests over the full pipeline:
//! raw records -> intake -> session -> selections/queries -> report files
//!
//! These tests drive the same path the CLI uses, including the interactive
//! console fed from an in-memory script, and check the files it leaves
//! behind.

use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

use threat_triage::console::Console;
use threat_triage::intake::prompt::Prompter;
use threat_triage::intake::{BatchFile, RawThreat};
use threat_triage::report::writer::{BLOCK_SEPARATOR, RECORD_SEPARATOR};
use threat_triage::report::{FileSink, Reporter};
use threat_triage::session::Session;
use threat_triage::{SeverityPolicy, TriageConfig, TriageError};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Create a temporary directory for test files. Returns the path.
/// The caller is responsible for cleanup.
fn create_test_dir(test_name: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join("threat-triage-test")
        .join(test_name);
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create test dir");
    dir
}

/// Clean up a test directory.
fn cleanup_test_dir(dir: &PathBuf) {
    let _ = fs::remove_dir_all(dir);
}

/// Configuration writing into `dir`, without colors.
fn test_config(dir: &PathBuf) -> TriageConfig {
    let mut config = TriageConfig::default();
    config.report.report_path = dir.join("ThreatsReport.txt");
    config.report.export_path = dir.join("threat_data.txt");
    config.report.color = false;
    config
}

fn raw(id: i64, base: i64, cost: i64, pct: i64, ip: &str, threat_type: &str) -> RawThreat {
    RawThreat {
        id,
        base_severity: base,
        resource_cost: cost,
        pre_deform_percent: pct,
        ip: ip.to_string(),
        location: None,
        threat_type: Some(threat_type.to_string()),
        status: None,
    }
}

/// Run the console over a scripted input. Returns what it printed and the
/// final session.
fn run_console(config: &TriageConfig, script: &str) -> (String, Session) {
    let mut reporter = Reporter::new();
    reporter.add_sink(FileSink::new(config.report.report_path.clone()));

    let prompter = Prompter::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());
    let mut console = Console::new(prompter, Session::new(config), reporter);
    console.run().expect("console run");

    let (mut prompter, session) = console.into_parts();
    let printed = String::from_utf8(prompter.output().clone()).expect("utf8 output");
    (printed, session)
}

// ---------------------------------------------------------------------------
// Pipeline tests
// ---------------------------------------------------------------------------

#[test]
fn test_batch_file_pipeline() {
    let dir = create_test_dir("batch_file_pipeline");
    let config = test_config(&dir);

    let batch_path = dir.join("batch.toml");
    fs::write(
        &batch_path,
        r#"
budget = 10

[[threats]]
id = 3
base_severity = 30
resource_cost = 6
ip = "203.0.113.3"
type = "Phishing"

[[threats]]
id = 1
base_severity = 50
resource_cost = 10
ip = "203.0.113.1"
type = "Phishing"

[[threats]]
id = 2
base_severity = 40
resource_cost = 4
ip = "203.0.113.2"
type = "Phishing"
"#,
    )
    .unwrap();

    let batch = BatchFile::from_file(&batch_path).unwrap();
    let mut session = Session::new(&config);
    session.load_batch(&batch.threats, batch.budget).unwrap();

    let ids: Vec<i64> = session.threats().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let greedy = session.greedy().unwrap();
    let optimal = session.optimal().unwrap();
    assert_eq!(greedy.chosen_ids(), vec![2, 3]);
    assert_eq!(optimal.chosen_ids(), vec![2, 3]);
    assert_eq!(optimal.total_severity, 70);
    assert_eq!(optimal.total_hours, 10);

    session.export().unwrap();
    let export = fs::read_to_string(&config.report.export_path).unwrap();
    assert!(export.contains("Total Available Resource Limit (hours): 10"));
    assert_eq!(export.matches(RECORD_SEPARATOR).count(), 3);
    let first = export.find("ID: 1").unwrap();
    let third = export.find("ID: 3").unwrap();
    assert!(first < third);

    cleanup_test_dir(&dir);
}

#[test]
fn test_optimal_strictly_beats_greedy() {
    let dir = create_test_dir("optimal_beats_greedy");
    let mut session = Session::new(&test_config(&dir));

    // Malware bonus +15 on every record: severities 60, 45, 45.
    session
        .load_batch(
            &[
                raw(1, 45, 6, 0, "10.0.0.1", "Malware"),
                raw(2, 30, 5, 0, "10.0.0.2", "Malware"),
                raw(3, 30, 5, 0, "10.0.0.3", "Malware"),
            ],
            10,
        )
        .unwrap();

    let greedy = session.greedy().unwrap();
    let optimal = session.optimal().unwrap();
    assert_eq!(greedy.total_severity, 60);
    assert_eq!(optimal.total_severity, 90);
    assert!(optimal.total_severity > greedy.total_severity);
    assert!(optimal.total_hours <= 10);

    cleanup_test_dir(&dir);
}

#[test]
fn test_duplicate_ids_and_ip_search() {
    let dir = create_test_dir("duplicate_ids");
    let mut session = Session::new(&test_config(&dir));

    session
        .load_batch(
            &[
                raw(5, 20, 1, 0, "192.168.1.10", "DDoS"),
                raw(2, 30, 1, 0, "10.0.0.2", "Malware"),
                raw(5, 40, 1, 0, "172.16.0.5", "Virus"),
                raw(1, 50, 1, 0, "192.168.1.10", "Spyware"),
            ],
            5,
        )
        .unwrap();

    // Stable id sort: the two #5 records keep their entry order.
    let order: Vec<(i64, &str)> = session
        .threats()
        .iter()
        .map(|t| (t.id, t.ip.as_str()))
        .collect();
    assert_eq!(
        order,
        vec![
            (1, "192.168.1.10"),
            (2, "10.0.0.2"),
            (5, "192.168.1.10"),
            (5, "172.16.0.5"),
        ]
    );

    let found = session.find_by_ip("192.168.1.10");
    let found_ids: Vec<i64> = found.iter().map(|t| t.id).collect();
    assert_eq!(found_ids, vec![1, 5]);

    assert!(session.find_by_ip("8.8.8.8").is_empty());

    cleanup_test_dir(&dir);
}

#[test]
fn test_policies_disagree_on_clamp_and_status() {
    let dir = create_test_dir("policies");
    let records = [raw(1, 90, 2, 50, "10.0.0.1", "Malware")];

    let mut clamped_config = test_config(&dir);
    clamped_config.scoring.policy = SeverityPolicy::Clamped;
    let mut clamped = Session::new(&clamped_config);
    clamped.load_batch(&records, 10).unwrap();
    assert_eq!(clamped.threats()[0].severity, 100);
    assert_eq!(clamped.threats()[0].status, "Critical");

    let mut legacy_config = test_config(&dir);
    legacy_config.scoring.policy = SeverityPolicy::Legacy;
    let mut legacy = Session::new(&legacy_config);
    legacy.load_batch(&records, 10).unwrap();
    assert_eq!(legacy.threats()[0].severity, 150);
    assert_eq!(legacy.threats()[0].status, "Critical");

    // Legacy never flags a high-severity DDoS as Critical on its own rule;
    // the inferred status still reflects the severity band.
    let mut supplied = raw(2, 95, 1, 0, "192.168.0.1", "DDoS");
    supplied.status = Some("Detected".to_string());
    legacy.load_batch(&[supplied.clone()], 10).unwrap();
    assert_eq!(legacy.threats()[0].status, "Detected");
    clamped.load_batch(&[supplied], 10).unwrap();
    assert_eq!(clamped.threats()[0].status, "Critical");

    cleanup_test_dir(&dir);
}

#[test]
fn test_summary_and_counts() {
    let dir = create_test_dir("summary_counts");
    let mut session = Session::new(&test_config(&dir));

    let empty = session.summary();
    assert_eq!(empty.count, 0);
    assert_eq!(empty.total_hours, 0);
    assert_eq!(empty.total_severity, 0);

    session
        .load_batch(
            &[
                raw(1, 10, 3, 0, "10.0.0.1", "Malware"),
                raw(2, 10, 4, 0, "10.0.0.2", "Malware"),
                raw(3, 10, 5, 0, "192.168.0.3", "DDoS"),
            ],
            20,
        )
        .unwrap();

    let summary = session.summary();
    assert_eq!(summary.count, 3);
    assert_eq!(summary.total_hours, 12);
    assert_eq!(summary.total_severity, 25 + 25 + 20);
    assert_eq!(summary.budget, 20);

    let counts = session.count_by_type();
    assert_eq!(counts["Malware"], 2);
    assert_eq!(counts["DDoS"], 1);

    cleanup_test_dir(&dir);
}

#[test]
fn test_rejected_batch_reports_record_position() {
    let dir = create_test_dir("rejected_batch");
    let mut session = Session::new(&test_config(&dir));

    let err = session
        .load_batch(
            &[
                raw(1, 10, 3, 0, "10.0.0.1", "Malware"),
                raw(2, 10, 3, -4, "10.0.0.2", "Malware"),
            ],
            20,
        )
        .unwrap_err();

    match err {
        TriageError::Validation { index, field, .. } => {
            assert_eq!(index, 1);
            assert_eq!(field, "pre_deform_percent");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!session.has_data());

    cleanup_test_dir(&dir);
}

// ---------------------------------------------------------------------------
// Interactive console
// ---------------------------------------------------------------------------

#[test]
fn test_console_full_session() {
    let dir = create_test_dir("console_full_session");
    let config = test_config(&dir);

    // Menu 1: two threats, budget 10. Then top-2, search, counts, summary, exit.
    let script = "\
1
2
1
50
10
192.168.0.1
0
Phishing

2
40
4
10.0.0.2
0
Phishing

10
5
2
6
10.0.0.2
7
8
9
";
    let (printed, session) = run_console(&config, script);

    assert!(printed.contains("CYBER THREAT RESPONSE SYSTEM"));
    assert_eq!(session.threats().len(), 2);
    assert_eq!(session.budget(), 10);

    let report = fs::read_to_string(&config.report.report_path).unwrap();
    assert!(report.contains("Threats Sorted by ID:"));
    assert!(report.contains("Greedy Selection (Severity/Cost Ratio):"));
    assert!(report.contains("Dynamic Programming Optimization:"));
    assert!(report.contains("Max Severity: 50, Hours Used: 10"));
    assert!(report.contains("Top 2 Most Severe Threats:"));
    assert!(report.contains("Search Results for IP: 10.0.0.2"));
    assert!(report.contains("Threat Counts by Type:"));
    assert!(report.contains("Phishing: 2"));
    assert!(report.contains("Available Response Hours: 10"));
    assert_eq!(report.matches(BLOCK_SEPARATOR).count(), 7);

    let export = fs::read_to_string(&config.report.export_path).unwrap();
    assert!(export.contains("IP Address: 192.168.0.1"));
    assert!(export.contains("Location: USA"));

    cleanup_test_dir(&dir);
}

#[test]
fn test_console_queries_without_data() {
    let dir = create_test_dir("console_no_data");
    let config = test_config(&dir);

    let (_printed, session) = run_console(&config, "2\n3\n8\nfoo\n9\n");
    assert!(!session.has_data());
    // Nothing was rendered into the report file.
    assert!(!config.report.report_path.exists());

    cleanup_test_dir(&dir);
}

#[test]
fn test_console_reasks_oversized_budget() {
    let dir = create_test_dir("console_oversized_budget");
    let config = test_config(&dir);

    let script = "1\n1\n4\n50\n10\n10.0.0.4\n0\n\n\n5000000000\n12\n9\n";
    let (printed, session) = run_console(&config, script);

    assert!(printed.contains("Invalid resource limit. Enter positive integer: "));
    assert!(session.has_data());
    assert_eq!(session.budget(), 12);
    assert_eq!(session.threats()[0].id, 4);

    cleanup_test_dir(&dir);
}

#[test]
fn test_console_stops_at_end_of_input() {
    let dir = create_test_dir("console_eof");
    let config = test_config(&dir);

    let (printed, session) = run_console(&config, "1\n3\n1\n");
    assert!(printed.contains("--- Threat 1 ---"));
    assert!(!session.has_data());

    cleanup_test_dir(&dir);
}
