//! Integration tests for statement-reconciler

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

use statement_reconciler::{
    load_table, normalize_statement, CsvSource, JsonReportWriter, MemorySource, Origin,
    RawTable, ReconConfig, ReconError, ReconciliationEngine, ReportSink, SectionKind,
};

fn write_fixture(dir: &tempfile::TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents).unwrap();
    path
}

fn dec(value: &str) -> BigDecimal {
    BigDecimal::from_str(value).unwrap()
}

const BANK_CSV: &str = "\
Banco Ejemplo S.A.,,,,
Extracto de cuenta 0012-3456,,,,
Fecha,Descripción,Débito,Crédito,Saldo
2024-01-02,Depósito cliente A,,1500.00,1500.00
2024-01-03,Transferencia recibida,,300,1800.00
2024-01-05,Comisión mantenimiento,12.50,,1787.50
2024-01-08,Pago proveedor,420.10,,1367.40
2024-01-09,Depósito sin identificar,,77,1444.40
";

const LEDGER_CSV: &str = "\
fecha,concepto,debe,haber
2024-01-02,Cobro factura 101,,1500
2024-01-03,Cobro factura 102,,100
2024-01-03,Cobro factura 103,,150
2024-01-03,Cobro factura 104,,50
2024-01-05,Gastos bancarios,12.5,
2024-01-10,Cobro factura 105,,999
";

#[test]
fn test_complete_reconciliation_workflow() {
    let dir = tempfile::tempdir().unwrap();
    let bank_path = write_fixture(&dir, "extracto.csv", BANK_CSV.as_bytes());
    let ledger_path = write_fixture(&dir, "libro.csv", LEDGER_CSV.as_bytes());

    let engine = ReconciliationEngine::new();
    let bank = engine.normalize(&load_table(&bank_path).unwrap(), Origin::Bank).unwrap();
    let ledger = engine
        .normalize(&load_table(&ledger_path).unwrap(), Origin::Ledger)
        .unwrap();

    // Two preamble lines above the real header
    assert_eq!(bank.header_row, 2);
    assert_eq!(bank.len(), 5);
    assert_eq!(ledger.header_row, 0);
    assert_eq!(ledger.len(), 6);

    let result = engine.reconcile(&bank, &ledger);

    let matched: Vec<BigDecimal> = result.matches.iter().map(|m| m.amount.clone()).collect();
    assert_eq!(matched, vec![dec("1500.00"), dec("-12.50")]);

    let missing_in_ledger: Vec<BigDecimal> =
        result.missing_in_ledger.iter().map(|t| t.amount.clone()).collect();
    assert_eq!(missing_in_ledger, vec![dec("300"), dec("-420.10"), dec("77")]);

    let missing_in_bank: Vec<BigDecimal> =
        result.missing_in_bank.iter().map(|t| t.amount.clone()).collect();
    assert_eq!(missing_in_bank, vec![dec("100"), dec("150"), dec("50"), dec("999")]);

    // 300 = 100 + 150 + 50, the leading run of the ledger leftovers
    assert_eq!(result.partial_matches.len(), 1);
    let group = &result.partial_matches[0];
    assert_eq!(group.base.amount, dec("300"));
    assert_eq!(group.components.len(), 3);
    assert_eq!(group.components_total(), dec("300"));

    let summary = result.summary();
    assert_eq!(summary.bank_count, 5);
    assert_eq!(summary.ledger_count, 6);
    assert_eq!(summary.completeness_label(), "18.18%");
}

#[test]
fn test_report_sections_through_sources() {
    let dir = tempfile::tempdir().unwrap();
    let bank = CsvSource::new(write_fixture(&dir, "extracto.csv", BANK_CSV.as_bytes()));
    let ledger = CsvSource::new(write_fixture(&dir, "libro.csv", LEDGER_CSV.as_bytes()));

    let report = ReconciliationEngine::new().reconcile_sources(&bank, &ledger).unwrap();

    let sheets: Vec<&str> = report.sections.iter().map(|s| s.sheet_name.as_str()).collect();
    assert_eq!(
        sheets,
        vec![
            "Coincidencias",
            "Faltantes en Contabilidad",
            "Faltantes en Banco",
            "Conciliaciones parciales"
        ]
    );

    let matches = report.section(SectionKind::Matches).unwrap();
    assert_eq!(matches.rows[0][0], "1500.00");
    assert_eq!(matches.rows[0][1], "2024-01-02");
    assert!(matches.rows[0][2].contains("descripción: Depósito cliente A"));
    assert!(matches.rows[0][4].contains("concepto: Cobro factura 101"));

    let missing = report.section(SectionKind::MissingInLedger).unwrap();
    assert_eq!(missing.rows.len(), 3);
    assert!(missing.rows.iter().all(|row| row[3] == "Bank"));

    let partial = report.section(SectionKind::PartialMatches).unwrap();
    assert_eq!(partial.rows.len(), 3);
    assert!(partial.rows[0][1].contains("Cobro factura 102"));
}

#[test]
fn test_completeness_percentage() {
    let bank_amounts = ["10", "20", "30", "40", "50", "60", "1001", "1002", "1003", "1004"];
    let ledger_amounts = ["60", "50", "40", "30", "20", "10", "7", "9"];

    let table = |amounts: &[&str]| {
        let mut rows = vec![vec!["debe".to_string(), "haber".to_string()]];
        rows.extend(amounts.iter().map(|a| vec![String::new(), a.to_string()]));
        RawTable::from_text_rows(rows)
    };

    let report = ReconciliationEngine::new()
        .reconcile_tables(&table(&bank_amounts[..]), &table(&ledger_amounts[..]))
        .unwrap();

    assert_eq!(report.summary.bank_count, 10);
    assert_eq!(report.summary.ledger_count, 8);
    assert_eq!(report.summary.matched, 6);
    assert_eq!(report.summary.completeness_label(), "33.33%");
    assert!(report.section(SectionKind::PartialMatches).is_none());
}

#[test]
fn test_exact_match_collapses_duplicate_amounts() {
    let bank = MemorySource::from_text_rows(
        "bank",
        vec![vec!["débito", "crédito"], vec!["", "100"], vec!["", "100"], vec!["", "50"]],
    );
    let ledger = MemorySource::from_text_rows("ledger", vec![vec!["debe", "haber"], vec!["", "100"]]);

    let report = ReconciliationEngine::new().reconcile_sources(&bank, &ledger).unwrap();
    assert_eq!(report.summary.matched, 1);

    let missing = report.section(SectionKind::MissingInLedger).unwrap();
    assert_eq!(missing.rows.len(), 1);
    assert_eq!(missing.rows[0][0], "50.00");
}

#[test]
fn test_missing_credit_column_aborts_run() {
    let bank = RawTable::from_text_rows(vec![
        vec!["fecha", "débito", "importe"],
        vec!["2024-01-01", "10", ""],
    ]);
    let ledger = RawTable::from_text_rows(vec![vec!["debe", "haber"], vec!["", "5"]]);

    let err = ReconciliationEngine::new().reconcile_tables(&bank, &ledger).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("credit"));
    assert!(message.contains("importe"));
}

#[test]
fn test_runs_are_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let bank = CsvSource::new(write_fixture(&dir, "extracto.csv", BANK_CSV.as_bytes()));
    let ledger = CsvSource::new(write_fixture(&dir, "libro.csv", LEDGER_CSV.as_bytes()));
    let engine = ReconciliationEngine::new();

    let render = || {
        let mut writer = JsonReportWriter::new(Vec::new());
        let report = engine.reconcile_sources(&bank, &ledger).unwrap();
        writer.write_report(&report).unwrap();
        writer.into_inner()
    };

    let first = render();
    let second = render();
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn test_windows_1252_statement() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        &dir,
        "extracto_latin.csv",
        b"Fecha,Descripci\xf3n,D\xe9bito,Cr\xe9dito\n2024-02-01,Dep\xf3sito,,25.00\n",
    );

    let statement = normalize_statement(&load_table(&path).unwrap(), Origin::Bank).unwrap();
    assert_eq!(statement.columns.debit.name, "débito");
    assert_eq!(statement.columns.credit.name, "crédito");
    assert_eq!(statement.transactions[0].amount, dec("25.00"));
}

#[test]
fn test_unsupported_and_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = write_fixture(&dir, "extracto.pdf", b"%PDF-1.4");
    assert!(matches!(load_table(&pdf), Err(ReconError::UnsupportedFormat(_))));

    let missing = dir.path().join("no_existe.csv");
    assert!(matches!(load_table(&missing), Err(ReconError::Io { .. })));
}

#[test]
fn test_config_driven_run() {
    let config = ReconConfig::from_toml(
        r#"
date_order = "day_first"
date_from = "2024-03-01"

[columns]
debit = ["Cargo"]
credit = ["Abono"]
"#,
    )
    .unwrap();
    let engine = ReconciliationEngine::with_config(config).unwrap();

    let bank = RawTable::from_text_rows(vec![
        vec!["Fecha", "Cargo", "Abono"],
        vec!["02/03/2024", "", "80"],
        vec!["28/02/2024", "", "45"],
        vec!["sin fecha", "", "80"],
    ]);
    let ledger = RawTable::from_text_rows(vec![
        vec!["Fecha", "Cargo", "Abono"],
        vec!["05/03/2024", "", "80"],
        vec!["27/02/2024", "", "45"],
    ]);

    let bank = engine.normalize(&bank, Origin::Bank).unwrap();
    assert_eq!(
        bank.transactions[0].date,
        NaiveDate::from_ymd_opt(2024, 3, 2)
    );

    let ledger = engine.normalize(&ledger, Origin::Ledger).unwrap();
    let result = engine.reconcile(&bank, &ledger);

    // Only March rows with a readable date take part
    assert_eq!(result.bank_count, 1);
    assert_eq!(result.ledger_count, 1);
    assert_eq!(result.matches.len(), 1);
    assert!(result.missing_in_ledger.is_empty());
    assert!(result.missing_in_bank.is_empty());
}

#[test]
fn test_exclusive_partial_matching_from_config() {
    let config = ReconConfig::from_toml(
        r#"
[partial]
strategy = "subset"
reuse_components = false
"#,
    )
    .unwrap();

    let bank = RawTable::from_text_rows(vec![
        vec!["débito", "crédito"],
        vec!["", "30"],
        vec!["", "30"],
    ]);
    let ledger = RawTable::from_text_rows(vec![
        vec!["debe", "haber"],
        vec!["", "5"],
        vec!["", "10"],
        vec!["", "20"],
        vec!["", "25"],
    ]);

    let report = ReconciliationEngine::with_config(config)
        .unwrap()
        .reconcile_tables(&bank, &ledger)
        .unwrap();

    // First 30 = 5 + 25, which leaves 10 + 20 for the second
    let partial = report.section(SectionKind::PartialMatches).unwrap();
    assert_eq!(report.summary.partial_groups, 2);
    assert_eq!(partial.rows.len(), 4);
    assert!(partial.rows[0][1].starts_with("Ledger 5.00"));
    assert!(partial.rows[1][1].starts_with("Ledger 25.00"));
    assert!(partial.rows[2][1].starts_with("Ledger 10.00"));
    assert!(partial.rows[3][1].starts_with("Ledger 20.00"));
}
