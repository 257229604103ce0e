//! End-to-end reconciliation example
//!
//! Run with two files:
//!     cargo run --example reconcile_statements -- extracto.csv libro.csv [config.toml]
//! or without arguments to reconcile built-in sample data.

use statement_reconciler::{
    source_for_path, JsonReportWriter, MemorySource, ReconConfig, ReconciliationEngine,
    ReportSink, TableSource,
};

fn sample_sources() -> (MemorySource, MemorySource) {
    let bank = MemorySource::from_text_rows(
        "sample bank statement",
        vec![
            vec!["Banco Ejemplo S.A.", "", "", ""],
            vec!["Periodo: enero 2024", "", "", ""],
            vec!["Fecha", "Descripción", "Débito", "Crédito"],
            vec!["2024-01-02", "Depósito cliente A", "", "1500.00"],
            vec!["2024-01-03", "Transferencia recibida", "", "300.00"],
            vec!["2024-01-05", "Comisión mantenimiento", "12.50", ""],
            vec!["2024-01-08", "Pago proveedor", "420.10", ""],
        ],
    );
    let ledger = MemorySource::from_text_rows(
        "sample ledger",
        vec![
            vec!["Fecha", "Concepto", "Debe", "Haber"],
            vec!["2024-01-02", "Cobro factura 101", "", "1500"],
            vec!["2024-01-03", "Cobro factura 102", "", "100"],
            vec!["2024-01-03", "Cobro factura 103", "", "200"],
            vec!["2024-01-05", "Gastos bancarios", "12.50", ""],
            vec!["2024-01-12", "Cobro factura 104", "", "75"],
        ],
    );
    (bank, ledger)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    println!("🏦 Statement Reconciler - Reconcile Statements Example\n");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match args.get(2) {
        Some(path) => ReconConfig::from_toml(&std::fs::read_to_string(path)?)?,
        None => ReconConfig::default(),
    };
    let engine = ReconciliationEngine::with_config(config)?;

    let (bank, ledger): (Box<dyn TableSource>, Box<dyn TableSource>) = match (args.first(), args.get(1)) {
        (Some(bank), Some(ledger)) => (source_for_path(bank)?, source_for_path(ledger)?),
        _ => {
            let (bank, ledger) = sample_sources();
            (Box::new(bank) as Box<dyn TableSource>, Box::new(ledger) as Box<dyn TableSource>)
        }
    };

    println!("📂 Bank:   {}", bank.name());
    println!("📂 Ledger: {}\n", ledger.name());

    let report = engine.reconcile_sources(bank.as_ref(), ledger.as_ref())?;

    let summary = &report.summary;
    println!("📊 Summary");
    println!("  Bank transactions:   {}", summary.bank_count);
    println!("  Ledger transactions: {}", summary.ledger_count);
    println!("  Exact matches:       {}", summary.matched);
    println!("  Missing in ledger:   {}", summary.missing_in_ledger);
    println!("  Missing in bank:     {}", summary.missing_in_bank);
    println!("  Partial groups:      {}", summary.partial_groups);
    println!("  Completeness:        {}\n", summary.completeness_label());

    for section in &report.sections {
        println!("📋 {} ({}): {} rows", section.title, section.sheet_name, section.len());
        for row in &section.rows {
            println!("  • {}", row.join(" | "));
        }
        println!();
    }

    println!("🧾 JSON report:");
    let mut writer = JsonReportWriter::new(std::io::stdout());
    writer.write_report(&report)?;

    Ok(())
}
