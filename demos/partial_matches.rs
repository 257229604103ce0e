//! Partial matching strategies side by side

use statement_reconciler::{
    PartialConfig, PartialStrategy, RawTable, ReconConfig, ReconciliationEngine, SectionKind,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🧩 Statement Reconciler - Partial Matches Example\n");

    // One bank deposit of 300 that the ledger booked as three invoices,
    // with an unrelated entry first so no leading run adds up to 300
    let bank = RawTable::from_text_rows(vec![
        vec!["fecha", "débito", "crédito"],
        vec!["2024-02-01", "", "300"],
    ]);
    let ledger = RawTable::from_text_rows(vec![
        vec!["fecha", "debe", "haber"],
        vec!["2024-01-30", "", "40"],
        vec!["2024-02-01", "", "120"],
        vec!["2024-02-01", "", "130"],
        vec!["2024-02-01", "", "50"],
    ]);

    for strategy in [PartialStrategy::Prefix, PartialStrategy::Subset] {
        let config = ReconConfig {
            partial: PartialConfig {
                strategy,
                ..PartialConfig::default()
            },
            ..ReconConfig::default()
        };
        let report = ReconciliationEngine::with_config(config)?.reconcile_tables(&bank, &ledger)?;

        println!("🔎 Strategy: {:?}", strategy);
        match report.section(SectionKind::PartialMatches) {
            Some(section) => {
                for row in &section.rows {
                    println!("  ✓ {}  ⇐  {}", row[0], row[1]);
                }
            }
            None => println!("  ✗ No partial match found"),
        }
        println!();
    }

    Ok(())
}
