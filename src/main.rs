use anyhow::Result;
use ed_journal_to_sqlite::{
    cli::{Cli, Commands},
    journal::{import_journal_dir, import_journal_file, BatchStats},
    market::{ingest_market_snapshot, read_market_file},
    schema::table_names,
    store::IngestContext,
};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse_args();

    match cli.command {
        Commands::Sync {
            journal_dir,
            output_db,
            market,
        } => {
            let start = Instant::now();
            let mut ctx = IngestContext::open(&output_db)?;

            let stats = import_journal_dir(&mut ctx, &journal_dir)?;

            if let Some(market_path) = market {
                let snapshot = read_market_file(&market_path)?;
                let prices = ingest_market_snapshot(&mut ctx, &snapshot)?;
                println!(
                    "Market {}: {} prices replaced ({} new commodities)",
                    snapshot.market_id, prices.prices, prices.commodities
                );
            }

            let elapsed = start.elapsed();
            println!(
                "Applied {} updates from {} records into {:?} in {:.1}s ({} undecodable)",
                stats.applied,
                stats.lines,
                output_db,
                elapsed.as_secs_f64(),
                stats.decode_failures
            );
        }

        Commands::Import { output_db, files } => {
            let start = Instant::now();
            let mut ctx = IngestContext::open(&output_db)?;

            let mut total = BatchStats::default();
            for path in &files {
                total.merge(import_journal_file(&mut ctx, path)?);
            }

            let elapsed = start.elapsed();
            println!(
                "Applied {} updates from {} records into {:?} in {:.1}s ({} undecodable)",
                total.applied,
                total.lines,
                output_db,
                elapsed.as_secs_f64(),
                total.decode_failures
            );
        }

        Commands::Market { output_db, file } => {
            let mut ctx = IngestContext::open(&output_db)?;
            let snapshot = read_market_file(&file)?;
            let stats = ingest_market_snapshot(&mut ctx, &snapshot)?;
            println!(
                "Market {}: {} prices replaced, {} new commodities, {} skipped",
                snapshot.market_id, stats.prices, stats.commodities, stats.skipped
            );
        }

        Commands::ListTables => {
            println!("Entity tables:\n");
            for name in table_names() {
                println!("  {}", name);
            }
        }
    }

    Ok(())
}
