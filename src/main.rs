use std::process;

use clap::Parser;

mod cli;
mod config;
mod diagnostics;
mod domain;
mod errors;
mod normalize;
mod render;
mod scrape;
mod store;

#[cfg(test)]
mod tests;

use crate::cli::Cli;
use crate::config::Config;
use crate::domain::SnapshotFilters;
use crate::errors::ScrapeError;
use crate::render::ZenRowsRenderer;
use crate::scrape::pob;
use crate::scrape::runner::{self, RunOptions, RunOutcome};

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let mut config = Config::from_env();
    if let Some(dir) = &cli.cache_dir {
        config.cache_dir = dir.clone();
    }

    // A renderer that cannot be built is a setup problem, same exit
    // code as any other bad input.
    let renderer = match ZenRowsRenderer::from_env(&config) {
        Ok(renderer) => renderer,
        Err(e) => exit_with(ScrapeError::InvalidInput(e.to_string())),
    };

    let options = RunOptions {
        league: cli.league.clone(),
        snapshot_id: cli.snapshot.clone(),
        filters: SnapshotFilters {
            ascendancy: cli.ascendancy.clone(),
            min_level: cli.min_level,
            max_level: cli.max_level,
        },
        limit: cli.limit,
        output: cli.output.clone(),
        use_cache: !cli.no_cache,
    };

    println!("{}", "=".repeat(60));
    println!("poe.ninja build scraper");
    println!("League: {}   Snapshot: {}", cli.league, cli.snapshot);
    println!("{}\n", "=".repeat(60));

    let outcome = match runner::run(&options, &renderer, &config) {
        Ok(outcome) => outcome,
        Err(e) => exit_with(e),
    };

    print_summary(&outcome);

    if let Some(n) = cli.export_pob {
        let top = outcome.snapshot.top(n);
        println!("\nExporting import codes for top {} builds...", top.len());
        match pob::export_import_codes(&renderer, top, &cli.pob_dir, config.pob_delay) {
            Ok(written) => println!(
                "✓ {}/{} import codes saved to {}/",
                written.len(),
                top.len(),
                cli.pob_dir.display()
            ),
            Err(e) => exit_with(e),
        }
    }

    println!("\nDone.");
}

fn exit_with(error: ScrapeError) -> ! {
    eprintln!("❌ {error}");
    process::exit(error.exit_code());
}

fn print_summary(outcome: &RunOutcome) {
    let snapshot = &outcome.snapshot;
    let report = &outcome.report;

    println!(
        "✓ {} builds captured ({} rows seen, {} pages, {} from cache)",
        snapshot.total_builds, report.rows_seen, report.pages_fetched, report.cache_hits
    );
    println!("✓ Snapshot written to {}", outcome.written_to.display());

    if report.rows_dropped() > 0 {
        println!("⚠ {} rows dropped:", report.rows_dropped());
        for row_error in report.row_errors.iter().take(5) {
            println!("    row {}: {}", row_error.index + 1, row_error.reason);
        }
    }
    if !report.field_issues.is_empty() {
        println!(
            "⚠ {} field issues ({} fields nulled):",
            report.field_issues.len(),
            report.fields_nulled()
        );
        for issue in report.field_issues.iter().take(5) {
            println!(
                "    row {}, {}: {} ({:?})",
                issue.row_index + 1,
                issue.field,
                issue.kind,
                issue.raw
            );
        }
    }

    if snapshot.builds.is_empty() {
        return;
    }

    println!("\n{}", "=".repeat(60));
    println!("Top {} builds:", snapshot.top(10).len());
    println!("{}", "=".repeat(60));
    for build in snapshot.top(10) {
        println!(
            "{:2}. [{:<15}] Lv{:>3} - {:<25} | Life: {:>6} | EHP: {:>5} | {}",
            build.rank,
            text_or_dash(&build.ascendancy),
            number_or_dash(build.level.map(u64::from)),
            build.character_name,
            number_or_dash(build.life),
            thousands_or_dash(build.effective_hp),
            text_or_dash(&build.main_skill),
        );
    }
}

fn text_or_dash(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

fn number_or_dash(value: Option<u64>) -> String {
    value.map_or_else(|| "-".to_string(), |n| n.to_string())
}

fn thousands_or_dash(value: Option<u64>) -> String {
    value.map_or_else(|| "-".to_string(), |n| format!("{}k", n / 1_000))
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("ninja_scrape=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
