// src/scrape/runner.rs
//
// The single flow of a run: validate, navigate + extract, normalize,
// filter, assemble, write. Fatal categories abort with nothing
// persisted; row and field noise accumulates in the report instead.

use std::path::PathBuf;

use crate::config::Config;
use crate::diagnostics::RunReport;
use crate::domain::{BuildRecord, BuildSnapshot, SnapshotFilters, SnapshotId};
use crate::errors::ScrapeError;
use crate::render::Renderer;
use crate::store::{self, CaptureCache};

use super::extract::{self, Extraction};
use super::navigator::{self, Navigator};

/// One run's inputs, as resolved from the command line.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub league: String,
    pub snapshot_id: String,
    pub filters: SnapshotFilters,
    pub limit: Option<usize>,
    pub output: Option<PathBuf>,
    pub use_cache: bool,
}

/// What a successful run hands back.
#[derive(Debug)]
pub struct RunOutcome {
    pub snapshot: BuildSnapshot,
    pub report: RunReport,
    pub written_to: PathBuf,
}

pub fn run(
    options: &RunOptions,
    renderer: &dyn Renderer,
    config: &Config,
) -> Result<RunOutcome, ScrapeError> {
    navigator::validate_league(&options.league)?;
    let snapshot_id: SnapshotId = options
        .snapshot_id
        .parse()
        .map_err(ScrapeError::InvalidInput)?;
    validate_filters(&options.filters)?;

    let cache = if options.use_cache {
        CaptureCache::new(&config.cache_dir, config.cache_freshness)
    } else {
        CaptureCache::disabled()
    };
    let navigator = Navigator::new(renderer, cache, config);

    tracing::info!(
        league = %options.league,
        snapshot = %snapshot_id,
        renderer = renderer.name(),
        "starting run"
    );

    let extraction = extract::collect_rows(&navigator, &options.league, &snapshot_id, options.limit)?;
    let Extraction {
        rows,
        row_errors,
        field_issues,
        pages_fetched,
        cache_hits,
        rows_seen,
    } = extraction;

    let mut report = RunReport {
        pages_fetched,
        cache_hits,
        rows_seen,
        row_errors,
        field_issues,
    };

    let mut records: Vec<BuildRecord> = Vec::with_capacity(rows.len());
    for raw in &rows {
        match BuildRecord::from_raw(raw) {
            Ok((record, issues)) => {
                report.field_issues.extend(issues);
                records.push(record);
            }
            Err(row_error) => {
                tracing::warn!(
                    index = row_error.index,
                    reason = %row_error.reason,
                    "dropping row during normalization"
                );
                report.row_errors.push(row_error);
            }
        }
    }

    let kept = apply_filters(records, &options.filters);
    let snapshot =
        BuildSnapshot::assemble(&options.league, snapshot_id, kept, options.filters.clone());

    let path = options
        .output
        .clone()
        .unwrap_or_else(|| store::default_snapshot_path(&config.out_dir, &snapshot));
    store::write_snapshot(&snapshot, &path)?;
    tracing::info!(
        path = %path.display(),
        builds = snapshot.total_builds,
        rows_dropped = report.rows_dropped(),
        fields_nulled = report.fields_nulled(),
        "snapshot written"
    );

    Ok(RunOutcome {
        snapshot,
        report,
        written_to: path,
    })
}

fn validate_filters(filters: &SnapshotFilters) -> Result<(), ScrapeError> {
    if let (Some(min), Some(max)) = (filters.min_level, filters.max_level) {
        if min > max {
            return Err(ScrapeError::InvalidInput(format!(
                "min level {min} is above max level {max}"
            )));
        }
    }
    Ok(())
}

fn apply_filters(records: Vec<BuildRecord>, filters: &SnapshotFilters) -> Vec<BuildRecord> {
    if filters.is_empty() {
        return records;
    }
    let before = records.len();
    let kept: Vec<BuildRecord> = records
        .into_iter()
        .filter(|record| filters.matches(record))
        .collect();
    tracing::debug!(before, after = kept.len(), "filters applied");
    kept
}
