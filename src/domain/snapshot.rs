// src/domain/snapshot.rs

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::build::BuildRecord;
use super::snapshot_id::SnapshotId;

/// Filters that were applied before assembly, recorded in the snapshot
/// for provenance.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SnapshotFilters {
    pub ascendancy: Option<String>,
    pub min_level: Option<u32>,
    pub max_level: Option<u32>,
}

impl SnapshotFilters {
    pub fn is_empty(&self) -> bool {
        self.ascendancy.is_none() && self.min_level.is_none() && self.max_level.is_none()
    }

    /// Whether a record passes. Ascendancy matches are exact and
    /// case-sensitive. A level bound can only pass a record whose level
    /// is actually known.
    pub fn matches(&self, record: &BuildRecord) -> bool {
        if let Some(wanted) = self.ascendancy.as_deref() {
            if record.ascendancy.as_deref() != Some(wanted) {
                return false;
            }
        }
        if self.min_level.is_some() || self.max_level.is_some() {
            let Some(level) = record.level else {
                return false;
            };
            if self.min_level.is_some_and(|min| level < min) {
                return false;
            }
            if self.max_level.is_some_and(|max| level > max) {
                return false;
            }
        }
        true
    }
}

/// An immutable capture of one ladder query. Built exactly once per run
/// by `assemble`; nothing mutates it afterwards.
#[derive(Debug, Serialize)]
pub struct BuildSnapshot {
    pub league: String,
    pub snapshot: SnapshotId,
    pub total_builds: usize,
    pub scraped_at: DateTime<Utc>,
    pub scraper_version: String,
    pub filters: SnapshotFilters,
    pub builds: Vec<BuildRecord>,
}

impl BuildSnapshot {
    /// Freeze the surviving records into a snapshot. Ranks are
    /// reassigned here so they always run 1..=N over what was kept, in
    /// the order the source presented it.
    pub fn assemble(
        league: &str,
        snapshot_id: SnapshotId,
        mut builds: Vec<BuildRecord>,
        filters: SnapshotFilters,
    ) -> Self {
        for (position, build) in builds.iter_mut().enumerate() {
            build.rank = (position as u32) + 1;
        }
        BuildSnapshot {
            league: league.to_string(),
            snapshot: snapshot_id,
            total_builds: builds.len(),
            scraped_at: Utc::now(),
            scraper_version: env!("CARGO_PKG_VERSION").to_string(),
            filters,
            builds,
        }
    }

    /// The first `n` builds by rank, or all of them if fewer exist.
    pub fn top(&self, n: usize) -> &[BuildRecord] {
        &self.builds[..n.min(self.builds.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, level: Option<u32>, ascendancy: Option<&str>) -> BuildRecord {
        BuildRecord {
            rank: 99,
            character_name: name.to_string(),
            account_name: None,
            level,
            ascendancy: ascendancy.map(str::to_string),
            life: None,
            energy_shield: None,
            effective_hp: None,
            dps: None,
            main_skill: None,
            keystones: Vec::new(),
            profile_url: format!("/builds/test/character/acct/{name}"),
        }
    }

    #[test]
    fn assemble_reassigns_contiguous_ranks() {
        let builds = vec![
            record("A", Some(96), Some("Berserker")),
            record("B", Some(94), Some("Deadeye")),
            record("C", Some(91), Some("Berserker")),
        ];
        let snapshot = BuildSnapshot::assemble(
            "mercenarieshcssf",
            SnapshotId::Hour(3),
            builds,
            SnapshotFilters::default(),
        );

        assert_eq!(snapshot.total_builds, 3);
        let ranks: Vec<u32> = snapshot.builds.iter().map(|b| b.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert_eq!(snapshot.league, "mercenarieshcssf");
        assert_eq!(snapshot.snapshot, SnapshotId::Hour(3));
        assert_eq!(snapshot.scraper_version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn top_is_bounded_by_available_builds() {
        let snapshot = BuildSnapshot::assemble(
            "test",
            SnapshotId::Latest,
            vec![record("A", None, None), record("B", None, None)],
            SnapshotFilters::default(),
        );
        assert_eq!(snapshot.top(10).len(), 2);
        assert_eq!(snapshot.top(1).len(), 1);
        assert_eq!(snapshot.top(0).len(), 0);
    }

    #[test]
    fn ascendancy_filter_is_case_sensitive() {
        let filters = SnapshotFilters {
            ascendancy: Some("Berserker".into()),
            ..Default::default()
        };
        assert!(filters.matches(&record("A", Some(90), Some("Berserker"))));
        assert!(!filters.matches(&record("B", Some(90), Some("berserker"))));
        assert!(!filters.matches(&record("C", Some(90), Some("Deadeye"))));
        assert!(!filters.matches(&record("D", Some(90), None)));
    }

    #[test]
    fn level_bounds_require_a_known_level() {
        let filters = SnapshotFilters {
            min_level: Some(90),
            max_level: Some(99),
            ..Default::default()
        };
        assert!(filters.matches(&record("A", Some(95), None)));
        assert!(!filters.matches(&record("B", Some(89), None)));
        assert!(!filters.matches(&record("C", Some(100), None)));
        assert!(!filters.matches(&record("D", None, None)));
    }

    #[test]
    fn empty_filters_match_everything() {
        let filters = SnapshotFilters::default();
        assert!(filters.is_empty());
        assert!(filters.matches(&record("A", None, None)));
    }
}
