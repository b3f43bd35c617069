// src/domain/snapshot_id.rs

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Time scope of a ladder query. poe.ninja understands the live ladder
/// (`latest`) and historical offsets written `hour-3`, `day-1`, `week-2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SnapshotId {
    Latest,
    Hour(u32),
    Day(u32),
    Week(u32),
}

impl SnapshotId {
    /// Value for the `timemachine` query parameter. `latest` is special:
    /// the site expects the parameter to be absent entirely.
    pub fn timemachine_param(&self) -> Option<String> {
        match self {
            SnapshotId::Latest => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotId::Latest => write!(f, "latest"),
            SnapshotId::Hour(n) => write!(f, "hour-{n}"),
            SnapshotId::Day(n) => write!(f, "day-{n}"),
            SnapshotId::Week(n) => write!(f, "week-{n}"),
        }
    }
}

impl FromStr for SnapshotId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || {
            format!(
                "unrecognized snapshot id {s:?} (expected latest, hour-<n>, day-<n> or week-<n>)"
            )
        };
        if s == "latest" {
            return Ok(SnapshotId::Latest);
        }
        let (kind, offset) = s.split_once('-').ok_or_else(bad)?;
        let offset: u32 = offset.parse().map_err(|_| bad())?;
        match kind {
            "hour" => Ok(SnapshotId::Hour(offset)),
            "day" => Ok(SnapshotId::Day(offset)),
            "week" => Ok(SnapshotId::Week(offset)),
            _ => Err(bad()),
        }
    }
}

// Snapshot files carry the id in its textual form.
impl Serialize for SnapshotId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
