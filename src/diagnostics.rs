// diagnostics.rs
//
// Recoverable problems found while reading the ladder. A whole-row
// problem discards that row; a field problem nulls that field. Neither
// ever aborts the run, but both must survive into the run summary.

use std::fmt;

/// Why one source row was discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowErrorKind {
    /// No character name could be read from the row.
    MissingName,
    /// No profile link could be read from the row.
    MissingProfileUrl,
    /// The row had no readable cells at all.
    MissingCells { found: usize },
}

impl fmt::Display for RowErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowErrorKind::MissingName => write!(f, "missing character name"),
            RowErrorKind::MissingProfileUrl => write!(f, "missing profile link"),
            RowErrorKind::MissingCells { found } => {
                write!(f, "unreadable row layout ({found} cells)")
            }
        }
    }
}

/// A discarded row, identified by its 0-based position in source
/// presentation order.
#[derive(Debug, Clone)]
pub struct RowError {
    pub index: usize,
    pub reason: RowErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldIssueKind {
    /// The field had content but no recognizable form; it was nulled.
    Unparseable,
    /// The value parsed but is outside the plausible domain; nulled.
    OutOfRange,
    /// The value is not in the known canonical set; kept verbatim.
    UnknownValue,
    /// The source's own rank column disagrees with row order.
    RankMismatch,
}

impl fmt::Display for FieldIssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldIssueKind::Unparseable => write!(f, "unparseable"),
            FieldIssueKind::OutOfRange => write!(f, "out of range"),
            FieldIssueKind::UnknownValue => write!(f, "unknown value"),
            FieldIssueKind::RankMismatch => write!(f, "rank mismatch"),
        }
    }
}

/// One field that did not normalize cleanly on a row that was kept.
/// `raw` holds the offending source text so the summary can show it.
#[derive(Debug, Clone)]
pub struct FieldIssue {
    pub row_index: usize,
    pub field: &'static str,
    pub raw: String,
    pub kind: FieldIssueKind,
}

/// Aggregated bookkeeping for one run, carried alongside the snapshot
/// rather than inside it.
#[derive(Debug, Default)]
pub struct RunReport {
    pub pages_fetched: usize,
    pub cache_hits: usize,
    pub rows_seen: usize,
    pub row_errors: Vec<RowError>,
    pub field_issues: Vec<FieldIssue>,
}

impl RunReport {
    pub fn rows_dropped(&self) -> usize {
        self.row_errors.len()
    }

    /// Issues that actually nulled a field. Unknown-value and
    /// rank-mismatch entries are advisory and leave data in place.
    pub fn fields_nulled(&self) -> usize {
        self.field_issues
            .iter()
            .filter(|issue| {
                matches!(
                    issue.kind,
                    FieldIssueKind::Unparseable | FieldIssueKind::OutOfRange
                )
            })
            .count()
    }
}
