// src/scrape/extract.rs
//
// Walks rendered ladder pages and lifts each row into a RawRow. Nothing
// here interprets values; it only finds them. The expected layout is
// seven cells (name, level+class, life, ES, EHP, DPS+gem, keystones),
// optionally preceded by a bare rank column on some ladder variants.

use std::collections::HashSet;

use once_cell::sync::OnceCell;
use scraper::{ElementRef, Selector};

use crate::diagnostics::{FieldIssue, FieldIssueKind, RowError, RowErrorKind};
use crate::domain::SnapshotId;
use crate::errors::ScrapeError;

use super::models::RawRow;
use super::navigator::Navigator;

fn row_selector() -> &'static Selector {
    static SELECTOR: OnceCell<Selector> = OnceCell::new();
    SELECTOR.get_or_init(|| Selector::parse("table tbody tr").unwrap())
}

fn cell_selector() -> &'static Selector {
    static SELECTOR: OnceCell<Selector> = OnceCell::new();
    SELECTOR.get_or_init(|| Selector::parse("td").unwrap())
}

fn link_selector() -> &'static Selector {
    static SELECTOR: OnceCell<Selector> = OnceCell::new();
    SELECTOR.get_or_init(|| Selector::parse("a").unwrap())
}

fn img_selector() -> &'static Selector {
    static SELECTOR: OnceCell<Selector> = OnceCell::new();
    SELECTOR.get_or_init(|| Selector::parse("img").unwrap())
}

/// Everything learned from walking one ladder query, before
/// normalization.
#[derive(Debug, Default)]
pub struct Extraction {
    pub rows: Vec<RawRow>,
    pub row_errors: Vec<RowError>,
    pub field_issues: Vec<FieldIssue>,
    pub pages_fetched: usize,
    pub cache_hits: usize,
    pub rows_seen: usize,
}

/// Walk the ladder page by page until the source runs dry or `limit`
/// rows have been gathered. Row order is the source's presentation
/// order, continued across page boundaries.
pub fn collect_rows(
    navigator: &Navigator,
    league: &str,
    snapshot_id: &SnapshotId,
    limit: Option<usize>,
) -> Result<Extraction, ScrapeError> {
    let mut extraction = Extraction::default();
    let mut seen_pages = HashSet::new();
    let mut page: u32 = 1;

    loop {
        if limit.is_some_and(|limit| extraction.rows.len() >= limit) {
            break;
        }
        if !seen_pages.insert(page) {
            tracing::warn!(page, "page repeated, stopping pagination");
            break;
        }

        let table = navigator.fetch_table_page(league, snapshot_id, page)?;
        extraction.pages_fetched += 1;
        if table.from_cache {
            extraction.cache_hits += 1;
        }

        let rows: Vec<ElementRef> = table.document().select(row_selector()).collect();
        if rows.is_empty() {
            // A present-but-empty body is a valid empty ladder on page 1
            // and the natural stop past the last page otherwise.
            tracing::debug!(league, page, "no rows on page, stopping pagination");
            break;
        }
        tracing::info!(league, page, rows = rows.len(), "page extracted");

        for row in rows {
            let index = extraction.rows_seen;
            extraction.rows_seen += 1;

            match extract_raw_row(row, index) {
                Ok(raw) => {
                    if let Some(source_rank) = raw.source_rank {
                        if source_rank as usize != index + 1 {
                            extraction.field_issues.push(FieldIssue {
                                row_index: index,
                                field: "rank",
                                raw: source_rank.to_string(),
                                kind: FieldIssueKind::RankMismatch,
                            });
                        }
                    }
                    extraction.rows.push(raw);
                }
                Err(row_error) => {
                    tracing::warn!(
                        index = row_error.index,
                        reason = %row_error.reason,
                        "dropping row"
                    );
                    extraction.row_errors.push(row_error);
                }
            }
            if limit.is_some_and(|limit| extraction.rows.len() >= limit) {
                break;
            }
        }

        page += 1;
        if !table.from_cache {
            navigator.polite_pause();
        }
    }

    Ok(extraction)
}

/// Read one `<tr>` into a RawRow. Only a structurally hopeless row is an
/// error here; missing individual cells simply leave their fields empty.
fn extract_raw_row(row: ElementRef<'_>, index: usize) -> Result<RawRow, RowError> {
    let all_cells: Vec<ElementRef> = row.select(cell_selector()).collect();
    if all_cells.is_empty() {
        return Err(RowError {
            index,
            reason: RowErrorKind::MissingCells { found: 0 },
        });
    }

    let (source_rank, cells) = match leading_rank(&all_cells) {
        Some(rank) => (Some(rank), &all_cells[1..]),
        None => (None, &all_cells[..]),
    };

    let name_link = cells
        .first()
        .and_then(|cell| cell.select(link_selector()).next());
    let character_name = name_link.map(element_text).filter(|text| !text.is_empty());
    let profile_url = name_link
        .and_then(|link| link.value().attr("href"))
        .map(str::to_string)
        .filter(|href| !href.is_empty());

    let level_cell = cells.get(1);
    let level = level_cell.map(|cell| element_text(*cell)).filter(|t| !t.is_empty());
    let class_icon = level_cell.and_then(|cell| cell.select(img_selector()).next());
    let ascendancy_alt = class_icon
        .and_then(|img| img.value().attr("alt"))
        .map(|alt| alt.trim().to_string())
        .filter(|alt| !alt.is_empty());
    let ascendancy_icon = class_icon
        .and_then(|img| img.value().attr("src"))
        .map(str::to_string)
        .filter(|src| !src.is_empty());

    let life = cell_text(cells, 2);
    let energy_shield = cell_text(cells, 3);
    let effective_hp = cell_text(cells, 4);

    let dps_cell = cells.get(5);
    let dps = dps_cell.map(|cell| element_text(*cell)).filter(|t| !t.is_empty());
    let skill_icon = dps_cell
        .and_then(|cell| cell.select(img_selector()).next())
        .and_then(|img| img.value().attr("src"))
        .map(str::to_string)
        .filter(|src| !src.is_empty());

    let keystone_alts = cells
        .get(6)
        .map(|cell| {
            cell.select(img_selector())
                .filter_map(|img| img.value().attr("alt"))
                .map(str::to_string)
                .filter(|alt| !alt.trim().is_empty())
                .collect()
        })
        .unwrap_or_default();

    Ok(RawRow {
        index,
        source_rank,
        character_name,
        profile_url,
        level,
        ascendancy_alt,
        ascendancy_icon,
        life,
        energy_shield,
        effective_hp,
        dps,
        skill_icon,
        keystone_alts,
    })
}

/// An eighth leading cell holding a bare integer is the ladder's own
/// rank column.
fn leading_rank(cells: &[ElementRef]) -> Option<u32> {
    if cells.len() < 8 {
        return None;
    }
    let text = element_text(cells[0]);
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn cell_text(cells: &[ElementRef], index: usize) -> Option<String> {
    cells
        .get(index)
        .map(|cell| element_text(*cell))
        .filter(|text| !text.is_empty())
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
