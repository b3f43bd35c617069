// src/domain/build.rs

use serde::Serialize;

use crate::diagnostics::{FieldIssue, FieldIssueKind, RowError, RowErrorKind};
use crate::normalize;
use crate::scrape::RawRow;

/// One ladder entry after normalization. Identity fields are required;
/// everything the site may omit or garble is an explicit `Option`, and
/// a `None` there means "the source did not give us this", never zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildRecord {
    pub rank: u32,
    pub character_name: String,
    pub account_name: Option<String>,
    pub level: Option<u32>,
    pub ascendancy: Option<String>,
    pub life: Option<u64>,
    pub energy_shield: Option<u64>,
    pub effective_hp: Option<u64>,
    pub dps: Option<u64>,
    pub main_skill: Option<String>,
    pub keystones: Vec<String>,
    pub profile_url: String,
}

impl BuildRecord {
    /// Normalize one raw row. A row without its identity fields is
    /// rejected outright; any other field that will not normalize is
    /// nulled and reported, and the record survives.
    ///
    /// The rank set here is the row's 1-based source position; the
    /// assembler reassigns ranks after filtering.
    pub fn from_raw(raw: &RawRow) -> Result<(Self, Vec<FieldIssue>), RowError> {
        let character_name = required_text(raw.character_name.as_deref()).ok_or(RowError {
            index: raw.index,
            reason: RowErrorKind::MissingName,
        })?;
        let profile_url = required_text(raw.profile_url.as_deref()).ok_or(RowError {
            index: raw.index,
            reason: RowErrorKind::MissingProfileUrl,
        })?;

        let mut issues = Vec::new();

        let account_name = normalize::account_from_profile_url(&profile_url);
        let level = level_field(&mut issues, raw.index, raw.level.as_deref());
        let ascendancy = ascendancy_field(&mut issues, raw);
        let life = scaled_field(&mut issues, raw.index, "life", raw.life.as_deref());
        let energy_shield =
            scaled_field(&mut issues, raw.index, "energy_shield", raw.energy_shield.as_deref());
        let effective_hp =
            scaled_field(&mut issues, raw.index, "effective_hp", raw.effective_hp.as_deref());
        let dps = scaled_field(&mut issues, raw.index, "dps", raw.dps.as_deref());
        let main_skill = raw
            .skill_icon
            .as_deref()
            .and_then(normalize::name_from_icon);
        let keystones = keystones_field(&mut issues, raw.index, &raw.keystone_alts);

        let record = BuildRecord {
            rank: (raw.index as u32) + 1,
            character_name,
            account_name,
            level,
            ascendancy,
            life,
            energy_shield,
            effective_hp,
            dps,
            main_skill,
            keystones,
            profile_url,
        };
        Ok((record, issues))
    }
}

fn required_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Numeric cell: empty markers are a quiet `None`, junk is a reported
/// `None`.
fn scaled_field(
    issues: &mut Vec<FieldIssue>,
    row_index: usize,
    field: &'static str,
    value: Option<&str>,
) -> Option<u64> {
    let text = value.map(str::trim).filter(|t| !normalize::is_empty_marker(t))?;
    match normalize::parse_scaled_number(text) {
        Some(number) => Some(number),
        None => {
            issues.push(FieldIssue {
                row_index,
                field,
                raw: text.to_string(),
                kind: FieldIssueKind::Unparseable,
            });
            None
        }
    }
}

/// Character level: the leading integer of the cell text, bounded to the
/// game's 1..=100.
fn level_field(
    issues: &mut Vec<FieldIssue>,
    row_index: usize,
    value: Option<&str>,
) -> Option<u32> {
    let text = value.map(str::trim).filter(|t| !normalize::is_empty_marker(t))?;
    let lead = text.split_whitespace().next()?;
    match lead.parse::<u32>() {
        Ok(level) if (1..=100).contains(&level) => Some(level),
        Ok(_) => {
            issues.push(FieldIssue {
                row_index,
                field: "level",
                raw: text.to_string(),
                kind: FieldIssueKind::OutOfRange,
            });
            None
        }
        Err(_) => {
            issues.push(FieldIssue {
                row_index,
                field: "level",
                raw: text.to_string(),
                kind: FieldIssueKind::Unparseable,
            });
            None
        }
    }
}

/// Ascendancy: prefer the icon's alt text, fall back to a name derived
/// from the icon path. Values outside the known set are kept but flagged.
fn ascendancy_field(issues: &mut Vec<FieldIssue>, raw: &RawRow) -> Option<String> {
    let name = required_text(raw.ascendancy_alt.as_deref()).or_else(|| {
        raw.ascendancy_icon
            .as_deref()
            .and_then(normalize::name_from_icon)
    })?;
    if !normalize::is_known_ascendancy(&name) {
        issues.push(FieldIssue {
            row_index: raw.index,
            field: "ascendancy",
            raw: name.clone(),
            kind: FieldIssueKind::UnknownValue,
        });
    }
    Some(name)
}

/// Keystones: trimmed, de-duplicated preserving first appearance,
/// unknown names kept but flagged.
fn keystones_field(
    issues: &mut Vec<FieldIssue>,
    row_index: usize,
    alts: &[String],
) -> Vec<String> {
    let mut keystones: Vec<String> = Vec::with_capacity(alts.len());
    for alt in alts {
        let name = normalize::clean_keystone_name(alt);
        if name.is_empty() || keystones.contains(&name) {
            continue;
        }
        if !normalize::is_known_keystone(&name) {
            issues.push(FieldIssue {
                row_index,
                field: "keystones",
                raw: name.clone(),
                kind: FieldIssueKind::UnknownValue,
            });
        }
        keystones.push(name);
    }
    keystones
}
