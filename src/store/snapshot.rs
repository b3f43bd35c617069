// src/store/snapshot.rs

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::domain::BuildSnapshot;
use crate::errors::ScrapeError;

/// Where a snapshot lands when no explicit path was given:
/// `<out_dir>/<league>/<snapshot-id>-<YYYY-MM-DD>.json`. The same
/// league, scope and calendar day always map to the same file, so a
/// rerun overwrites instead of accumulating siblings.
pub fn default_snapshot_path(out_dir: &Path, snapshot: &BuildSnapshot) -> PathBuf {
    let day = snapshot.scraped_at.format("%Y-%m-%d");
    out_dir
        .join(&snapshot.league)
        .join(format!("{}-{}.json", snapshot.snapshot, day))
}

/// Serialize the snapshot as pretty JSON through a temp sibling and
/// rename it into place. All or nothing: on any failure the temp file
/// is removed and the previous file, if any, is untouched.
pub fn write_snapshot(snapshot: &BuildSnapshot, path: &Path) -> Result<(), ScrapeError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                ScrapeError::Persistence(format!("create {}: {e}", parent.display()))
            })?;
        }
    }

    let tmp = path.with_extension(format!("tmp-{}", std::process::id()));
    let file = File::create(&tmp)
        .map_err(|e| ScrapeError::Persistence(format!("create {}: {e}", tmp.display())))?;
    let mut writer = BufWriter::new(file);

    if let Err(e) = serde_json::to_writer_pretty(&mut writer, snapshot) {
        let _ = fs::remove_file(&tmp);
        return Err(ScrapeError::Persistence(format!("serialize snapshot: {e}")));
    }
    if let Err(e) = writer.flush() {
        let _ = fs::remove_file(&tmp);
        return Err(ScrapeError::Persistence(format!(
            "flush {}: {e}",
            tmp.display()
        )));
    }
    drop(writer);

    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        ScrapeError::Persistence(format!("rename into {}: {e}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BuildSnapshot, SnapshotFilters, SnapshotId};
    use crate::tests::utils::scratch_dir;

    fn empty_snapshot(league: &str, id: SnapshotId) -> BuildSnapshot {
        BuildSnapshot::assemble(league, id, Vec::new(), SnapshotFilters::default())
    }

    #[test]
    fn default_path_is_league_scope_and_day() {
        let snapshot = empty_snapshot("mercenarieshcssf", SnapshotId::Hour(3));
        let day = snapshot.scraped_at.format("%Y-%m-%d").to_string();

        let path = default_snapshot_path(Path::new("builds"), &snapshot);
        assert_eq!(
            path,
            Path::new("builds")
                .join("mercenarieshcssf")
                .join(format!("hour-3-{day}.json"))
        );
    }

    #[test]
    fn write_creates_parents_and_valid_json() {
        let root = scratch_dir("snapshot_write");
        let snapshot = empty_snapshot("testleague", SnapshotId::Latest);
        let path = default_snapshot_path(&root, &snapshot);

        write_snapshot(&snapshot, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["league"], "testleague");
        assert_eq!(value["snapshot"], "latest");
        assert_eq!(value["total_builds"], 0);
        assert!(value["builds"].as_array().unwrap().is_empty());
        assert_eq!(value["scraper_version"], env!("CARGO_PKG_VERSION"));

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn rewrite_overwrites_rather_than_accumulating() {
        let root = scratch_dir("snapshot_overwrite");
        let first = empty_snapshot("testleague", SnapshotId::Day(1));
        let path = default_snapshot_path(&root, &first);

        write_snapshot(&first, &path).unwrap();
        let second = empty_snapshot("testleague", SnapshotId::Day(1));
        write_snapshot(&second, &path).unwrap();

        let entries: Vec<_> = fs::read_dir(root.join("testleague"))
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries.len(), 1, "expected a single file: {entries:?}");

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn no_temp_sibling_survives_a_successful_write() {
        let root = scratch_dir("snapshot_tmp");
        let snapshot = empty_snapshot("testleague", SnapshotId::Week(1));
        let path = default_snapshot_path(&root, &snapshot);

        write_snapshot(&snapshot, &path).unwrap();

        let entries: Vec<_> = fs::read_dir(root.join("testleague"))
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].ends_with(".json"), "found {entries:?}");

        let _ = fs::remove_dir_all(&root);
    }
}
