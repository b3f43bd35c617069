// src/tests/utils.rs
//
// Shared fixtures: scratch directories, a config with every wait zeroed,
// ladder HTML builders and the exact URLs the navigator will ask the
// renderer for.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::config::Config;

/// Unique scratch path per call; the test creates and removes it.
pub fn scratch_dir(label: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("ninja_scrape_{label}_{nanos}"))
}

/// Production defaults with all sleeps zeroed and IO routed under
/// `root`, so retry and pagination paths run instantly and leave the
/// real filesystem alone.
pub fn test_config(root: &Path) -> Config {
    Config {
        backoff_base_secs: 0,
        backoff_cap_secs: 0,
        jitter_max_secs: 0,
        page_delay: Duration::ZERO,
        pob_delay: Duration::ZERO,
        cache_dir: root.join("cache"),
        out_dir: root.join("out"),
        ..Config::default()
    }
}

/// A complete, well-formed ladder row. The profile link follows the
/// site's `/builds/<league>/character/<account>/<character>` shape.
pub fn complete_row(name: &str, ascendancy: &str, dps: &str) -> String {
    format!(
        concat!(
            r#"<tr><td><a href="/builds/testleague/character/acct-{name}/{name}">{name}</a></td>"#,
            r#"<td>96 <img alt="{asc}" src="https://cdn.test/{asc}.png"></td>"#,
            r#"<td>4,812</td><td>350</td><td>63k</td>"#,
            r#"<td>{dps} <img src="https://cdn.test/BoneshatterGem.png" alt=""></td>"#,
            r#"<td><img alt="Resolute Technique" src="/rt.png"></td></tr>"#
        ),
        name = name,
        asc = ascendancy,
        dps = dps,
    )
}

/// Name anchor present but without an href.
pub fn row_without_profile(name: &str) -> String {
    format!(
        r#"<tr><td><a>{name}</a></td><td>90</td><td>3,000</td><td>0</td><td>30k</td><td>500k</td><td></td></tr>"#
    )
}

/// Wrap rows into a full document with a populated table skeleton.
pub fn ladder_page(rows: &str) -> String {
    format!(
        "<html><body><main><table><thead><tr><th>Character</th></tr></thead>\
         <tbody>{rows}</tbody></table></main></body></html>"
    )
}

pub fn empty_ladder_page() -> String {
    ladder_page("")
}

/// A build detail page carrying a Path of Building import code.
pub fn profile_page(code: &str) -> String {
    format!(
        r#"<html><body><input aria-label="Path of Building import code" value="{code}"></body></html>"#
    )
}

/// The listing URL the navigator composes for a league, scope and page.
pub fn listing_url(league: &str, snapshot: &str, page: u32) -> String {
    let mut url = format!("https://poe.ninja/builds/{league}");
    let mut separator = '?';
    if snapshot != "latest" {
        url.push(separator);
        url.push_str(&format!("timemachine={snapshot}"));
        separator = '&';
    }
    if page >= 2 {
        url.push(separator);
        url.push_str(&format!("page={page}"));
    }
    url
}

/// Absolute URL of a complete_row build's detail page.
pub fn profile_url(name: &str) -> String {
    format!("https://poe.ninja/builds/testleague/character/acct-{name}/{name}")
}
