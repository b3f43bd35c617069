// src/cli.rs

use std::path::PathBuf;

use clap::Parser;

/// Scrape a poe.ninja builds ladder into a timestamped JSON snapshot.
#[derive(Debug, Parser)]
#[command(name = "ninja_scrape", version, about)]
pub struct Cli {
    /// League identifier as it appears in the ladder URL
    /// (e.g. mercenarieshcssf)
    pub league: String,

    /// Time scope: latest, hour-<N>, day-<N> or week-<N>
    #[arg(default_value = "latest")]
    pub snapshot: String,

    /// Keep only builds of this ascendancy (exact match, e.g. Berserker)
    #[arg(long, short = 'a')]
    pub ascendancy: Option<String>,

    /// Keep only builds at or above this character level
    #[arg(long)]
    pub min_level: Option<u32>,

    /// Keep only builds at or below this character level
    #[arg(long)]
    pub max_level: Option<u32>,

    /// Stop after this many rows
    #[arg(long, short = 'l')]
    pub limit: Option<usize>,

    /// Snapshot file path (default: <out-dir>/<league>/<scope>-<day>.json)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Export Path of Building import codes for the top N builds
    #[arg(long, short = 'p', value_name = "N")]
    pub export_pob: Option<usize>,

    /// Directory for exported import codes
    #[arg(long, default_value = "builds/pob_exports")]
    pub pob_dir: PathBuf,

    /// Raw-capture cache directory (overrides NINJA_CACHE_DIR)
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Re-fetch every page, ignoring fresh captures
    #[arg(long)]
    pub no_cache: bool,
}
