// src/scrape/pob.rs
//
// Path of Building import codes live on each build's detail page, in an
// input the page fills after its scripts run. Export is a follow-up
// phase over an already-assembled snapshot: one detail render per
// build, one .txt per code.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use once_cell::sync::OnceCell;
use scraper::{Html, Selector};

use crate::domain::BuildRecord;
use crate::errors::ScrapeError;
use crate::render::{RenderRequest, Renderer};

const PROFILE_ORIGIN: &str = "https://poe.ninja";
const POB_INPUT_SELECTOR: &str = r#"input[aria-label*="Path of Building"]"#;

fn pob_input_selector() -> &'static Selector {
    static SELECTOR: OnceCell<Selector> = OnceCell::new();
    SELECTOR.get_or_init(|| Selector::parse(POB_INPUT_SELECTOR).unwrap())
}

/// Fetch the import code for one build. Per-build failures are worth a
/// message, not a dead run, so the error is a plain description.
pub fn export_import_code(
    renderer: &dyn Renderer,
    build: &BuildRecord,
) -> Result<String, String> {
    let url = if build.profile_url.starts_with("http") {
        build.profile_url.clone()
    } else {
        format!("{PROFILE_ORIGIN}{}", build.profile_url)
    };

    let request = RenderRequest::new(url, POB_INPUT_SELECTOR);
    let html = renderer.render(&request).map_err(|e| e.to_string())?;

    let document = Html::parse_document(&html);
    document
        .select(pob_input_selector())
        .next()
        .and_then(|input| input.value().attr("value"))
        .map(str::to_string)
        .filter(|code| !code.is_empty())
        .ok_or_else(|| {
            format!(
                "no import code on the profile page of {}",
                build.character_name
            )
        })
}

/// Export codes for a batch of builds into `out_dir`, one file per
/// character. A failed build is logged and skipped; only an unusable
/// output directory is fatal. Returns the paths actually written.
pub fn export_import_codes(
    renderer: &dyn Renderer,
    builds: &[BuildRecord],
    out_dir: &Path,
    delay: Duration,
) -> Result<Vec<PathBuf>, ScrapeError> {
    fs::create_dir_all(out_dir)
        .map_err(|e| ScrapeError::Persistence(format!("create {}: {e}", out_dir.display())))?;

    let mut written = Vec::new();
    for (position, build) in builds.iter().enumerate() {
        if position > 0 {
            thread::sleep(delay);
        }
        match export_import_code(renderer, build) {
            Ok(code) => {
                let path = out_dir.join(format!("{}.txt", safe_file_name(&build.character_name)));
                match fs::write(&path, &code) {
                    Ok(()) => {
                        tracing::info!(
                            character = %build.character_name,
                            chars = code.len(),
                            "import code saved"
                        );
                        written.push(path);
                    }
                    Err(e) => {
                        tracing::warn!(
                            character = %build.character_name,
                            error = %e,
                            "could not save import code"
                        );
                    }
                }
            }
            Err(reason) => {
                tracing::warn!(character = %build.character_name, %reason, "skipping build");
            }
        }
    }
    Ok(written)
}

/// Character names are foreign input; anything outside alphanumerics
/// becomes an underscore.
fn safe_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}
