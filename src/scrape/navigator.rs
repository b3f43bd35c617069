// src/scrape/navigator.rs

use std::thread;
use std::time::{Duration, Instant};

use once_cell::sync::OnceCell;
use rand::Rng;
use scraper::{Html, Selector};
use url::Url;

use crate::config::Config;
use crate::domain::SnapshotId;
use crate::errors::ScrapeError;
use crate::render::{RenderRequest, Renderer};
use crate::store::CaptureCache;

/// Selector the render must satisfy before a page counts as drawn. The
/// body may legitimately hold zero rows; waiting on rows would turn an
/// empty league into a timeout.
pub const TABLE_BODY_SELECTOR: &str = "table tbody";

fn table_body_selector() -> &'static Selector {
    static SELECTOR: OnceCell<Selector> = OnceCell::new();
    SELECTOR.get_or_init(|| Selector::parse(TABLE_BODY_SELECTOR).unwrap())
}

/// League identifiers are plain URL path segments on poe.ninja. This is
/// a shape check only; whether the league exists is the remote's call.
pub fn validate_league(league: &str) -> Result<(), ScrapeError> {
    if league.is_empty() {
        return Err(ScrapeError::InvalidInput("league must not be empty".into()));
    }
    if !league
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ScrapeError::InvalidInput(format!(
            "league {league:?} may only contain ASCII letters, digits, '-' and '_'"
        )));
    }
    Ok(())
}

/// One rendered ladder page, parsed and ready for the extractor.
#[derive(Debug)]
pub struct TablePage {
    pub page: u32,
    pub from_cache: bool,
    document: Html,
}

impl TablePage {
    pub fn document(&self) -> &Html {
        &self.document
    }
}

/// The only component that talks to the network. Owns the retry policy
/// and consults the capture cache before spending a render call.
pub struct Navigator<'a> {
    renderer: &'a dyn Renderer,
    cache: CaptureCache,
    config: &'a Config,
}

impl<'a> Navigator<'a> {
    pub fn new(renderer: &'a dyn Renderer, cache: CaptureCache, config: &'a Config) -> Self {
        Self {
            renderer,
            cache,
            config,
        }
    }

    /// Fetch one page of the ladder, from cache when a fresh capture
    /// exists, otherwise through the renderer with bounded retries.
    pub fn fetch_table_page(
        &self,
        league: &str,
        snapshot_id: &SnapshotId,
        page: u32,
    ) -> Result<TablePage, ScrapeError> {
        if let Some(html) = self.cache.lookup(league, snapshot_id, page) {
            tracing::debug!(league, page, "serving page from capture cache");
            return Ok(TablePage {
                page,
                from_cache: true,
                document: Html::parse_document(&html),
            });
        }

        let url = self.listing_url(league, snapshot_id, page)?;
        let html = self.render_with_retry(&url)?;

        if let Err(e) = self.cache.store(league, snapshot_id, page, &html) {
            tracing::warn!(league, page, error = %e, "could not store capture");
        }

        Ok(TablePage {
            page,
            from_cache: false,
            document: Html::parse_document(&html),
        })
    }

    /// Compose the listing URL for a league, scope and page. `latest`
    /// carries no `timemachine` parameter and page 1 no `page`
    /// parameter, matching the site's own canonical URLs.
    fn listing_url(
        &self,
        league: &str,
        snapshot_id: &SnapshotId,
        page: u32,
    ) -> Result<String, ScrapeError> {
        let mut url = Url::parse(&self.config.base_url).map_err(|e| {
            ScrapeError::InvalidInput(format!("bad base url {:?}: {e}", self.config.base_url))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                ScrapeError::InvalidInput(format!(
                    "base url {:?} cannot take a league segment",
                    self.config.base_url
                ))
            })?
            .push(league);
        if let Some(timemachine) = snapshot_id.timemachine_param() {
            url.query_pairs_mut()
                .append_pair("timemachine", &timemachine);
        }
        if page >= 2 {
            url.query_pairs_mut().append_pair("page", &page.to_string());
        }
        Ok(url.to_string())
    }

    /// Bounded retries with doubling, jittered backoff. A render only
    /// counts as a success once the table body is in the document; a
    /// body with zero rows is a valid result and comes back as-is.
    fn render_with_retry(&self, url: &str) -> Result<String, ScrapeError> {
        let request = RenderRequest::new(url, TABLE_BODY_SELECTOR);
        let mut last_cause = String::from("no attempts were made");

        for attempt in 1..=self.config.max_attempts {
            let start = Instant::now();
            match self.renderer.render(&request) {
                Ok(html) if table_body_present(&html) => {
                    tracing::debug!(
                        attempt,
                        elapsed = ?start.elapsed(),
                        renderer = self.renderer.name(),
                        "render succeeded"
                    );
                    return Ok(html);
                }
                Ok(_) => {
                    last_cause = "rendered page has no table body".to_string();
                    tracing::warn!(attempt, url, "rendered page has no table body");
                }
                Err(e) => {
                    last_cause = e.to_string();
                    tracing::warn!(attempt, url, error = %e, "render attempt failed");
                }
            }
            if attempt < self.config.max_attempts {
                self.backoff(attempt);
            }
        }

        Err(ScrapeError::RemoteUnavailable {
            attempts: self.config.max_attempts,
            last_cause,
        })
    }

    fn backoff(&self, attempt: u32) {
        let doubled = 1u64 << (attempt - 1).min(16);
        let base = self
            .config
            .backoff_base_secs
            .saturating_mul(doubled)
            .min(self.config.backoff_cap_secs);
        let jitter = rand::thread_rng().gen_range(0..=self.config.jitter_max_secs);
        thread::sleep(Duration::from_secs(base + jitter));
    }

    /// Pause between consecutive network fetches. Cached pages cost the
    /// remote nothing, so the caller skips the pause for those.
    pub fn polite_pause(&self) {
        thread::sleep(self.config.page_delay);
    }
}

fn table_body_present(html: &str) -> bool {
    let document = Html::parse_document(html);
    document.select(table_body_selector()).next().is_some()
}
