// src/render/fixture.rs
//
// --- Test helper ---
// Deterministic stand-in for the real renderer: canned HTML keyed by
// URL, scriptable failures, and a call log so tests can assert how many
// renders actually happened.

use std::collections::HashMap;
use std::sync::Mutex;

use super::renderer::{RenderError, RenderRequest, Renderer};

pub struct FixtureRenderer {
    pages: HashMap<String, String>,
    /// Failure messages served before any page, drained front-first.
    queued_failures: Mutex<Vec<String>>,
    calls: Mutex<Vec<String>>,
}

impl FixtureRenderer {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            queued_failures: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    /// Queue `n` failures to be served before any page succeeds.
    pub fn failing_times(self, n: usize, message: &str) -> Self {
        self.queued_failures
            .lock()
            .unwrap()
            .extend(std::iter::repeat(message.to_string()).take(n));
        self
    }

    /// URLs rendered so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Renderer for FixtureRenderer {
    fn render(&self, request: &RenderRequest) -> Result<String, RenderError> {
        self.calls.lock().unwrap().push(request.url.clone());

        let mut failures = self.queued_failures.lock().unwrap();
        if !failures.is_empty() {
            return Err(RenderError::Network(failures.remove(0)));
        }
        drop(failures);

        self.pages
            .get(&request.url)
            .cloned()
            .ok_or_else(|| RenderError::Network(format!("no fixture page for {}", request.url)))
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}
