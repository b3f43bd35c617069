// src/render/renderer.rs

use std::error::Error;
use std::fmt;

/// What one render call needs: the target URL and a CSS selector that
/// must be populated before the page counts as settled.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub url: String,
    pub wait_for: String,
}

impl RenderRequest {
    pub fn new(url: impl Into<String>, wait_for: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            wait_for: wait_for.into(),
        }
    }
}

/// A single failed render. Retry policy belongs to the caller; this
/// type only says what went wrong once.
#[derive(Debug)]
pub enum RenderError {
    /// The renderer itself is unusable, e.g. a missing API key.
    Config(String),
    /// Transport failure talking to the render service.
    Network(String),
    /// The render service answered, but could not produce the page.
    Upstream(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Config(msg) => write!(f, "Renderer config error: {msg}"),
            RenderError::Network(msg) => write!(f, "Network error: {msg}"),
            RenderError::Upstream(msg) => write!(f, "Upstream render error: {msg}"),
        }
    }
}

impl Error for RenderError {}

/// External rendering capability. The ladder is drawn client side, so
/// plain HTTP GETs see an empty shell; implementations run the scripts,
/// wait for `wait_for` to match, and hand back the final HTML.
pub trait Renderer {
    fn render(&self, request: &RenderRequest) -> Result<String, RenderError>;

    /// Short label for log lines.
    fn name(&self) -> &'static str;
}
