#[cfg(test)]
pub mod fixture;
mod renderer;
mod zenrows;

pub use renderer::{RenderError, RenderRequest, Renderer};
pub use zenrows::ZenRowsRenderer;
