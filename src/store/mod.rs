mod cache;
mod snapshot;

pub use cache::CaptureCache;
pub use snapshot::{default_snapshot_path, write_snapshot};
