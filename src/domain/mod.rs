mod build;
mod snapshot;
mod snapshot_id;

pub use build::BuildRecord;
pub use snapshot::{BuildSnapshot, SnapshotFilters};
pub use snapshot_id::SnapshotId;
