pub mod client;
pub mod snapshot;
pub mod source;
pub mod types;

pub use client::TodoistClient;
pub use snapshot::{Snapshot, SnapshotSource};
pub use source::TaskSource;
pub use types::*;
