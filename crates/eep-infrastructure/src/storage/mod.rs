//! Snapshot slots and the storage codec layered on top of them.

mod file_slot;
mod memory_slot;
mod snapshot_storage;

pub use file_slot::FileSnapshotSlot;
pub use memory_slot::MemorySnapshotSlot;
pub use snapshot_storage::SnapshotStorage;
