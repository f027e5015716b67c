//! Destination document store (MongoDB).
//!
//! The destination database and collection are created implicitly by the
//! server on first write; this module performs no schema or collection
//! setup. Writes are append-only — no dedup, no updates, no deletes — so
//! re-running the pipeline duplicates previously stored objects.

mod mongo;

pub use mongo::{Store, StoreError};
