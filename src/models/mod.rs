//! Core data models for the video content store.
//!
//! These describe objects as they exist on disk. Nothing here is persisted
//! by this crate; the identifier is handed back to the caller to keep.

pub mod stored_object;
