//! Storage and streaming services used by the HTTP handlers.

pub mod content_store;
pub mod range;
pub mod range_streamer;
