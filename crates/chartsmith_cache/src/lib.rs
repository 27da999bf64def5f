//! # chartsmith_cache
//!
//! Fingerprint store for incremental chart builds.
//!
//! This crate remembers, for every artifact a build produced, the fingerprint
//! of the job that produced it. The builder compares that stored value with a
//! freshly computed one to decide whether the artifact can be reused.
//!
//! ## Storage
//!
//! The store is a flat JSON object mapping output paths to hex digests.
//! It is read once when a batch starts and written once when it ends.
//! Writes go through a temporary file that is renamed into place, so a
//! crash never leaves a half-written store behind.
//!
//! A missing or unreadable store is never fatal: it loads as empty and every
//! job is rebuilt.

mod error;
mod fingerprint;
mod store;

pub use error::CacheError;
pub use fingerprint::Fingerprint;
pub use store::{CacheStore, LoadStatus};
