//! # Storage Layer
//!
//! The board is one JSON document. This module defines how that document is read and
//! written, and how the two places it lives are kept in step.
//!
//! ## Backends
//!
//! The [`DocumentStore`] trait is the only thing the rest of the crate knows about
//! storage:
//!
//! - [`fs::FileStore`]: a single pretty-printed JSON file, written atomically
//!   (temp file + rename). Used both for the shared "remote" document and for the
//!   local cache.
//! - [`memory::InMemoryStore`]: no persistence, can be switched offline to simulate
//!   an unreachable remote. Used by tests.
//!
//! ## Gateway
//!
//! [`gateway::Gateway`] combines an optional remote store with a local cache:
//!
//! ```text
//! load:  remote (authoritative) ──empty──▶ cache ──found──▶ copy into remote (once)
//!           │ error                          │ nothing / malformed
//!           └──────────▶ cache               └──────────▶ empty document
//!
//! save:  cache (always) + remote (best effort)
//! ```
//!
//! Neither direction ever fails from the caller's point of view: problems are logged
//! and the in-memory document stays the source of truth for the running session.

use crate::error::Result;
use crate::model::AppDocument;

pub mod fs;
pub mod gateway;
pub mod memory;

pub use gateway::{Gateway, LoadOrigin, SaveReport};

/// Abstract interface for board document storage.
pub trait DocumentStore {
    /// Read the stored document. `Ok(None)` means nothing has been stored yet.
    fn load(&self) -> Result<Option<AppDocument>>;

    /// Replace the stored document.
    fn save(&mut self, doc: &AppDocument) -> Result<()>;

    /// Human readable location, for logs and `config` output.
    fn describe(&self) -> String;
}
