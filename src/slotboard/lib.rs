//! # Slotboard Architecture
//!
//! Slotboard is a **UI-agnostic content scheduling library**: a board of post, promo
//! and reel cards that live either in an unscheduled pool or in numbered slots on
//! calendar days. The binary is one client of it; a web or desktop front end could be
//! another.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Owns the session document                                │
//! │  - Dispatches to commands, saves (or defers saving)         │
//! └─────────────────────────────────────────────────────────────┘
//!                 │                            │
//!                 ▼                            ▼
//! ┌───────────────────────────────┐ ┌───────────────────────────┐
//! │  Commands (commands/*.rs)     │ │  Metrics (metrics.rs)     │
//! │  - Mutations on the document  │ │  - Read-only aggregations │
//! └───────────────────────────────┘ └───────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - DocumentStore trait, FileStore, InMemoryStore            │
//! │  - Gateway: remote document + local cache, migration        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes Rust arguments and returns Rust types. It never
//! writes to stdout/stderr and never exits the process. Diagnostics go through the
//! `log` macros; the binary decides where they end up (see [`logging`]).
//!
//! ## Testing Strategy
//!
//! 1. **Commands** and **metrics**: thorough unit tests over fixture documents.
//! 2. **API**: dispatch and save behavior against `InMemoryStore`.
//! 3. **Store**: file round trips and gateway fallbacks, in `tests/` with temp dirs.
//! 4. **CLI**: end-to-end runs of the binary against a temporary data directory.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Board mutations and lookups
//! - [`metrics`]: Weekly progress, calendar, KPIs, charts, week grid
//! - [`store`]: Storage abstraction, backends and the remote/cache gateway
//! - [`model`]: Cards, slots, the schedule and the board document
//! - [`datekey`]: Calendar-day keys (`YYYY-MM-DD`)
//! - [`debounce`]: Deferred saves for text edits
//! - [`config`]: Slot layout, goals and remote location
//! - [`logging`]: Rolling file logs
//! - [`error`]: Error types
//! - `cli`: Argument parsing and terminal rendering for the binary (not part of the lib API)

pub mod api;
pub mod commands;
pub mod config;
pub mod datekey;
pub mod debounce;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod store;
