//! # CLI Layer
//!
//! This module is **one possible UI client** for slotboard, not the application itself.
//! It is the only place that parses arguments, prints to the terminal and picks
//! exit codes.
//!
//! - `setup`: clap definitions and the grouped help screen
//! - `commands`: `run()`, context setup and the per-command `handle_*` functions
//! - `render`: turns API results (cards, week grids, calendars) into terminal text
//!
//! A CLI invocation is a short session: the board is loaded once, one command runs,
//! and any deferred save is flushed before the process exits.

pub mod commands;
pub mod render;
pub mod setup;
