//! # sakura-types
//!
//! Core type definitions for the sakura maid assistant.
//!
//! Every other sakura crate depends on this one. It contains:
//!
//! - **[`error`]** -- [`SakuraError`] and the crate-wide [`Result`] alias
//! - **[`config`]** -- Configuration schema loaded from `config.json`
//! - **[`event`]** -- Events emitted by the agent loop while it works

pub mod config;
pub mod error;
pub mod event;

pub use error::{Result, SakuraError};
