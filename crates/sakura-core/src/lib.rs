//! Core engine for the sakura maid assistant.
//!
//! - **[`tools`]** -- the [`Tool`](tools::registry::Tool) contract and the
//!   name-indexed [`ToolRegistry`](tools::registry::ToolRegistry)
//! - **[`agent`]** -- [`MaidAgent`](agent::MaidAgent), the tool-calling loop
//!   that turns one request into one reply
//! - **[`observer`]** -- the hook the CLI uses to narrate the loop
//! - **[`persona`]** -- the system prompt
//! - **[`security`]** -- tool output size limits
//!
//! Tool implementations live in `sakura-tools`; this crate only knows the
//! trait.

pub mod agent;
pub mod observer;
pub mod persona;
pub mod security;
pub mod tools;

pub use agent::{AgentSettings, MaidAgent};
pub use observer::{AgentObserver, NullObserver};
pub use tools::registry::{Tool, ToolError, ToolRegistry};
