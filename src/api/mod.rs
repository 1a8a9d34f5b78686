//! API Module
//!
//! Request boundary used by the CLI and by any embedding transport.
//! - `commands.rs`: predict, summarize and model listing

pub mod commands;

pub use commands::*;
