//! # bhq
//!
//! Merge browser history stores accumulated across machines and
//! profiles into one durable SQLite store, query it, and optionally
//! launch a result in the default browser.

pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod launch;
pub mod logging;
pub mod project;
pub mod query;
pub mod render;
pub mod snapshot;
pub mod store;
pub mod timestamp;
