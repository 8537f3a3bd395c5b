//! Conversation store implementations
//!
//! Two adapters for the store port: an in-memory map for tests and
//! ephemeral sessions, and a JSONL-file store that appends one message
//! per line under a data directory. The monthly usage meter lives here
//! too, alongside the files it shares the data directory with.

pub mod jsonl;
pub mod memory;
pub mod usage;
