//! Application use cases

pub mod build_context;
pub mod compare_responses;
pub mod run_discussion;
