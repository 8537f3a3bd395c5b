//! Infrastructure layer for roundtable
//!
//! This crate contains the adapters that implement the ports defined in
//! the application layer: the five provider backends, the fallback router
//! with its response cache, configuration file loading, and the shipped
//! conversation stores.

pub mod cache;
pub mod config;
pub mod credentials;
pub mod providers;
pub mod storage;

// Re-export commonly used types
pub use cache::{CacheKey, ResponseCache};
pub use config::{ConfigLoader, DefaultsConfig, FileConfig, StorageConfig};
pub use credentials::Credential;
pub use providers::{ProviderAdapter, default_adapters, router::FallbackRouter};
pub use storage::{
    jsonl::JsonlConversationStore, memory::InMemoryConversationStore, usage::FileUsageMeter,
};
