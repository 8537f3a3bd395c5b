//! Application layer for roundtable
//!
//! This crate contains use cases and port definitions. It depends only on
//! the domain layer; the provider adapters, router, and stores that
//! implement the ports live in the infrastructure layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    conversation_store::{ConversationStore, MessageRole, StoreError, StoredMessage},
    generation_gateway::{GatewayError, GenerationGateway, ProviderError, TextGeneration, TextOptions},
};
pub use use_cases::build_context::{
    ContextError, ContextWindow, ContextWindowBuilder, RECENT_WINDOW,
};
pub use use_cases::compare_responses::{CompareError, CompareResponsesInput, CompareResponsesUseCase};
pub use use_cases::run_discussion::{RunDiscussionError, RunDiscussionInput, RunDiscussionUseCase};
