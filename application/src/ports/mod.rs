//! Port definitions (interfaces to the outside world)

pub mod conversation_store;
pub mod generation_gateway;
