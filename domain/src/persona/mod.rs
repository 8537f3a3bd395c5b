//! Persona catalog and tier gating

pub mod entities;
pub mod registry;
pub mod tier;
