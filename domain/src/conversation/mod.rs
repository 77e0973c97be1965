//! Conversation aggregate: entities, ids, and the provider-facing transcript

pub mod entities;
pub mod transcript;
pub mod value_objects;
