//! Use cases

pub mod create_conversation;
pub mod run_synergy;
pub mod scaffold_project;
pub mod shared;
