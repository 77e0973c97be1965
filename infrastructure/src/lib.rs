//! Infrastructure layer for tandem
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the flat-file conversation store, the HTTP
//! chat-completions provider client, the filesystem scaffold writer, and
//! configuration file loading.

pub mod config;
pub mod providers;
pub mod scaffold;
pub mod store;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, FileProviderConfig, FileProvidersConfig, FileScaffoldConfig,
    FileStoreConfig,
};
pub use providers::{ChatCompletionsClient, ProviderSettings};
pub use scaffold::FsScaffoldWriter;
pub use store::JsonFileStore;
