pub mod audio;
pub mod chat;
pub mod config;
pub mod errors;
pub mod llm;
pub mod logging;
pub mod models;
pub mod rag;
pub mod vision;

/// Number of (query, response) pairs a conversation context retains.
pub const HISTORY_CAPACITY: usize = 5;

/// Default number of passages requested per retrieval.
pub const DEFAULT_TOP_K: usize = 3;

pub use config::AppConfig;
pub use errors::*;
