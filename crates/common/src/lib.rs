//! BlogForge Common Library
//!
//! Shared code for the BlogForge gateway including:
//! - Database models and repository patterns
//! - Session authentication and the article ownership guard
//! - Plain-text export formatting
//! - Generative-language client abstraction
//! - Error types and handling
//! - Configuration management
//! - Metrics and observability

pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod export;
pub mod generation;
pub mod metrics;

// Re-export commonly used types
pub use config::AppConfig;
pub use db::{DbPool, Repository};
pub use errors::{AppError, Result};
pub use generation::Generator;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default generative model
pub const DEFAULT_GENERATION_MODEL: &str = "gemini-pro";
