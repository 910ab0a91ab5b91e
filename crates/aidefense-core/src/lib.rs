//! AI Defense SDK core library
//!
//! This crate provides the domain models, error types, and configuration
//! shared by the AI Defense model-scanning client.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{Config, ScanPollConfig};
pub use error::SdkError;
pub use models::{RepoAuth, RepoConfig, ScanStatus, ScanStatusInfo, UrlType};
