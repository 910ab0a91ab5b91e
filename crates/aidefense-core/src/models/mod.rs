//! Data models for the model-scanning API
//!
//! Wire-format request/response types for the scan endpoints, plus the
//! repository target configuration used by repository scans.

mod repo;
mod scan;

// Re-export all models for convenient imports
pub use repo::*;
pub use scan::*;
