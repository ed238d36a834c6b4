//! Common library for the course platform client
//!
//! This crate provides functionality shared by the client crates, including
//! persisted key-value storage, configuration loading, the navigation seam
//! and the associated error types.

pub mod config;
pub mod error;
pub mod navigation;
pub mod storage;

pub use crate::config::ClientConfig;
pub use error::{ConfigError, StorageError, StorageResult};
pub use navigation::Navigator;
pub use storage::{FileStorage, MemoryStorage, Storage};

/// Example usage of the storage module
///
/// ```rust,no_run
/// use common::{ClientConfig, FileStorage, Storage, storage::keys};
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = ClientConfig::from_env()?;
///     let path = config.storage_path.clone().unwrap_or_else(|| "state.json".into());
///     let storage = FileStorage::open(path)?;
///     println!("Logged in: {}", storage.get(keys::ACCESS_TOKEN)?.is_some());
///     Ok(())
/// }
/// ```
pub fn example_usage() {}
