//! bugswap Common Library
//!
//! Catalog model, backup sidecars and the fixture switcher that injects
//! reproducible visual bugs into a working tree and restores it afterwards.

pub mod backup;
pub mod catalog;
pub mod error;
pub mod switcher;
pub mod types;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogSource, CATALOG_FILE_NAME, DEFAULT_BACKUP_SUFFIX};
pub use error::{Error, Result};
pub use switcher::FixtureSwitcher;
pub use types::*;

/// bugswap version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
