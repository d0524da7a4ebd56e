//! Typed key-value cache for TurboCommerce.
//!
//! Values are stored as JSON bytes through a [`KvBackend`], so any backend
//! that can hold bytes by key can persist engine state.
//!
//! # Example
//!
//! ```rust
//! use turbo_cache::Cache;
//!
//! let cache = Cache::in_memory();
//! cache.set("favorites", &vec!["lens-1", "cam-2"]).unwrap();
//!
//! let favorites: Option<Vec<String>> = cache.get("favorites").unwrap();
//! assert_eq!(favorites.unwrap().len(), 2);
//!
//! cache.delete("favorites").unwrap();
//! assert!(!cache.exists("favorites").unwrap());
//! ```

mod error;
mod kv;

pub use error::CacheError;
pub use kv::{Cache, KvBackend, MemoryBackend};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, KvBackend, MemoryBackend};
}
