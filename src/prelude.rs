//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use flocate::prelude::*;
//! ```

// Core
pub use crate::core::errors::{FlocateError, Result};

// Index model
pub use crate::index::descriptors::{FileDescriptor, SuffixDescriptor};
pub use crate::index::format::Index;

// Indexer
pub use crate::indexer::{IndexerConfig, build_index, build_index_file};

// Locator
pub use crate::locator::query::Locator;
