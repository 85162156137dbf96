//! Search-as-you-type filtering for JSON document trees.
//!
//! The core is [`filter::TreeFilter`]: given a document and a case-insensitive
//! substring term it returns a pruned copy of the tree holding only matching
//! branches, plus the ordered key-paths of every match. [`expand`] turns those
//! paths into expand/collapse decisions for a tree viewer, and [`state::Session`]
//! holds the document and live term for a viewer, recomputing the view on demand.

pub mod config;
pub mod depth;
pub mod error;
pub mod expand;
pub mod file;
pub mod filter;
pub mod path;
pub mod state;
pub mod tree;
pub mod types;

pub use error::{Error, Result};
pub use expand::{expanded_paths, should_expand, ExpandSet};
pub use filter::{filter, filter_document, FilterOutcome, Pruned, SearchTerm, TreeFilter};
pub use path::KeyPath;
pub use state::Session;
