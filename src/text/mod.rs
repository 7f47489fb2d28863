//! Text indexes built on the integer sets.
//!
//! - [`SubstringIndex`]: start positions of any sequence within one text
//! - [`Catalog`]: one substring index per item of a keyed collection, kept in
//!   sync through [`ChangeListener`] notifications or a coalesced [`ChangeBatch`]
//! - [`Trie`]: ordered prefix trie with shortest-unique-prefix enumeration

pub mod build;
pub mod catalog;
pub mod changes;
pub mod substring;
pub mod trie;

pub use build::{FileCatalog, FileMatch, build_file_catalog, collect_files};
pub use catalog::{Catalog, ChangeListener, ItemId};
pub use changes::{ChangeBatch, ItemChange, Pending};
pub use substring::SubstringIndex;
pub use trie::Trie;
