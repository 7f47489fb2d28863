//! # packset - Bit-packed integer sets and the text indexes built on them
//!
//! The crate is organized into these main modules:
//!
//! - [`sets`] - Fixed-width blocks, ranged sets with cross-range realignment,
//!   growable sets and empty/full-collapsing index sets
//! - [`text`] - Substring occurrence index, multi-item catalog and prefix trie
//! - [`utils`] - Configuration, binary detection and progress helpers
//! - [`error`] - The crate-wide [`Error`] type
//!
//! ## Quick Start
//!
//! ```
//! use packset::text::{SubstringIndex, Trie};
//!
//! let index = SubstringIndex::new("lorem ipsum dolor sit amet");
//! let starts: Vec<i64> = index.occurrences("or").iter().collect();
//! assert_eq!(starts, vec![1, 15]);
//!
//! let mut trie: Trie = Trie::new();
//! for key in ["dog", "dot", "duck", "ducks"] {
//!     trie.add(key);
//! }
//! let prefixes: Vec<String> = trie.prefixes("").collect();
//! assert_eq!(prefixes, vec!["do", "duck"]);
//! ```
//!
//! ## Representation
//!
//! A [`RangedSet`](sets::RangedSet) over `[offset, offset + length)` is an
//! array of machine words. Sets over different ranges are combined by
//! realigning one onto the other's range, shifting bits across word
//! boundaries. A substring search is then a chain of such shifted
//! intersections, one per character of the query.

pub mod error;
pub mod sets;
pub mod text;
pub mod utils;

pub use error::{Error, Result};
