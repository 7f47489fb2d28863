//! Bit-packed integer sets.
//!
//! - [`FixedBlock`]: an immutable set of `[0, W)` backed by one machine word
//! - [`RangedSet`]: a set over `[offset, offset + length)` built from blocks
//! - [`ShiftedView`]: a borrowed, shifted view of a `RangedSet`
//! - [`GrowableSet`]: a set over `[0, ∞)` that grows on insert
//! - [`IndexSet`]: a set over `[0, max)` with storage-free empty/full cases

pub mod block;
pub mod growable;
pub mod index_set;
pub mod ranged;
pub mod view;
pub mod word;

pub use block::{Block8, Block32, Block64, BlockIter, FixedBlock};
pub use growable::GrowableSet;
pub use index_set::IndexSet;
pub use ranged::RangedSet;
pub use view::ShiftedView;
pub use word::Word;
