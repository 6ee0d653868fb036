//! Outline - heading ids and table-of-contents derivation
//!
//! After a text-changing mutation, the stabilizer assigns deterministic,
//! collision-free ids to heading blocks. Ids derive from the heading text;
//! only headings whose id actually changed are touched, and the pass is
//! idempotent, so external anchors stay stable across unrelated edits.

mod slug;
mod stabilizer;
mod toc;

pub use slug::*;
pub use stabilizer::*;
pub use toc::*;
