//! Document Model - Core document tree structure and types
//!
//! This crate provides the foundational document model for the editor:
//! a typed tree of block/inline/text nodes with attribute maps, marks over
//! text runs, the custom scholarly element types, and the inline serialized
//! format used for storage and rendering outside the editor.

mod attr;
mod change;
mod document;
mod error;
mod mark;
mod node;
mod node_id;
mod position;
mod registry;
mod serial;
mod tree;

pub mod elements;

pub use attr::*;
pub use change::*;
pub use document::*;
pub use error::*;
pub use mark::*;
pub use node::*;
pub use node_id::*;
pub use position::*;
pub use registry::*;
pub use serial::*;
pub use tree::*;
