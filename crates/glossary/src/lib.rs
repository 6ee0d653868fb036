//! Glossary Highlighter - derived term decorations
//!
//! Derives a read-only overlay of highlighted spans from an externally
//! supplied term dictionary. Decorations are never part of the document;
//! they are recomputed from the latest committed version on text changes
//! and positionally remapped otherwise. A tooltip manager keeps exactly one
//! hover widget alive per decorated span.

mod decoration;
mod engine;
mod error;
mod matcher;
mod term;
mod tooltip;

pub use decoration::*;
pub use engine::*;
pub use error::*;
pub use matcher::*;
pub use term::*;
pub use tooltip::*;
