//! Edit Engine - the mutation pipeline
//!
//! Commands are sequences of atomic operations applied against a cloned
//! tree; either every operation applies or none do. Each committed command
//! produces a new immutable document version plus a change summary that
//! derived layers use to decide between recomputation and remapping.

mod anchor_commands;
mod command;
mod element_commands;
mod error;
mod executor;
mod image_commands;
mod note_commands;
mod operation;
mod quote_commands;
mod reading_commands;

pub use anchor_commands::*;
pub use command::*;
pub use element_commands::*;
pub use error::*;
pub use executor::*;
pub use image_commands::*;
pub use note_commands::*;
pub use operation::*;
pub use quote_commands::*;
pub use reading_commands::*;
