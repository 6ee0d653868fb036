//! Custom scholarly element types
//!
//! Each module provides typed constructors and accessors over the generic
//! attribute map for one element kind.

pub mod citation;
pub mod image;
pub mod note;
pub mod reading;
pub mod toc_anchor;

pub use citation::*;
pub use image::*;
pub use note::*;
pub use reading::*;
pub use toc_anchor::*;
