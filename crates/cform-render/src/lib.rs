#![forbid(unsafe_code)]

//! Render kernel for the contact form: cells, styles, buffers, frames, and
//! the accessibility tree widgets register into.

pub mod buffer;
pub mod cell;
pub mod frame;
pub mod semantics;
pub mod style;

pub use style::Style;
