#![forbid(unsafe_code)]

//! Input events and geometry shared by every layer of the contact form stack.

pub mod event;
pub mod geometry;
