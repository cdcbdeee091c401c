//! File storage operations against the Puter drive.

pub mod core;
pub mod entry;
