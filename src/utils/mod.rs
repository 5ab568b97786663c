//! Utilities.

pub mod unicode;
