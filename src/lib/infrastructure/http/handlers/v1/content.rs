//! Content generation handlers

pub mod generate;
