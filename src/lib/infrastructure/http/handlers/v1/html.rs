//! HTML template handlers

pub mod optimize;
pub mod upload;
