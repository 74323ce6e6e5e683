//! Domain logic: addresses, dispatch, content ports and the compose/upload pipelines

pub mod communication;
pub mod content;
pub mod pipeline;
