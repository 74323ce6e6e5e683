//! Adapters for the outside world: SMTP, the AI backend and the HTTP API

pub mod ai;
pub mod email;
pub mod http;
