//! Dispatch module: fans a draft out to every recipient.

mod outcome;
mod service;

pub use outcome::{DispatchOutcome, RecipientOutcome, SendStatus};
pub use service::{DispatchService, DispatchServiceImpl};
