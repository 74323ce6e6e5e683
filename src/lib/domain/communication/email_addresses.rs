//! Email addresses module.

mod email_address;
mod recipients;

pub use email_address::{EmailAddress, EmailAddressError};
pub use recipients::{Recipients, RecipientsError};
