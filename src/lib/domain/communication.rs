//! Email addresses, the mailer port and recipient fan-out

pub mod dispatch;
pub mod email_addresses;
pub mod mailer;
