//! Recipient lists parsed from a free-text, comma separated field

use std::slice;

use thiserror::Error;

use super::EmailAddress;

/// Errors raised while parsing a recipient field
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecipientsError {
    /// Nothing was entered
    #[error("Recipient is required.")]
    Empty,

    /// At least one token is not a valid address. Holds every offending token.
    #[error("One or more email addresses are invalid: {}", quoted(.0))]
    Invalid(Vec<String>),
}

fn quoted(tokens: &[String]) -> String {
    tokens
        .iter()
        .map(|token| format!("\"{token}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

/// A non-empty, validated list of recipients in input order.
///
/// The field is split on commas and every token is trimmed. An empty token (for
/// example from a trailing comma) is invalid, and a single invalid token rejects the
/// whole list. Repeated addresses are dropped, comparing case-insensitively and keeping
/// the first occurrence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recipients(Vec<EmailAddress>);

impl Recipients {
    /// Parse and validate a raw recipient field
    pub fn parse(raw: &str) -> Result<Self, RecipientsError> {
        if raw.trim().is_empty() {
            return Err(RecipientsError::Empty);
        }

        let mut addresses: Vec<EmailAddress> = Vec::new();
        let mut invalid = Vec::new();

        for token in raw.split(',').map(str::trim) {
            match EmailAddress::new(token) {
                Ok(address) => {
                    if !addresses.iter().any(|seen| seen.same_mailbox(&address)) {
                        addresses.push(address);
                    }
                }
                Err(_) => invalid.push(token.to_string()),
            }
        }

        if !invalid.is_empty() {
            return Err(RecipientsError::Invalid(invalid));
        }

        Ok(Self(addresses))
    }

    /// Number of distinct recipients
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a parsed list
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the recipients in input order
    pub fn iter(&self) -> slice::Iter<'_, EmailAddress> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Recipients {
    type Item = &'a EmailAddress;
    type IntoIter = slice::Iter<'a, EmailAddress>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn as_strings(recipients: &Recipients) -> Vec<&str> {
        recipients.iter().map(EmailAddress::as_str).collect()
    }

    #[test]
    fn test_parse_single_recipient() -> TestResult {
        let recipients = Recipients::parse("a@test.com")?;

        assert_eq!(as_strings(&recipients), vec!["a@test.com"]);

        Ok(())
    }

    #[test]
    fn test_parse_multiple_recipients_trims_and_keeps_order() -> TestResult {
        let recipients = Recipients::parse(" b@y.com ,a@x.com,  c@z.org ")?;

        assert_eq!(as_strings(&recipients), vec!["b@y.com", "a@x.com", "c@z.org"]);
        assert_eq!(recipients.len(), 3);

        Ok(())
    }

    #[test]
    fn test_parse_drops_duplicates_ignoring_case() -> TestResult {
        let recipients = Recipients::parse("a@x.com, b@y.com, A@X.com")?;

        assert_eq!(as_strings(&recipients), vec!["a@x.com", "b@y.com"]);

        Ok(())
    }

    #[test]
    fn test_parse_empty_field() {
        assert_eq!(Recipients::parse(""), Err(RecipientsError::Empty));
        assert_eq!(Recipients::parse("  \t"), Err(RecipientsError::Empty));
    }

    #[test]
    fn test_parse_names_every_invalid_token() {
        let result = Recipients::parse("a@x.com, nope, b@y.com, also@bad");

        assert_eq!(
            result,
            Err(RecipientsError::Invalid(vec![
                "nope".to_string(),
                "also@bad".to_string()
            ]))
        );
    }

    #[test]
    fn test_parse_rejects_trailing_comma() {
        let result = Recipients::parse("a@x.com,");

        assert_eq!(result, Err(RecipientsError::Invalid(vec![String::new()])));
    }

    #[test]
    fn test_invalid_error_message_quotes_tokens() {
        let error = RecipientsError::Invalid(vec!["nope".to_string(), String::new()]);

        assert_eq!(
            error.to_string(),
            r#"One or more email addresses are invalid: "nope", """#
        );
    }
}
