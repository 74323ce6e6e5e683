//! Input checks shared by the pipelines and the HTTP handlers

use super::ValidationError;

/// A prompt worth sending to the generator
pub fn require_prompt(prompt: &str) -> Result<&str, ValidationError> {
    if prompt.trim().is_empty() {
        return Err(ValidationError::EmptyPrompt);
    }

    Ok(prompt)
}

/// HTML worth optimizing or sending
pub fn require_html(html: Option<&str>) -> Result<&str, ValidationError> {
    html.filter(|html| !html.trim().is_empty())
        .ok_or(ValidationError::NoHtmlContent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_prompt() {
        assert_eq!(require_prompt("launch"), Ok("launch"));
        assert_eq!(require_prompt(" \n\t"), Err(ValidationError::EmptyPrompt));
        assert_eq!(require_prompt(""), Err(ValidationError::EmptyPrompt));
    }

    #[test]
    fn test_require_html() {
        assert_eq!(require_html(Some("<p>Hi</p>")), Ok("<p>Hi</p>"));
        assert_eq!(require_html(Some("  ")), Err(ValidationError::NoHtmlContent));
        assert_eq!(require_html(None), Err(ValidationError::NoHtmlContent));
    }
}
