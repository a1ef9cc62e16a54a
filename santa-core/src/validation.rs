use thiserror::Error;

pub const MIN_NAME_LEN: usize = 2;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name is required")]
    NameRequired,
    #[error("Name must be at least {min} characters")]
    NameTooShort { min: usize },
    #[error("Please enter a valid email address")]
    InvalidFormat,
}

impl ValidationError {
    /// Form field the error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::NameRequired | ValidationError::NameTooShort { .. } => "name",
            ValidationError::InvalidFormat => "email",
        }
    }
}

/// Returns the trimmed name to store.
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::NameRequired);
    }
    if trimmed.chars().count() < MIN_NAME_LEN {
        return Err(ValidationError::NameTooShort { min: MIN_NAME_LEN });
    }
    Ok(trimmed.to_string())
}

/// Email is optional: blank input yields `Ok(None)`.
pub fn validate_email(email: &str) -> Result<Option<String>, ValidationError> {
    if email.trim().is_empty() {
        return Ok(None);
    }
    if looks_like_email(email) {
        Ok(Some(email.to_string()))
    } else {
        Err(ValidationError::InvalidFormat)
    }
}

// local@domain.tld with no whitespace and a single '@'
fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, ch)| ch == '.' && i > 0 && i + 1 < domain.len())
}
