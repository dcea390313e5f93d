//! Vhost name validation.
//!
//! The name becomes a file name in two config directories and, with the
//! domain suffix, a directory under the sites root.

use crate::error::{ValidationErrorKind, VhostError};

/// Maximum length for a vhost name.
const MAX_NAME_LENGTH: usize = 64;

fn invalid(name: &str, message: impl Into<String>) -> VhostError {
    VhostError::Validation {
        kind: ValidationErrorKind::InvalidName {
            name: name.to_string(),
            message: message.into(),
        },
    }
}

/// Validates a vhost name.
///
/// # Rules
///
/// - Must be 1-64 characters
/// - Can contain alphanumeric, dots, dashes, and underscores
/// - Must start with alphanumeric character
/// - Must not contain `..`
pub fn validate_vhost_name(name: &str) -> Result<&str, VhostError> {
    let Some(first_char) = name.chars().next() else {
        return Err(invalid(name, "name cannot be empty"));
    };

    if name.len() > MAX_NAME_LENGTH {
        return Err(invalid(
            name,
            format!("name exceeds maximum length of {} characters", MAX_NAME_LENGTH),
        ));
    }

    if !first_char.is_ascii_alphanumeric() {
        return Err(invalid(name, "name must start with a letter or number"));
    }

    if let Some(c) = name
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && *c != '.' && *c != '-' && *c != '_')
    {
        return Err(invalid(name, format!("name contains invalid character '{}'", c)));
    }

    if name.contains("..") {
        return Err(invalid(name, "name contains path traversal sequence"));
    }

    Ok(name)
}
