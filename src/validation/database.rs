//! Database validation for MySQL operations keyed by vhost name.
//!
//! Names and character sets are interpolated into SQL, so both are restricted
//! to identifier characters.

use crate::error::VhostError;

/// Maximum length for database names.
const MAX_DATABASE_NAME_LENGTH: usize = 64;

/// Maximum length for character set names.
const MAX_CHARSET_LENGTH: usize = 32;

/// Validates a database name.
///
/// # Rules
///
/// - Must be 1-64 characters
/// - Must start with a letter or underscore
/// - Can contain only alphanumeric characters and underscores
/// - Cannot be a reserved MySQL schema or common admin name
pub fn validate_database_name(name: &str) -> Result<&str, VhostError> {
    let Some(first_char) = name.chars().next() else {
        return Err(VhostError::invalid_parameter(
            "name",
            "Database name cannot be empty",
        ));
    };

    if name.len() > MAX_DATABASE_NAME_LENGTH {
        return Err(VhostError::invalid_parameter(
            "name",
            format!(
                "Database name exceeds maximum length of {} characters",
                MAX_DATABASE_NAME_LENGTH
            ),
        ));
    }

    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(VhostError::invalid_parameter(
            "name",
            "Database name must start with a letter or underscore",
        ));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(VhostError::invalid_parameter(
            "name",
            "Database name can only contain letters, numbers, and underscores",
        ));
    }

    if is_reserved_keyword(&name.to_lowercase()) {
        return Err(VhostError::invalid_parameter(
            "name",
            format!("'{}' is a reserved database name", name),
        ));
    }

    Ok(name)
}

/// Validates a MySQL character set name (e.g. `utf8mb4`).
pub fn validate_charset(charset: &str) -> Result<&str, VhostError> {
    if charset.is_empty() || charset.len() > MAX_CHARSET_LENGTH {
        return Err(VhostError::invalid_parameter(
            "charset",
            format!("Character set must be 1-{} characters", MAX_CHARSET_LENGTH),
        ));
    }

    if !charset.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(VhostError::invalid_parameter(
            "charset",
            format!("Invalid character set '{}'", charset),
        ));
    }

    Ok(charset)
}

fn is_reserved_keyword(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "mysql",
        "information_schema",
        "performance_schema",
        "sys",
        "root",
        "admin",
    ];
    RESERVED.contains(&name)
}
