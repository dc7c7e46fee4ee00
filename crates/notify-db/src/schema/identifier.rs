//! SQL identifier validation for configurable table and column names

use super::SchemaError;

/// Accept `name` or `schema.name` made of ASCII letters, digits and
/// underscores, not starting with a digit.
pub fn validate_identifier(ident: &str) -> Result<&str, SchemaError> {
    let valid_part = |part: &str| {
        let mut chars = part.chars();
        matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    };

    let mut parts = ident.split('.');
    let ok = match (parts.next(), parts.next(), parts.next()) {
        (Some(name), None, _) => valid_part(name),
        (Some(schema), Some(name), None) => valid_part(schema) && valid_part(name),
        _ => false,
    };

    if ok {
        Ok(ident)
    } else {
        Err(SchemaError::InvalidIdentifier(ident.to_string()))
    }
}
