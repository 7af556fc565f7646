//! Request parameter validation shared by the HTTP handlers and the
//! work-item interactor.

use crate::error::{RelayError, RelayResult};

/// Checks that every named parameter is present and not blank.
///
/// All missing names are reported together, in the order given.
pub fn require_params(params: &[(&str, Option<&str>)]) -> RelayResult<()> {
    let missing: Vec<&str> = params
        .iter()
        .filter(|(_, value)| value.is_none_or(|v| v.trim().is_empty()))
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(RelayError::missing_parameters(missing))
    }
}

/// Rejects values that cannot be embedded in a WIQL string literal.
///
/// Quotes are handled by escaping at query build time; control characters
/// (line breaks included) have no legitimate use in an email or an
/// iteration path and are refused outright.
pub fn ensure_wiql_literal(name: &str, value: &str) -> RelayResult<()> {
    if value.chars().any(char::is_control) {
        return Err(RelayError::invalid_parameter(
            name,
            "contains control characters",
        ));
    }
    Ok(())
}
