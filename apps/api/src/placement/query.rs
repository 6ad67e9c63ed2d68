//! Query-string helpers. Blank parameters (`?min_cgpa=`) mean "no filter".

use std::str::FromStr;

use crate::errors::AppError;

pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Parses a non-blank parameter. Garbage is a validation error.
pub fn parse_param<T: FromStr>(name: &str, value: &Option<String>) -> Result<Option<T>, AppError> {
    non_blank(value)
        .map(|v| {
            v.parse::<T>()
                .map_err(|_| AppError::Validation(format!("Invalid value for '{name}': {v}")))
        })
        .transpose()
}
