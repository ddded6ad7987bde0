use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty {
        field: &'static str,
    },
    NotPositive {
        field: &'static str,
    },
    BelowMinimum {
        field: &'static str,
        min: i64,
        actual: i64,
    },
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        actual: i64,
    },
    NotOneOf {
        field: &'static str,
        allowed: &'static [&'static str],
        actual: String,
    },
    InvalidFormat {
        field: &'static str,
        input: String,
    },
    MissingOneOf {
        fields: &'static [&'static str],
    },
    Requires {
        field: &'static str,
        requires: &'static str,
    },
    RangeOrder {
        from: &'static str,
        till: &'static str,
    },
    InvalidPhoneNumber {
        input: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::NotPositive { field } => write!(f, "{field} must be a positive number"),
            Self::BelowMinimum { field, min, actual } => {
                write!(f, "{field} must be at least {min} (got {actual})")
            }
            Self::OutOfRange {
                field,
                min,
                max,
                actual,
            } => write!(
                f,
                "{field} out of range: {actual} (expected {min}..={max})"
            ),
            Self::NotOneOf {
                field,
                allowed,
                actual,
            } => write!(
                f,
                "invalid {field}: {actual} (expected one of: {})",
                allowed.join(", ")
            ),
            Self::InvalidFormat { field, input } => write!(f, "invalid {field}: {input}"),
            Self::MissingOneOf { fields } => {
                write!(f, "one of {} must be provided", fields.join(", "))
            }
            Self::Requires { field, requires } => {
                write!(f, "{field} requires {requires} to be set")
            }
            Self::RangeOrder { from, till } => {
                write!(f, "{from} must not be later than {till}")
            }
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Zero is the only unsigned value rejected as an identifier.
pub(crate) fn positive(field: &'static str, value: u64) -> Result<u64, ValidationError> {
    if value == 0 {
        return Err(ValidationError::NotPositive { field });
    }
    Ok(value)
}

pub(crate) fn positive_f64(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::NotPositive { field });
    }
    Ok(value)
}

/// Trimmed, non-empty text.
pub(crate) fn non_empty(
    field: &'static str,
    value: impl Into<String>,
) -> Result<String, ValidationError> {
    let value = value.into();
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(trimmed.to_owned())
}

pub(crate) fn one_of(
    field: &'static str,
    value: &str,
    allowed: &'static [&'static str],
) -> Result<(), ValidationError> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(ValidationError::NotOneOf {
        field,
        allowed,
        actual: value.to_owned(),
    })
}

pub(crate) fn in_range(
    field: &'static str,
    value: i64,
    min: i64,
    max: i64,
) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        return Ok(());
    }
    Err(ValidationError::OutOfRange {
        field,
        min,
        max,
        actual: value,
    })
}

pub(crate) fn at_least(field: &'static str, value: i64, min: i64) -> Result<(), ValidationError> {
    if value >= min {
        return Ok(());
    }
    Err(ValidationError::BelowMinimum {
        field,
        min,
        actual: value,
    })
}

/// ASCII digits only, at least one.
pub(crate) fn digits(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && value.bytes().all(|byte| byte.is_ascii_digit()) {
        return Ok(());
    }
    Err(ValidationError::InvalidFormat {
        field,
        input: value.to_owned(),
    })
}

/// Both bounds are optional; only a present pair is compared.
pub(crate) fn ordered<T: PartialOrd>(
    from: &'static str,
    start: Option<T>,
    till: &'static str,
    end: Option<T>,
) -> Result<(), ValidationError> {
    match (start, end) {
        (Some(start), Some(end)) if start > end => Err(ValidationError::RangeOrder { from, till }),
        _ => Ok(()),
    }
}

/// Comma-separated list of digit groups, e.g. `1,2,30`.
pub(crate) fn id_list(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if !value.is_empty()
        && value
            .split(',')
            .all(|part| !part.is_empty() && part.bytes().all(|byte| byte.is_ascii_digit()))
    {
        return Ok(());
    }
    Err(ValidationError::InvalidFormat {
        field,
        input: value.to_owned(),
    })
}
