/// Malformed or out-of-range request input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A required field was not supplied.
    #[error("missing field: {0}")]
    MissingField(&'static str),
    /// A field could not be parsed or violated its constraints.
    #[error("invalid {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
}

impl ValidationError {
    pub(crate) fn out_of_range<T: std::fmt::Display>(
        field: &'static str,
        value: T,
        min: T,
        max: T,
    ) -> Self {
        ValidationError::InvalidField {
            field,
            message: format!("{value} is outside {min}..={max}"),
        }
    }
}
