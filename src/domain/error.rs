use thiserror::Error;

/// Raised when a raw record cannot be turned into a domain value
/// after field unification.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{entity}: expected a mapping")]
    NotAMapping { entity: &'static str },

    #[error("{entity}: required field `{field}` is missing")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("{entity}: field `{field}` must be {expected}")]
    WrongType {
        entity: &'static str,
        field: &'static str,
        expected: &'static str,
    },
}
