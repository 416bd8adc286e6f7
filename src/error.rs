use thiserror::Error;

// Errors raised while turning caller input into a bike record.
// Unknown bike ids and refused transitions are not errors; the service
// reports those as `false` / `None`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RentalError {
    #[error("Unknown bike type: {0}")]
    UnknownType(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for field {field}: {reason}")]
    InvalidField { field: String, reason: String },
}

pub type Result<T, E = RentalError> = std::result::Result<T, E>;
