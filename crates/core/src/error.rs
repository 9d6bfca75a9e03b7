use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Configuration and usage errors.
///
/// These never describe problems with user input; those are collected as
/// [`ProcessingError`](crate::processing_error::ProcessingError) values on the
/// processing result instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Unknown parameter type: `{}`", .0)]
    UnknownType(String),

    #[error("Unknown component `{}` requested for parameter type `{}`", .component, .type_id)]
    UnknownComponent { type_id: String, component: String },

    #[error("Parameter specification is missing the required field `{}`", .0)]
    MissingField(String),

    #[error("Field `{}` of parameter `{}` should be {}", .field, .name, .expected)]
    InvalidField {
        name: String,
        field: String,
        expected: String,
    },

    #[error("Cyclic dependency between parameters: {}", .0.join(", "))]
    CycleDetected(Vec<String>),

    #[error("Illegal state: {}", .0)]
    IllegalState(String),
}

impl Error {
    pub fn unknown_component(type_id: &str, component: &str) -> Self {
        Self::UnknownComponent {
            type_id: type_id.to_string(),
            component: component.to_string(),
        }
    }

    pub fn invalid_field(name: &str, field: &str, expected: &str) -> Self {
        Self::InvalidField {
            name: name.to_string(),
            field: field.to_string(),
            expected: expected.to_string(),
        }
    }

    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::IllegalState(message.into())
    }
}
