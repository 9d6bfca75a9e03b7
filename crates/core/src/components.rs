//! Pluggable parsing, validation and formatting components.
//!
//! A parameter type is nothing more than a bundle of these components (see
//! [`TypeSpec`](crate::registry::TypeSpec)). Every component receives the
//! definition's options at call time so one instance can serve many
//! definitions.

use std::fmt::Debug;
use std::sync::Arc;

use indexmap::IndexMap;
use thiserror::Error;

use crate::definition::ParamDefinition;
use crate::param::Param;
use crate::value::{ParamOptions, Value};

/// A raw value could not be turned into a value of the expected type.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{}", .message)]
pub struct ParseError {
    message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn unexpected(value: &Value, expected: &str) -> Self {
        Self::new(format!("\"{value}\" is not a valid {expected}"))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub trait ValueParser: Send + Sync + Debug {
    /// Turns a cleaned raw value into a typed value.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the value has the wrong shape.
    fn parse(&self, value: &Value, options: &ParamOptions) -> Result<Value, ParseError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self::default()
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            errors: vec![ValidationError::new(message)],
        }
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(ValidationError::new(message));
    }

    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }
}

pub trait ValueValidator: Send + Sync + Debug {
    fn validate(&self, value: &Value, options: &ParamOptions) -> ValidationResult;
}

/// Cheap predicate run before the full validator.
pub type ValidationCallback = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Final post-processing of a validated (or defaulted) value.
///
/// List parameters are formatted one element at a time.
pub trait ValueFormatter: Send + Sync + Debug {
    fn format_value(&self, value: Value, context: &mut FormatContext<'_>) -> Value;
}

/// Passes values through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullParser;

impl ValueParser for NullParser {
    fn parse(&self, value: &Value, _options: &ParamOptions) -> Result<Value, ParseError> {
        Ok(value.clone())
    }
}

/// Accepts everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullValidator;

impl ValueValidator for NullValidator {
    fn validate(&self, _value: &Value, _options: &ParamOptions) -> ValidationResult {
        ValidationResult::valid()
    }
}

/// What a formatter can see of the current run.
///
/// `params` holds the parameters processed so far, which always includes the
/// dependencies of the parameter being formatted. Formatters may also
/// introduce new definitions; the processor schedules them after the current
/// parameter.
pub struct FormatContext<'a> {
    definition: &'a ParamDefinition,
    definitions: &'a IndexMap<String, Arc<ParamDefinition>>,
    params: &'a IndexMap<String, Param>,
    introduced: Vec<ParamDefinition>,
}

impl<'a> FormatContext<'a> {
    pub fn new(
        definition: &'a ParamDefinition,
        definitions: &'a IndexMap<String, Arc<ParamDefinition>>,
        params: &'a IndexMap<String, Param>,
    ) -> Self {
        Self {
            definition,
            definitions,
            params,
            introduced: Vec::new(),
        }
    }

    /// Definition of the parameter being formatted.
    pub fn definition(&self) -> &ParamDefinition {
        self.definition
    }

    pub fn options(&self) -> &ParamOptions {
        self.definition.options()
    }

    pub fn definitions(&self) -> &IndexMap<String, Arc<ParamDefinition>> {
        self.definitions
    }

    pub fn params(&self) -> &IndexMap<String, Param> {
        self.params
    }

    /// Final value of an already processed parameter.
    pub fn processed_value(&self, name: &str) -> Option<&Value> {
        self.params.get(name).map(Param::value)
    }

    /// Adds a definition to the running schema. Definitions whose name is
    /// already known are ignored by the processor.
    pub fn introduce_definition(&mut self, definition: ParamDefinition) {
        self.introduced.push(definition);
    }

    pub(crate) fn into_introduced(self) -> Vec<ParamDefinition> {
        self.introduced
    }
}
