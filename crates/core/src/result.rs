//! Outcome of one processing run.

use indexmap::IndexMap;
use serde::Serialize;

use crate::processing_error::{ProcessingError, Severity};
use crate::value::Value;

/// Snapshot of one parameter after processing.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ProcessedParam {
    name: String,
    value: Value,
    was_set_to_default: bool,
    original_name: Option<String>,
    original_value: Option<Value>,
}

impl ProcessedParam {
    /// The original name and value are only kept when the final value is not
    /// the default.
    pub fn new(
        name: &str,
        value: Value,
        was_set_to_default: bool,
        original_name: Option<String>,
        original_value: Option<Value>,
    ) -> Self {
        let (original_name, original_value) = if was_set_to_default {
            (None, None)
        } else {
            (original_name, original_value)
        };

        Self {
            name: name.to_string(),
            value,
            was_set_to_default,
            original_name,
            original_value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn was_set_to_default(&self) -> bool {
        self.was_set_to_default
    }

    pub fn original_name(&self) -> Option<&str> {
        self.original_name.as_deref()
    }

    pub fn original_value(&self) -> Option<&Value> {
        self.original_value.as_ref()
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct ProcessingResult {
    parameters: IndexMap<String, ProcessedParam>,
    errors: Vec<ProcessingError>,
}

impl ProcessingResult {
    pub fn new(parameters: IndexMap<String, ProcessedParam>, errors: Vec<ProcessingError>) -> Self {
        Self { parameters, errors }
    }

    pub fn parameters(&self) -> &IndexMap<String, ProcessedParam> {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&ProcessedParam> {
        self.parameters.get(name)
    }

    /// Plain `name → value` view. Only trust it when [`Self::has_fatal`] is false.
    pub fn parameter_map(&self) -> IndexMap<String, Value> {
        self.parameters
            .iter()
            .map(|(name, param)| (name.clone(), param.value.clone()))
            .collect()
    }

    pub fn errors(&self) -> &[ProcessingError] {
        &self.errors
    }

    pub fn has_fatal(&self) -> bool {
        self.errors.iter().any(ProcessingError::is_fatal)
    }

    pub fn errors_with_severity(&self, severity: Severity) -> impl Iterator<Item = &ProcessingError> {
        self.errors.iter().filter(move |e| e.severity() == severity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaulted_params_drop_original_input() {
        let defaulted = ProcessedParam::new(
            "width",
            Value::from("auto"),
            true,
            Some("w".to_string()),
            Some(Value::from("garbage")),
        );
        assert!(defaulted.original_name().is_none());
        assert!(defaulted.original_value().is_none());

        let given = ProcessedParam::new(
            "width",
            Value::from("10px"),
            false,
            Some("w".to_string()),
            Some(Value::from("10")),
        );
        assert_eq!(given.original_name(), Some("w"));
        assert_eq!(given.original_value(), Some(&Value::from("10")));
    }

    #[test]
    fn test_has_fatal() {
        let mut parameters = IndexMap::new();
        parameters.insert(
            "a".to_string(),
            ProcessedParam::new("a", Value::Integer(1), false, None, None),
        );

        let result = ProcessingResult::new(
            parameters.clone(),
            vec![ProcessingError::new("odd", Severity::Low)],
        );
        assert!(!result.has_fatal());
        assert_eq!(result.parameter_map()["a"], Value::Integer(1));
        assert_eq!(result.errors_with_severity(Severity::Low).count(), 1);

        let result = ProcessingResult::new(
            parameters,
            vec![ProcessingError::new("broken", Severity::Fatal)],
        );
        assert!(result.has_fatal());
    }
}
