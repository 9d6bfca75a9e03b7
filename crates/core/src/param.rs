//! Runtime state of one parameter during one processing run.
//!
//! A [`Param`] starts unbound, may be bound to user input (which is cleaned
//! right away), and is then processed once: parsed, validated, reset to its
//! default on recoverable errors, and finally formatted.

use std::sync::Arc;

use indexmap::IndexMap;
use log::{debug, trace, warn};

use crate::components::FormatContext;
use crate::definition::ParamDefinition;
use crate::error::{Error, Result};
use crate::options::Options;
use crate::processing_error::{ProcessingError, Severity};
use crate::result::ProcessedParam;
use crate::value::Value;

#[derive(Debug, Clone)]
pub struct Param {
    definition: Arc<ParamDefinition>,
    original_name: Option<String>,
    original_value: Option<Value>,
    value: Value,
    set_count: usize,
    was_set_to_default: bool,
    errors: Vec<ProcessingError>,
}

impl Param {
    pub fn new(definition: Arc<ParamDefinition>) -> Self {
        Self {
            definition,
            original_name: None,
            original_value: None,
            value: Value::Null,
            set_count: 0,
            was_set_to_default: false,
            errors: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.definition.name()
    }

    pub fn definition(&self) -> &Arc<ParamDefinition> {
        &self.definition
    }

    pub fn is_required(&self) -> bool {
        self.definition.is_required()
    }

    /// The working value; final once [`Self::process`] returned.
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn set_count(&self) -> usize {
        self.set_count
    }

    pub fn was_set_to_default(&self) -> bool {
        self.was_set_to_default
    }

    pub fn errors(&self) -> &[ProcessingError] {
        &self.errors
    }

    pub fn has_fatal_error(&self) -> bool {
        self.errors.iter().any(ProcessingError::is_fatal)
    }

    /// The name the user supplied the value under, possibly an alias.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalState`] if no user value was bound.
    pub fn original_name(&self) -> Result<&str> {
        self.original_name
            .as_deref()
            .ok_or_else(|| self.unbound_error("original name"))
    }

    /// The user supplied value before cleaning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalState`] if no user value was bound.
    pub fn original_value(&self) -> Result<&Value> {
        self.original_value
            .as_ref()
            .ok_or_else(|| self.unbound_error("original value"))
    }

    fn unbound_error(&self, what: &str) -> Error {
        Error::illegal_state(format!(
            "The {what} of parameter `{}` is only available after a user value was set",
            self.name()
        ))
    }

    /// Binds user input under `name` (the canonical name or an alias) and
    /// cleans it.
    ///
    /// Returns `false` without changing anything when a value is already
    /// bound and the options do not accept overriding.
    pub fn set_user_value(&mut self, name: &str, value: Value, options: &Options) -> bool {
        if self.set_count > 0 && !options.accept_overriding() {
            warn!(
                "Ignoring value for `{}` given as `{}`, it was already set",
                self.name(),
                name
            );
            return false;
        }

        self.original_name = Some(name.to_string());
        self.original_value = Some(value.clone());
        self.value = self.clean(value, options);
        self.set_count += 1;

        trace!("Bound `{}` to cleaned value {:?}", self.name(), self.value);
        true
    }

    fn clean(&self, value: Value, options: &Options) -> Value {
        let trim = self.definition.should_trim(options);
        let lowercase = self.definition.should_lowercase(options);

        if !self.definition.is_list() {
            return clean_scalar(value, trim, lowercase);
        }

        let items = match value {
            Value::String(raw) => raw
                .split(self.definition.delimiter())
                .map(|item| Value::String(item.to_string()))
                .collect(),
            Value::List(items) => items,
            other => vec![other],
        };

        Value::List(
            items
                .into_iter()
                .map(|item| clean_scalar(item, trim, lowercase))
                .collect(),
        )
    }

    /// Parses, validates, defaults and formats the parameter.
    ///
    /// `definitions` is the schema of the run and `params` the parameters
    /// processed before this one. Returns the definitions the formatter
    /// introduced.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalState`] for a required parameter without a
    /// user value; the processor reports those as missing instead.
    pub fn process(
        &mut self,
        definitions: &IndexMap<String, Arc<ParamDefinition>>,
        params: &IndexMap<String, Param>,
        options: &Options,
    ) -> Result<Vec<ParamDefinition>> {
        if self.set_count == 0 {
            if self.is_required() {
                return Err(Error::illegal_state(format!(
                    "Required parameter `{}` cannot be processed without a value",
                    self.name()
                )));
            }
            self.set_to_default();
        } else {
            self.parse_and_validate(options);
        }

        if self.has_fatal_error()
            || (self.was_set_to_default && !self.definition.should_manipulate_default())
        {
            return Ok(Vec::new());
        }

        let definition = Arc::clone(&self.definition);
        let mut context = FormatContext::new(&definition, definitions, params);
        let value = std::mem::take(&mut self.value);
        self.value = definition.format(value, &mut context);

        Ok(context.into_introduced())
    }

    fn parse_and_validate(&mut self, options: &Options) {
        let value = std::mem::take(&mut self.value);

        if self.definition.is_list() {
            let items = match value {
                Value::List(items) => items,
                other => vec![other],
            };

            let parsed = items
                .iter()
                .filter_map(|item| self.parse_and_validate_value(item, options))
                .collect();
            self.value = Value::List(parsed);
        } else {
            self.value = self
                .parse_and_validate_value(&value, options)
                .unwrap_or(Value::Null);
        }

        self.set_to_default_if_needed();
    }

    /// `None` when the value failed parsing or validation; the errors are
    /// recorded on the parameter.
    fn parse_and_validate_value(&mut self, raw: &Value, options: &Options) -> Option<Value> {
        let definition = Arc::clone(&self.definition);
        let parser = definition.parser_for(raw, options);

        let parsed = match parser.parse(raw, definition.options()) {
            Ok(parsed) => parsed,
            Err(e) => {
                self.register_error(
                    format!("Parameter {} could not be parsed: {}", self.name(), e),
                    "parsing",
                );
                return None;
            }
        };

        if let Some(callback) = definition.validation_callback() {
            if !callback(&parsed) {
                self.register_error(
                    format!(
                        "\"{}\" is not a valid {} for parameter {}",
                        raw,
                        definition.type_id(),
                        self.name()
                    ),
                    "validation",
                );
                return None;
            }
        }

        let result = definition.value_validator().validate(&parsed, definition.options());
        if !result.is_valid() {
            for error in result.errors() {
                self.register_error(
                    format!("Parameter {}: {}", self.name(), error.message()),
                    "validation",
                );
            }
            return None;
        }

        Some(parsed)
    }

    fn register_error(&mut self, message: String, stage: &str) {
        let severity = if self.is_required() {
            Severity::Fatal
        } else {
            Severity::Normal
        };

        debug!("{:?} error for `{}`: {}", severity, self.name(), message);

        let error = ProcessingError::new(message, severity)
            .with_element(self.name())
            .with_tags([self.name(), stage]);
        self.errors.push(error);
    }

    fn set_to_default_if_needed(&mut self) {
        if self.errors.is_empty() || self.has_fatal_error() {
            return;
        }

        let nothing_left = matches!(&self.value, Value::List(items) if items.is_empty());

        if !self.definition.is_list() || nothing_left {
            self.set_to_default();
        }
    }

    fn set_to_default(&mut self) {
        self.value = self.definition.default().cloned().unwrap_or_default();
        self.was_set_to_default = true;
    }

    pub fn to_processed(&self) -> ProcessedParam {
        ProcessedParam::new(
            self.name(),
            self.value.clone(),
            self.was_set_to_default,
            self.original_name.clone(),
            self.original_value.clone(),
        )
    }
}

fn clean_scalar(value: Value, trim: bool, lowercase: bool) -> Value {
    let mut text = match value {
        Value::String(text) => text,
        other => return other,
    };

    if trim {
        text = text.trim().to_string();
    }

    if lowercase {
        text = text.to_lowercase();
    }

    Value::String(text)
}
