//! Orchestration of one processing run.
//!
//! The processor binds raw input to definitions (by name, then by alias),
//! processes parameters in dependency order and collects the outcome into a
//! [`ProcessingResult`]. Processing stops at the first fatal error; the
//! parameters that were not reached are left out of the result.

use std::collections::VecDeque;
use std::sync::Arc;

use indexmap::IndexMap;
use log::{debug, warn};

use crate::definition::ParamDefinition;
use crate::error::Result;
use crate::options::Options;
use crate::param::Param;
use crate::processing_error::{ProcessingError, Severity};
use crate::result::ProcessingResult;
use crate::topological_sort::TopologicalSort;
use crate::value::Value;

/// Processes one set of raw parameters against one schema.
///
/// A processor holds per-run state and is consumed by
/// [`Processor::process_parameters`]; create a new one for every run.
#[derive(Debug, Default)]
pub struct Processor {
    options: Options,
    raw_parameters: IndexMap<String, Value>,
    definitions: IndexMap<String, Arc<ParamDefinition>>,
    params: IndexMap<String, Param>,
    errors: Vec<ProcessingError>,
    params_to_handle: VecDeque<String>,
}

impl Processor {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Stores raw input under normalized names. When two names normalize to
    /// the same key the later value is kept.
    pub fn set_parameters<I, K>(&mut self, parameters: I)
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        for (name, value) in parameters {
            let name = self.normalize_name(name.as_ref());
            self.raw_parameters.insert(name, value);
        }
    }

    fn normalize_name(&self, name: &str) -> String {
        let name = if self.options.trim_names() {
            name.trim()
        } else {
            name
        };

        if self.options.lowercase_names() {
            name.to_lowercase()
        } else {
            name.to_string()
        }
    }

    pub fn set_parameter_definitions(&mut self, definitions: IndexMap<String, Arc<ParamDefinition>>) {
        self.definitions = definitions;
    }

    /// Convenience for schemas built in code; definitions are keyed by name.
    pub fn set_definition_list(&mut self, definitions: Vec<ParamDefinition>) {
        self.definitions = definitions
            .into_iter()
            .map(|definition| (definition.name().to_string(), Arc::new(definition)))
            .collect();
    }

    /// Runs the whole pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CycleDetected`](crate::error::Error::CycleDetected)
    /// when dependencies form a cycle and the options ask to raise on cycles.
    pub fn process_parameters(mut self) -> Result<ProcessingResult> {
        debug!(
            "Processing {} raw parameters against {} definitions",
            self.raw_parameters.len(),
            self.definitions.len()
        );

        let names: Vec<String> = self.definitions.keys().cloned().collect();
        self.params_to_handle = self.evaluation_order(names)?.into();

        while !self.has_fatal() {
            let Some(name) = self.params_to_handle.pop_front() else {
                break;
            };
            self.process_one_param(&name)?;
        }

        if self.has_fatal() {
            debug!(
                "Stopped on a fatal error, {} parameters were not processed",
                self.params_to_handle.len()
            );
        } else if self.options.unknown_is_invalid() {
            self.register_unknown_parameters();
        }

        Ok(self.into_result())
    }

    fn has_fatal(&self) -> bool {
        self.errors.iter().any(ProcessingError::is_fatal)
    }

    /// Orders `names` by their dependencies, counting only dependencies that
    /// are among `names` themselves.
    fn evaluation_order(&self, names: Vec<String>) -> Result<Vec<String>> {
        let dependency_map = names
            .iter()
            .map(|name| {
                let dependencies = self
                    .definitions
                    .get(name)
                    .map(|definition| {
                        definition
                            .dependencies()
                            .iter()
                            .filter(|dependency| names.contains(dependency))
                            .cloned()
                            .collect::<Vec<String>>()
                    })
                    .unwrap_or_default();
                (name.clone(), dependencies)
            })
            .collect();

        TopologicalSort::new(dependency_map, self.options.raise_on_cycle()).sort()
    }

    fn process_one_param(&mut self, name: &str) -> Result<()> {
        let Some(definition) = self.definitions.get(name).cloned() else {
            return Ok(());
        };

        let mut param = Param::new(definition);

        if !self.attempt_to_set_user_value(&mut param) && param.is_required() {
            self.register_error(
                format!("Required parameter {name} is missing"),
                Severity::Fatal,
                [name, "missing"],
            );
            return Ok(());
        }

        let introduced = param.process(&self.definitions, &self.params, &self.options)?;
        self.errors.extend(param.errors().iter().cloned());

        debug!(
            "Processed `{}`: {:?}{}",
            name,
            param.value(),
            if param.was_set_to_default() {
                " (default)"
            } else {
                ""
            }
        );

        self.params.insert(name.to_string(), param);

        if !introduced.is_empty() {
            self.introduce_definitions(name, introduced)?;
        }

        Ok(())
    }

    /// Binds the raw value given under the exact name, or else under the
    /// first alias that has one, and removes it from the pending input.
    fn attempt_to_set_user_value(&mut self, param: &mut Param) -> bool {
        let key = if self.raw_parameters.contains_key(param.name()) {
            Some(param.name().to_string())
        } else {
            param
                .definition()
                .aliases()
                .iter()
                .find(|alias| self.raw_parameters.contains_key(alias.as_str()))
                .cloned()
        };

        let Some((key, value)) = key.and_then(|key| self.raw_parameters.shift_remove_entry(&key))
        else {
            return false;
        };

        param.set_user_value(&key, value, &self.options)
    }

    fn introduce_definitions(&mut self, source: &str, introduced: Vec<ParamDefinition>) -> Result<()> {
        let mut pending: Vec<String> = self.params_to_handle.drain(..).collect();

        for definition in introduced {
            let name = definition.name().to_string();

            if self.definitions.contains_key(&name) {
                warn!(
                    "Formatting `{}` introduced `{}`, which is already defined; ignoring it",
                    source, name
                );
                continue;
            }

            warn!("Formatting `{}` introduced parameter `{}`", source, name);
            self.definitions.insert(name.clone(), Arc::new(definition));
            pending.push(name);
        }

        self.params_to_handle = self.evaluation_order(pending)?.into();
        Ok(())
    }

    fn register_unknown_parameters(&mut self) {
        let unknown: Vec<String> = self.raw_parameters.keys().cloned().collect();

        for name in unknown {
            self.register_error(
                format!("Parameter {name} is unknown"),
                Severity::Low,
                [name.as_str(), "unknown"],
            );
        }
    }

    fn register_error(&mut self, message: String, severity: Severity, tags: [&str; 2]) {
        debug!("{:?} processing error: {}", severity, message);

        let error = ProcessingError::new(message, severity)
            .with_element(self.options.element_name())
            .with_tags(tags);
        self.errors.push(error);
    }

    fn into_result(self) -> ProcessingResult {
        let parameters = self
            .params
            .iter()
            .map(|(name, param)| (name.clone(), param.to_processed()))
            .collect();

        ProcessingResult::new(parameters, self.errors)
    }
}
