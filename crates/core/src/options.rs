//! Run options for parameter processing.
//!
//! [`Options`] replaces ambient global settings: one value is built by the host
//! and handed to every [`Processor`](crate::processor::Processor) run. It
//! deserializes with defaults filled in, so hosts can embed it in their own
//! configuration files.

use serde::Deserialize;

/// Label used as error element when no parameter owns the error.
pub const UNKNOWN_ELEMENT: &str = "unknown";

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Options {
    unknown_invalid: bool,
    lowercase_names: bool,
    trim_names: bool,
    accept_overriding: bool,
    trim_values: bool,
    lowercase_values: bool,
    raw_string_inputs: bool,
    raise_on_cycle: bool,
    name: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            unknown_invalid: true,
            lowercase_names: true,
            trim_names: true,
            accept_overriding: true,
            trim_values: true,
            lowercase_values: false,
            raw_string_inputs: true,
            raise_on_cycle: true,
            name: None,
        }
    }
}

impl Options {
    /// Whether raw parameters without a matching definition are reported.
    pub fn unknown_is_invalid(&self) -> bool {
        self.unknown_invalid
    }

    pub fn lowercase_names(&self) -> bool {
        self.lowercase_names
    }

    pub fn trim_names(&self) -> bool {
        self.trim_names
    }

    /// Whether a second value bound to an already bound parameter replaces it.
    pub fn accept_overriding(&self) -> bool {
        self.accept_overriding
    }

    pub fn trim_values(&self) -> bool {
        self.trim_values
    }

    pub fn lowercase_values(&self) -> bool {
        self.lowercase_values
    }

    /// Whether string input goes through the type's string parser rather than
    /// its typed parser.
    #[deprecated(note = "inputs are treated as strings whenever they are strings")]
    pub fn raw_string_inputs(&self) -> bool {
        self.raw_string_inputs
    }

    pub(crate) fn is_stringly_typed(&self) -> bool {
        self.raw_string_inputs
    }

    pub fn raise_on_cycle(&self) -> bool {
        self.raise_on_cycle
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Element label for errors that are not owned by a single parameter.
    pub fn element_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_ELEMENT)
    }

    #[must_use]
    pub fn with_unknown_invalid(mut self, value: bool) -> Self {
        self.unknown_invalid = value;
        self
    }

    #[must_use]
    pub fn with_lowercase_names(mut self, value: bool) -> Self {
        self.lowercase_names = value;
        self
    }

    #[must_use]
    pub fn with_trim_names(mut self, value: bool) -> Self {
        self.trim_names = value;
        self
    }

    #[must_use]
    pub fn with_accept_overriding(mut self, value: bool) -> Self {
        self.accept_overriding = value;
        self
    }

    #[must_use]
    pub fn with_trim_values(mut self, value: bool) -> Self {
        self.trim_values = value;
        self
    }

    #[must_use]
    pub fn with_lowercase_values(mut self, value: bool) -> Self {
        self.lowercase_values = value;
        self
    }

    #[must_use]
    pub fn with_raw_string_inputs(mut self, value: bool) -> Self {
        self.raw_string_inputs = value;
        self
    }

    #[must_use]
    pub fn with_raise_on_cycle(mut self, value: bool) -> Self {
        self.raise_on_cycle = value;
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
