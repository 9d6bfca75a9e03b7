use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

use indexmap::IndexSet;

use crate::components::{
    FormatContext, NullParser, NullValidator, ValidationCallback, ValueFormatter, ValueParser,
    ValueValidator,
};
use crate::error::{Error, Result};
use crate::options::Options;
use crate::value::{ParamOptions, Value};

pub const DEFAULT_DELIMITER: &str = ",";

/// Static schema of one parameter.
///
/// Definitions are built once, usually through
/// [`TypeRegistry`](crate::registry::TypeRegistry), and shared between runs
/// behind an [`Arc`]. Finish configuring a definition before sharing it.
#[derive(Clone)]
pub struct ParamDefinition {
    type_id: String,
    name: String,
    default: Option<Value>,
    is_list: bool,
    delimiter: String,
    aliases: IndexSet<String>,
    dependencies: IndexSet<String>,
    message: String,
    options: ParamOptions,
    trim: Option<bool>,
    apply_manipulations_to_default: bool,
    parser: Option<Arc<dyn ValueParser>>,
    string_parser: Option<Arc<dyn ValueParser>>,
    typed_parser: Option<Arc<dyn ValueParser>>,
    validator: Option<Arc<dyn ValueValidator>>,
    validation_callback: Option<ValidationCallback>,
    formatter: Option<Arc<dyn ValueFormatter>>,
}

impl ParamDefinition {
    /// A bare definition without any type components. A missing `default`
    /// makes the parameter required.
    pub fn new(
        type_id: &str,
        name: &str,
        default: Option<Value>,
        message: &str,
        is_list: bool,
    ) -> Self {
        Self {
            type_id: type_id.to_string(),
            name: name.to_string(),
            default,
            is_list,
            delimiter: DEFAULT_DELIMITER.to_string(),
            aliases: IndexSet::new(),
            dependencies: IndexSet::new(),
            message: message.to_string(),
            options: ParamOptions::new(),
            trim: None,
            apply_manipulations_to_default: true,
            parser: None,
            string_parser: None,
            typed_parser: None,
            validator: None,
            validation_callback: None,
            formatter: None,
        }
    }

    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    pub fn is_list(&self) -> bool {
        self.is_list
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn aliases(&self) -> &IndexSet<String> {
        &self.aliases
    }

    pub fn has_alias(&self, alias: &str) -> bool {
        self.aliases.contains(alias)
    }

    pub fn dependencies(&self) -> &IndexSet<String> {
        &self.dependencies
    }

    pub fn has_dependency(&self, name: &str) -> bool {
        self.dependencies.contains(name)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The full specification map, including type-specific keys.
    pub fn options(&self) -> &ParamOptions {
        &self.options
    }

    /// `None` defers to [`Options::trim_values`].
    pub fn trim_during_clean(&self) -> Option<bool> {
        self.trim
    }

    pub fn should_trim(&self, options: &Options) -> bool {
        self.trim.unwrap_or_else(|| options.trim_values())
    }

    pub fn should_lowercase(&self, options: &Options) -> bool {
        options.lowercase_values() || self.options.get_bool("tolower").unwrap_or(false)
    }

    pub fn should_manipulate_default(&self) -> bool {
        self.apply_manipulations_to_default
    }

    /// The explicitly injected parser, or one that passes values through.
    pub fn value_parser(&self) -> Arc<dyn ValueParser> {
        self.parser.clone().unwrap_or_else(|| Arc::new(NullParser))
    }

    /// The configured validator, or one that accepts everything.
    pub fn value_validator(&self) -> Arc<dyn ValueValidator> {
        self.validator.clone().unwrap_or_else(|| Arc::new(NullValidator))
    }

    pub fn validation_callback(&self) -> Option<&ValidationCallback> {
        self.validation_callback.as_ref()
    }

    pub fn formatter(&self) -> Option<&Arc<dyn ValueFormatter>> {
        self.formatter.as_ref()
    }

    /// Picks the parser for one raw value: an explicitly injected parser
    /// first, then the type's string or typed parser, then a pass-through.
    pub fn parser_for(&self, value: &Value, options: &Options) -> Arc<dyn ValueParser> {
        if let Some(parser) = &self.parser {
            return parser.clone();
        }

        let type_parser = if options.is_stringly_typed() && matches!(value, Value::String(_)) {
            &self.string_parser
        } else {
            &self.typed_parser
        };

        type_parser.clone().unwrap_or_else(|| Arc::new(NullParser))
    }

    /// Applies the type's formatter, element-wise for lists.
    pub fn format(&self, value: Value, context: &mut FormatContext<'_>) -> Value {
        let Some(formatter) = &self.formatter else {
            return value;
        };

        match value {
            Value::List(items) if self.is_list => Value::List(
                items
                    .into_iter()
                    .map(|item| formatter.format_value(item, context))
                    .collect(),
            ),
            value => formatter.format_value(value, context),
        }
    }

    /// Merges the recognized keys of a specification map into typed fields
    /// and keeps the whole map as this definition's options.
    ///
    /// Recognized keys: `aliases`, `dependencies` (list or comma separated
    /// string), `trim`, `manipulatedefault` (flags) and `delimiter` (string).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidField`] when `delimiter` is not a non-empty string.
    pub fn set_array_values(&mut self, spec: &ParamOptions) -> Result<()> {
        if let Some(aliases) = spec.get_string_list("aliases") {
            self.add_aliases(aliases);
        }

        if let Some(dependencies) = spec.get_string_list("dependencies") {
            self.add_dependencies(dependencies);
        }

        if let Some(trim) = spec.get_bool("trim") {
            self.trim = Some(trim);
        }

        if let Some(manipulate) = spec.get_bool("manipulatedefault") {
            self.apply_manipulations_to_default = manipulate;
        }

        match spec.get("delimiter") {
            None | Some(Value::Null) => {}
            Some(Value::String(delimiter)) if !delimiter.is_empty() => {
                self.delimiter = delimiter.clone();
            }
            Some(_) => {
                return Err(Error::invalid_field(
                    &self.name,
                    "delimiter",
                    "a non-empty string",
                ))
            }
        }

        self.options = spec.clone();
        Ok(())
    }

    pub fn set_default(&mut self, default: Option<Value>) {
        self.default = default;
    }

    pub fn set_message(&mut self, message: &str) {
        self.message = message.to_string();
    }

    pub fn set_delimiter(&mut self, delimiter: &str) {
        self.delimiter = delimiter.to_string();
    }

    pub fn set_trim(&mut self, trim: Option<bool>) {
        self.trim = trim;
    }

    pub fn set_apply_manipulations_to_default(&mut self, apply: bool) {
        self.apply_manipulations_to_default = apply;
    }

    pub fn set_options(&mut self, options: ParamOptions) {
        self.options = options;
    }

    pub fn add_aliases<I, S>(&mut self, aliases: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases
            .extend(aliases.into_iter().map(Into::into).filter(|a| !a.is_empty()));
    }

    pub fn add_dependencies<I, S>(&mut self, dependencies: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies
            .extend(dependencies.into_iter().map(Into::into).filter(|d| !d.is_empty()));
    }

    pub fn set_value_parser(&mut self, parser: Arc<dyn ValueParser>) {
        self.parser = Some(parser);
    }

    pub fn set_string_parser(&mut self, parser: Arc<dyn ValueParser>) {
        self.string_parser = Some(parser);
    }

    pub fn set_typed_parser(&mut self, parser: Arc<dyn ValueParser>) {
        self.typed_parser = Some(parser);
    }

    pub fn set_value_validator(&mut self, validator: Arc<dyn ValueValidator>) {
        self.validator = Some(validator);
    }

    pub fn set_validation_callback(&mut self, callback: ValidationCallback) {
        self.validation_callback = Some(callback);
    }

    pub fn set_formatter(&mut self, formatter: Arc<dyn ValueFormatter>) {
        self.formatter = Some(formatter);
    }
}

impl Debug for ParamDefinition {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ParamDefinition")
            .field("type_id", &self.type_id)
            .field("name", &self.name)
            .field("default", &self.default)
            .field("is_list", &self.is_list)
            .field("delimiter", &self.delimiter)
            .field("aliases", &self.aliases)
            .field("dependencies", &self.dependencies)
            .field("message", &self.message)
            .field("trim", &self.trim)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Display for ParamDefinition {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "`{}`", self.name)?;

        if !self.message.is_empty() {
            write!(formatter, " ({})", self.message)?;
        }

        Ok(())
    }
}
