//! Type registry and definition factory.
//!
//! A type is a [`TypeSpec`]: a bundle of optional parser, validator,
//! validation callback and formatter components. The registry maps type ids
//! to bundles and builds [`ParamDefinition`]s with the bundle injected.
//!
//! Build the registry once at startup; afterwards it is only read and can be
//! shared between threads.

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use indexmap::IndexMap;
use log::{debug, warn};

use crate::components::{
    NullParser, NullValidator, ValidationCallback, ValueFormatter, ValueParser, ValueValidator,
};
use crate::definition::ParamDefinition;
use crate::error::{Error, Result};
use crate::types::{self, STRING};
use crate::value::{ParamOptions, Value};

#[derive(Clone, Default)]
pub struct TypeSpec {
    string_parser: Option<Arc<dyn ValueParser>>,
    typed_parser: Option<Arc<dyn ValueParser>>,
    validator: Option<Arc<dyn ValueValidator>>,
    validation_callback: Option<ValidationCallback>,
    formatter: Option<Arc<dyn ValueFormatter>>,
}

impl TypeSpec {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_string_parser(mut self, parser: Arc<dyn ValueParser>) -> Self {
        self.string_parser = Some(parser);
        self
    }

    #[must_use]
    pub fn with_typed_parser(mut self, parser: Arc<dyn ValueParser>) -> Self {
        self.typed_parser = Some(parser);
        self
    }

    #[must_use]
    pub fn with_validator(mut self, validator: Arc<dyn ValueValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    #[must_use]
    pub fn with_validation_callback(mut self, callback: ValidationCallback) -> Self {
        self.validation_callback = Some(callback);
        self
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: Arc<dyn ValueFormatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    fn apply_to(&self, definition: &mut ParamDefinition) {
        if let Some(parser) = &self.string_parser {
            definition.set_string_parser(parser.clone());
        }
        if let Some(parser) = &self.typed_parser {
            definition.set_typed_parser(parser.clone());
        }
        if let Some(validator) = &self.validator {
            definition.set_value_validator(validator.clone());
        }
        if let Some(callback) = &self.validation_callback {
            definition.set_validation_callback(callback.clone());
        }
        if let Some(formatter) = &self.formatter {
            definition.set_formatter(formatter.clone());
        }
    }
}

impl Debug for TypeSpec {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("TypeSpec")
            .field("string_parser", &self.string_parser)
            .field("typed_parser", &self.typed_parser)
            .field("validator", &self.validator)
            .field("validation_callback", &self.validation_callback.is_some())
            .field("formatter", &self.formatter)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    StringParser,
    TypedParser,
    Validator,
    ValidationCallback,
    Formatter,
}

impl ComponentKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string-parser" => Some(Self::StringParser),
            "typed-parser" => Some(Self::TypedParser),
            "validator" => Some(Self::Validator),
            "validation-callback" => Some(Self::ValidationCallback),
            "formatter" => Some(Self::Formatter),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::StringParser => "string-parser",
            Self::TypedParser => "typed-parser",
            Self::Validator => "validator",
            Self::ValidationCallback => "validation-callback",
            Self::Formatter => "formatter",
        }
    }
}

/// A registered component. Parsers and validators fall back to their no-op
/// versions; callbacks and formatters are optional.
#[derive(Clone)]
pub enum Component {
    Parser(Arc<dyn ValueParser>),
    Validator(Arc<dyn ValueValidator>),
    ValidationCallback(Option<ValidationCallback>),
    Formatter(Option<Arc<dyn ValueFormatter>>),
}

impl Debug for Component {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parser(parser) => formatter.debug_tuple("Parser").field(parser).finish(),
            Self::Validator(validator) => {
                formatter.debug_tuple("Validator").field(validator).finish()
            }
            Self::ValidationCallback(callback) => formatter
                .debug_tuple("ValidationCallback")
                .field(&callback.is_some())
                .finish(),
            Self::Formatter(f) => formatter.debug_tuple("Formatter").field(f).finish(),
        }
    }
}

/// One entry of a schema: an already built definition or a plain
/// specification map.
#[derive(Debug, Clone)]
pub enum DefinitionSpec {
    Definition(Arc<ParamDefinition>),
    Map(ParamOptions),
}

impl From<ParamDefinition> for DefinitionSpec {
    fn from(definition: ParamDefinition) -> Self {
        Self::Definition(Arc::new(definition))
    }
}

impl From<Arc<ParamDefinition>> for DefinitionSpec {
    fn from(definition: Arc<ParamDefinition>) -> Self {
        Self::Definition(definition)
    }
}

impl From<ParamOptions> for DefinitionSpec {
    fn from(spec: ParamOptions) -> Self {
        Self::Map(spec)
    }
}

#[derive(Debug, Clone)]
pub struct TypeRegistry {
    types: IndexMap<String, TypeSpec>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::with_core_types()
    }
}

impl TypeRegistry {
    /// A registry without any types.
    pub fn new() -> Self {
        Self {
            types: IndexMap::new(),
        }
    }

    /// A registry with `boolean`, `float`, `integer`, `string` and
    /// `dimension` registered.
    pub fn with_core_types() -> Self {
        let mut registry = Self::new();
        for (type_id, spec) in types::core_types() {
            registry.register_type(type_id, spec);
        }
        registry
    }

    /// Registers a type. Returns `false` and leaves the registry untouched
    /// when the id is already taken.
    pub fn register_type(&mut self, type_id: &str, spec: TypeSpec) -> bool {
        if self.types.contains_key(type_id) {
            warn!("Parameter type `{}` is already registered, keeping the first registration", type_id);
            return false;
        }

        debug!("Registering parameter type `{}`", type_id);
        self.types.insert(type_id.to_string(), spec);
        true
    }

    pub fn has_type(&self, type_id: &str) -> bool {
        self.types.contains_key(type_id)
    }

    pub fn type_ids(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    fn spec(&self, type_id: &str) -> Result<&TypeSpec> {
        self.types
            .get(type_id)
            .ok_or_else(|| Error::UnknownType(type_id.to_string()))
    }

    /// # Errors
    ///
    /// Returns [`Error::UnknownType`] for unregistered types.
    pub fn component(&self, type_id: &str, kind: ComponentKind) -> Result<Component> {
        let spec = self.spec(type_id)?;

        let component = match kind {
            ComponentKind::StringParser => Component::Parser(
                spec.string_parser
                    .clone()
                    .unwrap_or_else(|| Arc::new(NullParser)),
            ),
            ComponentKind::TypedParser => Component::Parser(
                spec.typed_parser
                    .clone()
                    .unwrap_or_else(|| Arc::new(NullParser)),
            ),
            ComponentKind::Validator => Component::Validator(
                spec.validator
                    .clone()
                    .unwrap_or_else(|| Arc::new(NullValidator)),
            ),
            ComponentKind::ValidationCallback => {
                Component::ValidationCallback(spec.validation_callback.clone())
            }
            ComponentKind::Formatter => Component::Formatter(spec.formatter.clone()),
        };

        Ok(component)
    }

    /// Looks a component up by its name (`string-parser`, `typed-parser`,
    /// `validator`, `validation-callback` or `formatter`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownType`] or [`Error::UnknownComponent`].
    pub fn component_by_name(&self, type_id: &str, component: &str) -> Result<Component> {
        self.spec(type_id)?;
        let kind = ComponentKind::from_name(component)
            .ok_or_else(|| Error::unknown_component(type_id, component))?;
        self.component(type_id, kind)
    }

    /// Builds a definition of a registered type with its components injected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownType`] for unregistered types.
    pub fn new_definition(
        &self,
        type_id: &str,
        name: &str,
        default: Option<Value>,
        message: &str,
        is_list: bool,
    ) -> Result<ParamDefinition> {
        let spec = self.spec(type_id)?;
        let mut definition = ParamDefinition::new(type_id, name, default, message, is_list);
        spec.apply_to(&mut definition);
        Ok(definition)
    }

    /// Builds a definition from a specification map.
    ///
    /// `name` and `message` are required; `type` defaults to `string`,
    /// `islist` to false, and a missing or null `default` makes the parameter
    /// required. All other keys go through
    /// [`ParamDefinition::set_array_values`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`], [`Error::InvalidField`] or
    /// [`Error::UnknownType`].
    pub fn new_definition_from_spec(&self, spec: &ParamOptions) -> Result<ParamDefinition> {
        let name = match spec.get("name") {
            None | Some(Value::Null) => return Err(Error::MissingField("name".to_string())),
            Some(Value::String(name)) => name.clone(),
            Some(_) => return Err(Error::invalid_field("?", "name", "a string")),
        };

        let message = match spec.get("message") {
            None | Some(Value::Null) => return Err(Error::MissingField("message".to_string())),
            Some(Value::List(_)) => {
                return Err(Error::invalid_field(&name, "message", "a string"))
            }
            Some(message) => message.to_string(),
        };

        let type_id = match spec.get("type") {
            None | Some(Value::Null) => STRING,
            Some(Value::String(type_id)) => type_id.as_str(),
            Some(_) => return Err(Error::invalid_field(&name, "type", "a string")),
        };

        let default = spec.get("default").filter(|value| !value.is_null()).cloned();
        let is_list = spec.get_bool("islist").unwrap_or(false);

        let mut definition = self.new_definition(type_id, &name, default, &message, is_list)?;
        definition.set_array_values(spec)?;
        Ok(definition)
    }

    /// Normalizes a list of built definitions and specification maps into a
    /// name-keyed schema. Later entries replace earlier ones with the same name.
    ///
    /// # Errors
    ///
    /// Propagates errors of [`Self::new_definition_from_spec`].
    pub fn new_definitions_from_list(
        &self,
        specs: Vec<DefinitionSpec>,
    ) -> Result<IndexMap<String, Arc<ParamDefinition>>> {
        specs
            .into_iter()
            .map(|spec| self.build(None, spec))
            .collect()
    }

    /// Like [`Self::new_definitions_from_list`], but specification maps
    /// without a `name` are named after their key.
    ///
    /// # Errors
    ///
    /// Propagates errors of [`Self::new_definition_from_spec`].
    pub fn new_definitions_from_map(
        &self,
        specs: IndexMap<String, DefinitionSpec>,
    ) -> Result<IndexMap<String, Arc<ParamDefinition>>> {
        specs
            .into_iter()
            .map(|(key, spec)| self.build(Some(key), spec))
            .collect()
    }

    fn build(
        &self,
        key: Option<String>,
        spec: DefinitionSpec,
    ) -> Result<(String, Arc<ParamDefinition>)> {
        let definition = match spec {
            DefinitionSpec::Definition(definition) => definition,
            DefinitionSpec::Map(mut spec) => {
                if let Some(key) = key {
                    if !spec.contains_key("name") {
                        spec.insert("name", key);
                    }
                }
                Arc::new(self.new_definition_from_spec(&spec)?)
            }
        };

        Ok((definition.name().to_string(), definition))
    }
}
