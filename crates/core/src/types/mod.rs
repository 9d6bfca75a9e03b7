//! Core parameter types.
//!
//! Each submodule provides the components of one or two types; the bundles
//! are assembled in [`core_types`] and pre-registered by
//! [`TypeRegistry::default`](crate::registry::TypeRegistry).

pub mod boolean;
pub mod dimension;
pub mod number;
pub mod string;

use std::sync::Arc;

use crate::components::ValidationResult;
use crate::registry::TypeSpec;
use crate::value::{ParamOptions, Value};

pub const BOOLEAN: &str = "boolean";
pub const FLOAT: &str = "float";
pub const INTEGER: &str = "integer";
pub const STRING: &str = "string";
pub const DIMENSION: &str = "dimension";

/// Component bundles of the built-in types, in registration order.
pub fn core_types() -> Vec<(&'static str, TypeSpec)> {
    let boolean_parser = Arc::new(boolean::BoolParser);
    let range = Arc::new(number::RangeValidator);
    let dimension_parser = Arc::new(dimension::DimensionParser);

    vec![
        (
            BOOLEAN,
            TypeSpec::new()
                .with_string_parser(boolean_parser)
                .with_formatter(Arc::new(boolean::BoolFormatter))
                .with_validation_callback(Arc::new(|value: &Value| {
                    matches!(value, Value::Bool(_))
                })),
        ),
        (
            FLOAT,
            TypeSpec::new()
                .with_string_parser(Arc::new(number::FloatParser))
                .with_validator(range.clone())
                .with_formatter(Arc::new(number::FloatFormatter))
                .with_validation_callback(Arc::new(|value: &Value| {
                    matches!(value, Value::Float(_) | Value::Integer(_))
                })),
        ),
        (
            INTEGER,
            TypeSpec::new()
                .with_string_parser(Arc::new(number::IntegerParser))
                .with_validator(range)
                .with_formatter(Arc::new(number::IntegerFormatter))
                .with_validation_callback(Arc::new(|value: &Value| {
                    matches!(value, Value::Integer(_))
                })),
        ),
        (
            STRING,
            TypeSpec::new().with_validator(Arc::new(string::StringValidator)),
        ),
        (
            DIMENSION,
            TypeSpec::new()
                .with_string_parser(dimension_parser.clone())
                .with_typed_parser(dimension_parser)
                .with_validator(Arc::new(dimension::DimensionValidator))
                .with_formatter(Arc::new(dimension::DimensionFormatter)),
        ),
    ]
}

/// Checks the `values` (allow list) and `excluding` (deny list) options,
/// comparing rendered values.
pub(crate) fn check_listed_values(
    value: &Value,
    options: &ParamOptions,
    result: &mut ValidationResult,
) {
    let rendered = value.to_string();

    if let Some(allowed) = options.get_string_list("values") {
        if !allowed.contains(&rendered) {
            result.add_error(format!(
                "\"{rendered}\" is not one of the allowed values: {}",
                allowed.join(", ")
            ));
        }
    }

    if let Some(excluded) = options.get_string_list("excluding") {
        if excluded.contains(&rendered) {
            result.add_error(format!("\"{rendered}\" is not allowed"));
        }
    }
}

/// Checks `value` against optional inclusive bounds.
pub(crate) fn check_bounds(
    number: f64,
    lower: Option<f64>,
    upper: Option<f64>,
    result: &mut ValidationResult,
) {
    if let Some(lower) = lower {
        if number < lower {
            result.add_error(format!("{number} is smaller than the lower bound {lower}"));
        }
    }

    if let Some(upper) = upper {
        if number > upper {
            result.add_error(format!("{number} is bigger than the upper bound {upper}"));
        }
    }
}
