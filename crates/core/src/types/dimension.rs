//! Dimensions such as `10px`, `50%` or `auto`.
//!
//! Options: `defaultunit` (default `px`), `units` (default `px` and no unit),
//! `allowauto`, `lowerbound`/`upperbound`, and `minpercentage`/`maxpercentage`
//! (default 0 and 100) which replace the bounds for `%` values.

use std::sync::LazyLock;

use regex::Regex;

use crate::components::{
    FormatContext, ParseError, ValidationResult, ValueFormatter, ValueParser, ValueValidator,
};
use crate::types::check_bounds;
use crate::value::{ParamOptions, Value};

pub const AUTO: &str = "auto";
pub const DEFAULT_UNIT: &str = "px";
const DEFAULT_UNITS: [&str; 2] = ["px", ""];
const PERCENT: &str = "%";

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(?:\.\d+)?$").expect("number pattern is valid"));
static DIMENSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-?\d+(?:\.\d+)?)(.*)$").expect("dimension pattern is valid")
});

fn default_unit(options: &ParamOptions) -> &str {
    options.get_str("defaultunit").unwrap_or(DEFAULT_UNIT)
}

fn with_default_unit(value: &str, options: &ParamOptions) -> String {
    if NUMBER.is_match(value) {
        format!("{value}{}", default_unit(options))
    } else {
        value.to_string()
    }
}

/// Strips whitespace and appends the default unit to bare numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct DimensionParser;

impl ValueParser for DimensionParser {
    fn parse(&self, value: &Value, options: &ParamOptions) -> Result<Value, ParseError> {
        let raw = match value {
            Value::String(s) => s.chars().filter(|c| !c.is_whitespace()).collect::<String>(),
            Value::Integer(_) | Value::Float(_) => value.to_string(),
            _ => return Err(ParseError::unexpected(value, "dimension")),
        };

        if raw == AUTO {
            return Ok(Value::String(raw));
        }

        Ok(Value::String(with_default_unit(&raw, options)))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DimensionValidator;

impl ValueValidator for DimensionValidator {
    fn validate(&self, value: &Value, options: &ParamOptions) -> ValidationResult {
        let Some(text) = value.as_str() else {
            return ValidationResult::invalid(format!("\"{value}\" is not a dimension"));
        };

        if text == AUTO {
            return if options.get_bool("allowauto").unwrap_or(false) {
                ValidationResult::valid()
            } else {
                ValidationResult::invalid("\"auto\" is not allowed here")
            };
        }

        let Some(captures) = DIMENSION.captures(text) else {
            return ValidationResult::invalid(format!("\"{text}\" is not a dimension"));
        };

        let unit = &captures[2];
        let units = options
            .get_string_list("units")
            .unwrap_or_else(|| DEFAULT_UNITS.iter().map(ToString::to_string).collect());

        if !units.iter().any(|allowed| allowed == unit) {
            return ValidationResult::invalid(format!(
                "\"{unit}\" is not an allowed unit, expected one of: {}",
                units.join(", ")
            ));
        }

        let Ok(number) = captures[1].parse::<f64>() else {
            return ValidationResult::invalid(format!("\"{text}\" is not a dimension"));
        };

        let mut result = ValidationResult::valid();

        if unit == PERCENT {
            check_bounds(
                number,
                Some(options.get_f64("minpercentage").unwrap_or(0.0)),
                Some(options.get_f64("maxpercentage").unwrap_or(100.0)),
                &mut result,
            );
        } else {
            check_bounds(
                number,
                options.get_f64("lowerbound"),
                options.get_f64("upperbound"),
                &mut result,
            );
        }

        result
    }
}

/// Appends the default unit to bare numbers, which only reach formatting
/// through defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct DimensionFormatter;

impl ValueFormatter for DimensionFormatter {
    fn format_value(&self, value: Value, context: &mut FormatContext<'_>) -> Value {
        match value {
            Value::String(text) => Value::String(with_default_unit(&text, context.options())),
            Value::Integer(_) | Value::Float(_) => {
                Value::String(with_default_unit(&value.to_string(), context.options()))
            }
            value => value,
        }
    }
}
