//! Integer and float parsing, casting and shared range validation.

use crate::components::{
    FormatContext, ParseError, ValidationResult, ValueFormatter, ValueParser, ValueValidator,
};
use crate::types::{check_bounds, check_listed_values};
use crate::value::{ParamOptions, Value};

#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerParser;

impl ValueParser for IntegerParser {
    fn parse(&self, value: &Value, _options: &ParamOptions) -> Result<Value, ParseError> {
        value
            .as_str()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .map(Value::Integer)
            .ok_or_else(|| ParseError::unexpected(value, "integer"))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FloatParser;

impl ValueParser for FloatParser {
    fn parse(&self, value: &Value, _options: &ParamOptions) -> Result<Value, ParseError> {
        value
            .as_str()
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|number| number.is_finite())
            .map(Value::Float)
            .ok_or_else(|| ParseError::unexpected(value, "float"))
    }
}

/// Checks numbers against the `lowerbound`/`upperbound` options and the
/// `values`/`excluding` lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeValidator;

impl ValueValidator for RangeValidator {
    fn validate(&self, value: &Value, options: &ParamOptions) -> ValidationResult {
        let Some(number) = value.as_f64() else {
            return ValidationResult::invalid(format!("\"{value}\" is not a number"));
        };

        let mut result = ValidationResult::valid();
        check_bounds(
            number,
            options.get_f64("lowerbound"),
            options.get_f64("upperbound"),
            &mut result,
        );
        check_listed_values(value, options, &mut result);
        result
    }
}

/// Casts integral floats, numeric strings and flags to `Integer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerFormatter;

impl ValueFormatter for IntegerFormatter {
    fn format_value(&self, value: Value, _context: &mut FormatContext<'_>) -> Value {
        match value {
            Value::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                Value::Integer(f as i64)
            }
            Value::String(text) => text
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .unwrap_or(Value::String(text)),
            Value::Bool(b) => Value::Integer(i64::from(b)),
            other => other,
        }
    }
}

/// Casts integers, numeric strings and flags to `Float`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatFormatter;

impl ValueFormatter for FloatFormatter {
    fn format_value(&self, value: Value, _context: &mut FormatContext<'_>) -> Value {
        match value {
            Value::Integer(i) => Value::Float(i as f64),
            Value::String(text) => text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|number| number.is_finite())
                .map(Value::Float)
                .unwrap_or(Value::String(text)),
            Value::Bool(b) => Value::Float(if b { 1.0 } else { 0.0 }),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;
    use crate::definition::ParamDefinition;

    fn format(formatter: &dyn ValueFormatter, value: Value) -> Value {
        let definition = ParamDefinition::new("number", "n", None, "desc", false);
        let (definitions, params) = (IndexMap::new(), IndexMap::new());
        let mut context = FormatContext::new(&definition, &definitions, &params);
        formatter.format_value(value, &mut context)
    }

    #[test]
    fn test_integer_parser() {
        let options = ParamOptions::new();
        assert_eq!(
            IntegerParser.parse(&Value::from(" -42 "), &options).unwrap(),
            Value::Integer(-42)
        );
        assert_eq!(
            IntegerParser.parse(&Value::from("+7"), &options).unwrap(),
            Value::Integer(7)
        );
        assert!(IntegerParser.parse(&Value::from("4.2"), &options).is_err());
        assert!(IntegerParser.parse(&Value::from("four"), &options).is_err());
    }

    #[test]
    fn test_float_parser_rejects_non_finite() {
        let options = ParamOptions::new();
        assert_eq!(
            FloatParser.parse(&Value::from("4.5"), &options).unwrap(),
            Value::Float(4.5)
        );
        assert_eq!(
            FloatParser.parse(&Value::from("3"), &options).unwrap(),
            Value::Float(3.0)
        );
        assert!(FloatParser.parse(&Value::from("inf"), &options).is_err());
        assert!(FloatParser.parse(&Value::from("NaN"), &options).is_err());
    }

    #[test]
    fn test_range_validator_bounds() {
        let options = ParamOptions::new()
            .with("lowerbound", 1)
            .with("upperbound", 10);

        assert!(RangeValidator.validate(&Value::Integer(1), &options).is_valid());
        assert!(RangeValidator.validate(&Value::Float(9.5), &options).is_valid());
        assert!(!RangeValidator.validate(&Value::Integer(0), &options).is_valid());
        assert!(!RangeValidator.validate(&Value::Integer(11), &options).is_valid());
    }

    #[test]
    fn test_range_validator_value_lists() {
        let options = ParamOptions::new()
            .with("values", vec![1, 2, 3])
            .with("excluding", vec![2]);

        assert!(RangeValidator.validate(&Value::Integer(1), &options).is_valid());
        assert!(!RangeValidator.validate(&Value::Integer(2), &options).is_valid());
        assert!(!RangeValidator.validate(&Value::Integer(4), &options).is_valid());
    }

    #[test]
    fn test_range_validator_rejects_non_numbers() {
        let result = RangeValidator.validate(&Value::from("ten"), &ParamOptions::new());
        assert_eq!(result.errors().len(), 1);
    }

    #[test]
    fn test_float_formatter_widens() {
        assert_eq!(format(&FloatFormatter, Value::Integer(2)), Value::Float(2.0));
        assert_eq!(format(&FloatFormatter, Value::from(" 0.5 ")), Value::Float(0.5));
        assert_eq!(format(&FloatFormatter, Value::Float(1.5)), Value::Float(1.5));
        assert_eq!(format(&FloatFormatter, Value::from("wide")), Value::from("wide"));
    }

    #[test]
    fn test_integer_formatter_narrows_integral_values() {
        assert_eq!(format(&IntegerFormatter, Value::Float(3.0)), Value::Integer(3));
        assert_eq!(format(&IntegerFormatter, Value::Float(3.5)), Value::Float(3.5));
        assert_eq!(format(&IntegerFormatter, Value::from("12")), Value::Integer(12));
        assert_eq!(format(&IntegerFormatter, Value::Bool(true)), Value::Integer(1));
    }
}
