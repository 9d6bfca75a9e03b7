use crate::components::{FormatContext, ParseError, ValueFormatter, ValueParser};
use crate::value::{ParamOptions, Value};

const TRUE_WORDS: [&str; 4] = ["yes", "on", "true", "1"];
const FALSE_WORDS: [&str; 4] = ["no", "off", "false", "0"];

/// Parses the usual yes/no words, case-insensitively.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolParser;

impl ValueParser for BoolParser {
    fn parse(&self, value: &Value, _options: &ParamOptions) -> Result<Value, ParseError> {
        let Some(raw) = value.as_str() else {
            return match value {
                Value::Bool(_) => Ok(value.clone()),
                _ => Err(ParseError::unexpected(value, "boolean")),
            };
        };

        let word = raw.trim().to_lowercase();

        if TRUE_WORDS.contains(&word.as_str()) {
            Ok(Value::Bool(true))
        } else if FALSE_WORDS.contains(&word.as_str()) {
            Ok(Value::Bool(false))
        } else {
            Err(ParseError::unexpected(value, "boolean"))
        }
    }
}

/// Casts flag words and integers to `Bool`, mostly for defaults and typed
/// input that never went through [`BoolParser`]. Other values are kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolFormatter;

impl ValueFormatter for BoolFormatter {
    fn format_value(&self, value: Value, context: &mut FormatContext<'_>) -> Value {
        match value {
            Value::String(text) => {
                let raw = Value::String(text);
                BoolParser.parse(&raw, context.options()).unwrap_or(raw)
            }
            Value::Integer(i) => Value::Bool(i != 0),
            other => other,
        }
    }
}
