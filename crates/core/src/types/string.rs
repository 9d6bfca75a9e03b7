use std::collections::HashMap;
use std::sync::{LazyLock, Mutex, PoisonError};

use regex::Regex;

use crate::components::{ValidationResult, ValueValidator};
use crate::types::check_listed_values;
use crate::value::{ParamOptions, Value};

/// Compiled `regex` options keyed by pattern. Invalid patterns are kept too,
/// so each pattern is compiled once per process.
static PATTERNS: LazyLock<Mutex<HashMap<String, Result<Regex, regex::Error>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

fn full_match(pattern: &str) -> Result<Regex, regex::Error> {
    let mut patterns = PATTERNS.lock().unwrap_or_else(PoisonError::into_inner);

    if let Some(compiled) = patterns.get(pattern) {
        return compiled.clone();
    }

    let compiled = Regex::new(&format!("^(?:{pattern})$"));
    patterns.insert(pattern.to_string(), compiled.clone());
    compiled
}

/// Validates strings against `minlength`/`maxlength` (in characters), a
/// `regex` that must match the whole value, and the `values`/`excluding`
/// lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringValidator;

impl ValueValidator for StringValidator {
    fn validate(&self, value: &Value, options: &ParamOptions) -> ValidationResult {
        let Some(text) = value.as_str() else {
            return ValidationResult::invalid(format!("\"{value}\" is not a string"));
        };

        let mut result = ValidationResult::valid();
        let length = text.chars().count() as f64;

        if let Some(min) = options.get_f64("minlength") {
            if length < min {
                result.add_error(format!("\"{text}\" is shorter than {min} characters"));
            }
        }

        if let Some(max) = options.get_f64("maxlength") {
            if length > max {
                result.add_error(format!("\"{text}\" is longer than {max} characters"));
            }
        }

        if let Some(pattern) = options.get_str("regex") {
            match full_match(pattern) {
                Ok(regex) if !regex.is_match(text) => {
                    result.add_error(format!("\"{text}\" does not match the pattern {pattern}"));
                }
                Ok(_) => {}
                Err(e) => result.add_error(format!("Invalid pattern {pattern}: {e}")),
            }
        }

        check_listed_values(value, options, &mut result);
        result
    }
}
