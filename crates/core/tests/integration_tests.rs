//! Integration tests for param-processor
//!
//! These tests run complete processing workflows: schemas written as YAML,
//! built through the type registry, and processed against raw input.

use std::sync::Arc;

use indexmap::IndexMap;
use param_processor::components::{FormatContext, ValueFormatter};
use param_processor::registry::{DefinitionSpec, TypeRegistry, TypeSpec};
use param_processor::types::number::IntegerParser;
use param_processor::{
    Error, Options, ParamDefinition, ParamOptions, ProcessingResult, Processor, Severity, Value,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Builds a schema from a YAML list of specification maps.
fn schema(registry: &TypeRegistry, yaml: &str) -> IndexMap<String, Arc<ParamDefinition>> {
    let specs: Vec<ParamOptions> = serde_yaml::from_str(yaml).unwrap();
    registry
        .new_definitions_from_list(specs.into_iter().map(DefinitionSpec::from).collect())
        .unwrap()
}

fn process(
    options: Options,
    definitions: IndexMap<String, Arc<ParamDefinition>>,
    raw: &[(&str, &str)],
) -> ProcessingResult {
    init_logging();

    let mut processor = Processor::new(options);
    processor.set_parameters(raw.iter().map(|(name, value)| (*name, Value::from(*value))));
    processor.set_parameter_definitions(definitions);
    processor.process_parameters().unwrap()
}

const DIMENSIONS: &str = r#"
- name: width
  message: box-width
  type: dimension
  default: auto
  allowauto: true
  units: [px, ex, em, "%"]

- name: height
  message: box-height
  type: dimension
  default: "42%"
  lowerbound: 20
  upperbound: 80
  units: [px, ex, em, "%"]

- name: margin
  message: box-margin
  type: dimension
  default: 5
"#;

#[test]
fn test_dimension_workflow() {
    let registry = TypeRegistry::default();

    let result = process(
        Options::default(),
        schema(&registry, DIMENSIONS),
        &[("width", "10"), ("height", "10%"), ("margin", "auto")],
    );

    assert!(!result.has_fatal());
    let values = result.parameter_map();
    assert_eq!(values["width"], Value::from("10px"));
    assert_eq!(values["height"], Value::from("10%"));
    // `auto` is not allowed for the margin, so it falls back to its default,
    // which is formatted with the default unit.
    assert_eq!(values["margin"], Value::from("5px"));

    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].severity(), Severity::Normal);
    assert!(result.errors()[0].has_tag("margin"));
    assert!(result.parameter("margin").unwrap().was_set_to_default());
}

#[test]
fn test_dimension_out_of_bounds_uses_default() {
    let registry = TypeRegistry::default();

    let result = process(
        Options::default(),
        schema(&registry, DIMENSIONS),
        &[("height", "19")],
    );

    assert!(!result.has_fatal());
    assert_eq!(result.parameter_map()["height"], Value::from("42%"));
    assert_eq!(result.errors().len(), 1);

    let height = result.parameter("height").unwrap();
    assert!(height.was_set_to_default());
    assert!(height.original_value().is_none());
}

#[test]
fn test_dimension_without_options() {
    let registry = TypeRegistry::default();
    let definitions = schema(
        &registry,
        "- {name: size, message: desc-size, type: dimension}\n",
    );

    let result = process(Options::default(), definitions, &[("size", "10")]);

    assert!(result.errors().is_empty());
    assert_eq!(result.parameter_map()["size"], Value::from("10px"));
}

#[test]
fn test_idempotent_defaulting() {
    let registry = TypeRegistry::default();
    let definitions = schema(
        &registry,
        r#"
- {name: count, message: desc-count, type: integer, default: 10}
- {name: enabled, message: desc-enabled, type: boolean, default: false}
"#,
    );

    let result = process(Options::default(), definitions, &[]);

    assert!(result.errors().is_empty());
    for name in ["count", "enabled"] {
        assert!(result.parameter(name).unwrap().was_set_to_default());
    }
    assert_eq!(result.parameter_map()["count"], Value::Integer(10));
    assert_eq!(result.parameter_map()["enabled"], Value::Bool(false));
}

#[test]
fn test_required_missing_is_fatal() {
    let registry = TypeRegistry::default();
    let definitions = schema(
        &registry,
        r#"
- {name: source, message: desc-source}
- {name: target, message: desc-target}
"#,
    );

    let result = process(Options::default(), definitions, &[("target", "x")]);

    assert!(result.has_fatal());
    let fatal: Vec<_> = result.errors_with_severity(Severity::Fatal).collect();
    assert_eq!(fatal.len(), 1);
    assert!(fatal[0].has_tag("missing"));
    assert!(!result.parameter_map().contains_key("source"));
}

#[test]
fn test_invalid_required_value_is_fatal() {
    let registry = TypeRegistry::default();
    let definitions = schema(
        &registry,
        r#"
- {name: count, message: desc-count, type: integer, lowerbound: 1}
- {name: later, message: desc-later, default: ""}
"#,
    );

    let result = process(Options::default(), definitions, &[("count", "0")]);

    assert!(result.has_fatal());
    assert_eq!(result.errors().len(), 1);
    assert!(result.parameter("count").is_some());
    assert!(result.parameter("later").is_none());
}

#[test]
fn test_unknown_parameter_handling() {
    let registry = TypeRegistry::default();
    let definitions = || schema(&registry, "- {name: a, message: desc-a, type: integer}\n");

    let result = process(Options::default(), definitions(), &[("a", "1"), ("b", "2")]);
    assert_eq!(result.parameter_map()["a"], Value::Integer(1));
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].severity(), Severity::Low);
    assert!(result.errors()[0].has_tag("b"));
    assert!(result.errors()[0].has_tag("unknown"));

    let lenient = Options::default().with_unknown_invalid(false);
    let result = process(lenient, definitions(), &[("a", "1"), ("b", "2")]);
    assert!(result.errors().is_empty());
}

#[test]
fn test_alias_resolution_priority() {
    let registry = TypeRegistry::default();
    let definitions = schema(
        &registry,
        "- {name: x, message: desc-x, aliases: [y], default: none}\n",
    );

    let result = process(Options::default(), definitions.clone(), &[("y", "alias")]);
    assert_eq!(result.parameter_map()["x"], Value::from("alias"));
    assert_eq!(result.parameter("x").unwrap().original_name(), Some("y"));
    assert!(result.errors().is_empty());

    let result = process(
        Options::default(),
        definitions,
        &[("y", "alias"), ("x", "exact")],
    );
    assert_eq!(result.parameter_map()["x"], Value::from("exact"));
    // The alias entry was not consumed and is reported as unknown.
    assert_eq!(result.errors().len(), 1);
    assert!(result.errors()[0].has_tag("y"));
}

#[test]
fn test_list_defaulting_on_empty_result() {
    let registry = TypeRegistry::default();
    let definitions = schema(
        &registry,
        r#"
- name: levels
  message: desc-levels
  type: integer
  islist: true
  delimiter: "|"
  default: [1, 2]
  upperbound: 10
"#,
    );

    let result = process(Options::default(), definitions.clone(), &[("levels", "11 | x | 12")]);
    assert!(!result.has_fatal());
    assert_eq!(result.parameter_map()["levels"], Value::from(vec![1, 2]));
    assert_eq!(result.errors().len(), 3);
    assert!(result
        .errors()
        .iter()
        .all(|e| e.severity() == Severity::Normal));

    let result = process(Options::default(), definitions, &[("levels", "3|4")]);
    assert!(result.errors().is_empty());
    assert_eq!(result.parameter_map()["levels"], Value::from(vec![3, 4]));
}

#[test]
fn test_typed_raw_values() {
    let registry = TypeRegistry::default();
    let definitions = schema(
        &registry,
        r#"
- {name: count, message: desc-count, type: integer, default: 0}
- {name: ratio, message: desc-ratio, type: float, default: 1.0}
- {name: on, message: desc-on, type: boolean, default: false}
"#,
    );

    let mut processor = Processor::default();
    processor.set_parameters([
        ("count", Value::Integer(4)),
        ("ratio", Value::Integer(2)),
        ("on", Value::Bool(true)),
    ]);
    processor.set_parameter_definitions(definitions);
    let result = processor.process_parameters().unwrap();

    assert!(result.errors().is_empty());
    let values = result.parameter_map();
    assert_eq!(values["count"], Value::Integer(4));
    assert_eq!(values["ratio"], Value::Float(2.0));
    assert_eq!(values["on"], Value::Bool(true));
}

#[test]
fn test_defaults_are_cast_to_their_type() {
    let registry = TypeRegistry::default();
    let definitions = schema(
        &registry,
        r#"
- {name: ratio, message: desc-ratio, type: float, default: 1}
- {name: count, message: desc-count, type: integer, default: "7"}
- {name: visible, message: desc-visible, type: boolean, default: "no"}
- {name: raw, message: desc-raw, type: float, default: 1, manipulatedefault: false}
"#,
    );

    let result = process(Options::default(), definitions, &[]);

    assert!(result.errors().is_empty());
    let values = result.parameter_map();
    assert_eq!(values["ratio"], Value::Float(1.0));
    assert_eq!(values["count"], Value::Integer(7));
    assert_eq!(values["visible"], Value::Bool(false));
    assert_eq!(values["raw"], Value::Integer(1));
}

#[test]
fn test_cyclic_schema_is_rejected() {
    let registry = TypeRegistry::default();
    let definitions = schema(
        &registry,
        r#"
- {name: a, message: desc-a, default: "", dependencies: [b]}
- {name: b, message: desc-b, default: "", dependencies: [c]}
- {name: c, message: desc-c, default: "", dependencies: [a]}
"#,
    );

    let mut processor = Processor::default();
    processor.set_parameter_definitions(definitions);

    match processor.process_parameters() {
        Err(Error::CycleDetected(names)) => assert_eq!(names, vec!["a", "b", "c"]),
        other => panic!("Expected a cycle error, got {other:?}"),
    }
}

/// Scales a number by the already processed `factor` parameter and announces
/// a derived `scaled_label` parameter.
#[derive(Debug)]
struct ScaledFormatter;

impl ValueFormatter for ScaledFormatter {
    fn format_value(&self, value: Value, context: &mut FormatContext<'_>) -> Value {
        let factor = context
            .processed_value("factor")
            .and_then(Value::as_i64)
            .unwrap_or(1);

        let scaled = value.as_i64().map_or(value, |n| Value::Integer(n * factor));

        context.introduce_definition(ParamDefinition::new(
            "string",
            "scaled_label",
            Some(Value::from(format!("scaled by {factor}"))),
            "desc-scaled-label",
            false,
        ));

        scaled
    }
}

#[test]
fn test_custom_type_reads_dependencies_and_extends_schema() {
    init_logging();

    let mut registry = TypeRegistry::default();
    assert!(registry.register_type(
        "scaled",
        TypeSpec::new()
            .with_string_parser(Arc::new(IntegerParser))
            .with_formatter(Arc::new(ScaledFormatter)),
    ));

    let definitions = schema(
        &registry,
        r#"
- {name: amount, message: desc-amount, type: scaled, dependencies: [factor]}
- {name: factor, message: desc-factor, type: integer, default: 1}
"#,
    );

    let result = process(
        Options::default(),
        definitions,
        &[("amount", "7"), ("factor", "3"), ("scaled_label", "custom")],
    );

    assert!(result.errors().is_empty());
    let names: Vec<&str> = result.parameters().keys().map(String::as_str).collect();
    assert_eq!(names, vec!["factor", "amount", "scaled_label"]);

    let values = result.parameter_map();
    assert_eq!(values["amount"], Value::Integer(21));
    assert_eq!(values["scaled_label"], Value::from("custom"));
}

#[test]
fn test_definitions_from_map_with_prebuilt_entries() {
    let registry = TypeRegistry::default();
    let mut specs: IndexMap<String, DefinitionSpec> = IndexMap::new();
    specs.insert(
        "title".to_string(),
        ParamOptions::new().with("message", "desc-title").into(),
    );
    specs.insert(
        "ignored".to_string(),
        registry
            .new_definition("boolean", "visible", Some(Value::Bool(true)), "desc-visible", false)
            .unwrap()
            .into(),
    );
    let definitions = registry.new_definitions_from_map(specs).unwrap();

    let result = process(
        Options::default(),
        definitions,
        &[("title", "Report"), ("visible", "no")],
    );

    assert!(result.errors().is_empty());
    let values = result.parameter_map();
    assert_eq!(values["title"], Value::from("Report"));
    assert_eq!(values["visible"], Value::Bool(false));
}

#[test]
fn test_options_from_yaml() {
    let options: Options = serde_yaml::from_str(
        r#"
name: infobox
lowercase_values: true
lowercase_names: false
"#,
    )
    .unwrap();

    let registry = TypeRegistry::default();
    let definitions = schema(
        &registry,
        "- {name: mode, message: desc-mode, default: plain, values: [plain, fancy]}\n",
    );

    let result = process(options, definitions, &[("mode", " FANCY "), ("Mode", "x")]);

    assert_eq!(result.parameter_map()["mode"], Value::from("fancy"));
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].element(), "infobox");
    assert!(result.errors()[0].has_tag("Mode"));
}

#[test]
fn test_result_serializes() {
    let registry = TypeRegistry::default();
    let result = process(
        Options::default(),
        schema(&registry, "- {name: a, message: desc-a, default: x}\n"),
        &[("b", "1")],
    );

    let yaml = serde_yaml::to_string(&result).unwrap();
    assert!(yaml.contains("severity: low"));
    assert!(yaml.contains("was_set_to_default: true"));
}
