//! Parameter Processor
//!
//! This crate turns raw, user-supplied name/value pairs into clean typed values
//! according to a declarative schema. It resolves aliases, applies defaults,
//! parses and validates values, and reports problems as errors with
//! severities instead of failing outright.
//!
//! # Key Features
//!
//! - **Definitions**: Name, type, default, aliases, dependencies and
//!   type-specific options per parameter
//! - **Type Registry**: Types are bundles of parser, validator, validation
//!   callback and formatter components; `boolean`, `integer`, `float`,
//!   `string` and `dimension` come built in
//! - **Dependency Ordering**: Parameters are processed after the parameters
//!   they depend on
//! - **Recovery**: Non-fatal errors fall back to the default, fatal errors
//!   stop the run
//!
//! # Examples
//!
//! ```
//! use param_processor::processor::Processor;
//! use param_processor::registry::TypeRegistry;
//! use param_processor::value::{ParamOptions, Value};
//!
//! let registry = TypeRegistry::default();
//! let definitions = registry.new_definitions_from_list(vec![
//!     ParamOptions::new()
//!         .with("name", "width")
//!         .with("message", "The width of the box")
//!         .with("type", "dimension")
//!         .with("default", "auto")
//!         .into(),
//! ])?;
//!
//! let mut processor = Processor::default();
//! processor.set_parameters([("Width", Value::from(" 10 "))]);
//! processor.set_parameter_definitions(definitions);
//!
//! let result = processor.process_parameters()?;
//! assert!(!result.has_fatal());
//! assert_eq!(result.parameter_map()["width"], Value::from("10px"));
//! # Ok::<(), param_processor::error::Error>(())
//! ```

pub mod components;
pub mod definition;
pub mod error;
pub mod options;
pub mod param;
pub mod processing_error;
pub mod processor;
pub mod registry;
pub mod result;
pub mod topological_sort;
pub mod types;
pub mod value;

pub use definition::ParamDefinition;
pub use error::{Error, Result};
pub use options::Options;
pub use processing_error::{Action, ProcessingError, Severity};
pub use processor::Processor;
pub use registry::TypeRegistry;
pub use result::{ProcessedParam, ProcessingResult};
pub use value::{ParamOptions, Value};
