//! Dataset parsing
//!
//! Accepts either a bare JSON array of persons or an object carrying the
//! persons alongside an optional configuration:
//!
//! ```json
//! { "persons": [ { "id": "A", "sex": "M", "pos": { "x": 0, "y": 0 } } ],
//!   "config": { "hSpacing": 60 } }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, span, Level};

use crate::core::{PedigreeConfig, PedigreeError, Person};

/// A parsed dataset file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PedigreeDocument {
    pub persons: Vec<Person>,
    #[serde(default)]
    pub config: PedigreeConfig,
}

impl PedigreeDocument {
    pub fn new(persons: Vec<Person>, config: PedigreeConfig) -> Self {
        Self { persons, config }
    }
}

/// Pedigree dataset parser
#[derive(Debug, Clone, Copy, Default)]
pub struct PedigreeParser;

impl PedigreeParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, input: &str) -> Result<PedigreeDocument, PedigreeError> {
        let parse_span = span!(Level::DEBUG, "parse_pedigree", input_len = input.len());
        let _enter = parse_span.enter();

        let document = match serde_json::from_str::<Value>(input)? {
            value @ Value::Array(_) => PedigreeDocument::new(
                serde_json::from_value(value)?,
                PedigreeConfig::default(),
            ),
            value @ Value::Object(_) => serde_json::from_value(value)?,
            other => {
                return Err(PedigreeError::dataset_error(format!(
                    "expected an array of persons or an object with 'persons', found {}",
                    json_kind(&other)
                )))
            }
        };
        document.config.validate()?;

        debug!(person_count = document.persons.len(), "Parsed pedigree dataset");
        Ok(document)
    }

    /// Serialize persons the way [`parse`](Self::parse) reads them back
    pub fn write_persons(&self, persons: &[Person]) -> Result<String, PedigreeError> {
        Ok(serde_json::to_string_pretty(persons)?)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
