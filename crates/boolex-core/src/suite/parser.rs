//! Suite parsing from YAML/JSON.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ValidationError;

/// Errors that can occur when parsing suites.
#[derive(Error, Debug)]
pub enum SuiteError {
    #[error("Failed to read suite file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Suite validation failed: {0}")]
    Invalid(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Unsupported suite format: {0} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(String),
}

/// The outcome a case must produce.
///
/// Written as a bare boolean (`expect: true`) or an error kind
/// (`expect: invalid_syntax`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Expectation {
    Value(bool),
    Error(ValidationError),
}

impl From<Result<bool, ValidationError>> for Expectation {
    fn from(result: Result<bool, ValidationError>) -> Self {
        match result {
            Ok(value) => Expectation::Value(value),
            Err(error) => Expectation::Error(error),
        }
    }
}

/// A single expression with its expected outcome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Case {
    /// Unique identifier (e.g., "P1", "E3")
    pub id: String,

    /// The expression text, evaluated verbatim
    pub expression: String,

    /// What evaluating the expression must produce
    pub expect: Expectation,
}

/// A named collection of cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suite {
    /// Human-readable name
    pub name: String,

    /// Detailed description
    #[serde(default)]
    pub description: Option<String>,

    /// Cases, run in order
    #[serde(default)]
    pub cases: Vec<Case>,
}

impl Suite {
    /// Parse a suite from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SuiteError> {
        let suite: Suite = serde_yaml::from_str(yaml)?;
        suite.validate()?;
        Ok(suite)
    }

    /// Parse a suite from JSON string.
    pub fn from_json(json: &str) -> Result<Self, SuiteError> {
        let suite: Suite = serde_json::from_str(json)?;
        suite.validate()?;
        Ok(suite)
    }

    /// Parse a suite from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, SuiteError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse a suite from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SuiteError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse a suite file, picking the format from its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SuiteError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(SuiteError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Validate the suite structure.
    fn validate(&self) -> Result<(), SuiteError> {
        if self.name.trim().is_empty() {
            return Err(SuiteError::MissingField("name".to_string()));
        }

        let mut seen = HashSet::new();
        for (index, case) in self.cases.iter().enumerate() {
            if case.id.trim().is_empty() {
                return Err(SuiteError::MissingField(format!("cases[{}].id", index)));
            }
            if !seen.insert(case.id.as_str()) {
                return Err(SuiteError::Invalid(format!("Duplicate case ID: {}", case.id)));
            }
        }

        Ok(())
    }
}
