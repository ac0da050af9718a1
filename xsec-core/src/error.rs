//! Structured errors
//!
//! Errors raised while marshaling or computing never crash the host. They
//! are values that end up as messages on the component, with enough context
//! for a user to fix the input.

use serde::{Deserialize, Serialize};
use xsec_units::{ConversionError, QuantityKind};

/// Standard error codes (machine-readable)
pub mod codes {
    pub const PARSE_INPUT: &str = "PARSE_INPUT";
    pub const MISSING_INPUT: &str = "MISSING_INPUT";
    pub const TYPE_ERROR: &str = "TYPE_ERROR";
    pub const ACCESS_ERROR: &str = "ACCESS_ERROR";
    pub const UNIT_ERROR: &str = "UNIT_ERROR";
    pub const DOMAIN_ERROR: &str = "DOMAIN_ERROR";
    pub const ENGINE_ERROR: &str = "ENGINE_ERROR";
    pub const UNKNOWN_FUNCTION: &str = "UNKNOWN_FUNCTION";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Severity level of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Computation continued with degraded result
    Warning,
    /// Computation failed for this component
    Error,
    /// Programmer error; the component cannot be used
    Fatal,
}

/// Structured error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XsecError {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// Nick name of the parameter the error relates to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,

    /// Propagation notes
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub notes: Vec<String>,

    /// Severity level
    pub severity: Severity,
}

impl XsecError {
    /// Create a new error
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
            parameter: None,
            notes: Vec::new(),
            severity: Severity::Error,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder: set the parameter this error belongs to
    pub fn for_parameter(mut self, nick_name: impl Into<String>) -> Self {
        self.parameter = Some(nick_name.into());
        self
    }

    /// Builder: add propagation note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Builder: set severity
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// True for errors raised by a failed input conversion
    pub fn is_parse_error(&self) -> bool {
        self.code == codes::PARSE_INPUT
    }

    // ========== Common Error Constructors ==========

    /// An input value could not be converted to the parameter's type or quantity
    pub fn input_parse(nick_name: &str, expected: &str, got: &str) -> Self {
        Self::new(codes::PARSE_INPUT, format!(
            "Could not parse the input {} to the desired quantity ({}), got {}",
            nick_name, expected, got
        ))
        .for_parameter(nick_name)
        .with_suggestion(format!("Connect a {} value to {}", expected, nick_name))
    }

    pub fn missing_input(nick_name: &str) -> Self {
        Self::new(codes::MISSING_INPUT, format!("Input {} is required but has no value", nick_name))
            .for_parameter(nick_name)
    }

    pub fn type_error(expected: &str, got: &str) -> Self {
        Self::new(codes::TYPE_ERROR, format!("Expected {}, got {}", expected, got))
    }

    pub fn access_error(nick_name: &str, details: impl Into<String>) -> Self {
        Self::new(codes::ACCESS_ERROR, format!("Input {}: {}", nick_name, details.into()))
            .for_parameter(nick_name)
    }

    pub fn unit_mismatch(expected: QuantityKind, got: QuantityKind) -> Self {
        Self::new(codes::UNIT_ERROR, format!("Expected a {} unit, got a {} unit", expected, got))
            .with_severity(Severity::Fatal)
    }

    pub fn domain_error(details: impl Into<String>) -> Self {
        Self::new(codes::DOMAIN_ERROR, details.into())
    }

    pub fn engine(details: impl Into<String>) -> Self {
        Self::new(codes::ENGINE_ERROR, details.into())
    }

    pub fn unknown_function(name: &str) -> Self {
        Self::new(codes::UNKNOWN_FUNCTION, format!("Unknown function: {}", name))
            .with_suggestion("List the registered functions to see what is available")
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL, format!("Internal error: {}", details.into()))
            .with_suggestion("This is a bug, please report it")
            .with_severity(Severity::Fatal)
    }
}

impl std::fmt::Display for XsecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for XsecError {}

impl From<ConversionError> for XsecError {
    fn from(err: ConversionError) -> Self {
        match err {
            ConversionError::IncompatibleKinds { from_kind, to_kind, .. } => {
                Self::type_error(to_kind.name(), from_kind.name())
            }
            ConversionError::UnknownUnit(s) => Self::new(codes::UNIT_ERROR, format!("Unknown unit: {}", s)),
            ConversionError::InvalidNumber(s) => Self::type_error("Number", &format!("'{}'", s)),
        }
    }
}
