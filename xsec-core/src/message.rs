//! Message collections
//!
//! A Function accumulates human-readable messages at three severities while
//! it computes. The adapter mirrors them onto the host component.

use serde::{Deserialize, Serialize};
use crate::XsecError;

/// Severity channel of a component message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Error,
    Warning,
    Remark,
}

impl MessageLevel {
    pub fn name(&self) -> &'static str {
        match self {
            MessageLevel::Error => "error",
            MessageLevel::Warning => "warning",
            MessageLevel::Remark => "remark",
        }
    }
}

/// Ordered Warning/Error/Remark messages; duplicates are kept
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Messages {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub remarks: Vec<String>,
}

impl Messages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn remark(&mut self, message: impl Into<String>) {
        self.remarks.push(message.into());
    }

    /// Push a message at an explicit level
    pub fn push(&mut self, level: MessageLevel, message: impl Into<String>) {
        match level {
            MessageLevel::Error => self.error(message),
            MessageLevel::Warning => self.warning(message),
            MessageLevel::Remark => self.remark(message),
        }
    }

    /// Record a structured error as an error message, its notes in parentheses
    pub fn push_error(&mut self, error: &XsecError) {
        let message = if error.notes.is_empty() {
            error.message.clone()
        } else {
            format!("{} ({})", error.message, error.notes.join("; "))
        };
        self.errors.push(message);
    }

    pub fn clear(&mut self) {
        self.errors.clear();
        self.warnings.clear();
        self.remarks.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty() && self.remarks.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len() + self.warnings.len() + self.remarks.len()
    }

    /// Messages of one level
    pub fn at(&self, level: MessageLevel) -> &[String] {
        match level {
            MessageLevel::Error => &self.errors,
            MessageLevel::Warning => &self.warnings,
            MessageLevel::Remark => &self.remarks,
        }
    }

    /// All messages, errors first, then warnings, then remarks
    pub fn iter(&self) -> impl Iterator<Item = (MessageLevel, &str)> {
        let errors = self.errors.iter().map(|m| (MessageLevel::Error, m.as_str()));
        let warnings = self.warnings.iter().map(|m| (MessageLevel::Warning, m.as_str()));
        let remarks = self.remarks.iter().map(|m| (MessageLevel::Remark, m.as_str()));
        errors.chain(warnings).chain(remarks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_clear() {
        let mut m = Messages::new();
        m.warning("a");
        m.warning("a");
        m.remark("b");
        m.push(MessageLevel::Error, "c");
        assert_eq!(m.len(), 4);
        assert_eq!(m.at(MessageLevel::Warning), ["a", "a"]);
        assert!(m.has_errors());

        m.clear();
        assert!(m.is_empty());
    }

    #[test]
    fn test_iter_order() {
        let mut m = Messages::new();
        m.remark("r");
        m.warning("w");
        m.error("e");
        let levels: Vec<MessageLevel> = m.iter().map(|(l, _)| l).collect();
        assert_eq!(levels, [MessageLevel::Error, MessageLevel::Warning, MessageLevel::Remark]);
    }

    #[test]
    fn test_push_error() {
        let mut m = Messages::new();
        m.push_error(&XsecError::engine("Section failed to converge"));
        assert_eq!(m.errors, ["Section failed to converge"]);

        m.push_error(&XsecError::engine("Section failed to converge").with_note("Load 2"));
        assert_eq!(m.errors[1], "Section failed to converge (Load 2)");
    }
}
