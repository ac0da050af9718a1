//! Adapter errors
//!
//! These are programmer or wiring errors, returned from the adapter API.
//! Problems with the data flowing through a component are never raised here;
//! they become component messages.

use thiserror::Error;
use xsec_core::XsecError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdapterError {
    #[error("duplicate nick name '{nick_name}' among the {side} parameters of {function}")]
    DuplicateNickName {
        function: String,
        side: &'static str,
        nick_name: String,
    },

    #[error("{function} has not been registered with a host")]
    NotRegistered { function: String },

    #[error("{function} now has {found} {side} attributes, {expected} were registered")]
    AttributeCountChanged {
        function: String,
        side: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("{side} slot {index} out of range ({count} slots)")]
    SlotOutOfRange {
        side: &'static str,
        index: usize,
        count: usize,
    },

    #[error("no input slot named '{0}'")]
    UnknownSlot(String),

    #[error("dropdown {index} out of range ({count} lists)")]
    DropdownOutOfRange { index: usize, count: usize },

    #[error("item {index} out of range for dropdown {list} ({count} items)")]
    ChoiceOutOfRange { list: usize, index: usize, count: usize },

    #[error("'{item}' is not an item of dropdown {list}")]
    UnknownItem { list: usize, item: String },

    #[error("saved state has {found} dropdown lists, the component has {expected}")]
    StateMismatch { expected: usize, found: usize },

    #[error(transparent)]
    Xsec(#[from] XsecError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let e = AdapterError::DuplicateNickName {
            function: "CreateLoad".into(),
            side: "input",
            nick_name: "Fx".into(),
        };
        assert_eq!(e.to_string(), "duplicate nick name 'Fx' among the input parameters of CreateLoad");

        let e: AdapterError = XsecError::unknown_function("Nope").into();
        assert!(e.to_string().starts_with("[UNKNOWN_FUNCTION] Unknown function: Nope"));
    }
}
