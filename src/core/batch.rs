//! Purpose: Per-element outcome model for batch entity operations.
//! Exports: `BatchElementError`, `BatchElementErrorCode`, `Outcome`, `batch_element_exception`.
//! Role: Element-level failures travel as data; the façade escalates them per policy.
//! Invariants: Error codes and their names are a closed set.
//! Invariants: Exception messages are `<codeName>: <message> [index=..] [access=..] [entity=..]`.
use crate::core::error::{Error, ErrorKind};
use crate::core::reference::EntityReference;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum BatchElementErrorCode {
    Unknown,
    InvalidEntityReference,
    MalformedEntityReference,
    EntityAccessError,
    EntityResolutionError,
    InvalidPreflightHint,
    InvalidTraitSet,
}

impl BatchElementErrorCode {
    pub fn name(self) -> &'static str {
        match self {
            BatchElementErrorCode::Unknown => "unknown",
            BatchElementErrorCode::InvalidEntityReference => "invalidEntityReference",
            BatchElementErrorCode::MalformedEntityReference => "malformedEntityReference",
            BatchElementErrorCode::EntityAccessError => "entityAccessError",
            BatchElementErrorCode::EntityResolutionError => "entityResolutionError",
            BatchElementErrorCode::InvalidPreflightHint => "invalidPreflightHint",
            BatchElementErrorCode::InvalidTraitSet => "invalidTraitSet",
        }
    }
}

impl fmt::Display for BatchElementErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BatchElementError {
    pub code: BatchElementErrorCode,
    pub message: String,
}

impl BatchElementError {
    pub fn new(code: BatchElementErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Outcome for one index of a batch call.
pub type Outcome<T> = Result<T, BatchElementError>;

/// Build the call-level error raised when a throwing policy meets an element error.
pub fn batch_element_exception(
    error: BatchElementError,
    index: usize,
    access: Option<&str>,
    entity_reference: Option<&EntityReference>,
) -> Error {
    let mut message = format!("{}:", error.code.name());
    if !error.message.is_empty() {
        message.push(' ');
        message.push_str(&error.message);
    }
    message.push_str(&format!(" [index={index}]"));
    if let Some(access) = access {
        message.push_str(&format!(" [access={access}]"));
    }
    if let Some(entity_reference) = entity_reference {
        message.push_str(&format!(" [entity={entity_reference}]"));
    }
    Error::new(ErrorKind::BatchElement)
        .with_message(message)
        .with_index(index)
        .with_batch_element(error)
}
