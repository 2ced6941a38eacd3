//! Purpose: Call-level error model shared by the façade, the C ABI layer, and the CLI.
//! Exports: `Error`, `ErrorKind`, `Result`, `to_exit_code`.
//! Role: Single error currency; batch element failures ride in `ErrorKind::BatchElement`.
//! Invariants: Kinds are a closed set; exit codes and C error codes are stable once published.
//! Invariants: Display is `<Kind>: <message>` plus optional context suffixes.
use crate::core::batch::BatchElementError;
use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Internal,
    Usage,
    InputValidation,
    Configuration,
    NotImplemented,
    Unhandled,
    BatchElement,
    Unknown,
    Exception,
    OutOfRange,
    LengthError,
    BadVariantAccess,
    Io,
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    path: Option<PathBuf>,
    index: Option<usize>,
    batch_element: Option<BatchElementError>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            path: None,
            index: None,
            batch_element: None,
            source: None,
        }
    }

    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotImplemented).with_message(message)
    }

    pub fn input_validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InputValidation).with_message(message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration).with_message(message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn path(&self) -> Option<&std::path::Path> {
        self.path.as_deref()
    }

    /// Batch index that failed, set for `ErrorKind::BatchElement`.
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn batch_element(&self) -> Option<&BatchElementError> {
        self.batch_element.as_ref()
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_batch_element(mut self, error: BatchElementError) -> Self {
        self.batch_element = Some(error);
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Foreign-originated and element errors already carry a complete message.
        match self.kind {
            ErrorKind::BatchElement
            | ErrorKind::Unknown
            | ErrorKind::Exception
            | ErrorKind::OutOfRange
            | ErrorKind::LengthError
            | ErrorKind::BadVariantAccess => {
                if let Some(message) = &self.message {
                    return write!(f, "{message}");
                }
            }
            _ => {}
        }
        write!(f, "{:?}", self.kind)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

pub fn to_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Internal => 1,
        ErrorKind::Usage => 2,
        ErrorKind::InputValidation => 3,
        ErrorKind::Configuration => 4,
        ErrorKind::NotImplemented => 5,
        ErrorKind::Unhandled => 6,
        ErrorKind::BatchElement => 7,
        ErrorKind::Unknown => 8,
        ErrorKind::Exception => 9,
        ErrorKind::OutOfRange => 10,
        ErrorKind::LengthError => 11,
        ErrorKind::BadVariantAccess => 12,
        ErrorKind::Io => 13,
    }
}
