//! Purpose: Two-channel error translation at the C boundary.
//! Exports: `ErrorCode`, `throw_if_error`, `catch_unknown_exception_as_code`,
//!          `extract_exception_message`.
//! Role: Inbound codes become `Error` values; outbound `Error`s and panics become codes.
//! Invariants: No panic unwinds through an exported function.
//! Invariants: Code numbering is ABI; never renumber.
use crate::abi::string_view::{StringView, assign_string_view};
use crate::core::error::{Error, ErrorKind, Result};
use libc::c_int;
use std::fmt::Display;
use std::panic::{AssertUnwindSafe, catch_unwind};

pub const UNKNOWN_NON_EXCEPTION_MESSAGE: &str = "Unknown non-exception object thrown";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(i32)]
pub enum ErrorCode {
    Ok = 0,
    Unknown = 1,
    Exception = 2,
    OutOfRange = 3,
    LengthError = 4,
    BadVariantAccess = 5,
}

impl ErrorCode {
    pub fn from_raw(code: c_int) -> Option<Self> {
        match code {
            0 => Some(ErrorCode::Ok),
            1 => Some(ErrorCode::Unknown),
            2 => Some(ErrorCode::Exception),
            3 => Some(ErrorCode::OutOfRange),
            4 => Some(ErrorCode::LengthError),
            5 => Some(ErrorCode::BadVariantAccess),
            _ => None,
        }
    }

    pub fn raw(self) -> c_int {
        self as c_int
    }

    fn error_kind(self) -> ErrorKind {
        match self {
            ErrorCode::Ok | ErrorCode::Unknown => ErrorKind::Unknown,
            ErrorCode::Exception => ErrorKind::Exception,
            ErrorCode::OutOfRange => ErrorKind::OutOfRange,
            ErrorCode::LengthError => ErrorKind::LengthError,
            ErrorCode::BadVariantAccess => ErrorKind::BadVariantAccess,
        }
    }
}

/// Build the `Error` for a non-OK code; the message is `"<code>: <text>"`.
pub fn error_from_code(code: c_int, text: &str) -> Error {
    let kind = ErrorCode::from_raw(code)
        .map(ErrorCode::error_kind)
        .unwrap_or(ErrorKind::Unknown);
    Error::new(kind).with_message(format!("{code}: {text}"))
}

/// # Safety
/// `error.data` must be null or valid for reads of `error.capacity` bytes.
pub unsafe fn throw_if_error(code: c_int, error: &StringView) -> Result<()> {
    if code == ErrorCode::Ok.raw() {
        return Ok(());
    }
    let text = unsafe { error.to_string_lossy() };
    Err(error_from_code(code, &text))
}

/// # Safety
/// `error.data` must be null or valid for writes of `error.capacity` bytes.
pub unsafe fn extract_exception_message(error: &mut StringView, exception: &impl Display) {
    let text = exception.to_string();
    unsafe {
        assign_string_view(error, text.as_bytes());
    }
}

/// Run `f`, converting its error or panic into a code and a message in `error`.
///
/// # Safety
/// `error.data` must be null or valid for writes of `error.capacity` bytes.
pub unsafe fn catch_unknown_exception_as_code<F>(error: &mut StringView, f: F) -> c_int
where
    F: FnOnce() -> Result<ErrorCode>,
{
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(code)) => code.raw(),
        Ok(Err(err)) => {
            unsafe { extract_exception_message(error, &err) };
            ErrorCode::Exception.raw()
        }
        Err(_) => {
            unsafe { assign_string_view(error, UNKNOWN_NON_EXCEPTION_MESSAGE.as_bytes()) };
            ErrorCode::Unknown.raw()
        }
    }
}

/// Kinds that cross the boundary as their own code rather than `Exception`.
fn boundary_code(kind: ErrorKind) -> Option<ErrorCode> {
    match kind {
        ErrorKind::OutOfRange => Some(ErrorCode::OutOfRange),
        ErrorKind::LengthError => Some(ErrorCode::LengthError),
        ErrorKind::BadVariantAccess => Some(ErrorCode::BadVariantAccess),
        _ => None,
    }
}

/// Entry guard for exported functions; a null error pointer discards the message.
pub(crate) fn guard<F>(error: *mut StringView, f: F) -> c_int
where
    F: FnOnce() -> Result<ErrorCode>,
{
    let mut scratch = StringView::empty();
    // SAFETY: a non-null error view is caller-owned and valid for its capacity.
    let view = unsafe { error.as_mut() }.unwrap_or(&mut scratch);
    let mut coded_message = None;
    let code = unsafe {
        catch_unknown_exception_as_code(view, || match f() {
            Err(err) => match boundary_code(err.kind()) {
                Some(code) => {
                    coded_message = Some(err.message().unwrap_or_default().to_string());
                    Ok(code)
                }
                None => Err(err),
            },
            other => other,
        })
    };
    if let Some(message) = coded_message {
        unsafe { assign_string_view(view, message.as_bytes()) };
    }
    code
}
