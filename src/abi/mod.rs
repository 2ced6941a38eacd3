//! Purpose: C ABI boundary for managers and hosts built in other languages.
//! Exports: String views, error codes, opaque handles, the manager suite, the adapter,
//!          `export_manager`, and the exported `assetio_*` functions.
//! Role: Stable ABI surface; everything here is `#[repr(C)]` or `extern "C"`.
//! Invariants: No unwind crosses an exported function; failures travel as code + message.
//! Invariants: Handles are opaque; every constructor has a matching free function.
pub mod adapter;
pub mod errors;
pub mod export;
pub mod handles;
pub mod host_manager;
pub mod info_dictionary;
pub mod string_view;
pub mod suite;

pub use adapter::CManagerInterfaceAdapter;
pub use errors::{
    ErrorCode, catch_unknown_exception_as_code, extract_exception_message, throw_if_error,
};
pub use export::export_manager;
pub use string_view::{ConstStringView, STRING_BUFFER_SIZE, StringView, assign_string_view};
pub use suite::ManagerInterfaceSuite;
