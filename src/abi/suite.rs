//! Purpose: Function-pointer table a C-ABI manager exposes alongside its handle.
//! Exports: `ManagerInterfaceSuite`.
//! Role: Dispatch table consumed by `CManagerInterfaceAdapter` and produced by `export_manager`.
//! Invariants: Field order is ABI; appending is compatible, reordering is not.
//! Invariants: Every entry must be thread-safe for the lifetime of the handle.
use crate::abi::handles::{InfoDictionaryHandle, ManagerInterfaceHandle};
use crate::abi::string_view::StringView;
use libc::c_int;

#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct ManagerInterfaceSuite {
    /// Release the handle; called exactly once by its owner.
    pub dtor: unsafe extern "C" fn(handle: ManagerInterfaceHandle),
    pub identifier: unsafe extern "C" fn(
        error: *mut StringView,
        out: *mut StringView,
        handle: ManagerInterfaceHandle,
    ) -> c_int,
    pub display_name: unsafe extern "C" fn(
        error: *mut StringView,
        out: *mut StringView,
        handle: ManagerInterfaceHandle,
    ) -> c_int,
    /// Populate `out` through the `assetio_InfoDictionary_*` functions.
    pub info: unsafe extern "C" fn(
        error: *mut StringView,
        out: InfoDictionaryHandle,
        handle: ManagerInterfaceHandle,
    ) -> c_int,
}
