//! Purpose: C functions over the host façade and the shared handles it consumes.
//! Exports: `assetio_hostApi_Manager_*`, `assetio_managerApi_Shared*` functions.
//! Role: C hosts build a façade from a shared manager interface and a shared session.
//! Invariants: Every `*_ctor` result must be released with the matching `*_dtor`.
use crate::abi::adapter::CManagerInterfaceAdapter;
use crate::abi::errors::{ErrorCode, guard};
use crate::abi::handles::{
    HostManagerHandle, InfoDictionaryHandle, ManagerInterfaceHandle, SharedHostSessionHandle,
    SharedManagerInterfaceHandle, host_manager_from_handle, host_manager_to_handle,
    host_manager_to_instance, info_dictionary_to_instance, shared_host_session_from_handle,
    shared_host_session_to_instance, shared_manager_interface_from_handle,
    shared_manager_interface_to_handle, shared_manager_interface_to_instance,
};
use crate::abi::string_view::{StringView, assign_string_view};
use crate::abi::suite::ManagerInterfaceSuite;
use crate::core::error::{Error, ErrorKind, Result};
use crate::host_api::Manager;
use libc::c_int;
use std::sync::Arc;

fn null_arg(name: &str) -> Error {
    Error::new(ErrorKind::Usage).with_message(format!("{name} is null"))
}

fn borrow_host_manager<'a>(handle: HostManagerHandle) -> Result<&'a Manager> {
    unsafe { host_manager_to_instance(handle) }.ok_or_else(|| null_arg("manager handle"))
}

fn write_string(out: *mut StringView, value: &str) -> Result<ErrorCode> {
    // SAFETY: a non-null out view is caller-owned and valid for its capacity.
    let out = unsafe { out.as_mut() }.ok_or_else(|| null_arg("out"))?;
    unsafe { assign_string_view(out, value.as_bytes()) };
    Ok(ErrorCode::Ok)
}

/// Wrap a C manager (handle + suite) in an adapter and share it.
#[unsafe(no_mangle)]
pub extern "C" fn assetio_managerApi_SharedManagerInterface_ctor(
    error: *mut StringView,
    out: *mut SharedManagerInterfaceHandle,
    handle: ManagerInterfaceHandle,
    suite: ManagerInterfaceSuite,
) -> c_int {
    guard(error, || {
        if out.is_null() {
            return Err(null_arg("out"));
        }
        if handle.is_null() {
            return Err(null_arg("manager interface handle"));
        }
        // SAFETY: ownership of `handle` transfers to the adapter per the ctor contract.
        let adapter = unsafe { CManagerInterfaceAdapter::new(handle, suite) };
        let shared = shared_manager_interface_to_handle(Arc::new(adapter));
        unsafe { *out = shared };
        Ok(ErrorCode::Ok)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn assetio_managerApi_SharedManagerInterface_dtor(
    handle: SharedManagerInterfaceHandle,
) {
    if handle.is_null() {
        return;
    }
    unsafe {
        drop(shared_manager_interface_from_handle(handle));
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn assetio_managerApi_SharedHostSession_dtor(handle: SharedHostSessionHandle) {
    if handle.is_null() {
        return;
    }
    unsafe {
        drop(shared_host_session_from_handle(handle));
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn assetio_hostApi_Manager_ctor(
    error: *mut StringView,
    out: *mut HostManagerHandle,
    manager_interface: SharedManagerInterfaceHandle,
    host_session: SharedHostSessionHandle,
) -> c_int {
    guard(error, || {
        if out.is_null() {
            return Err(null_arg("out"));
        }
        let manager_interface = unsafe { shared_manager_interface_to_instance(manager_interface) }
            .ok_or_else(|| null_arg("manager interface handle"))?;
        let host_session = unsafe { shared_host_session_to_instance(host_session) }
            .ok_or_else(|| null_arg("host session handle"))?;
        let manager = Manager::new(Arc::clone(manager_interface), Arc::clone(host_session));
        unsafe { *out = host_manager_to_handle(manager) };
        Ok(ErrorCode::Ok)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn assetio_hostApi_Manager_dtor(handle: HostManagerHandle) {
    if handle.is_null() {
        return;
    }
    unsafe {
        drop(host_manager_from_handle(handle));
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn assetio_hostApi_Manager_identifier(
    error: *mut StringView,
    out: *mut StringView,
    handle: HostManagerHandle,
) -> c_int {
    guard(error, || write_string(out, &borrow_host_manager(handle)?.identifier()?))
}

#[unsafe(no_mangle)]
pub extern "C" fn assetio_hostApi_Manager_displayName(
    error: *mut StringView,
    out: *mut StringView,
    handle: HostManagerHandle,
) -> c_int {
    guard(error, || write_string(out, &borrow_host_manager(handle)?.display_name()?))
}

#[unsafe(no_mangle)]
pub extern "C" fn assetio_hostApi_Manager_info(
    error: *mut StringView,
    out: InfoDictionaryHandle,
    handle: HostManagerHandle,
) -> c_int {
    guard(error, || {
        let info = borrow_host_manager(handle)?.info()?;
        let dict = unsafe { info_dictionary_to_instance(out) }.ok_or_else(|| null_arg("out"))?;
        *dict = info;
        Ok(ErrorCode::Ok)
    })
}
