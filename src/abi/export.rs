//! Purpose: Publish a native manager as a C handle plus `ManagerInterfaceSuite`.
//! Exports: `export_manager`.
//! Role: Reverse of `CManagerInterfaceAdapter`; Rust managers become loadable by C hosts.
//! Invariants: Each suite entry runs under `catch_unknown_exception_as_code`.
//! Invariants: The handle owns one strong reference, released by the suite dtor.
use crate::abi::errors::{ErrorCode, guard};
use crate::abi::handles::{
    InfoDictionaryHandle, ManagerInterfaceHandle, SharedManagerInterface,
    info_dictionary_to_instance,
};
use crate::abi::string_view::{StringView, assign_string_view};
use crate::abi::suite::ManagerInterfaceSuite;
use crate::core::error::{Error, ErrorKind, Result};
use libc::c_int;

pub fn export_manager(
    manager: SharedManagerInterface,
) -> (ManagerInterfaceHandle, ManagerInterfaceSuite) {
    let handle = Box::into_raw(Box::new(manager)).cast();
    let suite = ManagerInterfaceSuite {
        dtor: exported_dtor,
        identifier: exported_identifier,
        display_name: exported_display_name,
        info: exported_info,
    };
    (handle, suite)
}

fn borrow_manager<'a>(handle: ManagerInterfaceHandle) -> Result<&'a SharedManagerInterface> {
    // SAFETY: handles passed to these entries were produced by `export_manager`.
    unsafe { handle.cast::<SharedManagerInterface>().as_ref() }
        .ok_or_else(|| Error::new(ErrorKind::Usage).with_message("manager handle is null"))
}

fn write_string(out: *mut StringView, value: &str) -> Result<ErrorCode> {
    // SAFETY: a non-null out view is caller-owned and valid for its capacity.
    let out = unsafe { out.as_mut() }
        .ok_or_else(|| Error::new(ErrorKind::Usage).with_message("out is null"))?;
    unsafe { assign_string_view(out, value.as_bytes()) };
    Ok(ErrorCode::Ok)
}

extern "C" fn exported_dtor(handle: ManagerInterfaceHandle) {
    if handle.is_null() {
        return;
    }
    unsafe {
        drop(Box::from_raw(handle.cast::<SharedManagerInterface>()));
    }
}

extern "C" fn exported_identifier(
    error: *mut StringView,
    out: *mut StringView,
    handle: ManagerInterfaceHandle,
) -> c_int {
    guard(error, || write_string(out, &borrow_manager(handle)?.identifier()?))
}

extern "C" fn exported_display_name(
    error: *mut StringView,
    out: *mut StringView,
    handle: ManagerInterfaceHandle,
) -> c_int {
    guard(error, || write_string(out, &borrow_manager(handle)?.display_name()?))
}

extern "C" fn exported_info(
    error: *mut StringView,
    out: InfoDictionaryHandle,
    handle: ManagerInterfaceHandle,
) -> c_int {
    guard(error, || {
        let info = borrow_manager(handle)?.info()?;
        let dict = unsafe { info_dictionary_to_instance(out) }
            .ok_or_else(|| Error::new(ErrorKind::Usage).with_message("out is null"))?;
        *dict = info;
        Ok(ErrorCode::Ok)
    })
}
