//! Purpose: Opaque C handle types and their conversions to Rust instances.
//! Exports: Handle aliases plus `to_handle`/`to_instance` style helpers per type.
//! Role: The only place raw handle pointers are cast back to Rust types.
//! Invariants: A handle is either null or was produced by the matching `*_to_handle`.
use crate::core::session::HostSessionPtr;
use crate::core::value::InfoDictionary;
use crate::host_api::Manager;
use crate::manager_api::ManagerInterface;
use std::sync::Arc;

#[repr(C)]
pub struct InfoDictionaryOpaque {
    _private: [u8; 0],
}

#[repr(C)]
pub struct ManagerInterfaceOpaque {
    _private: [u8; 0],
}

#[repr(C)]
pub struct SharedManagerInterfaceOpaque {
    _private: [u8; 0],
}

#[repr(C)]
pub struct SharedHostSessionOpaque {
    _private: [u8; 0],
}

#[repr(C)]
pub struct HostManagerOpaque {
    _private: [u8; 0],
}

pub type InfoDictionaryHandle = *mut InfoDictionaryOpaque;
/// Implementation-owned manager state behind a `ManagerInterfaceSuite`.
pub type ManagerInterfaceHandle = *mut ManagerInterfaceOpaque;
pub type SharedManagerInterfaceHandle = *mut SharedManagerInterfaceOpaque;
pub type SharedHostSessionHandle = *mut SharedHostSessionOpaque;
pub type HostManagerHandle = *mut HostManagerOpaque;

pub type SharedManagerInterface = Arc<dyn ManagerInterface>;

pub fn info_dictionary_to_handle(dict: &mut InfoDictionary) -> InfoDictionaryHandle {
    (dict as *mut InfoDictionary).cast()
}

/// # Safety
/// `handle` must be null or point at a live `InfoDictionary` not aliased elsewhere.
pub unsafe fn info_dictionary_to_instance<'a>(
    handle: InfoDictionaryHandle,
) -> Option<&'a mut InfoDictionary> {
    unsafe { handle.cast::<InfoDictionary>().as_mut() }
}

pub fn info_dictionary_into_handle(dict: Box<InfoDictionary>) -> InfoDictionaryHandle {
    Box::into_raw(dict).cast()
}

/// # Safety
/// `handle` must have come from [`info_dictionary_into_handle`] and not been freed.
pub unsafe fn info_dictionary_from_handle(handle: InfoDictionaryHandle) -> Box<InfoDictionary> {
    unsafe { Box::from_raw(handle.cast::<InfoDictionary>()) }
}

pub fn shared_manager_interface_to_handle(
    manager: SharedManagerInterface,
) -> SharedManagerInterfaceHandle {
    Box::into_raw(Box::new(manager)).cast()
}

/// # Safety
/// `handle` must be null or come from [`shared_manager_interface_to_handle`].
pub unsafe fn shared_manager_interface_to_instance<'a>(
    handle: SharedManagerInterfaceHandle,
) -> Option<&'a SharedManagerInterface> {
    unsafe { handle.cast::<SharedManagerInterface>().as_ref() }
}

/// # Safety
/// `handle` must come from [`shared_manager_interface_to_handle`] and not been freed.
pub unsafe fn shared_manager_interface_from_handle(
    handle: SharedManagerInterfaceHandle,
) -> Box<SharedManagerInterface> {
    unsafe { Box::from_raw(handle.cast::<SharedManagerInterface>()) }
}

pub fn shared_host_session_to_handle(session: HostSessionPtr) -> SharedHostSessionHandle {
    Box::into_raw(Box::new(session)).cast()
}

/// # Safety
/// `handle` must be null or come from [`shared_host_session_to_handle`].
pub unsafe fn shared_host_session_to_instance<'a>(
    handle: SharedHostSessionHandle,
) -> Option<&'a HostSessionPtr> {
    unsafe { handle.cast::<HostSessionPtr>().as_ref() }
}

/// # Safety
/// `handle` must come from [`shared_host_session_to_handle`] and not been freed.
pub unsafe fn shared_host_session_from_handle(
    handle: SharedHostSessionHandle,
) -> Box<HostSessionPtr> {
    unsafe { Box::from_raw(handle.cast::<HostSessionPtr>()) }
}

pub fn host_manager_to_handle(manager: Manager) -> HostManagerHandle {
    Box::into_raw(Box::new(manager)).cast()
}

/// # Safety
/// `handle` must be null or come from [`host_manager_to_handle`].
pub unsafe fn host_manager_to_instance<'a>(handle: HostManagerHandle) -> Option<&'a Manager> {
    unsafe { handle.cast::<Manager>().as_ref() }
}

/// # Safety
/// `handle` must come from [`host_manager_to_handle`] and not been freed.
pub unsafe fn host_manager_from_handle(handle: HostManagerHandle) -> Box<Manager> {
    unsafe { Box::from_raw(handle.cast::<Manager>()) }
}

#[cfg(test)]
mod tests {
    use super::{info_dictionary_to_handle, info_dictionary_to_instance};
    use crate::core::value::{InfoDictionary, Value};

    #[test]
    fn info_dictionary_handle_round_trips_to_same_instance() {
        let mut dict = InfoDictionary::new();
        let handle = info_dictionary_to_handle(&mut dict);
        let instance = unsafe { info_dictionary_to_instance(handle) }.expect("non-null");
        instance.insert("k".to_string(), Value::Int(1));
        assert_eq!(dict.get("k"), Some(&Value::Int(1)));
        assert!(unsafe { info_dictionary_to_instance(std::ptr::null_mut()) }.is_none());
    }
}
