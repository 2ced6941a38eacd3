//! Purpose: C functions for building and reading `InfoDictionary` values through a handle.
//! Exports: `assetio_InfoDictionary_*` functions.
//! Role: Lets C managers fill the dictionary passed to their `info` suite entry.
//! Invariants: Missing keys report `OutOfRange`; wrong types report `BadVariantAccess`.
//! Invariants: String reads truncate to the out buffer and report `LengthError` when short.
use crate::abi::errors::{ErrorCode, guard};
use crate::abi::handles::{
    InfoDictionaryHandle, info_dictionary_from_handle, info_dictionary_into_handle,
    info_dictionary_to_instance,
};
use crate::abi::string_view::{ConstStringView, StringView, assign_string_view};
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::value::{InfoDictionary, Value, ValueType};
use libc::c_int;

fn usage(message: &str) -> Error {
    Error::new(ErrorKind::Usage).with_message(message)
}

fn borrow_dict<'a>(handle: InfoDictionaryHandle) -> Result<&'a mut InfoDictionary> {
    // SAFETY: handles come from `assetio_InfoDictionary_ctor` or the adapter's stack dictionary.
    unsafe { info_dictionary_to_instance(handle) }
        .ok_or_else(|| usage("InfoDictionary handle is null"))
}

fn key_string(key: ConstStringView) -> String {
    unsafe { key.to_string_lossy() }
}

fn lookup<'a>(dict: &'a InfoDictionary, key: &str) -> Result<&'a Value> {
    dict.get(key)
        .ok_or_else(|| Error::new(ErrorKind::OutOfRange).with_message("Invalid key"))
}

fn bad_type() -> Error {
    Error::new(ErrorKind::BadVariantAccess).with_message("Invalid value type")
}

fn write_out<T>(out: *mut T, value: T) -> Result<()> {
    if out.is_null() {
        return Err(usage("out is null"));
    }
    unsafe { *out = value };
    Ok(())
}

fn get_with<T>(
    error: *mut StringView,
    out: *mut T,
    handle: InfoDictionaryHandle,
    key: ConstStringView,
    extract: impl FnOnce(&Value) -> Option<T>,
) -> c_int {
    guard(error, || {
        let dict = borrow_dict(handle)?;
        let value = extract(lookup(dict, &key_string(key))?).ok_or_else(bad_type)?;
        write_out(out, value)?;
        Ok(ErrorCode::Ok)
    })
}

fn set_with(
    error: *mut StringView,
    handle: InfoDictionaryHandle,
    key: ConstStringView,
    value: Value,
) -> c_int {
    guard(error, || {
        let dict = borrow_dict(handle)?;
        dict.insert(key_string(key), value);
        Ok(ErrorCode::Ok)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn assetio_InfoDictionary_ctor(
    error: *mut StringView,
    out: *mut InfoDictionaryHandle,
) -> c_int {
    guard(error, || {
        if out.is_null() {
            return Err(usage("out is null"));
        }
        let handle = info_dictionary_into_handle(Box::new(InfoDictionary::new()));
        unsafe { *out = handle };
        Ok(ErrorCode::Ok)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn assetio_InfoDictionary_dtor(handle: InfoDictionaryHandle) {
    if handle.is_null() {
        return;
    }
    unsafe {
        drop(info_dictionary_from_handle(handle));
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn assetio_InfoDictionary_size(handle: InfoDictionaryHandle) -> usize {
    borrow_dict(handle).map(|dict| dict.len()).unwrap_or(0)
}

#[unsafe(no_mangle)]
pub extern "C" fn assetio_InfoDictionary_typeOf(
    error: *mut StringView,
    out: *mut ValueType,
    handle: InfoDictionaryHandle,
    key: ConstStringView,
) -> c_int {
    get_with(error, out, handle, key, |value| Some(value.value_type()))
}

#[unsafe(no_mangle)]
pub extern "C" fn assetio_InfoDictionary_getBool(
    error: *mut StringView,
    out: *mut bool,
    handle: InfoDictionaryHandle,
    key: ConstStringView,
) -> c_int {
    get_with(error, out, handle, key, Value::as_bool)
}

#[unsafe(no_mangle)]
pub extern "C" fn assetio_InfoDictionary_getInt(
    error: *mut StringView,
    out: *mut i64,
    handle: InfoDictionaryHandle,
    key: ConstStringView,
) -> c_int {
    get_with(error, out, handle, key, Value::as_int)
}

#[unsafe(no_mangle)]
pub extern "C" fn assetio_InfoDictionary_getFloat(
    error: *mut StringView,
    out: *mut f64,
    handle: InfoDictionaryHandle,
    key: ConstStringView,
) -> c_int {
    get_with(error, out, handle, key, Value::as_float)
}

#[unsafe(no_mangle)]
pub extern "C" fn assetio_InfoDictionary_getStr(
    error: *mut StringView,
    out: *mut StringView,
    handle: InfoDictionaryHandle,
    key: ConstStringView,
) -> c_int {
    guard(error, || {
        let dict = borrow_dict(handle)?;
        let text = lookup(dict, &key_string(key))?.as_str().ok_or_else(bad_type)?;
        // SAFETY: a non-null out view is caller-owned and valid for its capacity.
        let out = unsafe { out.as_mut() }.ok_or_else(|| usage("out is null"))?;
        if unsafe { assign_string_view(out, text.as_bytes()) } {
            Ok(ErrorCode::Ok)
        } else {
            Err(Error::new(ErrorKind::LengthError)
                .with_message("Insufficient storage for return value"))
        }
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn assetio_InfoDictionary_setBool(
    error: *mut StringView,
    handle: InfoDictionaryHandle,
    key: ConstStringView,
    value: bool,
) -> c_int {
    set_with(error, handle, key, Value::Bool(value))
}

#[unsafe(no_mangle)]
pub extern "C" fn assetio_InfoDictionary_setInt(
    error: *mut StringView,
    handle: InfoDictionaryHandle,
    key: ConstStringView,
    value: i64,
) -> c_int {
    set_with(error, handle, key, Value::Int(value))
}

#[unsafe(no_mangle)]
pub extern "C" fn assetio_InfoDictionary_setFloat(
    error: *mut StringView,
    handle: InfoDictionaryHandle,
    key: ConstStringView,
    value: f64,
) -> c_int {
    set_with(error, handle, key, Value::Float(value))
}

#[unsafe(no_mangle)]
pub extern "C" fn assetio_InfoDictionary_setStr(
    error: *mut StringView,
    handle: InfoDictionaryHandle,
    key: ConstStringView,
    value: ConstStringView,
) -> c_int {
    let value = unsafe { value.to_string_lossy() };
    set_with(error, handle, key, Value::Str(value))
}
