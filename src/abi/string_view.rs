//! Purpose: Bounded string buffers exchanged across the C boundary.
//! Exports: `StringView`, `ConstStringView`, `STRING_BUFFER_SIZE`, `assign_string_view`.
//! Role: Every string crossing the ABI travels as an explicit pointer/size pair.
//! Invariants: `size` is authoritative; buffers are never NUL-terminated by this crate.
//! Invariants: Writes truncate to `capacity` and never touch bytes past it.
use libc::c_char;
use std::ptr;

/// Size of the scratch buffers the adapter allocates per call.
pub const STRING_BUFFER_SIZE: usize = 500;

/// Mutable caller-owned buffer: `capacity` bytes at `data`, of which `size` are in use.
#[repr(C)]
#[derive(Debug)]
pub struct StringView {
    pub capacity: usize,
    pub data: *mut c_char,
    pub size: usize,
}

/// Read-only borrowed string: `size` bytes at `data`.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct ConstStringView {
    pub data: *const c_char,
    pub size: usize,
}

impl StringView {
    /// View with no storage; writes into it are silently dropped.
    pub fn empty() -> Self {
        Self {
            capacity: 0,
            data: ptr::null_mut(),
            size: 0,
        }
    }

    pub fn from_buffer(buffer: &mut [u8]) -> Self {
        Self {
            capacity: buffer.len(),
            data: buffer.as_mut_ptr().cast(),
            size: 0,
        }
    }

    /// # Safety
    /// `data` must be null or valid for reads of `capacity` bytes.
    pub unsafe fn as_bytes(&self) -> &[u8] {
        if self.data.is_null() {
            return &[];
        }
        let len = self.size.min(self.capacity);
        unsafe { std::slice::from_raw_parts(self.data.cast::<u8>(), len) }
    }

    /// # Safety
    /// Same contract as [`StringView::as_bytes`].
    pub unsafe fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(unsafe { self.as_bytes() }).into_owned()
    }
}

impl ConstStringView {
    pub fn new(value: &str) -> Self {
        Self {
            data: value.as_ptr().cast(),
            size: value.len(),
        }
    }

    /// # Safety
    /// `data` must be null or valid for reads of `size` bytes.
    pub unsafe fn as_bytes(&self) -> &[u8] {
        if self.data.is_null() {
            return &[];
        }
        unsafe { std::slice::from_raw_parts(self.data.cast::<u8>(), self.size) }
    }

    /// # Safety
    /// Same contract as [`ConstStringView::as_bytes`].
    pub unsafe fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(unsafe { self.as_bytes() }).into_owned()
    }
}

/// Copy `bytes` into `view`, truncating to its capacity; returns whether everything fit.
///
/// # Safety
/// `view.data` must be null or valid for writes of `view.capacity` bytes.
pub unsafe fn assign_string_view(view: &mut StringView, bytes: &[u8]) -> bool {
    if view.data.is_null() {
        view.size = 0;
        return bytes.is_empty();
    }
    let len = bytes.len().min(view.capacity);
    unsafe {
        ptr::copy_nonoverlapping(bytes.as_ptr(), view.data.cast::<u8>(), len);
    }
    view.size = len;
    len == bytes.len()
}
