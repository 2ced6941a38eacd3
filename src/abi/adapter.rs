//! Purpose: Native `ManagerInterface` over a C handle plus function-pointer suite.
//! Exports: `CManagerInterfaceAdapter`.
//! Role: Lets the host façade drive managers built against the C ABI.
//! Invariants: Owns the handle; `suite.dtor` runs exactly once, on drop.
//! Invariants: Strings are read from `data[..size]`; embedded NULs survive.
//! Invariants: Returned values must be UTF-8; invalid bytes are an error, never replaced.
//! Notes: Only identity and info are bridged; every other call is not implemented.
use crate::abi::errors::throw_if_error;
use crate::abi::handles::{ManagerInterfaceHandle, info_dictionary_to_handle};
use crate::abi::string_view::{STRING_BUFFER_SIZE, StringView};
use crate::abi::suite::ManagerInterfaceSuite;
use crate::core::access::{
    DefaultEntityAccess, EntityTraitsAccess, PolicyAccess, PublishingAccess, ResolveAccess,
};
use crate::core::context::ContextPtr;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::reference::EntityReference;
use crate::core::session::HostSessionPtr;
use crate::core::traits_data::{TraitSet, TraitsData};
use crate::core::value::InfoDictionary;
use crate::manager_api::{
    Capability, DefaultEntityReferenceSuccessCallback, EntityTraitsSuccessCallback, ErrorCallback,
    ExistsSuccessCallback, ManagerInterface, PreflightSuccessCallback, RegisterSuccessCallback,
    ResolveSuccessCallback,
};
use libc::c_int;

type StringGetter =
    unsafe extern "C" fn(*mut StringView, *mut StringView, ManagerInterfaceHandle) -> c_int;

fn not_implemented() -> Error {
    Error::not_implemented("Not implemented")
}

#[derive(Debug)]
pub struct CManagerInterfaceAdapter {
    handle: ManagerInterfaceHandle,
    suite: ManagerInterfaceSuite,
}

// The suite contract requires implementations to be callable from any thread.
unsafe impl Send for CManagerInterfaceAdapter {}
unsafe impl Sync for CManagerInterfaceAdapter {}

impl CManagerInterfaceAdapter {
    /// Take ownership of `handle`.
    ///
    /// # Safety
    /// `handle` must be valid for every entry of `suite` until `suite.dtor` is called,
    /// and must not be released by anyone else.
    pub unsafe fn new(handle: ManagerInterfaceHandle, suite: ManagerInterfaceSuite) -> Self {
        Self { handle, suite }
    }

    fn call_string(&self, operation: &str, getter: StringGetter) -> Result<String> {
        let mut error_buffer = [0u8; STRING_BUFFER_SIZE];
        let mut out_buffer = [0u8; STRING_BUFFER_SIZE];
        let mut error = StringView::from_buffer(&mut error_buffer);
        let mut out = StringView::from_buffer(&mut out_buffer);

        // SAFETY: both views describe live stack buffers; the handle is valid per `new`.
        let code = unsafe { getter(&mut error, &mut out, self.handle) };
        unsafe { throw_if_error(code, &error) }?;
        let bytes = unsafe { out.as_bytes() }.to_vec();
        String::from_utf8(bytes).map_err(|err| {
            Error::new(ErrorKind::Exception)
                .with_message(format!("{operation}: manager returned invalid UTF-8"))
                .with_source(err)
        })
    }
}

impl Drop for CManagerInterfaceAdapter {
    fn drop(&mut self) {
        unsafe { (self.suite.dtor)(self.handle) };
    }
}

impl ManagerInterface for CManagerInterfaceAdapter {
    fn identifier(&self) -> Result<String> {
        self.call_string("identifier", self.suite.identifier)
    }

    fn display_name(&self) -> Result<String> {
        self.call_string("displayName", self.suite.display_name)
    }

    fn info(&self) -> Result<InfoDictionary> {
        let mut info = InfoDictionary::new();
        let mut error_buffer = [0u8; STRING_BUFFER_SIZE];
        let mut error = StringView::from_buffer(&mut error_buffer);

        let code = unsafe {
            (self.suite.info)(&mut error, info_dictionary_to_handle(&mut info), self.handle)
        };
        unsafe { throw_if_error(code, &error) }?;
        Ok(info)
    }

    fn settings(&self, _host_session: &HostSessionPtr) -> Result<InfoDictionary> {
        Err(not_implemented())
    }

    fn initialize(&self, _settings: InfoDictionary, _host_session: &HostSessionPtr) -> Result<()> {
        Err(not_implemented())
    }

    fn has_capability(&self, _capability: Capability) -> Result<bool> {
        Err(not_implemented())
    }

    fn management_policy(
        &self,
        _trait_sets: &[TraitSet],
        _access: PolicyAccess,
        _context: &ContextPtr,
        _host_session: &HostSessionPtr,
    ) -> Result<Vec<TraitsData>> {
        Err(not_implemented())
    }

    fn is_entity_reference_string(
        &self,
        _some_string: &str,
        _host_session: &HostSessionPtr,
    ) -> Result<bool> {
        Err(not_implemented())
    }

    fn entity_exists(
        &self,
        _entity_references: &[EntityReference],
        _context: &ContextPtr,
        _host_session: &HostSessionPtr,
        _on_success: ExistsSuccessCallback<'_>,
        _on_error: ErrorCallback<'_>,
    ) -> Result<()> {
        Err(not_implemented())
    }

    fn entity_traits(
        &self,
        _entity_references: &[EntityReference],
        _access: EntityTraitsAccess,
        _context: &ContextPtr,
        _host_session: &HostSessionPtr,
        _on_success: EntityTraitsSuccessCallback<'_>,
        _on_error: ErrorCallback<'_>,
    ) -> Result<()> {
        Err(not_implemented())
    }

    fn default_entity_reference(
        &self,
        _trait_sets: &[TraitSet],
        _access: DefaultEntityAccess,
        _context: &ContextPtr,
        _host_session: &HostSessionPtr,
        _on_success: DefaultEntityReferenceSuccessCallback<'_>,
        _on_error: ErrorCallback<'_>,
    ) -> Result<()> {
        Err(not_implemented())
    }

    fn resolve(
        &self,
        _entity_references: &[EntityReference],
        _trait_set: &TraitSet,
        _access: ResolveAccess,
        _context: &ContextPtr,
        _host_session: &HostSessionPtr,
        _on_success: ResolveSuccessCallback<'_>,
        _on_error: ErrorCallback<'_>,
    ) -> Result<()> {
        Err(not_implemented())
    }

    fn preflight(
        &self,
        _entity_references: &[EntityReference],
        _traits_hints: &[TraitsData],
        _access: PublishingAccess,
        _context: &ContextPtr,
        _host_session: &HostSessionPtr,
        _on_success: PreflightSuccessCallback<'_>,
        _on_error: ErrorCallback<'_>,
    ) -> Result<()> {
        Err(not_implemented())
    }

    fn register(
        &self,
        _entity_references: &[EntityReference],
        _traits_datas: &[TraitsData],
        _access: PublishingAccess,
        _context: &ContextPtr,
        _host_session: &HostSessionPtr,
        _on_success: RegisterSuccessCallback<'_>,
        _on_error: ErrorCallback<'_>,
    ) -> Result<()> {
        Err(not_implemented())
    }
}
