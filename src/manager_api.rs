//! Purpose: Capability-set interface every manager implementation provides.
//! Exports: `ManagerInterface`, `Capability`, callback aliases.
//! Role: The single seam between hosts (via the façade) and managers (native or C ABI).
//! Invariants: Batch calls fire exactly one callback per index before returning.
//! Invariants: Callbacks may fire in any order and from any thread.
//! Invariants: Unsupported operations return `ErrorKind::NotImplemented`.
use crate::core::access::{
    DefaultEntityAccess, EntityTraitsAccess, PolicyAccess, PublishingAccess, ResolveAccess,
};
use crate::core::batch::BatchElementError;
use crate::core::context::ContextPtr;
use crate::core::error::{Error, Result};
use crate::core::reference::EntityReference;
use crate::core::session::HostSessionPtr;
use crate::core::traits_data::{TraitSet, TraitsData};
use crate::core::value::InfoDictionary;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[repr(u8)]
pub enum Capability {
    EntityReferenceIdentification = 0,
    ManagementPolicyQueries = 1,
    StatefulContexts = 2,
    CustomTerminology = 3,
    Resolution = 4,
    Publishing = 5,
    RelationshipQueries = 6,
    ExistenceQueries = 7,
    DefaultEntityReferences = 8,
    EntityTraitIntrospection = 9,
}

impl Capability {
    pub const ALL: [Capability; 10] = [
        Capability::EntityReferenceIdentification,
        Capability::ManagementPolicyQueries,
        Capability::StatefulContexts,
        Capability::CustomTerminology,
        Capability::Resolution,
        Capability::Publishing,
        Capability::RelationshipQueries,
        Capability::ExistenceQueries,
        Capability::DefaultEntityReferences,
        Capability::EntityTraitIntrospection,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Capability::EntityReferenceIdentification => "entityReferenceIdentification",
            Capability::ManagementPolicyQueries => "managementPolicyQueries",
            Capability::StatefulContexts => "statefulContexts",
            Capability::CustomTerminology => "customTerminology",
            Capability::Resolution => "resolution",
            Capability::Publishing => "publishing",
            Capability::RelationshipQueries => "relationshipQueries",
            Capability::ExistenceQueries => "existenceQueries",
            Capability::DefaultEntityReferences => "defaultEntityReferences",
            Capability::EntityTraitIntrospection => "entityTraitIntrospection",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|capability| capability.name() == name)
    }
}

pub type SuccessCallback<'a, T> = &'a (dyn Fn(usize, T) + Sync);
pub type ErrorCallback<'a> = &'a (dyn Fn(usize, BatchElementError) + Sync);

pub type ExistsSuccessCallback<'a> = SuccessCallback<'a, bool>;
pub type ResolveSuccessCallback<'a> = SuccessCallback<'a, TraitsData>;
pub type PreflightSuccessCallback<'a> = SuccessCallback<'a, EntityReference>;
pub type RegisterSuccessCallback<'a> = SuccessCallback<'a, EntityReference>;
pub type EntityTraitsSuccessCallback<'a> = SuccessCallback<'a, TraitSet>;
/// `None` means the manager has no default for that trait set.
pub type DefaultEntityReferenceSuccessCallback<'a> = SuccessCallback<'a, Option<EntityReference>>;

fn unsupported(operation: &str) -> Error {
    Error::not_implemented(format!("{operation} is not supported by this manager"))
}

pub trait ManagerInterface: Send + Sync {
    fn identifier(&self) -> Result<String>;

    fn display_name(&self) -> Result<String>;

    fn info(&self) -> Result<InfoDictionary> {
        Ok(InfoDictionary::new())
    }

    fn settings(&self, _host_session: &HostSessionPtr) -> Result<InfoDictionary> {
        Ok(InfoDictionary::new())
    }

    fn initialize(&self, _settings: InfoDictionary, _host_session: &HostSessionPtr) -> Result<()> {
        Err(unsupported("initialize"))
    }

    fn has_capability(&self, _capability: Capability) -> Result<bool> {
        Err(unsupported("hasCapability"))
    }

    /// One policy `TraitsData` per entry of `trait_sets`, in order.
    fn management_policy(
        &self,
        _trait_sets: &[TraitSet],
        _access: PolicyAccess,
        _context: &ContextPtr,
        _host_session: &HostSessionPtr,
    ) -> Result<Vec<TraitsData>> {
        Err(unsupported("managementPolicy"))
    }

    fn is_entity_reference_string(
        &self,
        _some_string: &str,
        _host_session: &HostSessionPtr,
    ) -> Result<bool> {
        Err(unsupported("isEntityReferenceString"))
    }

    fn entity_exists(
        &self,
        _entity_references: &[EntityReference],
        _context: &ContextPtr,
        _host_session: &HostSessionPtr,
        _on_success: ExistsSuccessCallback<'_>,
        _on_error: ErrorCallback<'_>,
    ) -> Result<()> {
        Err(unsupported("entityExists"))
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
        Err(unsupported("entityTraits"))
    }

    /// Batched over trait sets rather than references; one callback per trait set.
    fn default_entity_reference(
        &self,
        _trait_sets: &[TraitSet],
        _access: DefaultEntityAccess,
        _context: &ContextPtr,
        _host_session: &HostSessionPtr,
        _on_success: DefaultEntityReferenceSuccessCallback<'_>,
        _on_error: ErrorCallback<'_>,
    ) -> Result<()> {
        Err(unsupported("defaultEntityReference"))
    }

    #[allow(clippy::too_many_arguments)]
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
        Err(unsupported("resolve"))
    }

    #[allow(clippy::too_many_arguments)]
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
        Err(unsupported("preflight"))
    }

    #[allow(clippy::too_many_arguments)]
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
        Err(unsupported("register"))
    }
}
