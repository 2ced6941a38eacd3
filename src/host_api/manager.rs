//! Purpose: Host-facing façade over a `ManagerInterface`.
//! Exports: `Manager`.
//! Role: Turns callback-style batch calls into ordered results under a chosen error policy.
//! Invariants: Results are returned in input order whatever the callback order.
//! Invariants: Empty batches return immediately without calling the manager.
//! Invariants: Out-of-range callback indices and undelivered indices are call-level errors.
use crate::core::access::{
    DefaultEntityAccess, EntityTraitsAccess, PolicyAccess, PublishingAccess, ResolveAccess,
};
use crate::core::batch::{BatchElementError, Outcome};
use crate::core::context::ContextPtr;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::reference::EntityReference;
use crate::core::session::HostSessionPtr;
use crate::core::traits_data::{TraitSet, TraitsData};
use crate::core::value::InfoDictionary;
use crate::host_api::policy::{BatchElementErrorPolicy, ElementContext, Variant};
use crate::log::Severity;
use crate::manager_api::{Capability, ManagerInterface};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct Manager {
    manager_interface: Arc<dyn ManagerInterface>,
    host_session: HostSessionPtr,
}

/// Per-index slots filled by callbacks, plus the first index that fell outside the batch.
struct Slots<T> {
    outcomes: Vec<Option<Outcome<T>>>,
    out_of_range: Option<usize>,
}

fn collect_outcomes<T, F>(len: usize, invoke: F) -> Result<Vec<Outcome<T>>>
where
    T: Send,
    F: FnOnce(&(dyn Fn(usize, T) + Sync), &(dyn Fn(usize, BatchElementError) + Sync)) -> Result<()>,
{
    if len == 0 {
        return Ok(Vec::new());
    }
    let slots = Mutex::new(Slots {
        outcomes: (0..len).map(|_| None).collect(),
        out_of_range: None,
    });
    let store = |index: usize, outcome: Outcome<T>| {
        let mut slots = slots.lock().unwrap_or_else(|err| err.into_inner());
        match slots.outcomes.get_mut(index) {
            // Repeat deliveries overwrite.
            Some(slot) => *slot = Some(outcome),
            None => {
                slots.out_of_range.get_or_insert(index);
            }
        }
    };
    let on_success: &(dyn Fn(usize, T) + Sync) = &|index, value| store(index, Ok(value));
    let on_error: &(dyn Fn(usize, BatchElementError) + Sync) =
        &|index, error| store(index, Err(error));
    invoke(on_success, on_error)?;

    let slots = slots.into_inner().unwrap_or_else(|err| err.into_inner());
    if let Some(index) = slots.out_of_range {
        return Err(Error::input_validation(format!(
            "Index '{index}' out of bounds for batch size of {len}"
        )));
    }
    slots
        .outcomes
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.ok_or_else(|| {
                Error::new(ErrorKind::Unhandled).with_message(format!(
                    "Manager returned without a result for index {index} of {len}"
                ))
            })
        })
        .collect()
}

fn check_parallel_lengths(references: usize, traits: usize, what: &str) -> Result<()> {
    if references == traits {
        return Ok(());
    }
    Err(Error::input_validation(format!(
        "Parameter lists must be of the same length: {references} entity references vs. {traits} {what}."
    )))
}

impl Manager {
    pub fn new(manager_interface: Arc<dyn ManagerInterface>, host_session: HostSessionPtr) -> Self {
        Self {
            manager_interface,
            host_session,
        }
    }

    pub fn host_session(&self) -> &HostSessionPtr {
        &self.host_session
    }

    pub fn identifier(&self) -> Result<String> {
        self.manager_interface.identifier()
    }

    pub fn display_name(&self) -> Result<String> {
        self.manager_interface.display_name()
    }

    pub fn info(&self) -> Result<InfoDictionary> {
        self.manager_interface.info()
    }

    pub fn settings(&self) -> Result<InfoDictionary> {
        self.manager_interface.settings(&self.host_session)
    }

    pub fn initialize(&self, settings: InfoDictionary) -> Result<()> {
        self.host_session.log(
            Severity::DebugApi,
            &format!("initialize: {} setting(s)", settings.len()),
        );
        self.manager_interface.initialize(settings, &self.host_session)
    }

    pub fn has_capability(&self, capability: Capability) -> Result<bool> {
        self.manager_interface.has_capability(capability)
    }

    pub fn management_policy(
        &self,
        trait_sets: &[TraitSet],
        access: PolicyAccess,
        context: &ContextPtr,
    ) -> Result<Vec<TraitsData>> {
        self.manager_interface
            .management_policy(trait_sets, access, context, &self.host_session)
    }

    pub fn is_entity_reference_string(&self, some_string: &str) -> Result<bool> {
        self.manager_interface
            .is_entity_reference_string(some_string, &self.host_session)
    }

    pub fn entity_exists<P: BatchElementErrorPolicy>(
        &self,
        entity_references: &[EntityReference],
        context: &ContextPtr,
        _policy: P,
    ) -> Result<P::Batch<bool>> {
        self.log_call("entityExists", entity_references.len());
        let outcomes = collect_outcomes(entity_references.len(), |on_success, on_error| {
            self.manager_interface.entity_exists(
                entity_references,
                context,
                &self.host_session,
                on_success,
                on_error,
            )
        })?;
        P::finish_batch(outcomes, element_context(None, entity_references))
    }

    pub fn entity_exists_one<P: BatchElementErrorPolicy>(
        &self,
        entity_reference: &EntityReference,
        context: &ContextPtr,
        _policy: P,
    ) -> Result<P::Single<bool>> {
        let references = std::slice::from_ref(entity_reference);
        let outcome = first_outcome(self.entity_exists(references, context, Variant)?)?;
        P::finish_single(outcome, element_context(None, references))
    }

    pub fn entity_traits<P: BatchElementErrorPolicy>(
        &self,
        entity_references: &[EntityReference],
        access: EntityTraitsAccess,
        context: &ContextPtr,
        _policy: P,
    ) -> Result<P::Batch<TraitSet>> {
        self.log_call("entityTraits", entity_references.len());
        let outcomes = collect_outcomes(entity_references.len(), |on_success, on_error| {
            self.manager_interface.entity_traits(
                entity_references,
                access,
                context,
                &self.host_session,
                on_success,
                on_error,
            )
        })?;
        P::finish_batch(outcomes, element_context(Some(access.name()), entity_references))
    }

    pub fn entity_traits_one<P: BatchElementErrorPolicy>(
        &self,
        entity_reference: &EntityReference,
        access: EntityTraitsAccess,
        context: &ContextPtr,
        _policy: P,
    ) -> Result<P::Single<TraitSet>> {
        let references = std::slice::from_ref(entity_reference);
        let outcome = first_outcome(self.entity_traits(references, access, context, Variant)?)?;
        P::finish_single(outcome, element_context(Some(access.name()), references))
    }

    /// One optional default reference per trait set, in input order.
    pub fn default_entity_reference<P: BatchElementErrorPolicy>(
        &self,
        trait_sets: &[TraitSet],
        access: DefaultEntityAccess,
        context: &ContextPtr,
        _policy: P,
    ) -> Result<P::Batch<Option<EntityReference>>> {
        self.host_session.log(
            Severity::DebugApi,
            &format!("defaultEntityReference: {} trait set(s)", trait_sets.len()),
        );
        let outcomes = collect_outcomes(trait_sets.len(), |on_success, on_error| {
            self.manager_interface.default_entity_reference(
                trait_sets,
                access,
                context,
                &self.host_session,
                on_success,
                on_error,
            )
        })?;
        P::finish_batch(outcomes, element_context(Some(access.name()), &[]))
    }

    pub fn default_entity_reference_one<P: BatchElementErrorPolicy>(
        &self,
        trait_set: &TraitSet,
        access: DefaultEntityAccess,
        context: &ContextPtr,
        _policy: P,
    ) -> Result<P::Single<Option<EntityReference>>> {
        let trait_sets = std::slice::from_ref(trait_set);
        let outcomes = self.default_entity_reference(trait_sets, access, context, Variant)?;
        let outcome = first_outcome(outcomes)?;
        P::finish_single(outcome, element_context(Some(access.name()), &[]))
    }

    pub fn resolve<P: BatchElementErrorPolicy>(
        &self,
        entity_references: &[EntityReference],
        trait_set: &TraitSet,
        access: ResolveAccess,
        context: &ContextPtr,
        _policy: P,
    ) -> Result<P::Batch<TraitsData>> {
        self.log_call("resolve", entity_references.len());
        let outcomes = collect_outcomes(entity_references.len(), |on_success, on_error| {
            self.manager_interface.resolve(
                entity_references,
                trait_set,
                access,
                context,
                &self.host_session,
                on_success,
                on_error,
            )
        })?;
        P::finish_batch(outcomes, element_context(Some(access.name()), entity_references))
    }

    pub fn resolve_one<P: BatchElementErrorPolicy>(
        &self,
        entity_reference: &EntityReference,
        trait_set: &TraitSet,
        access: ResolveAccess,
        context: &ContextPtr,
        _policy: P,
    ) -> Result<P::Single<TraitsData>> {
        let references = std::slice::from_ref(entity_reference);
        let outcomes = self.resolve(references, trait_set, access, context, Variant)?;
        let outcome = first_outcome(outcomes)?;
        P::finish_single(outcome, element_context(Some(access.name()), references))
    }

    pub fn preflight<P: BatchElementErrorPolicy>(
        &self,
        entity_references: &[EntityReference],
        traits_hints: &[TraitsData],
        access: PublishingAccess,
        context: &ContextPtr,
        _policy: P,
    ) -> Result<P::Batch<EntityReference>> {
        check_parallel_lengths(entity_references.len(), traits_hints.len(), "traits hints")?;
        self.log_call("preflight", entity_references.len());
        let outcomes = collect_outcomes(entity_references.len(), |on_success, on_error| {
            self.manager_interface.preflight(
                entity_references,
                traits_hints,
                access,
                context,
                &self.host_session,
                on_success,
                on_error,
            )
        })?;
        P::finish_batch(outcomes, element_context(Some(access.name()), entity_references))
    }

    pub fn preflight_one<P: BatchElementErrorPolicy>(
        &self,
        entity_reference: &EntityReference,
        traits_hint: &TraitsData,
        access: PublishingAccess,
        context: &ContextPtr,
        _policy: P,
    ) -> Result<P::Single<EntityReference>> {
        let references = std::slice::from_ref(entity_reference);
        let outcomes = self.preflight(
            references,
            std::slice::from_ref(traits_hint),
            access,
            context,
            Variant,
        )?;
        let outcome = first_outcome(outcomes)?;
        P::finish_single(outcome, element_context(Some(access.name()), references))
    }

    pub fn register<P: BatchElementErrorPolicy>(
        &self,
        entity_references: &[EntityReference],
        traits_datas: &[TraitsData],
        access: PublishingAccess,
        context: &ContextPtr,
        _policy: P,
    ) -> Result<P::Batch<EntityReference>> {
        check_parallel_lengths(entity_references.len(), traits_datas.len(), "traits datas")?;
        self.log_call("register", entity_references.len());
        let outcomes = collect_outcomes(entity_references.len(), |on_success, on_error| {
            self.manager_interface.register(
                entity_references,
                traits_datas,
                access,
                context,
                &self.host_session,
                on_success,
                on_error,
            )
        })?;
        P::finish_batch(outcomes, element_context(Some(access.name()), entity_references))
    }

    pub fn register_one<P: BatchElementErrorPolicy>(
        &self,
        entity_reference: &EntityReference,
        traits_data: &TraitsData,
        access: PublishingAccess,
        context: &ContextPtr,
        _policy: P,
    ) -> Result<P::Single<EntityReference>> {
        let references = std::slice::from_ref(entity_reference);
        let outcomes = self.register(
            references,
            std::slice::from_ref(traits_data),
            access,
            context,
            Variant,
        )?;
        let outcome = first_outcome(outcomes)?;
        P::finish_single(outcome, element_context(Some(access.name()), references))
    }

    fn log_call(&self, operation: &str, count: usize) {
        self.host_session.log(
            Severity::DebugApi,
            &format!("{operation}: {count} entity reference(s)"),
        );
    }
}

fn first_outcome<T>(outcomes: Vec<Outcome<T>>) -> Result<Outcome<T>> {
    outcomes.into_iter().next().ok_or_else(|| {
        Error::new(ErrorKind::Internal).with_message("single-item batch produced no outcome")
    })
}

fn element_context<'a>(
    access: Option<&'a str>,
    entity_references: &'a [EntityReference],
) -> ElementContext<'a> {
    ElementContext {
        access,
        entity_references,
    }
}
