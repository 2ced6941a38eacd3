//! Purpose: Reference in-process manager that serves entities described in its settings.
//! Exports: `SimpleManager`, `IDENTIFIER`, setting key constants.
//! Role: Default manager for the CLI and a fixture for exercising the façade end to end.
//! Invariants: Only read access is supported for resolution and policy queries.
//! Invariants: Capabilities outside the advertised set fall back to not-implemented.
//! Notes: `read_traits` rows are `entity,trait,key,value`; values are typed on load.
//! Notes: The default entity for a trait set is the first entity, by reference order, carrying it.
use crate::core::access::{
    DefaultEntityAccess, EntityTraitsAccess, PolicyAccess, PublishingAccess, ResolveAccess,
};
use crate::core::batch::{BatchElementError, BatchElementErrorCode};
use crate::core::context::ContextPtr;
use crate::core::error::{Error, Result};
use crate::core::reference::EntityReference;
use crate::core::session::HostSessionPtr;
use crate::core::traits_data::{TraitSet, TraitsData};
use crate::core::value::{InfoDictionary, Value};
use crate::log::Severity;
use crate::manager_api::{
    Capability, DefaultEntityReferenceSuccessCallback, EntityTraitsSuccessCallback, ErrorCallback,
    ExistsSuccessCallback, ManagerInterface, PreflightSuccessCallback, RegisterSuccessCallback,
    ResolveSuccessCallback,
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

pub const IDENTIFIER: &str = "org.assetio.examples.manager.simple";
pub const DISPLAY_NAME: &str = "Simple Manager";

pub const SETTING_PREFIX: &str = "prefix";
pub const SETTING_CAPABILITIES: &str = "capabilities";
pub const SETTING_READ_POLICY: &str = "read_policy";
pub const SETTING_READ_TRAITS: &str = "read_traits";

pub const INFO_KEY_ENTITY_REFERENCES_MATCH_PREFIX: &str = "entityReferencesMatchPrefix";

const DEFAULT_PREFIX: &str = "simple://";

type Properties = BTreeMap<String, Value>;
type TraitProperties = BTreeMap<String, Properties>;

#[derive(Debug)]
struct State {
    settings: InfoDictionary,
    capabilities: BTreeSet<Capability>,
    entities: BTreeMap<String, TraitProperties>,
    prefix: String,
    read_policy: String,
}

impl State {
    fn new() -> Self {
        Self {
            settings: InfoDictionary::new(),
            capabilities: [
                Capability::EntityReferenceIdentification,
                Capability::ManagementPolicyQueries,
                Capability::EntityTraitIntrospection,
                Capability::Resolution,
            ]
            .into_iter()
            .collect(),
            entities: BTreeMap::new(),
            prefix: DEFAULT_PREFIX.to_string(),
            read_policy: String::new(),
        }
    }
}

#[derive(Debug)]
pub struct SimpleManager {
    state: RwLock<State>,
}

impl Default for SimpleManager {
    fn default() -> Self {
        Self::new()
    }
}

fn string_setting<'a>(settings: &'a InfoDictionary, key: &str) -> Result<Option<&'a str>> {
    match settings.get(key) {
        None => Ok(None),
        Some(Value::Str(value)) => Ok(Some(value)),
        Some(_) => Err(Error::configuration(format!(
            "SimpleManager: setting '{key}' must be a string"
        ))),
    }
}

fn parse_capabilities(csv: &str) -> Result<BTreeSet<Capability>> {
    if csv.is_empty() {
        return Ok(BTreeSet::new());
    }
    csv.split(',')
        .map(|name| {
            Capability::from_name(name).ok_or_else(|| {
                Error::configuration(format!("SimpleManager: unsupported capability: {name}"))
            })
        })
        .collect()
}

/// Type a CSV cell: integer, then float, then `true`/`false`, else the text itself.
fn parse_property_value(text: &str) -> Value {
    if let Ok(value) = text.parse::<i64>() {
        return Value::Int(value);
    }
    if let Some(value) = text.parse::<f64>().ok().filter(|value| value.is_finite()) {
        return Value::Float(value);
    }
    match text {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::Str(text.to_string()),
    }
}

fn parse_read_traits(csv: &str, entities: &mut BTreeMap<String, TraitProperties>) {
    for row in csv.lines() {
        let mut cells = row.split(',');
        let entity = cells.next().unwrap_or_default();
        let trait_id = cells.next().unwrap_or_default();
        let key = cells.next().unwrap_or_default();
        let value = cells.next().unwrap_or_default();
        let properties = entities
            .entry(entity.to_string())
            .or_default()
            .entry(trait_id.to_string())
            .or_default();
        if !key.is_empty() {
            properties.insert(key.to_string(), parse_property_value(value));
        }
    }
}

impl SimpleManager {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::new()),
        }
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(|err| err.into_inner())
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(|err| err.into_inner())
    }

    fn enabled(&self, capability: Capability) -> bool {
        self.read_state().capabilities.contains(&capability)
    }
}

fn fail_all(count: usize, on_error: ErrorCallback<'_>, code: BatchElementErrorCode, message: &str) {
    for index in 0..count {
        on_error(index, BatchElementError::new(code, message));
    }
}

impl ManagerInterface for SimpleManager {
    fn identifier(&self) -> Result<String> {
        Ok(IDENTIFIER.to_string())
    }

    fn display_name(&self) -> Result<String> {
        Ok(DISPLAY_NAME.to_string())
    }

    fn info(&self) -> Result<InfoDictionary> {
        let mut info = InfoDictionary::new();
        info.insert(
            INFO_KEY_ENTITY_REFERENCES_MATCH_PREFIX.to_string(),
            Value::Str(self.read_state().prefix.clone()),
        );
        Ok(info)
    }

    fn settings(&self, _host_session: &HostSessionPtr) -> Result<InfoDictionary> {
        Ok(self.read_state().settings.clone())
    }

    /// Merge `settings` over the current ones and rebuild derived state.
    fn initialize(&self, settings: InfoDictionary, host_session: &HostSessionPtr) -> Result<()> {
        let mut state = self.write_state();
        let mut merged = state.settings.clone();
        merged.extend(settings);

        let prefix = string_setting(&merged, SETTING_PREFIX)?.map(str::to_string);
        let capabilities = string_setting(&merged, SETTING_CAPABILITIES)?
            .map(parse_capabilities)
            .transpose()?;
        let read_policy = string_setting(&merged, SETTING_READ_POLICY)?.map(str::to_string);
        let read_traits = string_setting(&merged, SETTING_READ_TRAITS)?.map(str::to_string);

        if let Some(prefix) = prefix {
            state.prefix = prefix;
        }
        if let Some(capabilities) = capabilities {
            state.capabilities = capabilities;
        }
        if let Some(read_policy) = read_policy {
            state.read_policy = read_policy;
        }
        if let Some(read_traits) = read_traits {
            parse_read_traits(&read_traits, &mut state.entities);
        }
        state.settings = merged;

        host_session.log(
            Severity::Debug,
            &format!(
                "SimpleManager: initialized with {} entities and prefix '{}'",
                state.entities.len(),
                state.prefix
            ),
        );
        Ok(())
    }

    fn has_capability(&self, capability: Capability) -> Result<bool> {
        Ok(self.enabled(capability))
    }

    fn management_policy(
        &self,
        trait_sets: &[TraitSet],
        access: PolicyAccess,
        _context: &ContextPtr,
        _host_session: &HostSessionPtr,
    ) -> Result<Vec<TraitsData>> {
        let mut policies = vec![TraitsData::new(); trait_sets.len()];
        if access != PolicyAccess::Read {
            return Ok(policies);
        }
        let state = self.read_state();
        for (trait_set, policy) in trait_sets.iter().zip(policies.iter_mut()) {
            if trait_set.is_empty() {
                continue;
            }
            let matching = state
                .entities
                .values()
                .find(|traits| trait_set.iter().all(|id| traits.contains_key(id)));
            if let Some(traits) = matching {
                for trait_id in trait_set {
                    if traits.get(trait_id).is_some_and(|props| !props.is_empty()) {
                        policy.add_trait(trait_id.clone());
                    }
                }
                if !state.read_policy.is_empty() {
                    policy.add_trait(state.read_policy.clone());
                }
            }
        }
        Ok(policies)
    }

    fn is_entity_reference_string(
        &self,
        some_string: &str,
        _host_session: &HostSessionPtr,
    ) -> Result<bool> {
        Ok(some_string.starts_with(self.read_state().prefix.as_str()))
    }

    fn entity_exists(
        &self,
        entity_references: &[EntityReference],
        _context: &ContextPtr,
        _host_session: &HostSessionPtr,
        on_success: ExistsSuccessCallback<'_>,
        _on_error: ErrorCallback<'_>,
    ) -> Result<()> {
        if !self.enabled(Capability::ExistenceQueries) {
            return Err(Error::not_implemented("entityExists requires existenceQueries"));
        }
        let state = self.read_state();
        for (index, reference) in entity_references.iter().enumerate() {
            on_success(index, state.entities.contains_key(reference.as_str()));
        }
        Ok(())
    }

    fn entity_traits(
        &self,
        entity_references: &[EntityReference],
        access: EntityTraitsAccess,
        _context: &ContextPtr,
        _host_session: &HostSessionPtr,
        on_success: EntityTraitsSuccessCallback<'_>,
        on_error: ErrorCallback<'_>,
    ) -> Result<()> {
        if !self.enabled(Capability::EntityTraitIntrospection) {
            return Err(Error::not_implemented(
                "entityTraits requires entityTraitIntrospection",
            ));
        }
        if access != EntityTraitsAccess::Read {
            fail_all(
                entity_references.len(),
                on_error,
                BatchElementErrorCode::EntityAccessError,
                "Entity access is read-only",
            );
            return Ok(());
        }
        let state = self.read_state();
        for (index, reference) in entity_references.iter().enumerate() {
            match state.entities.get(reference.as_str()) {
                Some(traits) => on_success(index, traits.keys().cloned().collect()),
                None => on_error(
                    index,
                    BatchElementError::new(
                        BatchElementErrorCode::EntityResolutionError,
                        "Entity not found",
                    ),
                ),
            }
        }
        Ok(())
    }

    fn default_entity_reference(
        &self,
        trait_sets: &[TraitSet],
        access: DefaultEntityAccess,
        _context: &ContextPtr,
        _host_session: &HostSessionPtr,
        on_success: DefaultEntityReferenceSuccessCallback<'_>,
        on_error: ErrorCallback<'_>,
    ) -> Result<()> {
        if !self.enabled(Capability::DefaultEntityReferences) {
            return Err(Error::not_implemented(
                "defaultEntityReference requires defaultEntityReferences",
            ));
        }
        if access != DefaultEntityAccess::Read {
            fail_all(
                trait_sets.len(),
                on_error,
                BatchElementErrorCode::EntityAccessError,
                "Entity access is read-only",
            );
            return Ok(());
        }
        let state = self.read_state();
        for (index, trait_set) in trait_sets.iter().enumerate() {
            if trait_set.is_empty() {
                on_error(
                    index,
                    BatchElementError::new(
                        BatchElementErrorCode::InvalidTraitSet,
                        "Trait set is empty",
                    ),
                );
                continue;
            }
            let default = state
                .entities
                .iter()
                .find(|(_, traits)| trait_set.iter().all(|id| traits.contains_key(id)))
                .map(|(reference, _)| EntityReference::new(reference.clone()));
            on_success(index, default);
        }
        Ok(())
    }

    fn resolve(
        &self,
        entity_references: &[EntityReference],
        trait_set: &TraitSet,
        access: ResolveAccess,
        _context: &ContextPtr,
        _host_session: &HostSessionPtr,
        on_success: ResolveSuccessCallback<'_>,
        on_error: ErrorCallback<'_>,
    ) -> Result<()> {
        if !self.enabled(Capability::Resolution) {
            return Err(Error::not_implemented("resolve requires resolution"));
        }
        if access != ResolveAccess::Read {
            fail_all(
                entity_references.len(),
                on_error,
                BatchElementErrorCode::EntityAccessError,
                "Entity access is read-only",
            );
            return Ok(());
        }
        let state = self.read_state();
        for (index, reference) in entity_references.iter().enumerate() {
            let Some(traits) = state.entities.get(reference.as_str()) else {
                on_error(
                    index,
                    BatchElementError::new(
                        BatchElementErrorCode::EntityResolutionError,
                        "Entity not found",
                    ),
                );
                continue;
            };
            let mut data = TraitsData::new();
            for trait_id in trait_set {
                if let Some(properties) = traits.get(trait_id) {
                    for (key, value) in properties {
                        data.set_trait_property(trait_id.clone(), key.clone(), value.clone());
                    }
                }
            }
            on_success(index, data);
        }
        Ok(())
    }

    fn preflight(
        &self,
        entity_references: &[EntityReference],
        _traits_hints: &[TraitsData],
        _access: PublishingAccess,
        _context: &ContextPtr,
        _host_session: &HostSessionPtr,
        on_success: PreflightSuccessCallback<'_>,
        _on_error: ErrorCallback<'_>,
    ) -> Result<()> {
        if !self.enabled(Capability::Publishing) {
            return Err(Error::not_implemented("preflight requires publishing"));
        }
        for (index, reference) in entity_references.iter().enumerate() {
            on_success(index, reference.clone());
        }
        Ok(())
    }

    fn register(
        &self,
        entity_references: &[EntityReference],
        traits_datas: &[TraitsData],
        _access: PublishingAccess,
        _context: &ContextPtr,
        _host_session: &HostSessionPtr,
        on_success: RegisterSuccessCallback<'_>,
        _on_error: ErrorCallback<'_>,
    ) -> Result<()> {
        if !self.enabled(Capability::Publishing) {
            return Err(Error::not_implemented("register requires publishing"));
        }
        let mut state = self.write_state();
        for (index, (reference, data)) in entity_references.iter().zip(traits_datas).enumerate() {
            let traits = state.entities.entry(reference.as_str().to_string()).or_default();
            for trait_id in data.trait_set() {
                let properties = traits.entry(trait_id.clone()).or_default();
                for key in data.trait_property_keys(&trait_id) {
                    if let Some(value) = data.get_trait_property(&trait_id, &key) {
                        properties.insert(key, value.clone());
                    }
                }
            }
            on_success(index, reference.clone());
        }
        Ok(())
    }
}
