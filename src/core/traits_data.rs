//! Purpose: Trait/property bag passed into and out of manager operations.
//! Exports: `TraitsData`, `TraitSet`, `TraitSets`, `TraitId`.
//! Role: Owned by one operation at a time; `Clone` is a deep copy.
//! Invariants: Property values are always one of the `Value` variants.
//! Invariants: Setting a property implicitly adds its trait.
use crate::core::error::{Error, Result};
use crate::core::value::Value;
use std::collections::{BTreeMap, BTreeSet};

pub type TraitId = String;
pub type TraitSet = BTreeSet<TraitId>;
pub type TraitSets = Vec<TraitSet>;

type Properties = BTreeMap<String, Value>;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TraitsData {
    data: BTreeMap<TraitId, Properties>,
}

impl TraitsData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_traits(trait_set: &TraitSet) -> Self {
        let mut data = Self::new();
        data.add_traits(trait_set);
        data
    }

    /// Deep-copy `other`; an absent source is rejected rather than yielding an empty bag.
    pub fn try_copy(other: Option<&TraitsData>) -> Result<Self> {
        other
            .cloned()
            .ok_or_else(|| Error::input_validation("Cannot copy-construct from a null TraitsData"))
    }

    pub fn trait_set(&self) -> TraitSet {
        self.data.keys().cloned().collect()
    }

    pub fn has_trait(&self, trait_id: &str) -> bool {
        self.data.contains_key(trait_id)
    }

    pub fn add_trait(&mut self, trait_id: impl Into<TraitId>) {
        self.data.entry(trait_id.into()).or_default();
    }

    pub fn add_traits(&mut self, trait_set: &TraitSet) {
        for trait_id in trait_set {
            self.add_trait(trait_id.clone());
        }
    }

    pub fn get_trait_property(&self, trait_id: &str, key: &str) -> Option<&Value> {
        self.data.get(trait_id).and_then(|properties| properties.get(key))
    }

    pub fn set_trait_property(
        &mut self,
        trait_id: impl Into<TraitId>,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) {
        self.data
            .entry(trait_id.into())
            .or_default()
            .insert(key.into(), value.into());
    }

    pub fn trait_property_keys(&self, trait_id: &str) -> BTreeSet<String> {
        self.data
            .get(trait_id)
            .map(|properties| properties.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Value {
        let traits = self
            .data
            .iter()
            .map(|(trait_id, properties)| {
                let props = properties
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect::<serde_json::Map<_, _>>();
                (trait_id.clone(), serde_json::Value::Object(props))
            })
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(traits)
    }
}
