// Opaque entity reference strings; the manager alone decides validity.
use std::fmt;

#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct EntityReference(String);

impl EntityReference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for EntityReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityReference {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for EntityReference {
    fn from(value: String) -> Self {
        Self(value)
    }
}

pub type EntityReferences = Vec<EntityReference>;
