use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl Relationship {
    pub fn to(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
        }
    }
}

/// A named data asset. `relationships` lists the assets this one uses data from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl Entity {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            relationships: Vec::new(),
        }
    }

    pub fn using<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relationships
            .extend(names.into_iter().map(Relationship::to));
        self
    }

    pub fn uses(&self, name: &str) -> bool {
        self.relationships
            .iter()
            .any(|relationship| relationship.name == name)
    }

    pub fn relationship_names(&self) -> impl Iterator<Item = &str> {
        self.relationships
            .iter()
            .map(|relationship| relationship.name.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("asset name must not be empty")]
    EmptyName,
    #[error("an asset named '{0}' already exists")]
    DuplicateName(String),
    #[error("asset '{0}' cannot use data from itself")]
    SelfReference(String),
    #[error("no asset named '{0}'")]
    UnknownAsset(String),
}

pub(super) fn validate_entity(entity: &Entity) -> Result<(), CatalogError> {
    if entity.name.trim().is_empty() {
        return Err(CatalogError::EmptyName);
    }

    if entity.uses(&entity.name) {
        return Err(CatalogError::SelfReference(entity.name.clone()));
    }

    Ok(())
}
