use std::collections::HashSet;

use super::entity::validate_entity;
use super::{CatalogError, Entity};

/// Ordered in-memory catalog. Every mutation bumps `revision` so views know to rebuild.
#[derive(Clone, Debug, Default)]
pub struct AssetStore {
    entities: Vec<Entity>,
    revision: u64,
}

impl AssetStore {
    pub fn new(entities: Vec<Entity>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(entities.len());
        for entity in &entities {
            validate_entity(entity)?;
            if !seen.insert(entity.name.as_str()) {
                return Err(CatalogError::DuplicateName(entity.name.clone()));
            }
        }

        Ok(Self {
            entities,
            revision: 0,
        })
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.name == name)
    }

    pub fn add(&mut self, entity: Entity) -> Result<(), CatalogError> {
        validate_entity(&entity)?;
        if self.get(&entity.name).is_some() {
            return Err(CatalogError::DuplicateName(entity.name));
        }

        tracing::debug!(name = %entity.name, "asset added");
        self.entities.push(entity);
        self.revision = self.revision.wrapping_add(1);
        Ok(())
    }

    pub fn update(&mut self, entity: Entity) -> Result<(), CatalogError> {
        validate_entity(&entity)?;
        let slot = self
            .entities
            .iter_mut()
            .find(|existing| existing.name == entity.name)
            .ok_or_else(|| CatalogError::UnknownAsset(entity.name.clone()))?;

        tracing::debug!(name = %entity.name, "asset updated");
        *slot = entity;
        self.revision = self.revision.wrapping_add(1);
        Ok(())
    }

    /// Assets that list `name` among their relationships, in catalog order.
    pub fn users_of(&self, name: &str) -> Vec<&str> {
        self.entities
            .iter()
            .filter(|entity| entity.uses(name))
            .map(|entity| entity.name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample_entities;

    #[test]
    fn rejects_duplicates_and_self_references() {
        let duplicate = vec![Entity::new("a", ""), Entity::new("a", "again")];
        assert_eq!(
            AssetStore::new(duplicate).unwrap_err(),
            CatalogError::DuplicateName("a".to_owned())
        );

        let looped = vec![Entity::new("a", "").using(["a"])];
        assert_eq!(
            AssetStore::new(looped).unwrap_err(),
            CatalogError::SelfReference("a".to_owned())
        );
    }

    #[test]
    fn add_and_update_bump_revision() {
        let mut store = AssetStore::new(sample_entities()).expect("sample is valid");
        assert_eq!(store.revision(), 0);

        store
            .add(Entity::new("Data Asset 6", "new").using(["Data Asset 5"]))
            .expect("add");
        assert_eq!(store.revision(), 1);
        assert_eq!(store.len(), 6);

        assert_eq!(
            store.add(Entity::new("Data Asset 6", "dup")),
            Err(CatalogError::DuplicateName("Data Asset 6".to_owned()))
        );
        assert_eq!(store.add(Entity::new(" ", "")), Err(CatalogError::EmptyName));

        store
            .update(Entity::new("Data Asset 4", "changed").using(["Data Asset 1"]))
            .expect("update");
        assert_eq!(store.revision(), 2);
        assert_eq!(store.get("Data Asset 4").map(|e| e.description.as_str()), Some("changed"));

        assert_eq!(
            store.update(Entity::new("nope", "")),
            Err(CatalogError::UnknownAsset("nope".to_owned()))
        );
        assert_eq!(store.revision(), 2);
    }

    #[test]
    fn users_of_follows_catalog_order() {
        let store = AssetStore::new(sample_entities()).expect("sample is valid");
        assert_eq!(store.users_of("Data Asset 1"), vec!["Data Asset 2", "Data Asset 3"]);
        assert!(store.users_of("Data Asset 5").is_empty());
    }
}
