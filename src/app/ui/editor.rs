use std::collections::HashSet;

use eframe::egui::{self, RichText, Ui};

use crate::catalog::{AssetStore, CatalogError, Entity, Relationship};

use super::super::ViewModel;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
enum EditorMode {
    #[default]
    Closed,
    Adding,
    /// The name is the key and cannot change while editing.
    Editing(String),
}

/// Add/edit form state for one asset.
#[derive(Clone, Debug, Default)]
pub(in crate::app) struct EditorState {
    mode: EditorMode,
    name: String,
    description: String,
    uses: HashSet<String>,
    existing: Vec<Relationship>,
    error: Option<String>,
}

impl EditorState {
    pub(in crate::app) fn is_open(&self) -> bool {
        self.mode != EditorMode::Closed
    }

    pub(in crate::app) fn start_add(&mut self) {
        *self = Self {
            mode: EditorMode::Adding,
            ..Self::default()
        };
    }

    pub(in crate::app) fn start_edit(&mut self, entity: &Entity) {
        *self = Self {
            mode: EditorMode::Editing(entity.name.clone()),
            name: entity.name.clone(),
            description: entity.description.clone(),
            uses: entity.relationship_names().map(str::to_owned).collect(),
            existing: entity.relationships.clone(),
            error: None,
        };
    }

    pub(in crate::app) fn close(&mut self) {
        *self = Self::default();
    }

    fn set_uses(&mut self, name: &str, used: bool) {
        if used {
            self.uses.insert(name.to_owned());
        } else {
            self.uses.remove(name);
        }
    }

    /// The entity the form describes. Relationships follow catalog order and
    /// keep any description they already had.
    fn to_entity(&self, entities: &[Entity]) -> Entity {
        let name = match &self.mode {
            EditorMode::Editing(name) => name.clone(),
            _ => self.name.trim().to_owned(),
        };

        let relationships = entities
            .iter()
            .filter(|entity| entity.name != name && self.uses.contains(&entity.name))
            .map(|entity| {
                self.existing
                    .iter()
                    .find(|relationship| relationship.name == entity.name)
                    .cloned()
                    .unwrap_or_else(|| Relationship::to(entity.name.as_str()))
            })
            .collect();

        Entity {
            name,
            description: self.description.trim().to_owned(),
            relationships,
        }
    }

    /// Writes the form into `store` and closes it. On error the form stays
    /// open with the message set.
    pub(in crate::app) fn submit(&mut self, store: &mut AssetStore) -> Result<String, CatalogError> {
        let entity = self.to_entity(store.entities());
        let name = entity.name.clone();

        let result = match self.mode {
            EditorMode::Closed => return Ok(name),
            EditorMode::Adding => store.add(entity),
            EditorMode::Editing(_) => store.update(entity),
        };

        match result {
            Ok(()) => {
                tracing::info!(asset = %name, "asset saved");
                self.close();
                Ok(name)
            }
            Err(error) => {
                self.error = Some(error.to_string());
                Err(error)
            }
        }
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_editor(&mut self, ui: &mut Ui) {
        if !self.editor.is_open() {
            if ui.button("Add asset").clicked() {
                self.editor.start_add();
            }
            return;
        }

        let heading = match &self.editor.mode {
            EditorMode::Editing(name) => format!("Edit {name}"),
            _ => "New asset".to_owned(),
        };
        ui.label(RichText::new(heading).strong());

        ui.label("Name");
        if matches!(self.editor.mode, EditorMode::Editing(_)) {
            ui.add_enabled(false, egui::TextEdit::singleline(&mut self.editor.name))
                .on_disabled_hover_text("Names identify assets and cannot be changed.");
        } else {
            ui.text_edit_singleline(&mut self.editor.name);
        }

        ui.label("Description");
        ui.text_edit_multiline(&mut self.editor.description);

        ui.label("Uses data from");
        let own_name = self.editor.name.trim().to_owned();
        egui::ScrollArea::vertical()
            .id_salt("editor_relationships_scroll")
            .max_height(180.0)
            .show(ui, |ui| {
                for entity in self.store.entities() {
                    if entity.name == own_name {
                        continue;
                    }
                    let mut used = self.editor.uses.contains(&entity.name);
                    if ui.checkbox(&mut used, entity.name.as_str()).changed() {
                        self.editor.set_uses(&entity.name, used);
                    }
                }
            });

        if let Some(error) = &self.editor.error {
            ui.colored_label(ui.visuals().error_fg_color, error.as_str());
        }

        ui.horizontal(|ui| {
            if ui.button("Save").clicked()
                && let Ok(name) = self.editor.submit(&mut self.store)
            {
                self.mode.refresh(self.store.entities());
                self.status = Some(format!("Saved {name}"));
            }
            if ui.button("Cancel").clicked() {
                self.editor.close();
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample_entities;

    fn store() -> AssetStore {
        AssetStore::new(sample_entities()).expect("sample is valid")
    }

    #[test]
    fn adding_emits_relationships_in_catalog_order() {
        let mut store = store();
        let mut editor = EditorState::default();
        editor.start_add();
        editor.name = "  Data Asset 6 ".to_owned();
        editor.description = "joined".to_owned();
        editor.set_uses("Data Asset 4", true);
        editor.set_uses("Data Asset 1", true);

        assert_eq!(editor.submit(&mut store), Ok("Data Asset 6".to_owned()));
        assert!(!editor.is_open());

        let added = store.get("Data Asset 6").expect("added");
        assert_eq!(
            added.relationship_names().collect::<Vec<_>>(),
            vec!["Data Asset 1", "Data Asset 4"]
        );
    }

    #[test]
    fn editing_keeps_the_name() {
        let mut store = store();
        let mut editor = EditorState::default();
        editor.start_edit(store.get("Data Asset 3").expect("present"));
        editor.name = "Renamed".to_owned();
        editor.set_uses("Data Asset 2", false);

        assert_eq!(editor.submit(&mut store), Ok("Data Asset 3".to_owned()));
        assert!(store.get("Renamed").is_none());
        let edited = store.get("Data Asset 3").expect("present");
        assert_eq!(edited.relationship_names().collect::<Vec<_>>(), vec!["Data Asset 1"]);
    }

    #[test]
    fn failed_submit_keeps_the_form_open() {
        let mut store = store();
        let mut editor = EditorState::default();
        editor.start_add();
        editor.name = "Data Asset 2".to_owned();

        assert_eq!(
            editor.submit(&mut store),
            Err(CatalogError::DuplicateName("Data Asset 2".to_owned()))
        );
        assert!(editor.is_open());
        assert!(editor.error.is_some());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn self_reference_is_never_emitted() {
        let mut editor = EditorState::default();
        editor.start_add();
        editor.name = "loop".to_owned();
        editor.set_uses("loop", true);
        let entities = vec![Entity::new("loop", "")];
        assert!(editor.to_entity(&entities).relationships.is_empty());
    }
}
