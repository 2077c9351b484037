//! The editing session: one owned aggregate holding the live layout, its
//! history, the saved designs and the cached generated code.

use crate::catalog::Catalog;
use crate::codegen;
use crate::error::Result;
use crate::history::History;
use crate::ident::{ComponentId, IdGenerator};
use crate::layout::{ComponentNode, LayoutState, PropertyUpdate, Region};
use crate::persistence::{DesignLibrary, KeyValueStore, SavedDesign};
use crate::value::PropValue;
use chrono::Utc;

pub const DEFAULT_DESIGN_NAME: &str = "New Design";

pub struct Builder<S: KeyValueStore> {
    catalog: Catalog,
    layout: LayoutState,
    history: History,
    ids: IdGenerator,
    designs: DesignLibrary<S>,
    selected: Option<ComponentId>,
    /// Name shown for the design being edited; set by save and load
    design_name: String,
    // Cached generated code
    generated: String,
}

impl<S: KeyValueStore> Builder<S> {
    pub fn new(catalog: Catalog, store: S) -> Self {
        Self::with_parts(catalog, store, History::new(), IdGenerator::new())
    }

    /// Build a session from explicit parts. Ids already used by saved
    /// designs are reserved in `ids`.
    pub fn with_parts(catalog: Catalog, store: S, history: History, mut ids: IdGenerator) -> Self {
        let designs = DesignLibrary::open(store);
        for design in designs.list() {
            ids.reserve(&design.id);
            for id in design.layout.ids() {
                ids.reserve(id);
            }
        }
        let layout = LayoutState::new();
        let generated = codegen::generate(&layout);
        Self {
            catalog,
            layout,
            history,
            ids,
            designs,
            selected: None,
            design_name: DEFAULT_DESIGN_NAME.to_owned(),
            generated,
        }
    }

    pub fn set_design_name(&mut self, name: impl Into<String>) {
        self.design_name = name.into();
    }

    pub fn design_name(&self) -> &str {
        &self.design_name
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn layout(&self) -> &LayoutState {
        &self.layout
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Generated code for the live layout.
    pub fn generated(&self) -> &str {
        &self.generated
    }

    /// Record `pre_image` for undo after a mutation went through.
    fn commit(&mut self, pre_image: LayoutState) {
        self.history.push(pre_image);
        self.regenerate();
    }

    fn regenerate(&mut self) {
        self.generated = codegen::generate(&self.layout);
    }

    /// Place a new component and select it.
    pub fn insert(
        &mut self,
        type_id: &str,
        region: Region,
        index: Option<usize>,
    ) -> Option<&ComponentNode> {
        let pre_image = self.layout.clone();
        let id = self
            .layout
            .insert(&self.catalog, &mut self.ids, type_id, region, index)?;
        self.commit(pre_image);
        self.selected = Some(id.clone());
        self.layout.find_by_id(&id)
    }

    /// Append a new child under `parent_id` and select it.
    pub fn insert_nested(&mut self, parent_id: &ComponentId, type_id: &str) -> Option<&ComponentNode> {
        let pre_image = self.layout.clone();
        let id = self
            .layout
            .insert_nested(&self.catalog, &mut self.ids, parent_id, type_id)?;
        self.commit(pre_image);
        self.selected = Some(id.clone());
        self.layout.find_by_id(&id)
    }

    pub fn find_by_id(&self, id: &ComponentId) -> Option<&ComponentNode> {
        self.layout.find_by_id(id)
    }

    pub fn update_property(
        &mut self,
        id: &ComponentId,
        key: &str,
        value: PropValue,
    ) -> Option<PropertyUpdate> {
        let pre_image = self.layout.clone();
        let update = self
            .layout
            .update_property(&self.catalog, &mut self.ids, id, key, value)?;
        self.commit(pre_image);
        Some(update)
    }

    /// Update a property from editor text, coerced by the catalog's
    /// descriptor for `key`. Keys without a descriptor are stored as text.
    ///
    /// Malformed text is an error and leaves the prior value in place.
    pub fn update_property_from_text(
        &mut self,
        id: &ComponentId,
        key: &str,
        text: &str,
    ) -> Result<Option<PropertyUpdate>> {
        let Some(node) = self.layout.find_by_id(id) else {
            tracing::debug!("update_property_from_text: no component {id}");
            return Ok(None);
        };
        let value = match self.catalog.property_type(node.type_id(), key) {
            Some(descriptor) => descriptor.coerce(key, text)?,
            None => PropValue::from(text),
        };
        Ok(self.update_property(id, key, value))
    }

    /// Remove a component with its subtree. Clears the selection when it
    /// pointed into the removed subtree.
    pub fn remove(&mut self, id: &ComponentId) -> Option<ComponentNode> {
        let pre_image = self.layout.clone();
        let removed = self.layout.remove(id)?;
        self.commit(pre_image);
        if self
            .selected
            .as_ref()
            .is_some_and(|sel| !self.layout.contains(sel))
        {
            self.selected = None;
        }
        Some(removed)
    }

    pub fn move_node(
        &mut self,
        id: &ComponentId,
        region: Region,
        to_index: usize,
        parent: Option<&ComponentId>,
    ) -> bool {
        let pre_image = self.layout.clone();
        if !self
            .layout
            .move_node(&self.catalog, id, region, to_index, parent)
        {
            return false;
        }
        self.commit(pre_image);
        true
    }

    /// Select `id`; an unknown id clears the selection.
    pub fn select(&mut self, id: &ComponentId) -> Option<&ComponentNode> {
        self.selected = self.layout.contains(id).then(|| id.clone());
        self.selected()
    }

    pub fn selected(&self) -> Option<&ComponentNode> {
        self.selected.as_ref().and_then(|id| self.layout.find_by_id(id))
    }

    /// Record the live layout in history without mutating it.
    pub fn snapshot(&mut self) {
        self.history.snapshot(&self.layout);
    }

    pub fn undo(&mut self) -> bool {
        if !self.history.undo(&mut self.layout) {
            tracing::debug!("undo: nothing to undo");
            return false;
        }
        tracing::info!("undo to history entry {}", self.history.cursor());
        self.selected = None;
        self.regenerate();
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.history.redo(&mut self.layout) {
            tracing::debug!("redo: nothing to redo");
            return false;
        }
        tracing::info!("redo to history entry {}", self.history.cursor());
        self.selected = None;
        self.regenerate();
        true
    }

    /// Forget all undo entries, e.g. after seeding a fresh session.
    pub fn reset_history(&mut self) {
        self.history.clear();
    }

    /// Store a copy of the live layout under `name`.
    pub fn save(&mut self, name: &str, description: &str) -> Result<&SavedDesign> {
        let design = SavedDesign {
            id: self.ids.next("design"),
            name: name.to_owned(),
            description: description.to_owned(),
            created_at: Utc::now(),
            layout: self.layout.clone(),
        };
        self.design_name = name.to_owned();
        let saved = self.designs.save(design)?;
        tracing::info!("saved design {} ({})", saved.name, saved.id);
        Ok(saved)
    }

    /// Replace the live layout with a saved design. The current layout is
    /// recorded in history first, so the load can be undone.
    pub fn load(&mut self, id: &ComponentId) -> bool {
        let Some(design) = self.designs.find(id).cloned() else {
            tracing::debug!("load: no saved design {id}");
            return false;
        };
        self.history.snapshot(&self.layout);
        for node_id in design.layout.ids() {
            self.ids.reserve(node_id);
        }
        self.layout = design.layout;
        self.selected = None;
        tracing::info!("loaded design {} ({})", design.name, design.id);
        self.design_name = design.name;
        self.regenerate();
        true
    }

    pub fn saved_designs(&self) -> &[SavedDesign] {
        self.designs.list()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn builder() -> Builder<MemoryStore> {
        Builder::with_parts(
            Catalog::builtin(),
            MemoryStore::default(),
            History::new(),
            IdGenerator::with_seed(42),
        )
    }

    #[test]
    fn test_insert_selects_and_regenerates() {
        let mut b = builder();
        assert_eq!(b.generated(), codegen::PLACEHOLDER);

        let id = b.insert("alert", Region::Content, None).unwrap().id().clone();
        assert_eq!(b.selected().unwrap().id(), &id);
        assert!(b.generated().contains("<Alert\n"));
        assert!(b.history().can_undo());
    }

    #[test]
    fn test_noop_mutations_leave_history_alone() {
        let mut b = builder();
        assert!(b.insert("carousel", Region::Content, None).is_none());
        assert!(b.remove(&ComponentId::from("ghost")).is_none());
        assert!(b.update_property(&ComponentId::from("ghost"), "k", PropValue::Null).is_none());
        assert!(!b.move_node(&ComponentId::from("ghost"), Region::Tools, 0, None));
        assert!(b.history().is_empty());
    }

    #[test]
    fn test_open_modal_creates_exactly_one_modal() {
        let mut b = builder();
        let button = b.insert("button", Region::Content, None).unwrap().id().clone();
        let update = b
            .update_property(&button, "onClick", PropValue::from("openModal"))
            .unwrap();

        let modals = b.layout().roots(Region::Modals);
        assert_eq!(modals.len(), 1);
        assert_eq!(update.modal.as_ref(), Some(&modals[0]));

        let modal = b.find_by_id(&modals[0]).unwrap();
        assert_eq!(modal.type_id(), "modal");
        assert_eq!(modal.props(), &b.catalog().get("modal").unwrap().default_props);

        // Wiring a second button reuses the existing dialog
        let other = b.insert("button", Region::Content, None).unwrap().id().clone();
        b.update_property(&other, "onClick", PropValue::from("openModal"));
        assert_eq!(b.layout().roots(Region::Modals).len(), 1);
    }

    #[test]
    fn test_nested_button_renders_inside_container() {
        let mut b = builder();
        let container = b.insert("container", Region::Content, None).unwrap().id().clone();
        b.insert_nested(&container, "button").unwrap();

        let code = b.generated();
        let open = code.find("<Container").unwrap();
        let button = code.find("<Button").unwrap();
        let close = code.find("</Container>").unwrap();
        assert!(open < button && button < close);
    }

    #[test]
    fn test_load_restores_saved_snapshot() {
        let mut b = builder();
        b.insert("header", Region::Content, None);
        let saved = b.save("Draft", "first pass").unwrap().clone();
        assert_eq!(b.design_name(), "Draft");

        b.insert("table", Region::Content, None);
        let header = b.layout().roots(Region::Content)[0].clone();
        b.update_property(&header, "variant", PropValue::from("h1"));
        assert_ne!(b.layout(), &saved.layout);

        assert!(b.load(&saved.id));
        assert_eq!(b.layout(), &saved.layout);
        assert!(b.selected().is_none());

        // The load itself can be undone
        assert!(b.undo());
        assert_eq!(b.layout().roots(Region::Content).len(), 2);
    }

    #[test]
    fn test_load_unknown_design() {
        let mut b = builder();
        assert!(!b.load(&ComponentId::from("design_0_0")));
        assert!(b.history().is_empty());
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut b = builder();
        b.insert("badge", Region::Content, None);
        let before = b.layout().clone();
        b.insert("spinner", Region::Content, None);
        let after = b.layout().clone();

        assert!(b.undo());
        assert_eq!(b.layout(), &before);
        assert!(b.selected().is_none());
        assert!(b.redo());
        assert_eq!(b.layout(), &after);
        assert!(!b.redo());
    }

    #[test]
    fn test_remove_clears_selection_inside_subtree() {
        let mut b = builder();
        let container = b.insert("container", Region::Content, None).unwrap().id().clone();
        b.insert_nested(&container, "input").unwrap();
        assert!(b.selected().is_some());

        b.remove(&container).unwrap();
        assert!(b.selected().is_none());
        assert!(b.layout().is_empty());
    }

    #[test]
    fn test_select() {
        let mut b = builder();
        let id = b.insert("badge", Region::Content, None).unwrap().id().clone();
        b.select(&ComponentId::from("nope"));
        assert!(b.selected().is_none());
        assert_eq!(b.select(&id).unwrap().type_id(), "badge");
    }

    #[test]
    fn test_update_from_text() {
        let mut b = builder();
        let grid = b.insert("column-layout", Region::Content, None).unwrap().id().clone();

        b.update_property_from_text(&grid, "columns", "4").unwrap();
        assert_eq!(b.find_by_id(&grid).unwrap().prop("columns"), Some(&PropValue::Number(4.0)));

        b.update_property_from_text(&grid, "label", "free text").unwrap();
        assert_eq!(
            b.find_by_id(&grid).unwrap().prop("label"),
            Some(&PropValue::from("free text"))
        );

        let missing = b
            .update_property_from_text(&ComponentId::from("ghost"), "columns", "1")
            .unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_malformed_structured_text_keeps_prior_value() {
        let mut b = builder();
        let nav = b.insert("side-navigation", Region::Navigation, None).unwrap().id().clone();
        let before = b.find_by_id(&nav).unwrap().prop("items").cloned();
        let entries = b.history().len();

        assert!(b.update_property_from_text(&nav, "items", "[{\"type\":").is_err());
        assert_eq!(b.find_by_id(&nav).unwrap().prop("items").cloned(), before);
        assert_eq!(b.history().len(), entries);
    }

    #[test]
    fn test_saved_design_ids_are_reserved_on_reopen() {
        let mut b = builder();
        b.insert("badge", Region::Content, None);
        let saved = b.save("One", "").unwrap().clone();

        let Builder { designs, .. } = b;
        let reopened = Builder::with_parts(
            Catalog::builtin(),
            designs.store().clone(),
            History::new(),
            IdGenerator::with_seed(42),
        );
        assert_eq!(reopened.saved_designs(), [saved.clone()]);
        assert!(reopened.ids.is_issued(&saved.id));
        for id in saved.layout.ids() {
            assert!(reopened.ids.is_issued(id));
        }
    }
}
