//! Mutations of the component forest.
//!
//! Every operation addresses nodes by id. Unknown ids, unknown catalog types
//! and placements that would break the tree leave the state untouched and
//! report `None`/`false`.

use super::{ComponentNode, LayoutState, Region};
use crate::catalog::{Catalog, ComponentDefinition};
use crate::ident::{ComponentId, IdGenerator};
use crate::value::PropValue;

/// Property key that links a button to its dialog.
pub(crate) const MODAL_ID_KEY: &str = "modalId";
pub(crate) const OPEN_MODAL: &str = "openModal";

/// Outcome of a successful property write.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyUpdate {
    /// Dialog created because a button was wired to open one.
    pub modal: Option<ComponentId>,
}

/// Where a node hangs: top level of a region, or under a parent.
#[derive(Clone, Debug, PartialEq)]
enum Slot {
    Region(Region),
    Parent(ComponentId),
}

impl LayoutState {
    fn instantiate(
        &mut self,
        def: &ComponentDefinition,
        ids: &mut IdGenerator,
        parent: Option<ComponentId>,
    ) -> ComponentId {
        let id = ids.next(&def.id);
        let node = ComponentNode {
            id: id.clone(),
            type_id: def.id.clone(),
            props: def.default_props.clone(),
            children: Vec::new(),
            parent_id: parent,
        };
        self.nodes.insert(id.clone(), node);
        id
    }

    fn siblings_mut(&mut self, slot: &Slot) -> Option<&mut Vec<ComponentId>> {
        match slot {
            Slot::Region(region) => Some(self.regions.get_mut(*region)),
            Slot::Parent(parent) => self.nodes.get_mut(parent).map(|n| &mut n.children),
        }
    }

    fn slot_of(&self, id: &ComponentId) -> Option<Slot> {
        let node = self.nodes.get(id)?;
        match &node.parent_id {
            Some(parent) => Some(Slot::Parent(parent.clone())),
            None => Region::ALL
                .into_iter()
                .find(|r| self.regions.get(*r).contains(id))
                .map(Slot::Region),
        }
    }

    /// Unlink `id` from its sibling list; the node stays in the arena.
    fn detach(&mut self, id: &ComponentId) -> Option<Slot> {
        let slot = self.slot_of(id)?;
        let siblings = self.siblings_mut(&slot)?;
        let pos = siblings.iter().position(|c| c == id)?;
        siblings.remove(pos);
        Some(slot)
    }

    fn attach(&mut self, id: ComponentId, slot: Slot, index: Option<usize>) {
        let parent = match &slot {
            Slot::Parent(p) => Some(p.clone()),
            Slot::Region(_) => None,
        };
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent_id = parent;
        }
        if let Some(siblings) = self.siblings_mut(&slot) {
            match index {
                Some(i) if i <= siblings.len() => siblings.insert(i, id),
                _ => siblings.push(id),
            }
        }
    }

    /// Place a fresh `type_id` node at the top level of `region`.
    ///
    /// Inserts at `index` when it is within `0..=len`, otherwise appends.
    pub fn insert(
        &mut self,
        catalog: &Catalog,
        ids: &mut IdGenerator,
        type_id: &str,
        region: Region,
        index: Option<usize>,
    ) -> Option<ComponentId> {
        let Some(def) = catalog.get(type_id) else {
            tracing::debug!("insert: unknown component type {type_id}");
            return None;
        };
        let id = self.instantiate(def, ids, None);
        self.attach(id.clone(), Slot::Region(region), index);
        Some(id)
    }

    /// Append a fresh `type_id` node to the children of `parent_id`.
    ///
    /// Rejected when the parent is missing, the type is unknown, or the
    /// parent's type does not accept children.
    pub fn insert_nested(
        &mut self,
        catalog: &Catalog,
        ids: &mut IdGenerator,
        parent_id: &ComponentId,
        type_id: &str,
    ) -> Option<ComponentId> {
        let Some(parent) = self.nodes.get(parent_id) else {
            tracing::debug!("insert_nested: no parent {parent_id}");
            return None;
        };
        if !catalog.allows_nesting(&parent.type_id) {
            tracing::debug!(
                "insert_nested: {} ({}) does not accept children",
                parent_id,
                parent.type_id
            );
            return None;
        }
        let Some(def) = catalog.get(type_id) else {
            tracing::debug!("insert_nested: unknown component type {type_id}");
            return None;
        };
        let id = self.instantiate(def, ids, Some(parent_id.clone()));
        self.attach(id.clone(), Slot::Parent(parent_id.clone()), None);
        Some(id)
    }

    /// Overwrite one property. The value is not checked against the catalog.
    pub fn set_property(&mut self, id: &ComponentId, key: &str, value: PropValue) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.props.insert(key.to_owned(), value);
                true
            }
            None => {
                tracing::debug!("set_property: no component {id}");
                false
            }
        }
    }

    /// Overwrite one property, applying the button/dialog rule: wiring a
    /// button's `onClick` to `openModal` while no dialog exists creates a
    /// default dialog and links the button to it through `modalId`.
    pub fn update_property(
        &mut self,
        catalog: &Catalog,
        ids: &mut IdGenerator,
        id: &ComponentId,
        key: &str,
        value: PropValue,
    ) -> Option<PropertyUpdate> {
        let opens_modal = key == "onClick" && value.as_str() == Some(OPEN_MODAL);
        if !self.set_property(id, key, value) {
            return None;
        }

        let mut update = PropertyUpdate::default();
        let is_button = self.nodes.get(id).is_some_and(|n| n.type_id == "button");
        if opens_modal && is_button && self.roots(Region::Modals).is_empty() {
            if let Some(modal) = self.insert(catalog, ids, "modal", Region::Modals, None) {
                tracing::debug!("created dialog {modal} for button {id}");
                self.set_property(id, MODAL_ID_KEY, PropValue::String(modal.to_string()));
                update.modal = Some(modal);
            }
        }
        Some(update)
    }

    /// Remove `id` and its whole subtree. Remaining siblings keep their order.
    pub fn remove(&mut self, id: &ComponentId) -> Option<ComponentNode> {
        if self.detach(id).is_none() {
            tracing::debug!("remove: no component {id}");
            return None;
        }
        let mut stack = vec![id.clone()];
        let mut removed = None;
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                stack.extend(node.children.iter().cloned());
                if &current == id {
                    removed = Some(node);
                }
            }
        }
        removed
    }

    /// Relocate `id` (with its subtree) to `to_index` among the top-level
    /// nodes of `region`, or among the children of `parent` when given.
    ///
    /// The node is unlinked first, so `to_index` counts positions without it;
    /// an index past the end appends. Dropping a node onto itself or into its
    /// own subtree, or into a parent that does not accept children, is a no-op.
    pub fn move_node(
        &mut self,
        catalog: &Catalog,
        id: &ComponentId,
        region: Region,
        to_index: usize,
        parent: Option<&ComponentId>,
    ) -> bool {
        if !self.contains(id) {
            tracing::debug!("move: no component {id}");
            return false;
        }
        let target = match parent {
            Some(parent) => {
                let Some(parent_node) = self.nodes.get(parent) else {
                    tracing::debug!("move: no parent {parent}");
                    return false;
                };
                if self.is_ancestor_or_self(id, parent) {
                    tracing::debug!("move: {id} cannot be dropped into itself");
                    return false;
                }
                if !catalog.allows_nesting(&parent_node.type_id) {
                    tracing::debug!("move: {parent} does not accept children");
                    return false;
                }
                Slot::Parent(parent.clone())
            }
            None => Slot::Region(region),
        };

        if self.detach(id).is_none() {
            return false;
        }
        self.attach(id.clone(), target, Some(to_index));
        true
    }
}
