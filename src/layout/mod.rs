//! The component forest: placed widgets, organized by layout region.
//!
//! Nodes live in an arena keyed by [`ComponentId`]. Each node lists its
//! children by id and keeps a back-reference to its parent; the top-level
//! nodes of every region are listed separately. Snapshots for undo/redo are
//! plain clones of [`LayoutState`].

mod edit;

pub use edit::PropertyUpdate;
pub(crate) use edit::{MODAL_ID_KEY, OPEN_MODAL};

use crate::error::BuilderError;
use crate::ident::ComponentId;
use crate::value::{PropValue, Properties};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Named slot of the page layout. `Modals` is the auxiliary dialog list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Navigation,
    Content,
    Tools,
    Notifications,
    Breadcrumbs,
    Modals,
}

impl Region {
    /// Search order used by lookups and walks.
    pub const ALL: [Region; 6] = [
        Region::Navigation,
        Region::Content,
        Region::Tools,
        Region::Notifications,
        Region::Breadcrumbs,
        Region::Modals,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Region::Navigation => "navigation",
            Region::Content => "content",
            Region::Tools => "tools",
            Region::Notifications => "notifications",
            Region::Breadcrumbs => "breadcrumbs",
            Region::Modals => "modals",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = BuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "navigation" => Ok(Region::Navigation),
            "content" => Ok(Region::Content),
            "tools" => Ok(Region::Tools),
            "notifications" => Ok(Region::Notifications),
            "breadcrumbs" => Ok(Region::Breadcrumbs),
            "modal" | "modals" => Ok(Region::Modals),
            _ => Err(BuilderError::UnknownRegion(s.to_owned())),
        }
    }
}

/// A placed widget instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentNode {
    pub(crate) id: ComponentId,
    #[serde(rename = "type")]
    pub(crate) type_id: String,
    pub(crate) props: Properties,
    #[serde(default)]
    pub(crate) children: Vec<ComponentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) parent_id: Option<ComponentId>,
}

impl ComponentNode {
    pub fn id(&self) -> &ComponentId {
        &self.id
    }

    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    pub fn props(&self) -> &Properties {
        &self.props
    }

    pub fn prop(&self, key: &str) -> Option<&PropValue> {
        self.props.get(key)
    }

    pub fn children(&self) -> &[ComponentId] {
        &self.children
    }

    pub fn parent_id(&self) -> Option<&ComponentId> {
        self.parent_id.as_ref()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct Roots {
    navigation: Vec<ComponentId>,
    content: Vec<ComponentId>,
    tools: Vec<ComponentId>,
    notifications: Vec<ComponentId>,
    breadcrumbs: Vec<ComponentId>,
    modals: Vec<ComponentId>,
}

impl Roots {
    fn get(&self, region: Region) -> &Vec<ComponentId> {
        match region {
            Region::Navigation => &self.navigation,
            Region::Content => &self.content,
            Region::Tools => &self.tools,
            Region::Notifications => &self.notifications,
            Region::Breadcrumbs => &self.breadcrumbs,
            Region::Modals => &self.modals,
        }
    }

    fn get_mut(&mut self, region: Region) -> &mut Vec<ComponentId> {
        match region {
            Region::Navigation => &mut self.navigation,
            Region::Content => &mut self.content,
            Region::Tools => &mut self.tools,
            Region::Notifications => &mut self.notifications,
            Region::Breadcrumbs => &mut self.breadcrumbs,
            Region::Modals => &mut self.modals,
        }
    }
}

/// The whole arrangement: every region, the modal list and the node arena.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutState {
    #[serde(default)]
    regions: Roots,
    #[serde(default)]
    nodes: BTreeMap<ComponentId, ComponentNode>,
}

impl LayoutState {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when every region and the modal list are empty.
    pub fn is_empty(&self) -> bool {
        Region::ALL.iter().all(|r| self.regions.get(*r).is_empty())
    }

    /// Number of placed nodes at every depth.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains(&self, id: &ComponentId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Look a node up wherever it sits in the forest.
    ///
    /// Ids are unique across all regions and depths, so the arena lookup
    /// yields the same node a pre-order search in [`Region::ALL`] order would.
    pub fn find_by_id(&self, id: &ComponentId) -> Option<&ComponentNode> {
        self.nodes.get(id)
    }

    pub fn roots(&self, region: Region) -> &[ComponentId] {
        self.regions.get(region)
    }

    /// Top-level nodes of `region`, in order.
    pub fn region_nodes(&self, region: Region) -> impl Iterator<Item = &ComponentNode> {
        self.regions
            .get(region)
            .iter()
            .filter_map(|id| self.nodes.get(id))
    }

    /// Children of `id`, in order. Empty when `id` is unknown.
    pub fn child_nodes(&self, id: &ComponentId) -> impl Iterator<Item = &ComponentNode> {
        self.nodes
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|c| self.nodes.get(c))
    }

    /// The region whose tree contains `id`.
    pub fn region_of(&self, id: &ComponentId) -> Option<Region> {
        let root = self.root_of(id)?;
        Region::ALL
            .into_iter()
            .find(|r| self.regions.get(*r).contains(root))
    }

    fn root_of<'a>(&'a self, id: &'a ComponentId) -> Option<&'a ComponentId> {
        let mut current = self.nodes.get(id)?;
        while let Some(parent) = current.parent_id.as_ref() {
            current = self.nodes.get(parent)?;
        }
        Some(&current.id)
    }

    /// Whether `ancestor` is `id` itself or lies on its parent chain.
    pub fn is_ancestor_or_self(&self, ancestor: &ComponentId, id: &ComponentId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.nodes.get(current).and_then(|n| n.parent_id.as_ref());
        }
        false
    }

    /// Every node, depth-first pre-order, region by region.
    pub fn iter(&self) -> Preorder<'_> {
        let mut stack: Vec<&ComponentId> = Vec::new();
        for region in Region::ALL.iter().rev() {
            stack.extend(self.regions.get(*region).iter().rev());
        }
        Preorder { state: self, stack }
    }

    /// Pre-order walk of one region's trees.
    pub fn iter_region(&self, region: Region) -> Preorder<'_> {
        Preorder {
            state: self,
            stack: self.regions.get(region).iter().rev().collect(),
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = &ComponentId> {
        self.nodes.keys()
    }
}

/// Depth-first pre-order iterator over a [`LayoutState`].
pub struct Preorder<'a> {
    state: &'a LayoutState,
    stack: Vec<&'a ComponentId>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a ComponentNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            if let Some(node) = self.state.nodes.get(id) {
                self.stack.extend(node.children.iter().rev());
                return Some(node);
            }
        }
        None
    }
}
