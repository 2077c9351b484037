//! Durable storage of named design snapshots.

mod store;

pub use store::{FileStore, KeyValueStore, MemoryStore};

use crate::error::Result;
use crate::ident::ComponentId;
use crate::layout::LayoutState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store key holding the whole saved-design list.
pub const DESIGNS_KEY: &str = "cloudscapeBuilderDesigns";

/// A named snapshot of the layout, independent of undo history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedDesign {
    pub id: ComponentId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub layout: LayoutState,
}

/// The saved-design list, mirrored to a [`KeyValueStore`].
///
/// Every save rewrites the whole list.
pub struct DesignLibrary<S: KeyValueStore> {
    store: S,
    designs: Vec<SavedDesign>,
}

impl<S: KeyValueStore> DesignLibrary<S> {
    /// Read the list from `store`. Missing or unreadable data yields an empty list.
    pub fn open(store: S) -> Self {
        let designs = match store.get(DESIGNS_KEY) {
            Some(raw) => match serde_json::from_str::<Vec<SavedDesign>>(&raw) {
                Ok(designs) => designs,
                Err(e) => {
                    tracing::warn!("Failed to parse saved designs: {}", e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };
        tracing::debug!("loaded {} saved designs", designs.len());
        Self { store, designs }
    }

    /// Append `design` and persist the list. The design stays in memory even
    /// when writing fails.
    pub fn save(&mut self, design: SavedDesign) -> Result<&SavedDesign> {
        self.designs.push(design);
        let json = serde_json::to_string(&self.designs)?;
        self.store.set(DESIGNS_KEY, &json)?;
        let index = self.designs.len() - 1;
        Ok(&self.designs[index])
    }

    pub fn find(&self, id: &ComponentId) -> Option<&SavedDesign> {
        self.designs.iter().find(|d| &d.id == id)
    }

    /// Saved designs, oldest first.
    pub fn list(&self) -> &[SavedDesign] {
        &self.designs
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::ident::IdGenerator;
    use crate::layout::Region;

    fn design(name: &str) -> SavedDesign {
        let catalog = Catalog::builtin();
        let mut ids = IdGenerator::with_seed(31);
        let mut layout = LayoutState::new();
        layout.insert(&catalog, &mut ids, "alert", Region::Content, None);
        SavedDesign {
            id: ids.next("design"),
            name: name.to_owned(),
            description: String::new(),
            created_at: Utc::now(),
            layout,
        }
    }

    #[test]
    fn test_open_empty_store() {
        let library = DesignLibrary::open(MemoryStore::default());
        assert!(library.list().is_empty());
    }

    #[test]
    fn test_save_persists_whole_list() {
        let mut library = DesignLibrary::open(MemoryStore::default());
        let first = library.save(design("One")).unwrap().id.clone();
        library.save(design("Two")).unwrap();

        let raw = library.store().get(DESIGNS_KEY).unwrap();
        let stored: Vec<SavedDesign> = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].name, "One");

        assert_eq!(library.find(&first).unwrap().name, "One");
    }

    #[test]
    fn test_reopen_reads_saved_designs() {
        let mut library = DesignLibrary::open(MemoryStore::default());
        let saved = library.save(design("Draft")).unwrap().clone();

        let reopened = DesignLibrary::open(library.store().clone());
        assert_eq!(reopened.list(), [saved]);
    }

    #[test]
    fn test_corrupt_data_starts_empty() {
        let mut store = MemoryStore::default();
        store.set(DESIGNS_KEY, "{ definitely not a list").unwrap();
        let library = DesignLibrary::open(store);
        assert!(library.list().is_empty());
    }
}
