/// The persisted record kept in chrome.storage.local
///
/// Everything lives in one document that is read whole and written whole.
/// Writers do not merge, so the last write wins.

use crate::error::{BoxyError, Result};
use crate::item::{ALL_ITEMS, Item, Settings, Theme};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Keys read from chrome.storage.local when loading the record
pub const STORAGE_KEYS: [&str; 5] = ["items", "folders", "theme", "settings", "archive"];

/// Root storage structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageData {
    #[serde(default, deserialize_with = "lenient_items")]
    pub items: Vec<Item>,
    #[serde(default = "default_folders")]
    pub folders: Vec<String>,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub settings: Settings,
    /// Archived items. Only read, never written back.
    #[serde(default, deserialize_with = "lenient_items", skip_serializing)]
    pub archive: Vec<Item>,
}

/// Decode an item list, dropping entries that are not valid items.
/// One bad entry must not make the whole record unreadable.
fn lenient_items<'de, D>(deserializer: D) -> std::result::Result<Vec<Item>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Entry {
        Valid(Item),
        Malformed(IgnoredAny),
    }

    let entries = Option::<Vec<Entry>>::deserialize(deserializer)?.unwrap_or_default();
    let total = entries.len();
    let items: Vec<Item> = entries
        .into_iter()
        .filter_map(|entry| match entry {
            Entry::Valid(item) => Some(item),
            Entry::Malformed(_) => None,
        })
        .collect();

    if items.len() < total {
        log::warn!("Skipped {} malformed stored items", total - items.len());
    }
    Ok(items)
}

fn default_folders() -> Vec<String> {
    vec![ALL_ITEMS.to_string()]
}

impl StorageData {
    pub fn new() -> Self {
        StorageData {
            items: Vec::new(),
            folders: default_folders(),
            theme: Theme::default(),
            settings: Settings::default(),
            archive: Vec::new(),
        }
    }

    /// Put the record back into a consistent shape after loading.
    ///
    /// The sentinel folder is restored at the front, duplicate folder names are
    /// dropped and items pointing at unknown folders move to the sentinel.
    /// Returns the number of items that were reassigned.
    pub fn repair(&mut self) -> usize {
        let mut seen = std::collections::HashSet::new();
        self.folders.retain(|f| !f.trim().is_empty() && seen.insert(f.clone()));

        if !self.folders.iter().any(|f| f == ALL_ITEMS) {
            self.folders.insert(0, ALL_ITEMS.to_string());
        }

        let mut moved = 0;
        for item in self.items.iter_mut() {
            if !self.folders.contains(&item.folder) {
                item.folder = ALL_ITEMS.to_string();
                moved += 1;
            }
        }
        moved
    }

    pub fn has_folder(&self, name: &str) -> bool {
        self.folders.iter().any(|f| f == name)
    }

    /// Insert a new item at the front (newest first)
    pub fn add_item(&mut self, item: Item) {
        self.items.insert(0, item);
    }

    pub fn remove_item(&mut self, item_id: &str) -> Option<Item> {
        let pos = self.items.iter().position(|i| i.id == item_id)?;
        Some(self.items.remove(pos))
    }

    pub fn get_item(&self, item_id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == item_id)
    }

    pub fn get_item_mut(&mut self, item_id: &str) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| i.id == item_id)
    }

    /// Look an id up among active items first, then archived ones
    pub fn find_any(&self, item_id: &str) -> Option<&Item> {
        self.items
            .iter()
            .chain(self.archive.iter())
            .find(|i| i.id == item_id)
    }

    /// Remove every item, returning the ids that were removed
    pub fn clear_items(&mut self) -> Vec<String> {
        self.items.drain(..).map(|i| i.id).collect()
    }

    pub fn create_folder(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BoxyError::EmptyFolderName);
        }
        if self.has_folder(name) {
            return Err(BoxyError::DuplicateFolder(name.to_string()));
        }

        self.folders.push(name.to_string());
        Ok(())
    }

    /// Delete a folder and move its items to the sentinel folder.
    /// Returns how many items were moved.
    pub fn delete_folder(&mut self, name: &str) -> Result<usize> {
        if name == ALL_ITEMS {
            return Err(BoxyError::ProtectedFolder);
        }
        if !self.has_folder(name) {
            return Err(BoxyError::FolderNotFound(name.to_string()));
        }

        let mut moved = 0;
        for item in self.items.iter_mut().filter(|i| i.folder == name) {
            item.folder = ALL_ITEMS.to_string();
            moved += 1;
        }
        self.folders.retain(|f| f != name);
        Ok(moved)
    }

    /// Resolve a folder choice to one that exists
    pub fn resolve_folder(&self, name: &str) -> String {
        if self.has_folder(name) {
            name.to_string()
        } else {
            ALL_ITEMS.to_string()
        }
    }
}

impl Default for StorageData {
    fn default() -> Self {
        Self::new()
    }
}
