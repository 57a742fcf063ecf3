/// Item list operations: filtering, folder counts, grouping, stale scan

use crate::item::{ALL_ITEMS, Item, ItemType, MS_PER_DAY};

/// Tab selected in the popup header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TabFilter {
    #[default]
    All,
    Type(ItemType),
    Folders,
}

impl TabFilter {
    pub const TABS: [TabFilter; 6] = [
        TabFilter::All,
        TabFilter::Type(ItemType::Article),
        TabFilter::Type(ItemType::Image),
        TabFilter::Type(ItemType::Video),
        TabFilter::Type(ItemType::Text),
        TabFilter::Folders,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TabFilter::All => "All",
            TabFilter::Type(t) => t.label(),
            TabFilter::Folders => "Folders",
        }
    }

    fn accepts(&self, item: &Item) -> bool {
        match self {
            TabFilter::All | TabFilter::Folders => true,
            TabFilter::Type(t) => item.kind == *t,
        }
    }
}

/// Compute the visible items: folder ∩ type ∩ case-insensitive search on name or note.
///
/// `folder` of `None` means no folder restriction.
pub fn visible_items<'a>(
    items: &'a [Item],
    folder: Option<&str>,
    tab: TabFilter,
    query: &str,
) -> Vec<&'a Item> {
    let query = query.trim().to_lowercase();

    items
        .iter()
        .filter(|item| folder.map_or(true, |f| item.folder == f))
        .filter(|item| tab.accepts(item))
        .filter(|item| {
            query.is_empty()
                || item.name.to_lowercase().contains(&query)
                || item.note.to_lowercase().contains(&query)
        })
        .collect()
}

/// Item count per folder, in folder order. The sentinel counts every item.
pub fn folder_counts(folders: &[String], items: &[Item]) -> Vec<(String, usize)> {
    folders
        .iter()
        .map(|folder| {
            let count = if folder == ALL_ITEMS {
                items.len()
            } else {
                items.iter().filter(|i| &i.folder == folder).count()
            };
            (folder.clone(), count)
        })
        .collect()
}

/// Group items by their folder, groups ordered by first appearance
pub fn group_by_folder(items: &[Item]) -> Vec<(String, Vec<&Item>)> {
    let mut groups: Vec<(String, Vec<&Item>)> = Vec::new();

    for item in items {
        match groups.iter_mut().find(|(folder, _)| *folder == item.folder) {
            Some((_, members)) => members.push(item),
            None => groups.push((item.folder.clone(), vec![item])),
        }
    }

    groups
}

/// Items not touched for more than `cleanup_days` days
pub fn stale_items(items: &[Item], now: f64, cleanup_days: u32) -> Vec<&Item> {
    let cutoff = now - f64::from(cleanup_days) * MS_PER_DAY;
    items.iter().filter(|item| item.accessed < cutoff).collect()
}
