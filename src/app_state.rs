/// Popup application state and the operations that mutate it
///
/// The popup loads the record once when it opens and renders from this struct
/// until it closes. Every mutation here is followed by a whole-record save
/// in the UI layer.

use crate::detect::DetectedContent;
use crate::error::{BoxyError, Result};
use crate::filter::{TabFilter, folder_counts, visible_items};
use crate::item::{ALL_ITEMS, Item, ItemType, MAX_NOTE_CHARS, Theme, new_item_id, truncate_chars};
use crate::reminder::{Alarms, sync_alarm};
use crate::storage::StorageData;

/// Modals that can be shown over the item list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    Save,
    Edit,
    Settings,
}

/// What was captured from the active tab for the save form
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageCapture {
    pub url: String,
    pub title: String,
    pub kind: ItemType,
    pub preview: Option<String>,
    pub snippet: String,
}

impl PageCapture {
    pub fn new(url: String, title: String, detected: DetectedContent) -> Self {
        PageCapture {
            url,
            title,
            kind: detected.kind,
            preview: detected.preview.filter(|p| !p.is_empty()),
            snippet: detected.snippet,
        }
    }

    pub fn needs_screenshot(&self) -> bool {
        self.preview.is_none()
    }
}

/// Fields of the save form
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemDraft {
    pub name: String,
    pub kind: ItemType,
    pub folder: String,
    pub note: String,
    pub alarm: Option<f64>,
}

/// Fields of the edit form
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemEdit {
    pub folder: String,
    pub note: String,
    pub alarm: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub data: StorageData,
    pub tab: TabFilter,
    /// `None` shows every folder
    pub folder: Option<String>,
    pub search: String,
    pub page_capture: Option<PageCapture>,
    pub editing: Option<String>,
    pub modal: Option<Modal>,
    /// Set when the stored record could not be read. Writing would replace it.
    pub read_only: bool,
}

impl AppState {
    pub fn new(mut data: StorageData) -> Self {
        let moved = data.repair();
        if moved > 0 {
            log::warn!("Reassigned {} items with unknown folders to {}", moved, ALL_ITEMS);
        }

        AppState {
            data,
            ..Default::default()
        }
    }

    /// Empty state used after a failed load. It refuses every persisted change.
    pub fn unavailable() -> Self {
        AppState {
            read_only: true,
            ..Default::default()
        }
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.read_only {
            return Err(BoxyError::StorageUnavailable);
        }
        Ok(())
    }

    pub fn visible(&self) -> Vec<&Item> {
        visible_items(&self.data.items, self.folder.as_deref(), self.tab, &self.search)
    }

    pub fn folder_counts(&self) -> Vec<(String, usize)> {
        folder_counts(&self.data.folders, &self.data.items)
    }

    pub fn set_tab(&mut self, tab: TabFilter) {
        self.tab = tab;
    }

    pub fn set_search(&mut self, query: &str) {
        self.search = query.to_string();
    }

    /// Pick a folder from the folder view and switch back to the item list.
    /// The sentinel folder shows every item.
    pub fn select_folder(&mut self, name: &str) {
        self.folder = (name != ALL_ITEMS && self.data.has_folder(name)).then(|| name.to_string());
        self.tab = TabFilter::All;
    }

    /// Message shown when the visible list is empty
    pub fn empty_message(&self) -> &'static str {
        if !self.search.trim().is_empty() {
            "No results found"
        } else if self.folder.is_some() {
            "Folder is empty"
        } else {
            "Your boxy is empty!"
        }
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.ensure_writable()?;
        self.data.theme = theme;
        Ok(())
    }

    pub fn set_cleanup_days(&mut self, days: u32) -> Result<()> {
        self.ensure_writable()?;
        self.data.settings.cleanup_days = days.max(1);
        Ok(())
    }

    /// Open the save form with what was detected on the active tab
    pub fn open_save(&mut self, capture: PageCapture) -> ItemDraft {
        let draft = ItemDraft {
            name: capture.title.trim().to_string(),
            kind: capture.kind,
            folder: self.folder.clone().unwrap_or_else(|| ALL_ITEMS.to_string()),
            note: truncate_chars(capture.snippet.trim(), MAX_NOTE_CHARS),
            alarm: None,
        };
        self.page_capture = Some(capture);
        self.modal = Some(Modal::Save);
        draft
    }

    pub fn close_save(&mut self) {
        self.page_capture = None;
        self.close_modal(Modal::Save);
    }

    /// Validate the draft and add the new item at the front of the list.
    /// A reminder in the future arms a timer keyed by the new id.
    pub fn create_item(&mut self, draft: ItemDraft, alarms: &impl Alarms, now: f64) -> Result<&Item> {
        self.ensure_writable()?;
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(BoxyError::EmptyName);
        }

        let (url, preview) = self
            .page_capture
            .as_ref()
            .map(|c| (c.url.clone(), c.preview.clone().unwrap_or_default()))
            .unwrap_or_default();

        let item = Item {
            id: new_item_id(now),
            kind: draft.kind,
            name: name.to_string(),
            url,
            preview,
            note: truncate_chars(draft.note.trim(), MAX_NOTE_CHARS),
            folder: self.data.resolve_folder(&draft.folder),
            created: now,
            accessed: now,
            alarm: draft.alarm,
        };

        if item.alarm.is_some() {
            sync_alarm(alarms, &item, now);
        }
        self.data.add_item(item);
        self.close_save();

        Ok(&self.data.items[0])
    }

    /// Open the edit form for an item, returning the prefilled fields
    pub fn open_edit(&mut self, item_id: &str) -> Result<ItemEdit> {
        let item = self
            .data
            .get_item(item_id)
            .ok_or_else(|| BoxyError::ItemNotFound(item_id.to_string()))?;

        let edit = ItemEdit {
            folder: item.folder.clone(),
            note: item.note.clone(),
            alarm: item.alarm,
        };
        self.editing = Some(item_id.to_string());
        self.modal = Some(Modal::Edit);
        Ok(edit)
    }

    pub fn editing_item(&self) -> Option<&Item> {
        self.editing.as_deref().and_then(|id| self.data.get_item(id))
    }

    pub fn close_edit(&mut self) {
        self.editing = None;
        self.close_modal(Modal::Edit);
    }

    /// Apply the edit form to the item being edited
    pub fn save_edit(&mut self, edit: ItemEdit, alarms: &impl Alarms, now: f64) -> Result<()> {
        let id = self
            .editing
            .clone()
            .ok_or_else(|| BoxyError::ItemNotFound(String::new()))?;
        self.edit_item(&id, edit, alarms, now)?;
        self.close_edit();
        Ok(())
    }

    /// Update folder, note and reminder of an item in place.
    /// The platform timer is rescheduled or cleared to match.
    pub fn edit_item(&mut self, item_id: &str, edit: ItemEdit, alarms: &impl Alarms, now: f64) -> Result<()> {
        self.ensure_writable()?;
        let folder = self.data.resolve_folder(&edit.folder);
        let item = self
            .data
            .get_item_mut(item_id)
            .ok_or_else(|| BoxyError::ItemNotFound(item_id.to_string()))?;

        item.folder = folder;
        item.note = truncate_chars(edit.note.trim(), MAX_NOTE_CHARS);
        item.alarm = edit.alarm;
        item.accessed = now;
        sync_alarm(alarms, item, now);
        Ok(())
    }

    /// Remove one item and cancel its reminder
    pub fn delete_item(&mut self, item_id: &str, alarms: &impl Alarms) -> Result<Item> {
        self.ensure_writable()?;
        let item = self
            .data
            .remove_item(item_id)
            .ok_or_else(|| BoxyError::ItemNotFound(item_id.to_string()))?;
        alarms.cancel(item_id);

        if self.editing.as_deref() == Some(item_id) {
            self.close_edit();
        }
        Ok(item)
    }

    /// Cancel every reminder, then remove every item. Returns how many were removed.
    pub fn delete_all(&mut self, alarms: &impl Alarms) -> Result<usize> {
        self.ensure_writable()?;
        for item in &self.data.items {
            alarms.cancel(&item.id);
        }
        let removed = self.data.clear_items().len();
        self.close_edit();
        Ok(removed)
    }

    pub fn create_folder(&mut self, name: &str) -> Result<()> {
        self.ensure_writable()?;
        self.data.create_folder(name)
    }

    /// Delete a folder, moving its items to the sentinel. Returns how many moved.
    pub fn delete_folder(&mut self, name: &str) -> Result<usize> {
        self.ensure_writable()?;
        let moved = self.data.delete_folder(name)?;
        if self.folder.as_deref() == Some(name) {
            self.folder = None;
        }
        Ok(moved)
    }

    pub fn open_settings(&mut self) {
        self.modal = Some(Modal::Settings);
    }

    pub fn close_settings(&mut self) {
        self.close_modal(Modal::Settings);
    }

    fn close_modal(&mut self, modal: Modal) {
        if self.modal == Some(modal) {
            self.modal = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminder::fake::FakeAlarms;

    const NOW: f64 = 1_700_000_000_000.0;

    fn draft(name: &str) -> ItemDraft {
        ItemDraft {
            name: name.to_string(),
            kind: ItemType::Article,
            folder: ALL_ITEMS.to_string(),
            note: String::new(),
            alarm: None,
        }
    }

    fn capture() -> PageCapture {
        PageCapture::new(
            "https://example.com/post".to_string(),
            "  A post  ".to_string(),
            DetectedContent {
                kind: ItemType::Image,
                preview: Some("data:image/jpeg;base64,xyz".to_string()),
                snippet: "A photo".to_string(),
            },
        )
    }

    fn state_with_item(alarms: &FakeAlarms, alarm: Option<f64>) -> (AppState, String) {
        let mut state = AppState::new(StorageData::new());
        let mut d = draft("Saved");
        d.alarm = alarm;
        let id = state.create_item(d, alarms, NOW).unwrap().id.clone();
        (state, id)
    }

    #[test]
    fn test_create_requires_name() {
        let alarms = FakeAlarms::default();
        let mut state = AppState::new(StorageData::new());

        assert_eq!(state.create_item(draft("   "), &alarms, NOW).err(), Some(BoxyError::EmptyName));
        assert!(state.data.items.is_empty());
    }

    #[test]
    fn test_create_uses_capture_and_prepends() {
        let alarms = FakeAlarms::default();
        let mut state = AppState::new(StorageData::new());
        state.create_item(draft("Older"), &alarms, NOW).unwrap();

        let form = state.open_save(capture());
        assert_eq!(form.name, "A post");
        assert_eq!(form.kind, ItemType::Image);
        assert_eq!(form.note, "A photo");
        assert_eq!(state.modal, Some(Modal::Save));

        let item = state.create_item(form, &alarms, NOW + 1.0).unwrap().clone();

        assert_eq!(state.data.items[0].id, item.id);
        assert_eq!(item.url, "https://example.com/post");
        assert_eq!(item.preview, "data:image/jpeg;base64,xyz");
        assert_eq!(item.created, NOW + 1.0);
        assert_eq!(item.accessed, NOW + 1.0);
        assert_eq!(state.modal, None);
        assert!(state.page_capture.is_none());
    }

    #[test]
    fn test_create_truncates_note_and_repairs_folder() {
        let alarms = FakeAlarms::default();
        let mut state = AppState::new(StorageData::new());
        let mut d = draft("Long note");
        d.note = "n".repeat(700);
        d.folder = "Missing".to_string();

        let item = state.create_item(d, &alarms, NOW).unwrap();

        assert_eq!(item.note.chars().count(), MAX_NOTE_CHARS);
        assert_eq!(item.folder, ALL_ITEMS);
    }

    #[test]
    fn test_create_with_future_reminder_arms_timer() {
        let alarms = FakeAlarms::default();
        let (_, id) = state_with_item(&alarms, Some(NOW + 60_000.0));
        assert_eq!(alarms.when(&id), Some(NOW + 60_000.0));
    }

    #[test]
    fn test_create_with_past_reminder_schedules_nothing() {
        let alarms = FakeAlarms::default();
        let (state, id) = state_with_item(&alarms, Some(NOW - 1.0));

        assert_eq!(*alarms.schedule_calls.borrow(), 0);
        assert_eq!(state.data.get_item(&id).unwrap().alarm, Some(NOW - 1.0));
    }

    #[test]
    fn test_edit_reschedules_and_touches() {
        let alarms = FakeAlarms::default();
        let (mut state, id) = state_with_item(&alarms, Some(NOW + 1000.0));
        state.create_folder("Work").unwrap();

        let mut edit = state.open_edit(&id).unwrap();
        assert_eq!(state.editing_item().map(|i| i.id.clone()), Some(id.clone()));
        edit.folder = "Work".to_string();
        edit.note = " updated ".to_string();
        edit.alarm = Some(NOW + 9000.0);
        state.save_edit(edit, &alarms, NOW + 10.0).unwrap();

        let item = state.data.get_item(&id).unwrap();
        assert_eq!(item.folder, "Work");
        assert_eq!(item.note, "updated");
        assert_eq!(item.accessed, NOW + 10.0);
        assert_eq!(item.created, NOW);
        assert_eq!(alarms.count(), 1);
        assert_eq!(alarms.when(&id), Some(NOW + 9000.0));
        assert_eq!(state.editing, None);
        assert_eq!(state.modal, None);
    }

    #[test]
    fn test_edit_clearing_reminder_cancels_timer() {
        let alarms = FakeAlarms::default();
        let (mut state, id) = state_with_item(&alarms, Some(NOW + 1000.0));

        let edit = ItemEdit {
            folder: ALL_ITEMS.to_string(),
            note: String::new(),
            alarm: None,
        };
        state.edit_item(&id, edit, &alarms, NOW).unwrap();

        assert_eq!(state.data.get_item(&id).unwrap().alarm, None);
        assert_eq!(alarms.when(&id), None);
    }

    #[test]
    fn test_edit_unknown_item() {
        let alarms = FakeAlarms::default();
        let mut state = AppState::new(StorageData::new());
        assert_eq!(
            state.edit_item("nope", ItemEdit::default(), &alarms, NOW),
            Err(BoxyError::ItemNotFound("nope".to_string()))
        );
        assert!(state.open_edit("nope").is_err());
        assert_eq!(state.modal, None);
    }

    #[test]
    fn test_delete_cancels_timer() {
        let alarms = FakeAlarms::default();
        let (mut state, id) = state_with_item(&alarms, Some(NOW + 1000.0));
        state.open_edit(&id).unwrap();

        state.delete_item(&id, &alarms).unwrap();

        assert!(state.data.items.is_empty());
        assert_eq!(alarms.count(), 0);
        assert_eq!(state.editing, None);
        assert!(state.delete_item(&id, &alarms).is_err());
    }

    #[test]
    fn test_delete_all_cancels_every_timer() {
        let alarms = FakeAlarms::default();
        let mut state = AppState::new(StorageData::new());
        for i in 0..3 {
            let mut d = draft(&format!("Item {}", i));
            d.alarm = Some(NOW + 1000.0 * f64::from(i + 1));
            state.create_item(d, &alarms, NOW).unwrap();
        }
        assert_eq!(alarms.count(), 3);

        assert_eq!(state.delete_all(&alarms), Ok(3));
        assert!(state.data.items.is_empty());
        assert_eq!(alarms.count(), 0);
    }

    #[test]
    fn test_folder_deletion_keeps_items_valid() {
        let alarms = FakeAlarms::default();
        let mut state = AppState::new(StorageData::new());
        state.create_folder("A").unwrap();
        state.create_folder("B").unwrap();
        for (name, folder) in [("x", "A"), ("y", "B"), ("z", "A")] {
            let mut d = draft(name);
            d.folder = folder.to_string();
            state.create_item(d, &alarms, NOW).unwrap();
        }
        state.select_folder("A");

        assert_eq!(state.delete_folder(ALL_ITEMS), Err(BoxyError::ProtectedFolder));
        assert_eq!(state.delete_folder("A"), Ok(2));
        assert_eq!(state.delete_folder("B"), Ok(1));

        assert_eq!(state.data.items.len(), 3);
        assert!(state.data.items.iter().all(|i| state.data.has_folder(&i.folder)));
        assert_eq!(state.folder, None);
    }

    #[test]
    fn test_select_folder_switches_to_item_list() {
        let mut state = AppState::new(StorageData::new());
        state.create_folder("A").unwrap();
        state.set_tab(TabFilter::Folders);

        state.select_folder("A");
        assert_eq!(state.folder.as_deref(), Some("A"));
        assert_eq!(state.tab, TabFilter::All);
        assert_eq!(state.empty_message(), "Folder is empty");

        state.select_folder(ALL_ITEMS);
        assert_eq!(state.folder, None);
        assert_eq!(state.empty_message(), "Your boxy is empty!");

        state.set_search("zzz");
        assert_eq!(state.empty_message(), "No results found");
    }

    #[test]
    fn test_save_form_defaults_to_current_folder() {
        let mut state = AppState::new(StorageData::new());
        state.create_folder("Reading").unwrap();
        state.select_folder("Reading");

        let form = state.open_save(PageCapture::default());
        assert_eq!(form.folder, "Reading");
    }

    #[test]
    fn test_page_capture_screenshot_needed() {
        let detected = DetectedContent::fallback("Title");
        let bare = PageCapture::new("https://a.b".to_string(), "Title".to_string(), detected);
        assert!(bare.needs_screenshot());

        let mut detected = DetectedContent::fallback("Title");
        detected.preview = Some(String::new());
        let empty_preview = PageCapture::new(String::new(), String::new(), detected);
        assert!(empty_preview.needs_screenshot());

        assert!(!capture().needs_screenshot());
    }

    #[test]
    fn test_modals_are_independent() {
        let mut state = AppState::new(StorageData::new());
        state.open_settings();
        state.close_edit();
        assert_eq!(state.modal, Some(Modal::Settings));
        state.close_settings();
        assert_eq!(state.modal, None);
    }

    #[test]
    fn test_cleanup_days_minimum() {
        let mut state = AppState::new(StorageData::new());
        state.set_cleanup_days(0).unwrap();
        assert_eq!(state.data.settings.cleanup_days, 1);
    }

    #[test]
    fn test_visible_is_stable() {
        let alarms = FakeAlarms::default();
        let mut state = AppState::new(StorageData::new());
        state.create_item(draft("Cat"), &alarms, NOW).unwrap();
        state.create_item(draft("Dog"), &alarms, NOW).unwrap();

        let first: Vec<String> = state.visible().iter().map(|i| i.id.clone()).collect();
        let second: Vec<String> = state.visible().iter().map(|i| i.id.clone()).collect();
        assert_eq!(first, second);
        assert_eq!(state.folder_counts(), vec![(ALL_ITEMS.to_string(), 2)]);
    }

    #[test]
    fn test_unavailable_state_refuses_changes() {
        let alarms = FakeAlarms::default();
        let mut state = AppState::unavailable();
        let mut d = draft("Later");
        d.alarm = Some(NOW + 60_000.0);

        assert_eq!(
            state.create_item(d, &alarms, NOW).map(|_| ()),
            Err(BoxyError::StorageUnavailable)
        );
        assert_eq!(alarms.count(), 0);
        assert_eq!(state.create_folder("Work"), Err(BoxyError::StorageUnavailable));
        assert_eq!(state.set_theme(Theme::Dark), Err(BoxyError::StorageUnavailable));
        assert_eq!(state.set_cleanup_days(7), Err(BoxyError::StorageUnavailable));
        assert_eq!(state.delete_all(&alarms), Err(BoxyError::StorageUnavailable));
        assert_eq!(state.delete_folder("Work"), Err(BoxyError::StorageUnavailable));
        assert_eq!(state.data, StorageData::new());
    }

    #[test]
    fn test_unavailable_state_still_browses() {
        let mut state = AppState::unavailable();
        state.set_search("cat");
        state.set_tab(TabFilter::Folders);
        state.open_settings();
        assert_eq!(state.modal, Some(Modal::Settings));
        assert!(state.visible().is_empty());
    }

    #[test]
    fn test_open_save_keeps_items_deleted_while_detecting() {
        let alarms = FakeAlarms::default();
        let (mut state, id) = state_with_item(&alarms, None);
        state.delete_item(&id, &alarms).unwrap();

        state.open_save(capture());
        assert!(state.data.items.is_empty());
        assert_eq!(state.modal, Some(Modal::Save));
    }
}
