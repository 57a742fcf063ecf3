/// Background coordinator: reminder alarms, notifications and the cleanup nudge
///
/// Handlers are stateless. Each one receives the freshly loaded record and
/// talks to the browser through [`BackgroundPlatform`]. A missing item or
/// record means nothing further happens.

use crate::filter::stale_items;
use crate::storage::StorageData;
use serde::Serialize;

pub const CONTEXT_MENU_ID: &str = "save-to-boxy";
pub const CONTEXT_MENU_TITLE: &str = "Save to Boxy";
pub const CONTEXT_MENU_CONTEXTS: [&str; 5] = ["page", "selection", "image", "video", "link"];

/// Name of the recurring timer that runs the stale-item scan
pub const CLEANUP_ALARM: &str = "cleanup-check";
pub const CLEANUP_PERIOD_MINUTES: f64 = 60.0;
/// Notification id used for the cleanup suggestion
pub const CLEANUP_NOTIFICATION: &str = "cleanup-suggestion";
/// Minimum number of stale items before suggesting a cleanup
pub const CLEANUP_THRESHOLD: usize = 10;

pub const OPEN_BUTTON: i32 = 0;
pub const DISMISS_BUTTON: i32 = 1;

/// Packaged icon, resolved from the extension root
pub const NOTIFICATION_ICON: &str = "/icons/icon128.png";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NotificationButton {
    pub title: String,
}

/// Options passed to chrome.notifications.create
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub icon_url: &'static str,
    pub title: String,
    pub message: String,
    pub priority: u8,
    pub require_interaction: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<NotificationButton>,
}

impl Notification {
    fn basic(title: &str, message: String, priority: u8) -> Self {
        Notification {
            kind: "basic",
            icon_url: NOTIFICATION_ICON,
            title: title.to_string(),
            message,
            priority,
            require_interaction: false,
            buttons: Vec::new(),
        }
    }

    pub fn reminder(item_name: &str) -> Self {
        Notification {
            require_interaction: true,
            buttons: vec![
                NotificationButton { title: "Open".to_string() },
                NotificationButton { title: "Dismiss".to_string() },
            ],
            ..Notification::basic("Boxy Reminder", format!("Time for \"{}\"", item_name), 2)
        }
    }

    pub fn cleanup(count: usize) -> Self {
        Notification::basic(
            "Boxy Cleanup",
            format!("You have {} old items. Time to clean up?", count),
            1,
        )
    }
}

/// Browser services the background worker depends on
pub trait BackgroundPlatform {
    fn notify(&self, id: &str, notification: &Notification);
    fn clear_notification(&self, id: &str);
    fn open_tab(&self, url: &str);
    /// Tell an open popup that a reminder went off
    fn alarm_fired(&self, item_id: &str);
}

#[derive(Debug, Clone, PartialEq)]
pub enum AlarmOutcome {
    Reminded(String),
    ItemMissing,
    CleanupSuggested(usize),
    NothingToClean,
}

/// Dispatch a fired timer: the cleanup scan or an item reminder
pub fn handle_alarm(
    data: &StorageData,
    name: &str,
    now: f64,
    platform: &impl BackgroundPlatform,
) -> AlarmOutcome {
    if name == CLEANUP_ALARM {
        return check_for_cleanup(data, now, platform);
    }

    log::info!("Alarm fired: {}", name);
    let Some(item) = data.get_item(name) else {
        log::info!("Item not found for alarm: {}", name);
        return AlarmOutcome::ItemMissing;
    };

    platform.notify(name, &Notification::reminder(&item.name));
    platform.alarm_fired(name);
    AlarmOutcome::Reminded(item.id.clone())
}

/// Suggest a cleanup when enough items have gone untouched
pub fn check_for_cleanup(
    data: &StorageData,
    now: f64,
    platform: &impl BackgroundPlatform,
) -> AlarmOutcome {
    let count = stale_items(&data.items, now, data.settings.cleanup_days).len();
    if count >= CLEANUP_THRESHOLD {
        platform.notify(CLEANUP_NOTIFICATION, &Notification::cleanup(count));
        AlarmOutcome::CleanupSuggested(count)
    } else {
        AlarmOutcome::NothingToClean
    }
}

/// Open the item behind a notification, if it still exists and has a URL
fn open_item(data: &StorageData, notification_id: &str, platform: &impl BackgroundPlatform) -> bool {
    let url = data
        .find_any(notification_id)
        .map(|item| item.url.as_str())
        .filter(|url| !url.is_empty());

    match url {
        Some(url) => {
            platform.open_tab(url);
            true
        }
        None => false,
    }
}

/// Body click: open the item and clear the notification
pub fn handle_notification_click(
    data: &StorageData,
    notification_id: &str,
    platform: &impl BackgroundPlatform,
) -> bool {
    let opened = open_item(data, notification_id, platform);
    platform.clear_notification(notification_id);
    opened
}

/// Button click: `Open` opens the item, any button clears the notification
pub fn handle_notification_button(
    data: &StorageData,
    notification_id: &str,
    button_index: i32,
    platform: &impl BackgroundPlatform,
) -> bool {
    let opened = button_index == OPEN_BUTTON && open_item(data, notification_id, platform);
    platform.clear_notification(notification_id);
    opened
}
