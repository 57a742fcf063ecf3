/// Data structures for Boxy
use serde::{Deserialize, Serialize};
use uuid::{NoContext, Timestamp, Uuid};

/// The folder every item falls back to. Always present, never renamed or deleted.
pub const ALL_ITEMS: &str = "All Items";

/// Maximum length of a note, in characters
pub const MAX_NOTE_CHARS: usize = 500;

pub const DEFAULT_CLEANUP_DAYS: u32 = 30;

pub const MS_PER_MINUTE: f64 = 60_000.0;
pub const MS_PER_HOUR: f64 = 3_600_000.0;
pub const MS_PER_DAY: f64 = 86_400_000.0;

/// Kind of saved content
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    #[default]
    Article,
    Image,
    Video,
    Text,
}

impl ItemType {
    pub const ALL: [ItemType; 4] = [ItemType::Article, ItemType::Image, ItemType::Video, ItemType::Text];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Article => "article",
            ItemType::Image => "image",
            ItemType::Video => "video",
            ItemType::Text => "text",
        }
    }

    pub fn parse(value: &str) -> Option<ItemType> {
        ItemType::ALL.into_iter().find(|t| t.as_str() == value)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ItemType::Article => "Article",
            ItemType::Image => "Image",
            ItemType::Video => "Video",
            ItemType::Text => "Text",
        }
    }
}

/// A saved piece of content
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ItemType,
    pub name: String,
    #[serde(default)]
    pub url: String,
    /// Embedded thumbnail/screenshot data URL, or a bare image URL. Empty when none.
    #[serde(default)]
    pub preview: String,
    #[serde(default)]
    pub note: String,
    #[serde(default = "default_folder")]
    pub folder: String,
    pub created: f64,
    pub accessed: f64,
    /// One-shot reminder time in epoch milliseconds
    #[serde(default)]
    pub alarm: Option<f64>,
}

impl Item {
    pub fn has_preview(&self) -> bool {
        !self.preview.is_empty()
    }

    /// Host of the source URL, if it parses
    pub fn source_host(&self) -> Option<String> {
        url::Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
    }
}

fn default_folder() -> String {
    ALL_ITEMS.to_string()
}

/// Colour scheme preference
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Auto,
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Auto => "auto",
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Theme> {
        match value {
            "auto" => Some(Theme::Auto),
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    /// Resolve to a concrete dark/light choice given the system preference
    pub fn is_dark(&self, system_prefers_dark: bool) -> bool {
        match self {
            Theme::Auto => system_prefers_dark,
            Theme::Light => false,
            Theme::Dark => true,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_cleanup_days")]
    pub cleanup_days: u32,
}

fn default_cleanup_days() -> u32 {
    DEFAULT_CLEANUP_DAYS
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            cleanup_days: DEFAULT_CLEANUP_DAYS,
        }
    }
}

/// Mint a unique, time-ordered item id from the creation time
pub fn new_item_id(now_ms: f64) -> String {
    let ms = now_ms.max(0.0) as u64;
    let ts = Timestamp::from_unix(NoContext, ms / 1000, ((ms % 1000) * 1_000_000) as u32);
    Uuid::new_v7(ts).to_string()
}

/// Truncate to at most `max` characters without splitting a code point
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Age label shown on item cards: `new`, `12min`, `3h`, `5d`
pub fn time_ago(timestamp: f64, now: f64) -> String {
    let seconds = ((now - timestamp) / 1000.0).floor();
    if seconds < 60.0 {
        "new".to_string()
    } else if seconds < 3600.0 {
        format!("{}min", (seconds / 60.0).floor())
    } else if seconds < 86400.0 {
        format!("{}h", (seconds / 3600.0).floor())
    } else {
        format!("{}d", (seconds / 86400.0).floor())
    }
}

/// Countdown label for an armed reminder: `expired`, `2h5m` or `40m`
pub fn alarm_countdown(alarm: f64, now: f64) -> String {
    let diff = alarm - now;
    if diff < 0.0 {
        return "expired".to_string();
    }

    let hours = (diff / MS_PER_HOUR).floor();
    let minutes = ((diff % MS_PER_HOUR) / MS_PER_MINUTE).floor();
    if hours > 0.0 {
        format!("{}h{}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item() -> Item {
        Item {
            id: "item-1".to_string(),
            kind: ItemType::Image,
            name: "Cat".to_string(),
            url: "https://www.example.com/cat".to_string(),
            preview: String::new(),
            note: "fluffy".to_string(),
            folder: "Pets".to_string(),
            created: 1_700_000_000_000.0,
            accessed: 1_700_000_000_000.0,
            alarm: Some(1_700_000_600_000.0),
        }
    }

    #[test]
    fn test_item_serializes_with_record_field_names() {
        let json = serde_json::to_value(sample_item()).unwrap();

        assert_eq!(json["type"], "image");
        assert_eq!(json["folder"], "Pets");
        assert_eq!(json["alarm"], 1_700_000_600_000.0);
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn test_item_defaults_for_missing_fields() {
        let json = r#"{"id":"1","type":"text","name":"Quote","created":1.0,"accessed":1.0}"#;
        let item: Item = serde_json::from_str(json).unwrap();

        assert_eq!(item.folder, ALL_ITEMS);
        assert_eq!(item.alarm, None);
        assert!(!item.has_preview());
        assert_eq!(item.url, "");
    }

    #[test]
    fn test_null_alarm_means_no_reminder() {
        let json = r#"{"id":"1","type":"video","name":"Clip","created":1.0,"accessed":1.0,"alarm":null}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.alarm, None);
    }

    #[test]
    fn test_item_type_parse() {
        assert_eq!(ItemType::parse("video"), Some(ItemType::Video));
        assert_eq!(ItemType::parse("folders"), None);
        for t in ItemType::ALL {
            assert_eq!(ItemType::parse(t.as_str()), Some(t));
        }
    }

    #[test]
    fn test_source_host() {
        assert_eq!(sample_item().source_host(), Some("example.com".to_string()));

        let mut item = sample_item();
        item.url = String::new();
        assert_eq!(item.source_host(), None);
    }

    #[test]
    fn test_theme() {
        assert_eq!(Theme::parse("dark"), Some(Theme::Dark));
        assert_eq!(Theme::parse("sepia"), None);
        assert!(Theme::Auto.is_dark(true));
        assert!(!Theme::Auto.is_dark(false));
        assert!(Theme::Dark.is_dark(false));
        assert!(!Theme::Light.is_dark(true));
    }

    #[test]
    fn test_settings_default_cleanup_days() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.cleanup_days, 30);

        let json = serde_json::to_value(Settings { cleanup_days: 7 }).unwrap();
        assert_eq!(json["cleanupDays"], 7);
    }

    #[test]
    fn test_new_item_id_unique_within_same_millisecond() {
        let a = new_item_id(1_700_000_000_000.0);
        let b = new_item_id(1_700_000_000_000.0);
        assert_ne!(a, b);
        assert!(new_item_id(1_700_000_000_000.0) < new_item_id(1_800_000_000_000.0));
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("çãõé", 2), "çã");
    }

    #[test]
    fn test_time_ago() {
        let now = 1_700_000_000_000.0;
        assert_eq!(time_ago(now - 30_000.0, now), "new");
        assert_eq!(time_ago(now - 5.0 * MS_PER_MINUTE, now), "5min");
        assert_eq!(time_ago(now - 3.0 * MS_PER_HOUR, now), "3h");
        assert_eq!(time_ago(now - 2.0 * MS_PER_DAY, now), "2d");
    }

    #[test]
    fn test_alarm_countdown() {
        let now = 1_700_000_000_000.0;
        assert_eq!(alarm_countdown(now - 1.0, now), "expired");
        assert_eq!(alarm_countdown(now + 40.0 * MS_PER_MINUTE, now), "40m");
        assert_eq!(alarm_countdown(now + 2.0 * MS_PER_HOUR + 5.0 * MS_PER_MINUTE, now), "2h5m");
    }
}
