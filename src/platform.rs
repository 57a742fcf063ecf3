/// Bridge to the chrome.* extension APIs
///
/// The JS side lives in `js/platform.js`. Promise-returning calls are
/// imported with `catch` so every failure comes back as a `BoxyError`.

use crate::background::{BackgroundPlatform, Notification};
use crate::detect::DetectedContent;
use crate::error::{BoxyError, Result};
use crate::reminder::Alarms;
use crate::storage::{STORAGE_KEYS, StorageData};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

// Import JS bridge functions
#[wasm_bindgen(module = "/js/platform.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getStorage(keys: JsValue) -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(value: JsValue) -> std::result::Result<(), JsValue>;

    fn createAlarm(name: &str, when: f64);

    fn createPeriodicAlarm(name: &str, period_minutes: f64);

    fn clearAlarm(name: &str);

    fn createNotification(id: &str, options: JsValue);

    fn clearNotification(id: &str);

    fn openTab(url: &str);

    fn sendAlarmFired(item_id: &str);

    fn createContextMenu(id: &str, title: &str, contexts: JsValue);

    fn openPopup();

    #[wasm_bindgen(catch)]
    async fn captureVisibleTab(quality: u32) -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn queryActiveTab() -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn sendDetectContent(tab_id: i32) -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn requestTabCapture() -> std::result::Result<JsValue, JsValue>;

    fn onAlarmFired(callback: &js_sys::Function);
}

/// JPEG quality used for visible-tab screenshots
pub const SCREENSHOT_QUALITY: u32 = 50;

/// Active tab as reported by chrome.tabs.query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActiveTab {
    pub id: i32,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
}

/// Response of the `captureTab` message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CaptureResponse {
    #[serde(default)]
    pub preview: Option<String>,
}

/// Read the whole record. A missing record yields the defaults.
pub async fn load_storage() -> Result<StorageData> {
    let keys = serde_wasm_bindgen::to_value(&STORAGE_KEYS)?;
    let storage_js = getStorage(keys).await?;

    let mut data = if storage_js.is_null() || storage_js.is_undefined() {
        StorageData::new()
    } else {
        serde_wasm_bindgen::from_value(storage_js)?
    };
    data.repair();
    Ok(data)
}

/// Write the whole record. Whoever writes last wins.
pub async fn save_storage(data: &StorageData) -> Result<()> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    let storage_js = data.serialize(&serializer)?;

    setStorage(storage_js).await?;
    Ok(())
}

pub async fn active_tab() -> Result<ActiveTab> {
    let tab_js = queryActiveTab().await?;
    if tab_js.is_null() || tab_js.is_undefined() {
        return Err(BoxyError::Platform("no active tab".to_string()));
    }
    Ok(serde_wasm_bindgen::from_value(tab_js)?)
}

/// Ask the tab's content script to classify the page
pub async fn request_detection(tab_id: i32) -> Result<DetectedContent> {
    let response = sendDetectContent(tab_id).await?;
    if response.is_null() || response.is_undefined() {
        return Err(BoxyError::Platform("empty detectContent response".to_string()));
    }
    Ok(serde_wasm_bindgen::from_value(response)?)
}

/// Ask the background worker for a screenshot of the visible tab
pub async fn request_screenshot() -> Result<Option<String>> {
    let response = requestTabCapture().await?;
    if response.is_null() || response.is_undefined() {
        return Ok(None);
    }
    let capture: CaptureResponse = serde_wasm_bindgen::from_value(response)?;
    Ok(capture.preview.filter(|p| !p.is_empty()))
}

/// Take a screenshot of the visible tab from the background worker
pub async fn capture_visible_tab() -> Result<Option<String>> {
    let data_url = captureVisibleTab(SCREENSHOT_QUALITY).await?;
    Ok(data_url.as_string().filter(|s| !s.is_empty()))
}

pub fn register_context_menu(id: &str, title: &str, contexts: &[&str]) -> Result<()> {
    createContextMenu(id, title, serde_wasm_bindgen::to_value(contexts)?);
    Ok(())
}

pub fn register_periodic_alarm(name: &str, period_minutes: f64) {
    createPeriodicAlarm(name, period_minutes);
}

pub fn open_popup() {
    openPopup();
}

pub fn open_url(url: &str) {
    openTab(url);
}

/// Call `callback` whenever the background reports a fired reminder.
/// The closure stays registered for the lifetime of the page.
pub fn listen_alarm_fired(callback: impl Fn(String) + 'static) {
    let closure = Closure::wrap(Box::new(callback) as Box<dyn Fn(String)>);
    onAlarmFired(closure.as_ref().unchecked_ref());
    closure.forget();
}

/// chrome-backed implementation of the platform capabilities
#[derive(Debug, Clone, Copy, Default)]
pub struct Chrome;

impl Alarms for Chrome {
    fn schedule(&self, id: &str, when_ms: f64) {
        createAlarm(id, when_ms);
    }

    fn cancel(&self, id: &str) {
        clearAlarm(id);
    }
}

impl BackgroundPlatform for Chrome {
    fn notify(&self, id: &str, notification: &Notification) {
        match serde_wasm_bindgen::to_value(notification) {
            Ok(options) => createNotification(id, options),
            Err(e) => log::warn!("Failed to build notification {}: {}", id, e),
        }
    }

    fn clear_notification(&self, id: &str) {
        clearNotification(id);
    }

    fn open_tab(&self, url: &str) {
        openTab(url);
    }

    fn alarm_fired(&self, item_id: &str) {
        sendAlarmFired(item_id);
    }
}
