/// Boxy - Chrome Extension for saving things to read, watch or remember later
/// Built with Rust + WASM + Yew

mod app_state;
mod background;
mod detect;
mod dom;
mod error;
mod filter;
mod item;
mod platform;
mod reminder;
mod storage;
pub mod ui;

use background::{
    CLEANUP_ALARM, CLEANUP_PERIOD_MINUTES, CONTEXT_MENU_CONTEXTS, CONTEXT_MENU_ID,
    CONTEXT_MENU_TITLE,
};
use platform::Chrome;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Serialize a message response with `null` for missing values
fn to_response(value: &impl Serialize) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}

// Content script: classify the current page
#[wasm_bindgen]
pub async fn detect_content() -> JsValue {
    to_response(&dom::detect_page().await)
}

// Background worker entry points, wired to chrome events in js/background-main.js

#[wasm_bindgen]
pub fn background_installed() {
    log::info!("Boxy installed");
    if let Err(e) = platform::register_context_menu(CONTEXT_MENU_ID, CONTEXT_MENU_TITLE, &CONTEXT_MENU_CONTEXTS) {
        log::warn!("Failed to create context menu: {}", e);
    }
}

// Runs each time the service worker loads. Re-creating the alarm replaces it.
#[wasm_bindgen]
pub fn background_started() {
    platform::register_periodic_alarm(CLEANUP_ALARM, CLEANUP_PERIOD_MINUTES);
}

#[wasm_bindgen]
pub fn background_menu_clicked(menu_id: &str) {
    if menu_id == CONTEXT_MENU_ID {
        platform::open_popup();
    }
}

#[wasm_bindgen]
pub async fn background_alarm(name: String) {
    match platform::load_storage().await {
        Ok(data) => {
            background::handle_alarm(&data, &name, js_sys::Date::now(), &Chrome);
        }
        Err(e) => log::warn!("Alarm {} skipped, storage unavailable: {}", name, e),
    }
}

#[wasm_bindgen]
pub async fn background_notification_clicked(id: String) {
    match platform::load_storage().await {
        Ok(data) => {
            background::handle_notification_click(&data, &id, &Chrome);
        }
        Err(e) => {
            log::warn!("Storage unavailable: {}", e);
            background::BackgroundPlatform::clear_notification(&Chrome, &id);
        }
    }
}

#[wasm_bindgen]
pub async fn background_notification_button(id: String, button_index: i32) {
    match platform::load_storage().await {
        Ok(data) => {
            background::handle_notification_button(&data, &id, button_index, &Chrome);
        }
        Err(e) => {
            log::warn!("Storage unavailable: {}", e);
            background::BackgroundPlatform::clear_notification(&Chrome, &id);
        }
    }
}

#[wasm_bindgen]
pub fn background_notification_closed(id: &str) {
    log::info!("Notification closed: {}", id);
}

// Relay for the popup's `captureTab` message
#[wasm_bindgen]
pub async fn background_capture_tab() -> JsValue {
    let preview = platform::capture_visible_tab().await.unwrap_or_else(|e| {
        log::warn!("Tab capture failed: {}", e);
        None
    });
    to_response(&platform::CaptureResponse { preview })
}
