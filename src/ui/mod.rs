/// UI module exports
pub mod components;
pub mod modals;
pub mod popup;

use crate::item::Theme;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;

/// Parse the value of a `datetime-local` input as local time
pub(crate) fn parse_local_datetime(value: &str) -> Option<f64> {
    if value.trim().is_empty() {
        return None;
    }
    let ms = js_sys::Date::new(&JsValue::from_str(value)).get_time();
    (!ms.is_nan()).then_some(ms)
}

/// Format a timestamp for a `datetime-local` input
pub(crate) fn format_local_datetime(ms: f64) -> String {
    let date = js_sys::Date::new(&JsValue::from_f64(ms));
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}",
        date.get_full_year(),
        date.get_month() + 1,
        date.get_date(),
        date.get_hours(),
        date.get_minutes()
    )
}

/// Ask before a destructive action
pub(crate) fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// Put `theme-dark` or `theme-light` on the body
pub(crate) fn apply_theme(theme: Theme) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let prefers_dark = window
        .match_media("(prefers-color-scheme: dark)")
        .ok()
        .flatten()
        .map(|mq| mq.matches())
        .unwrap_or(false);

    if let Some(body) = window.document().and_then(|d| d.body()) {
        let classes = body.class_list();
        let _ = classes.remove_2("theme-dark", "theme-light");
        let class = if theme.is_dark(prefers_dark) { "theme-dark" } else { "theme-light" };
        let _ = classes.add_1(class);
    }
}

/// Run `f` once after `ms` milliseconds
pub(crate) fn after(ms: i32, f: impl FnOnce() + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once(f);
    if window
        .set_timeout_with_callback_and_timeout_and_arguments_0(closure.as_ref().unchecked_ref(), ms)
        .is_ok()
    {
        closure.forget();
    }
}

/// Counter that lets a delayed action check it is still the most recent one
#[derive(Clone, Default)]
pub(crate) struct Generation(Rc<Cell<u64>>);

impl Generation {
    pub fn advance(&self) -> u64 {
        let next = self.0.get().wrapping_add(1);
        self.0.set(next);
        next
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.0.get() == generation
    }
}

/// The value from the most recent render, shared with async work started in an earlier one
pub(crate) struct Latest<T>(Rc<RefCell<T>>);

impl<T> Clone for Latest<T> {
    fn clone(&self) -> Self {
        Latest(Rc::clone(&self.0))
    }
}

impl<T: Clone> Latest<T> {
    pub fn new(value: T) -> Self {
        Latest(Rc::new(RefCell::new(value)))
    }

    pub fn replace(&self, value: T) {
        *self.0.borrow_mut() = value;
    }

    pub fn get(&self) -> T {
        self.0.borrow().clone()
    }
}
