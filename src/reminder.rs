/// One-shot reminders keyed by item id

use crate::item::Item;

/// Platform timer service. Scheduling an id that already has a timer replaces it.
pub trait Alarms {
    fn schedule(&self, id: &str, when_ms: f64);
    fn cancel(&self, id: &str);
}

/// Milliseconds until the reminder fires, or `None` when it is not in the future
pub fn reminder_delay(alarm: f64, now: f64) -> Option<f64> {
    let delay = alarm - now;
    (delay > 0.0).then_some(delay)
}

/// Bring the platform timer for `item` in line with its `alarm` field.
/// Returns true when a timer is armed afterwards.
pub fn sync_alarm(alarms: &impl Alarms, item: &Item, now: f64) -> bool {
    match item.alarm {
        Some(when) if reminder_delay(when, now).is_some() => {
            alarms.schedule(&item.id, when);
            true
        }
        _ => {
            alarms.cancel(&item.id);
            false
        }
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::Alarms;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory alarms: one entry per id, like chrome.alarms
    #[derive(Default)]
    pub struct FakeAlarms {
        pub armed: RefCell<HashMap<String, f64>>,
        pub schedule_calls: RefCell<usize>,
    }

    impl FakeAlarms {
        pub fn when(&self, id: &str) -> Option<f64> {
            self.armed.borrow().get(id).copied()
        }

        pub fn count(&self) -> usize {
            self.armed.borrow().len()
        }
    }

    impl Alarms for FakeAlarms {
        fn schedule(&self, id: &str, when_ms: f64) {
            *self.schedule_calls.borrow_mut() += 1;
            self.armed.borrow_mut().insert(id.to_string(), when_ms);
        }

        fn cancel(&self, id: &str) {
            self.armed.borrow_mut().remove(id);
        }
    }
}
