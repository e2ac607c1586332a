//! Widget instance registry
//!
//! Enforces the one-instance-per-page invariant. The lifecycle controller
//! checks and sets its key here before doing anything else; a duplicate
//! initialize is rejected before any UI or network activity.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::error::WidgetError;

#[derive(Default)]
pub struct WidgetRegistry {
    active: Mutex<HashSet<String>>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the page key for a new instance.
    pub fn register(&self, key: &str) -> Result<(), WidgetError> {
        let mut active = self.active.lock().expect("registry lock poisoned");
        if !active.insert(key.to_string()) {
            return Err(WidgetError::DuplicateInstance(key.to_string()));
        }
        Ok(())
    }

    /// Release the key when an instance is torn down.
    pub fn release(&self, key: &str) {
        self.active
            .lock()
            .expect("registry lock poisoned")
            .remove(key);
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.active
            .lock()
            .expect("registry lock poisoned")
            .contains(key)
    }
}
