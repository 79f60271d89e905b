//! Test doubles shared by the unit tests of this crate.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::foundation::user::{ChatUser, User};

/// A sender that records every message it receives.
pub(crate) struct RecordingSender {
    name: String,
    unique_id: Uuid,
    permissions: Mutex<HashSet<String>>,
    messages: Mutex<Vec<String>>,
    disconnected: Mutex<Option<String>>,
}

impl RecordingSender {
    pub(crate) fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_owned(),
            unique_id: Uuid::new_v4(),
            permissions: Mutex::new(HashSet::new()),
            messages: Mutex::new(Vec::new()),
            disconnected: Mutex::new(None),
        })
    }

    pub(crate) fn grant(self: Arc<Self>, permission: &str) -> Arc<Self> {
        self.permissions.lock().insert(permission.to_owned());
        self
    }

    pub(crate) fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    pub(crate) fn disconnect_reason(&self) -> Option<String> {
        self.disconnected.lock().clone()
    }
}

impl ChatUser for RecordingSender {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn send_message(&self, message: &str) {
        self.messages.lock().push(message.to_owned());
    }

    fn has_permission(&self, permission: &str) -> bool {
        self.permissions.lock().contains(permission)
    }

    fn as_user(&self) -> Option<&dyn User> {
        Some(self)
    }
}

impl User for RecordingSender {
    fn unique_id(&self) -> Uuid {
        self.unique_id
    }

    fn disconnect(&self, reason: &str) {
        *self.disconnected.lock() = Some(reason.to_owned());
    }
}
