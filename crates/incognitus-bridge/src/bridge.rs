use incognitus_core::traits::{BackCallback, HostBridge, ImpactStyle, ListenerId, NotificationKind};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::payload::LaunchPayload;

/// Maybe-present handle to the host bridge.
///
/// Built once at startup. Every action is a silent no-op when the host, or the
/// capability the action needs, is missing.
#[derive(Clone, Default)]
pub struct Bridge {
    host: Option<Arc<dyn HostBridge>>,
    payload: LaunchPayload,
}

impl Bridge {
    /// Wrap the probed host, parsing its launch payload once.
    pub fn new(host: Option<Arc<dyn HostBridge>>) -> Self {
        let payload = match host.as_deref() {
            Some(h) => LaunchPayload::parse(h.init_data()).unwrap_or_else(|e| {
                warn!("bridge: unreadable launch payload: {e}");
                LaunchPayload::default()
            }),
            None => LaunchPayload::default(),
        };
        Self { host, payload }
    }

    /// A bridge for running outside the container.
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn is_present(&self) -> bool {
        self.host.is_some()
    }

    /// Raw launch string; empty when not embedded.
    pub fn init_data(&self) -> &str {
        self.host.as_deref().map(|h| h.init_data()).unwrap_or("")
    }

    /// Structured, unverified launch payload.
    pub fn payload(&self) -> &LaunchPayload {
        &self.payload
    }

    pub fn user_id(&self) -> Option<i64> {
        self.payload.user.as_ref().map(|u| u.id)
    }

    /// The user's client locale, as reported by the host.
    pub fn user_language(&self) -> Option<&str> {
        self.payload
            .user
            .as_ref()
            .and_then(|u| u.language_code.as_deref())
    }

    pub fn platform(&self) -> &str {
        self.host.as_deref().map(|h| h.platform()).unwrap_or("unknown")
    }

    /// True only inside the container with a launch payload to authenticate with.
    pub fn is_embedded(&self) -> bool {
        !self.init_data().is_empty()
    }

    pub fn ready(&self) {
        if let Some(h) = &self.host {
            h.ready();
        }
    }

    pub fn expand(&self) {
        if let Some(h) = &self.host {
            h.expand();
        }
    }

    pub fn close(&self) {
        if let Some(h) = &self.host {
            h.close();
        }
    }

    pub fn haptic_notification(&self, kind: NotificationKind) {
        if let Some(haptic) = self.host.as_deref().and_then(|h| h.haptic()) {
            haptic.notification_occurred(kind);
        }
    }

    pub fn haptic_impact(&self, style: ImpactStyle) {
        if let Some(haptic) = self.host.as_deref().and_then(|h| h.haptic()) {
            haptic.impact_occurred(style);
        }
    }

    pub fn haptic_selection(&self) {
        if let Some(haptic) = self.host.as_deref().and_then(|h| h.haptic()) {
            haptic.selection_changed();
        }
    }

    /// Spinner on the host's main button.
    pub fn show_progress(&self) {
        if let Some(button) = self.host.as_deref().and_then(|h| h.main_button()) {
            button.show_progress();
        }
    }

    pub fn hide_progress(&self) {
        if let Some(button) = self.host.as_deref().and_then(|h| h.main_button()) {
            button.hide_progress();
        }
    }

    pub fn show_back(&self) {
        if let Some(button) = self.host.as_deref().and_then(|h| h.back_button()) {
            button.show();
        }
    }

    pub fn hide_back(&self) {
        if let Some(button) = self.host.as_deref().and_then(|h| h.back_button()) {
            button.hide();
        }
    }

    /// Register a back-button handler.
    ///
    /// The handler stays registered for as long as the returned subscription
    /// lives. Returns `None` when the host has no back button.
    #[must_use = "dropping the subscription unregisters the handler"]
    pub fn on_back(&self, callback: BackCallback) -> Option<BackSubscription> {
        let host = self.host.as_ref()?;
        let id = host.back_button()?.on_click(callback);
        debug!("bridge: back handler {id:?} registered");
        Some(BackSubscription {
            host: Arc::clone(host),
            id,
        })
    }
}

impl fmt::Debug for Bridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bridge")
            .field("present", &self.is_present())
            .field("platform", &self.platform())
            .field("user_id", &self.user_id())
            .finish()
    }
}

/// Owns a registered back-button handler; unregisters it on drop.
pub struct BackSubscription {
    host: Arc<dyn HostBridge>,
    id: ListenerId,
}

impl BackSubscription {
    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl Drop for BackSubscription {
    fn drop(&mut self) {
        if let Some(button) = self.host.back_button() {
            button.off_click(self.id);
            debug!("bridge: back handler {:?} removed", self.id);
        }
    }
}
