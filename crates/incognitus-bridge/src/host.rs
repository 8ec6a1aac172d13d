//! In-process host used outside the container: the CLI builds one from the
//! configured launch string, tests use it to observe what the app asked for.

use incognitus_core::traits::{
    BackButton, BackCallback, HapticFeedback, HostBridge, ImpactStyle, ListenerId, MainButton,
    NotificationKind,
};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Something the app asked the host to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostAction {
    Ready,
    Expand,
    Close,
    Notification(NotificationKind),
    Impact(ImpactStyle),
    Selection,
    ShowProgress,
    HideProgress,
    ShowBack,
    HideBack,
}

type SharedCallback = Arc<dyn Fn() + Send + Sync>;

/// Recording [`HostBridge`] with every optional capability enabled by default.
pub struct StaticHost {
    init_data: String,
    platform: String,
    capabilities: bool,
    actions: Mutex<Vec<HostAction>>,
    listeners: Mutex<BTreeMap<u64, SharedCallback>>,
    next_listener: AtomicU64,
}

impl StaticHost {
    pub fn new(init_data: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            init_data: init_data.into(),
            platform: platform.into(),
            capabilities: true,
            actions: Mutex::new(Vec::new()),
            listeners: Mutex::new(BTreeMap::new()),
            next_listener: AtomicU64::new(1),
        }
    }

    /// Model an old host build without haptics, main button, or back button.
    pub fn without_capabilities(mut self) -> Self {
        self.capabilities = false;
        self
    }

    /// Everything requested so far, in order.
    pub fn actions(&self) -> Vec<HostAction> {
        lock(&self.actions).clone()
    }

    pub fn back_listeners(&self) -> usize {
        lock(&self.listeners).len()
    }

    /// Simulate the user pressing the back button.
    pub fn press_back(&self) {
        // Handlers may call back into the host, so run them unlocked.
        let callbacks: Vec<SharedCallback> = lock(&self.listeners).values().cloned().collect();
        for callback in callbacks {
            callback();
        }
    }

    fn record(&self, action: HostAction) {
        lock(&self.actions).push(action);
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl HostBridge for StaticHost {
    fn init_data(&self) -> &str {
        &self.init_data
    }

    fn platform(&self) -> &str {
        &self.platform
    }

    fn ready(&self) {
        self.record(HostAction::Ready);
    }

    fn expand(&self) {
        self.record(HostAction::Expand);
    }

    fn close(&self) {
        self.record(HostAction::Close);
    }

    fn haptic(&self) -> Option<&dyn HapticFeedback> {
        self.capabilities.then_some(self as &dyn HapticFeedback)
    }

    fn main_button(&self) -> Option<&dyn MainButton> {
        self.capabilities.then_some(self as &dyn MainButton)
    }

    fn back_button(&self) -> Option<&dyn BackButton> {
        self.capabilities.then_some(self as &dyn BackButton)
    }
}

impl HapticFeedback for StaticHost {
    fn notification_occurred(&self, kind: NotificationKind) {
        self.record(HostAction::Notification(kind));
    }

    fn impact_occurred(&self, style: ImpactStyle) {
        self.record(HostAction::Impact(style));
    }

    fn selection_changed(&self) {
        self.record(HostAction::Selection);
    }
}

impl MainButton for StaticHost {
    fn show_progress(&self) {
        self.record(HostAction::ShowProgress);
    }

    fn hide_progress(&self) {
        self.record(HostAction::HideProgress);
    }
}

impl BackButton for StaticHost {
    fn show(&self) {
        self.record(HostAction::ShowBack);
    }

    fn hide(&self) {
        self.record(HostAction::HideBack);
    }

    fn on_click(&self, callback: BackCallback) -> ListenerId {
        let id = self.next_listener.fetch_add(1, Ordering::Relaxed);
        lock(&self.listeners).insert(id, Arc::from(callback));
        ListenerId(id)
    }

    fn off_click(&self, id: ListenerId) {
        lock(&self.listeners).remove(&id.0);
    }
}
