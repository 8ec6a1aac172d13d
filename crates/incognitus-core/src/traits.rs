use crate::{error::ClientError, lang::Lang};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Key → localized string mapping for one language.
pub type Table = HashMap<String, String>;

/// Where translation tables come from.
///
/// A non-2xx response must map to [`ClientError::TranslationFetch`]; a body
/// that is not a flat string map must fail rather than return a partial table.
#[async_trait]
pub trait TableSource: Send + Sync {
    /// Human-readable source name for logs.
    fn name(&self) -> &str;

    /// Retrieve and parse the table for `lang`.
    async fn fetch(&self, lang: Lang) -> Result<Table, ClientError>;
}

/// Durable client-side key/value storage (the `localStorage` role).
pub trait PrefStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, ClientError>;

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError>;
}

/// The slice of the page the translator touches.
///
/// Implementations own their interior mutability; the DOM is shared state.
pub trait Document: Send + Sync {
    /// Rewrite the text of every element carrying a translation key,
    /// using `resolve(key)` as the new text.
    fn translate_elements(&self, resolve: &dyn Fn(&str) -> String);

    /// Set or clear right-to-left direction on the document root.
    fn set_rtl(&self, rtl: bool);

    /// Drop a presentation class from the body, if present.
    fn remove_body_class(&self, class: &str);
}

/// Host haptic feedback: notification kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Error,
    Success,
    Warning,
}

/// Host haptic feedback: impact strengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpactStyle {
    Light,
    Medium,
    Heavy,
    Rigid,
    Soft,
}

/// Callback fired when the host back button is pressed.
pub type BackCallback = Box<dyn Fn() + Send + Sync>;

/// Identifier for a registered back-button callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Optional haptic capability of the host.
pub trait HapticFeedback: Send + Sync {
    fn notification_occurred(&self, kind: NotificationKind);
    fn impact_occurred(&self, style: ImpactStyle);
    fn selection_changed(&self);
}

/// Optional main-button capability of the host.
pub trait MainButton: Send + Sync {
    fn show_progress(&self);
    fn hide_progress(&self);
}

/// Optional back-button capability of the host.
pub trait BackButton: Send + Sync {
    fn show(&self);
    fn hide(&self);
    fn on_click(&self, callback: BackCallback) -> ListenerId;
    fn off_click(&self, id: ListenerId);
}

/// The platform-injected bridge object of the chat container.
///
/// Only present when the app runs embedded; capabilities the host build
/// lacks return `None`.
pub trait HostBridge: Send + Sync {
    /// Raw launch-parameter string, passed verbatim to the backend.
    fn init_data(&self) -> &str;

    /// Host platform name (`"ios"`, `"android"`, `"tdesktop"`, ...).
    fn platform(&self) -> &str;

    fn ready(&self);

    fn expand(&self);

    fn close(&self);

    fn haptic(&self) -> Option<&dyn HapticFeedback> {
        None
    }

    fn main_button(&self) -> Option<&dyn MainButton> {
        None
    }

    fn back_button(&self) -> Option<&dyn BackButton> {
        None
    }
}
