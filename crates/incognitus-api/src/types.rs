//! Request and response bodies of the backend API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Error body returned by the backend on non-2xx replies.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    /// Usually a string; validation failures carry a list instead.
    #[serde(default)]
    pub detail: Value,
}

impl ErrorBody {
    pub(crate) fn message(&self) -> Option<&str> {
        self.detail.as_str().filter(|s| !s.is_empty())
    }
}

/// Generic `{"ok": true}` acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub ok: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Health {
    pub status: String,
    #[serde(default)]
    pub port: Option<u16>,
}

/// Public view of a share link: who the message will reach.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LinkInfo {
    pub nickname: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendRequest<'a> {
    pub token: &'a str,
    pub text: &'a str,
}

/// The signed-in user's own statistics.
#[derive(Debug, Clone, Deserialize)]
pub struct Dashboard {
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub lang: String,
    #[serde(default)]
    pub messages_sent: u64,
    #[serde(default)]
    pub messages_received: u64,
    #[serde(default, deserialize_with = "timestamp")]
    pub registered_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp")]
    pub last_activity: Option<DateTime<Utc>>,
    #[serde(default)]
    pub blocked_count: u64,
    #[serde(default)]
    pub revoke_count: u64,
    /// Token of the user's share link.
    #[serde(default)]
    pub link_token: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub frame: Option<String>,
    #[serde(default)]
    pub bot_username: String,
    #[serde(default)]
    pub profile_token: String,
    #[serde(flatten)]
    pub visibility: ProfileSettings,
}

/// Profile visibility toggles. Unset fields are left unchanged on update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_public: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_show_last_seen: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_show_level: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_show_active_days: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_show_registered: Option<bool>,
}

impl ProfileSettings {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Public profile looked up by profile token. Fields the owner hides are absent.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub nickname: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub active_days: Option<u32>,
    #[serde(default, deserialize_with = "timestamp")]
    pub registered_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp")]
    pub last_seen: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AvatarInfo {
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InboxMessage {
    pub id: i64,
    #[serde(default)]
    pub sender_nickname: String,
    #[serde(default)]
    pub message_text: String,
    #[serde(default = "default_message_type")]
    pub message_type: String,
    #[serde(default, deserialize_with = "timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "flag")]
    pub read: bool,
}

/// One page of the inbox, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InboxPage {
    #[serde(default)]
    pub messages: Vec<InboxMessage>,
    #[serde(default)]
    pub unread_count: u64,
    /// Absent on older backends; the pager then relies on page size.
    #[serde(default)]
    pub has_more: Option<bool>,
}

fn default_message_type() -> String {
    "text".to_string()
}

/// RFC 3339 timestamp; empty strings, nulls, and unparsable values read as `None`.
fn timestamp<'de, D>(de: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(de)?;
    Ok(raw
        .filter(|s| !s.is_empty())
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|dt| dt.with_timezone(&Utc)))
}

/// Boolean that SQLite-backed endpoints may send as `0`/`1`.
fn flag<'de, D>(de: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(de)? {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_i64().unwrap_or(0) != 0,
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_error_body_message() {
        let body: ErrorBody = serde_json::from_str(r#"{"detail":"Link not found"}"#).unwrap();
        assert_eq!(body.message(), Some("Link not found"));

        let body: ErrorBody =
            serde_json::from_str(r#"{"detail":[{"loc":["body","text"],"msg":"required"}]}"#)
                .unwrap();
        assert_eq!(body.message(), None);

        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.message(), None);
    }

    #[test]
    fn test_inbox_message_accepts_integer_read_flag() {
        let msg: InboxMessage = serde_json::from_str(
            r#"{"id":7,"sender_id":0,"sender_nickname":"Web visitor","message_text":"hi",
                "message_type":"text","created_at":"2025-03-01T10:00:00Z","read":1}"#,
        )
        .unwrap();
        assert!(msg.read);
        assert_eq!(
            msg.created_at,
            Some(Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_dashboard_tolerates_sparse_body() {
        let d: Dashboard = serde_json::from_str(
            r#"{"nickname":"Fox","registered_at":"","last_activity":"2025-01-02T03:04:05+00:00",
                "profile_public":true,"avatar":null}"#,
        )
        .unwrap();
        assert_eq!(d.nickname, "Fox");
        assert_eq!(d.registered_at, None);
        assert!(d.last_activity.is_some());
        assert_eq!(d.visibility.profile_public, Some(true));
        assert_eq!(d.visibility.profile_show_level, None);
    }

    #[test]
    fn test_profile_settings_serialize_only_set_fields() {
        let s = ProfileSettings {
            profile_public: Some(false),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_string(&s).unwrap(),
            r#"{"profile_public":false}"#
        );
        assert!(ProfileSettings::default().is_empty());
        assert!(!s.is_empty());
    }
}
