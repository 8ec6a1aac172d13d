//! Launch payload parsing.
//!
//! The container passes a url-encoded query string (`query_id=..&user=..&
//! auth_date=..&hash=..`). The backend verifies its signature; the client only
//! reads it, so nothing here is trusted for authorization.

use incognitus_core::error::ClientError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The container user, as embedded in the `user` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebAppUser {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    /// IETF tag of the user's client language (`"fa-IR"`, `"en"`).
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default)]
    pub is_premium: Option<bool>,
}

/// Unverified structured view of the launch string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchPayload {
    pub query_id: Option<String>,
    pub user: Option<WebAppUser>,
    pub auth_date: Option<i64>,
    pub hash: Option<String>,
    pub start_param: Option<String>,
}

impl LaunchPayload {
    /// Parse the raw launch string. Empty input yields an empty payload.
    ///
    /// Unknown fields are ignored; a `user` field that is not valid JSON is
    /// an error.
    pub fn parse(init_data: &str) -> Result<Self, ClientError> {
        let mut payload = Self::default();

        for (key, value) in url::form_urlencoded::parse(init_data.as_bytes()) {
            match key.as_ref() {
                "query_id" => payload.query_id = Some(value.into_owned()),
                "user" => payload.user = Some(serde_json::from_str(&value)?),
                "auth_date" => match value.parse() {
                    Ok(ts) => payload.auth_date = Some(ts),
                    Err(_) => debug!("bridge: ignoring non-numeric auth_date {value:?}"),
                },
                "hash" => payload.hash = Some(value.into_owned()),
                "start_param" => payload.start_param = Some(value.into_owned()),
                _ => {}
            }
        }

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "query_id=AAHdF6IQAAAAAN0XohDhrOrc\
        &user=%7B%22id%22%3A279058397%2C%22first_name%22%3A%22Vlad%22%2C\
        %22username%22%3A%22vdkfrost%22%2C%22language_code%22%3A%22fa-IR%22%7D\
        &auth_date=1662771648&hash=c501b71e775f74ce10e377dea85a7ea24ecd640b223ea86dfe453e0eaed2e2b2";

    #[test]
    fn test_parse_full_payload() {
        let p = LaunchPayload::parse(SAMPLE).unwrap();
        assert_eq!(p.query_id.as_deref(), Some("AAHdF6IQAAAAAN0XohDhrOrc"));
        assert_eq!(p.auth_date, Some(1662771648));
        let user = p.user.unwrap();
        assert_eq!(user.id, 279058397);
        assert_eq!(user.first_name, "Vlad");
        assert_eq!(user.username.as_deref(), Some("vdkfrost"));
        assert_eq!(user.language_code.as_deref(), Some("fa-IR"));
        assert!(p.hash.is_some());
    }

    #[test]
    fn test_parse_empty_is_default() {
        assert_eq!(LaunchPayload::parse("").unwrap(), LaunchPayload::default());
    }

    #[test]
    fn test_parse_without_user() {
        let p = LaunchPayload::parse("start_param=ref42&auth_date=abc").unwrap();
        assert!(p.user.is_none());
        assert_eq!(p.start_param.as_deref(), Some("ref42"));
        assert_eq!(p.auth_date, None);
    }

    #[test]
    fn test_parse_bad_user_json_errors() {
        let err = LaunchPayload::parse("user=%7Bnot-json").unwrap_err();
        assert!(matches!(err, ClientError::Serialization(_)));
    }
}
