use incognitus_core::error::ClientError;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::pager::InboxPager;
use crate::types::{
    Ack, AvatarInfo, Dashboard, ErrorBody, Health, InboxPage, LinkInfo, Profile, ProfileSettings,
    SendRequest,
};

/// Header carrying the raw launch payload on authenticated calls.
pub const INIT_DATA_HEADER: &str = "X-Init-Data";

/// Client for the backend REST API rooted at one origin.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base: Url,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, ClientError> {
        let base = Url::parse(base_url)
            .map_err(|e| ClientError::Config(format!("invalid backend url {base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::Config(format!(
                "backend url {base_url} cannot be a base"
            )));
        }
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `GET /api/health`
    pub async fn health(&self) -> Result<Health, ClientError> {
        let req = self.client.get(self.url(&["api", "health"])?);
        self.execute(req, "Backend unavailable").await
    }

    /// `GET /api/link/{token}`: recipient of a share link.
    pub async fn link(&self, token: &str) -> Result<LinkInfo, ClientError> {
        let req = self.client.get(self.url(&["api", "link", token])?);
        self.execute(req, "Failed to load link").await
    }

    /// `POST /api/send`: deliver an anonymous message through a share link.
    pub async fn send_message(&self, token: &str, text: &str) -> Result<Ack, ClientError> {
        let req = self
            .client
            .post(self.url(&["api", "send"])?)
            .json(&SendRequest { token, text });
        self.execute(req, "Failed to send message").await
    }

    /// `GET /api/dashboard` (authenticated).
    pub async fn dashboard(&self, init_data: &str) -> Result<Dashboard, ClientError> {
        let req = self
            .client
            .get(self.url(&["api", "dashboard"])?)
            .header(INIT_DATA_HEADER, init_data);
        self.execute(req, "Failed to load dashboard").await
    }

    /// `GET /api/profile/{token}`: public profile by profile token.
    pub async fn profile(&self, token: &str) -> Result<Profile, ClientError> {
        let req = self.client.get(self.url(&["api", "profile", token])?);
        self.execute(req, "Failed to load profile").await
    }

    /// `POST /api/profile` (authenticated): change visibility toggles.
    pub async fn update_profile(
        &self,
        init_data: &str,
        settings: &ProfileSettings,
    ) -> Result<Ack, ClientError> {
        let req = self
            .client
            .post(self.url(&["api", "profile"])?)
            .header(INIT_DATA_HEADER, init_data)
            .json(settings);
        self.execute(req, "Failed to update profile").await
    }

    /// `POST /api/avatar` (authenticated, multipart field `file`).
    pub async fn upload_avatar(
        &self,
        init_data: &str,
        image: Vec<u8>,
        file_name: &str,
        mime: &str,
    ) -> Result<AvatarInfo, ClientError> {
        let part = reqwest::multipart::Part::bytes(image)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .map_err(|e| ClientError::Transport(format!("avatar mime error: {e}")))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let req = self
            .client
            .post(self.url(&["api", "avatar"])?)
            .header(INIT_DATA_HEADER, init_data)
            .multipart(form);
        self.execute(req, "Failed to upload avatar").await
    }

    /// `DELETE /api/avatar` (authenticated).
    pub async fn delete_avatar(&self, init_data: &str) -> Result<Ack, ClientError> {
        let req = self
            .client
            .delete(self.url(&["api", "avatar"])?)
            .header(INIT_DATA_HEADER, init_data);
        self.execute(req, "Failed to delete avatar").await
    }

    /// `GET /api/inbox?offset=&limit=` (authenticated).
    pub async fn inbox(
        &self,
        init_data: &str,
        offset: u64,
        limit: u32,
    ) -> Result<InboxPage, ClientError> {
        let req = self
            .client
            .get(self.url(&["api", "inbox"])?)
            .query(&[("offset", offset.to_string()), ("limit", limit.to_string())])
            .header(INIT_DATA_HEADER, init_data);
        self.execute(req, "Failed to load inbox").await
    }

    /// Walk the whole inbox page by page.
    pub fn inbox_pager<'a>(&'a self, init_data: &'a str, page_size: u32) -> InboxPager<'a> {
        InboxPager::new(self, init_data, page_size)
    }

    /// `POST /api/inbox/{id}/read` (authenticated).
    pub async fn mark_read(&self, init_data: &str, message_id: i64) -> Result<Ack, ClientError> {
        let id = message_id.to_string();
        let req = self
            .client
            .post(self.url(&["api", "inbox", id.as_str(), "read"])?)
            .header(INIT_DATA_HEADER, init_data);
        self.execute(req, "Failed to mark message as read").await
    }

    /// Shareable story-card image for a link token. No request is made.
    pub fn story_card_url(&self, token: &str) -> Result<Url, ClientError> {
        self.url(&["api", "story-card", token])
    }

    /// Base URL with `segments` appended, each percent-encoded.
    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Config(format!("cannot extend {}", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send `req`, map non-2xx replies to [`ClientError::Fetch`], parse the body.
    async fn execute<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        default_message: &str,
    ) -> Result<T, ClientError> {
        let resp = req
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("backend request failed: {e}")))?;

        let status = resp.status();
        let url = resp.url().clone();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message().map(str::to_string))
                .unwrap_or_else(|| default_message.to_string());
            warn!("backend {} {url}: {message}", status.as_u16());
            return Err(ClientError::Fetch {
                status: status.as_u16(),
                message,
            });
        }

        debug!("backend {} {url}", status.as_u16());
        let body = resp
            .text()
            .await
            .map_err(|e| ClientError::Transport(format!("backend body read failed: {e}")))?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_encodes_segments() {
        let client = BackendClient::new("https://lazez.uz").unwrap();
        assert_eq!(
            client.url(&["api", "link", "a b/c"]).unwrap().as_str(),
            "https://lazez.uz/api/link/a%20b%2Fc"
        );
    }

    #[test]
    fn test_url_keeps_base_path() {
        let client = BackendClient::new("https://example.com/prefix/").unwrap();
        assert_eq!(
            client.url(&["api", "health"]).unwrap().as_str(),
            "https://example.com/prefix/api/health"
        );
    }

    #[test]
    fn test_story_card_url() {
        let client = BackendClient::new("https://lazez.uz").unwrap();
        assert_eq!(
            client.story_card_url("abc123").unwrap().as_str(),
            "https://lazez.uz/api/story-card/abc123"
        );
    }

    #[test]
    fn test_rejects_non_base_url() {
        assert!(matches!(
            BackendClient::new("mailto:someone@example.com"),
            Err(ClientError::Config(_))
        ));
        assert!(matches!(
            BackendClient::new("lazez.uz"),
            Err(ClientError::Config(_))
        ));
    }
}
