//! Translation table sources.
//!
//! Tables live at `i18n/<code>.json` relative to the app, as flat JSON
//! objects of string keys to string values.

use async_trait::async_trait;
use incognitus_core::{
    error::ClientError,
    lang::Lang,
    traits::{Table, TableSource},
};
use std::path::PathBuf;
use tracing::debug;
use url::Url;

/// Relative path of the table for `lang`.
pub fn table_path(lang: Lang) -> String {
    format!("i18n/{}.json", lang.code())
}

/// Parse a table body. Anything other than a flat string map is an error.
pub fn parse_table(body: &str) -> Result<Table, ClientError> {
    Ok(serde_json::from_str(body)?)
}

/// Fetches tables over HTTP relative to the app's base URL.
pub struct HttpTableSource {
    client: reqwest::Client,
    base: Url,
}

impl HttpTableSource {
    /// `base_url` is the directory the app is served from; a trailing slash
    /// is added when missing so `i18n/` resolves beneath it.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, ClientError> {
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base = Url::parse(&base)
            .map_err(|e| ClientError::Config(format!("invalid i18n base url {base_url}: {e}")))?;
        Ok(Self { client, base })
    }

    /// Absolute URL of the table for `lang`.
    pub fn url_for(&self, lang: Lang) -> Result<Url, ClientError> {
        self.base
            .join(&table_path(lang))
            .map_err(|e| ClientError::Config(format!("invalid table url: {e}")))
    }
}

#[async_trait]
impl TableSource for HttpTableSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, lang: Lang) -> Result<Table, ClientError> {
        let url = self.url_for(lang)?;
        debug!("i18n: GET {url}");

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("i18n request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::TranslationFetch {
                lang,
                status: status.as_u16(),
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| ClientError::Transport(format!("i18n body read failed: {e}")))?;
        parse_table(&body)
    }
}

/// Reads tables from a local directory laid out like the served `i18n/`.
pub struct DirTableSource {
    dir: PathBuf,
}

impl DirTableSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl TableSource for DirTableSource {
    fn name(&self) -> &str {
        "dir"
    }

    async fn fetch(&self, lang: Lang) -> Result<Table, ClientError> {
        let path = self.dir.join(format!("{}.json", lang.code()));
        debug!("i18n: reading {}", path.display());

        let body = match tokio::fs::read_to_string(&path).await {
            Ok(body) => body,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ClientError::TranslationFetch { lang, status: 404 });
            }
            Err(e) => return Err(e.into()),
        };
        parse_table(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Per-process scratch directory so concurrent test runs never share files.
    fn scratch_dir(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "__incognitus_test_{name}_{}__",
            std::process::id()
        ))
    }

    #[test]
    fn test_table_path() {
        assert_eq!(table_path(Lang::Fa), "i18n/fa.json");
    }

    #[test]
    fn test_url_for_adds_trailing_slash() {
        let src = HttpTableSource::new("https://lazez.uz/miniapp").unwrap();
        assert_eq!(
            src.url_for(Lang::Ru).unwrap().as_str(),
            "https://lazez.uz/miniapp/i18n/ru.json"
        );
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        assert!(matches!(
            HttpTableSource::new("not a url"),
            Err(ClientError::Config(_))
        ));
    }

    #[test]
    fn test_parse_table_rejects_nested_values() {
        assert!(parse_table(r#"{"a": "b"}"#).is_ok());
        assert!(parse_table(r#"{"a": {"b": "c"}}"#).is_err());
        assert!(parse_table(r#"["a"]"#).is_err());
        assert!(parse_table("").is_err());
    }

    #[tokio::test]
    async fn test_dir_source_missing_file_is_404() {
        let tmp = scratch_dir("i18n_missing");
        let _ = std::fs::remove_dir_all(&tmp);
        std::fs::create_dir_all(&tmp).unwrap();

        let err = DirTableSource::new(&tmp).fetch(Lang::Uz).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::TranslationFetch {
                lang: Lang::Uz,
                status: 404
            }
        ));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn test_dir_source_reads_table() {
        let tmp = scratch_dir("i18n_dir");
        let _ = std::fs::remove_dir_all(&tmp);
        std::fs::create_dir_all(&tmp).unwrap();
        std::fs::write(tmp.join("ru.json"), r#"{"send": "Отправить"}"#).unwrap();

        let table = DirTableSource::new(&tmp).fetch(Lang::Ru).await.unwrap();
        assert_eq!(table.get("send").map(String::as_str), Some("Отправить"));

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
