use anyhow::{bail, Context as _};
use incognitus_api::types::ProfileSettings;
use incognitus_api::BackendClient;
use incognitus_bridge::{Bridge, StaticHost};
use incognitus_core::config::{shellexpand, Config};
use incognitus_core::lang::Lang;
use incognitus_core::traits::{HostBridge, NotificationKind, TableSource};
use incognitus_i18n::{DirTableSource, FilePrefs, HttpTableSource, MemoryDocument, Translator};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Everything a command needs: config, host bridge and backend client.
pub struct App {
    cfg: Config,
    bridge: Bridge,
    backend: BackendClient,
}

impl App {
    /// `init_data` from the CLI wins over `host.init_data` from the config.
    pub fn new(cfg: Config, init_data: Option<String>) -> anyhow::Result<Self> {
        let init_data = init_data.unwrap_or_else(|| cfg.host.init_data.clone());
        let bridge = if init_data.is_empty() {
            Bridge::absent()
        } else {
            let host: Arc<dyn HostBridge> =
                Arc::new(StaticHost::new(init_data, cfg.host.platform.clone()));
            Bridge::new(Some(host))
        };
        bridge.ready();

        let backend = BackendClient::new(&cfg.backend.base_url)?;
        Ok(Self {
            cfg,
            bridge,
            backend,
        })
    }

    pub async fn lang(&self, set: Option<&str>, keys: &[String]) -> anyhow::Result<()> {
        let doc = Arc::new(MemoryDocument::with_keys(keys.iter().cloned()));
        let translator = Translator::new(
            self.table_source()?,
            Arc::new(FilePrefs::new(self.prefs_path())),
            doc.clone(),
        );

        let lang = match set {
            Some(code) => {
                let wanted: Lang = code.parse()?;
                let lang = translator.load(Some(wanted.code())).await?;
                translator.apply();
                lang
            }
            None => {
                let limit = Duration::from_secs(self.cfg.i18n.detect_timeout_secs);
                tokio::time::timeout(limit, translator.detect(self.bridge.user_language()))
                    .await
                    .context("language detection timed out")??
            }
        };

        println!("{lang} ({}, {})", translator.display_name(lang), doc.dir());
        for key in keys {
            println!("{key} = {}", doc.text_of(key).unwrap_or_default());
        }
        Ok(())
    }

    pub async fn health(&self) -> anyhow::Result<()> {
        let health = self.backend.health().await?;
        match health.port {
            Some(port) => println!("{} (port {port})", health.status),
            None => println!("{}", health.status),
        }
        Ok(())
    }

    pub async fn link(&self, token: &str) -> anyhow::Result<()> {
        let link = self.backend.link(token).await?;
        println!("Send an anonymous message to {}", link.nickname);
        Ok(())
    }

    pub async fn send(&self, token: &str, text: &str) -> anyhow::Result<()> {
        self.with_progress(self.backend.send_message(token, text))
            .await?;
        println!("Message sent.");
        Ok(())
    }

    pub async fn dashboard(&self) -> anyhow::Result<()> {
        let init_data = self.require_init_data()?;
        let d = self
            .with_progress(self.backend.dashboard(init_data))
            .await?;

        println!("Nickname:          {}", d.nickname);
        println!("Messages sent:     {}", d.messages_sent);
        println!("Messages received: {}", d.messages_received);
        if let Some(at) = d.registered_at {
            println!("Registered:        {}", at.format("%Y-%m-%d"));
        }
        if let Some(at) = d.last_activity {
            println!("Last activity:     {}", at.format("%Y-%m-%d %H:%M UTC"));
        }
        if !d.link_token.is_empty() && !d.bot_username.is_empty() {
            println!(
                "Share link:        https://t.me/{}?start={}",
                d.bot_username, d.link_token
            );
        }
        if let Some(public) = d.visibility.profile_public {
            println!(
                "Profile:           {}",
                if public { "public" } else { "private" }
            );
        }
        Ok(())
    }

    pub async fn profile(&self, token: &str) -> anyhow::Result<()> {
        let p = self.backend.profile(token).await?;
        println!("{}", p.nickname);
        if let Some(level) = p.level {
            println!("  level:       {level}");
        }
        if let Some(days) = p.active_days {
            println!("  active days: {days}");
        }
        if let Some(at) = p.registered_at {
            println!("  registered:  {}", at.format("%Y-%m-%d"));
        }
        if let Some(at) = p.last_seen {
            println!("  last seen:   {}", at.format("%Y-%m-%d %H:%M UTC"));
        }
        Ok(())
    }

    pub async fn visibility(&self, settings: &ProfileSettings) -> anyhow::Result<()> {
        if settings.is_empty() {
            bail!("nothing to change. Pass at least one of --public, --last-seen, --level, --active-days, --registered");
        }
        let init_data = self.require_init_data()?;
        self.with_progress(self.backend.update_profile(init_data, settings))
            .await?;
        println!("Profile updated.");
        Ok(())
    }

    pub async fn inbox(&self, offset: u64, limit: u32, all: bool) -> anyhow::Result<()> {
        let init_data = self.require_init_data()?;

        let messages = if all {
            self.backend
                .inbox_pager(init_data, limit)
                .collect_all()
                .await?
        } else {
            let page = self.backend.inbox(init_data, offset, limit).await?;
            println!("{} unread", page.unread_count);
            page.messages
        };

        for m in &messages {
            let at = m
                .created_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            let mark = if m.read { ' ' } else { '*' };
            println!("{mark} [{}] {at} {}: {}", m.id, m.sender_nickname, m.message_text);
        }
        info!("inbox: listed {} messages", messages.len());
        Ok(())
    }

    pub async fn read(&self, id: i64) -> anyhow::Result<()> {
        let init_data = self.require_init_data()?;
        self.backend.mark_read(init_data, id).await?;
        println!("Message {id} marked as read.");
        Ok(())
    }

    pub async fn avatar_upload(&self, path: &str) -> anyhow::Result<()> {
        let init_data = self.require_init_data()?;
        let path = PathBuf::from(shellexpand(path));
        let mime = image_mime(&path)?;
        let image = tokio::fs::read(&path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "avatar".to_string());

        let info = self
            .with_progress(
                self.backend
                    .upload_avatar(init_data, image, &file_name, mime),
            )
            .await?;
        match info.avatar_url {
            Some(url) => println!("Avatar uploaded: {url}"),
            None => println!("Avatar uploaded."),
        }
        Ok(())
    }

    pub async fn avatar_delete(&self) -> anyhow::Result<()> {
        let init_data = self.require_init_data()?;
        self.with_progress(self.backend.delete_avatar(init_data))
            .await?;
        println!("Avatar removed.");
        Ok(())
    }

    pub fn story_card(&self, token: &str) -> anyhow::Result<()> {
        println!("{}", self.backend.story_card_url(token)?);
        Ok(())
    }

    fn require_init_data(&self) -> anyhow::Result<&str> {
        if !self.bridge.is_embedded() {
            bail!("no launch payload. Set host.init_data in the config or INCOGNITUS_INIT_DATA");
        }
        Ok(self.bridge.init_data())
    }

    /// Run a user-initiated call with the host's progress indicator and a
    /// success/error haptic afterwards.
    async fn with_progress<T, F>(&self, call: F) -> Result<T, incognitus_core::error::ClientError>
    where
        F: Future<Output = Result<T, incognitus_core::error::ClientError>>,
    {
        self.bridge.show_progress();
        let result = call.await;
        self.bridge.hide_progress();

        match &result {
            Ok(_) => self.bridge.haptic_notification(NotificationKind::Success),
            Err(e) => {
                warn!("request failed: {e}");
                self.bridge.haptic_notification(NotificationKind::Error);
            }
        }
        result
    }

    fn table_source(&self) -> anyhow::Result<Arc<dyn TableSource>> {
        let i18n = &self.cfg.i18n;
        if i18n.dir.is_empty() {
            Ok(Arc::new(HttpTableSource::new(&i18n.base_url)?))
        } else {
            Ok(Arc::new(DirTableSource::new(shellexpand(&i18n.dir))))
        }
    }

    /// Relative prefs paths live under `data_dir`.
    fn prefs_path(&self) -> PathBuf {
        let prefs = PathBuf::from(shellexpand(&self.cfg.i18n.prefs_file));
        if prefs.is_absolute() {
            prefs
        } else {
            Path::new(&shellexpand(&self.cfg.incognitus.data_dir)).join(prefs)
        }
    }
}

/// The backend accepts PNG and JPEG only.
fn image_mime(path: &Path) -> anyhow::Result<&'static str> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        _ => bail!("unsupported image type for {}: use .png or .jpg", path.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(init_data: Option<&str>) -> App {
        let mut cfg = Config::default();
        cfg.incognitus.data_dir = "/var/lib/incognitus".to_string();
        App::new(cfg, init_data.map(str::to_string)).unwrap()
    }

    #[test]
    fn test_image_mime() {
        assert_eq!(image_mime(Path::new("me.PNG")).unwrap(), "image/png");
        assert_eq!(image_mime(Path::new("/tmp/me.jpeg")).unwrap(), "image/jpeg");
        assert!(image_mime(Path::new("me.gif")).is_err());
        assert!(image_mime(Path::new("avatar")).is_err());
    }

    #[test]
    fn test_absent_host_has_no_init_data() {
        let app = app(None);
        assert!(!app.bridge.is_present());
        assert!(app.require_init_data().is_err());
    }

    #[test]
    fn test_cli_init_data_wins() {
        let app = app(Some("query_id=q&auth_date=1&hash=h"));
        assert!(app.bridge.is_embedded());
        assert_eq!(
            app.require_init_data().unwrap(),
            "query_id=q&auth_date=1&hash=h"
        );
    }

    #[test]
    fn test_relative_prefs_path_uses_data_dir() {
        let mut app = app(None);
        app.cfg.i18n.prefs_file = "prefs.json".to_string();
        assert_eq!(
            app.prefs_path(),
            PathBuf::from("/var/lib/incognitus/prefs.json")
        );
        app.cfg.i18n.prefs_file = "/etc/incognitus/prefs.json".to_string();
        assert_eq!(
            app.prefs_path(),
            PathBuf::from("/etc/incognitus/prefs.json")
        );
    }
}
