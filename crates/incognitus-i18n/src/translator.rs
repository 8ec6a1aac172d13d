//! The translation loader.

use incognitus_core::{
    error::ClientError,
    lang::{primary_tag, Lang},
    traits::{Document, PrefStore, Table, TableSource},
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Storage key holding the last resolved language code.
pub const LANG_PREF_KEY: &str = "i18n_lang";

/// Body class removed once strings are in place.
pub const LOADING_CLASS: &str = "loading";

/// One cache slot per language. The cell stays empty until a fetch succeeds,
/// so a failed or malformed table is never cached.
type Slot = Arc<OnceCell<Arc<Table>>>;

/// The selected table and the default-language table backing it.
struct Active {
    lang: Lang,
    current: Arc<Table>,
    fallback: Arc<Table>,
}

/// Resolves a language into a pair of loaded tables and serves lookups.
///
/// Every instance owns its cache and active pair, so independent loaders
/// never observe each other.
pub struct Translator {
    source: Arc<dyn TableSource>,
    prefs: Arc<dyn PrefStore>,
    document: Arc<dyn Document>,
    cache: Mutex<HashMap<Lang, Slot>>,
    active: RwLock<Active>,
}

impl Translator {
    /// Create a loader with empty tables; `t` returns keys until the first load.
    pub fn new(
        source: Arc<dyn TableSource>,
        prefs: Arc<dyn PrefStore>,
        document: Arc<dyn Document>,
    ) -> Self {
        let empty = Arc::new(Table::new());
        Self {
            source,
            prefs,
            document,
            cache: Mutex::new(HashMap::new()),
            active: RwLock::new(Active {
                lang: Lang::DEFAULT,
                current: Arc::clone(&empty),
                fallback: empty,
            }),
        }
    }

    /// Return the table for `lang`, fetching it once if not cached.
    ///
    /// Concurrent calls for the same uncached language share one retrieval.
    pub async fn fetch_table(&self, lang: Lang) -> Result<Arc<Table>, ClientError> {
        let slot = {
            let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(cache.entry(lang).or_default())
        };

        if let Some(table) = slot.get() {
            debug!("i18n: cache hit for {lang}");
            return Ok(Arc::clone(table));
        }

        let table = slot
            .get_or_try_init(|| async {
                let table = self.source.fetch(lang).await?;
                info!(
                    "i18n: loaded {} strings for {lang} from {}",
                    table.len(),
                    self.source.name()
                );
                Ok::<_, ClientError>(Arc::new(table))
            })
            .await?;
        Ok(Arc::clone(table))
    }

    /// Normalize `code`, fetch its table plus the fallback, and make them active.
    ///
    /// Nothing is reassigned unless every required fetch succeeds.
    pub async fn load(&self, code: Option<&str>) -> Result<Lang, ClientError> {
        let lang = Lang::normalize(code);

        if let Err(e) = self.prefs.set(LANG_PREF_KEY, lang.code()) {
            debug!("i18n: could not persist language {lang}: {e}");
        }

        let (current, fallback) = if lang == Lang::DEFAULT {
            let table = self.fetch_table(lang).await?;
            (Arc::clone(&table), table)
        } else {
            tokio::try_join!(self.fetch_table(lang), self.fetch_table(Lang::DEFAULT))?
        };

        {
            let mut active = self.active.write().unwrap_or_else(PoisonError::into_inner);
            active.lang = lang;
            active.current = current;
            active.fallback = fallback;
        }
        self.document.set_rtl(lang.is_rtl());

        Ok(lang)
    }

    /// Look up `key`: current table, then fallback, then the key itself.
    pub fn t(&self, key: &str) -> String {
        let active = self.active.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(value) = active.current.get(key).filter(|v| !v.is_empty()) {
            return value.clone();
        }
        if let Some(value) = active.fallback.get(key).filter(|v| !v.is_empty()) {
            return value.clone();
        }
        debug!("i18n: missing string '{key}' in {}", active.lang);
        key.to_string()
    }

    /// Write the active strings into the document and clear the loading flag.
    pub fn apply(&self) {
        self.document.translate_elements(&|key| self.t(key));
        self.document.remove_body_class(LOADING_CLASS);
    }

    /// Pick the startup language, load it, and apply it.
    ///
    /// Order of preference: stored choice, the host's locale, the default.
    pub async fn detect(&self, host_locale: Option<&str>) -> Result<Lang, ClientError> {
        let stored = match self.prefs.get(LANG_PREF_KEY) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                debug!("i18n: could not read stored language: {e}");
                None
            }
        };

        let wanted = stored.or_else(|| host_locale.map(primary_tag));
        let lang = self.load(wanted.as_deref()).await?;
        self.apply();
        Ok(lang)
    }

    /// The active language.
    pub fn current_lang(&self) -> Lang {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .lang
    }

    /// Every supported language, in picker order.
    pub fn available(&self) -> &'static [Lang] {
        &Lang::ALL
    }

    /// Display name of `lang` from its own `lang_name` string when that table
    /// is cached, otherwise the upper-cased code.
    pub fn display_name(&self, lang: Lang) -> String {
        let slot = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&lang)
            .cloned();

        slot.and_then(|slot| slot.get().and_then(|t| t.get("lang_name").cloned()))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| lang.code().to_uppercase())
    }
}
