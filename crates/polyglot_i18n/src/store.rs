use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::format::apply_args;
use crate::message::{ArgValue, Message};
use crate::subscription::{Callback, Subscribers, Subscription, SubscriptionId};
use crate::tree::Translations;

#[cfg(any(feature = "yaml", feature = "json"))]
use crate::I18nError;

/// Language selected when nothing else has been configured.
pub const DEFAULT_LANGUAGE: &str = "pt";

/// Optional process-wide store.
static GLOBAL_STORE: OnceLock<TranslationStore> = OnceLock::new();

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

struct StoreInner {
    language: RwLock<String>,
    translations: RwLock<Arc<Translations>>,
    subscribers: Arc<Subscribers>,
}

/// Translation store: current language, dictionary, and change subscribers.
///
/// Cloning is cheap and yields another handle to the same store. Separate
/// stores created with [`TranslationStore::new`] share nothing.
///
/// Subscribers are notified synchronously, on the calling thread, after the
/// change is applied and every internal lock is released.
#[derive(Clone)]
pub struct TranslationStore {
    inner: Arc<StoreInner>,
}

impl Default for TranslationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslationStore {
    /// An empty store using [`DEFAULT_LANGUAGE`].
    pub fn new() -> Self {
        Self::with_language(DEFAULT_LANGUAGE)
    }

    pub fn with_language(lang: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                language: RwLock::new(lang.into()),
                translations: RwLock::new(Arc::new(Translations::new())),
                subscribers: Arc::new(Subscribers::new()),
            }),
        }
    }

    /// Initialize the process-wide store.
    ///
    /// Safe to call multiple times; the first call wins.
    pub fn init(lang: impl Into<String>) -> &'static TranslationStore {
        let lang = lang.into();
        GLOBAL_STORE.get_or_init(|| Self::with_language(lang))
    }

    /// The process-wide store, created with defaults on first use.
    pub fn global() -> &'static TranslationStore {
        GLOBAL_STORE.get_or_init(Self::new)
    }

    pub fn try_get() -> Option<&'static TranslationStore> {
        GLOBAL_STORE.get()
    }

    pub fn language(&self) -> String {
        read(&self.inner.language).clone()
    }

    /// Set the language without notifying subscribers (startup configuration).
    pub fn set_default_language(&self, lang: impl Into<String>) {
        let lang = lang.into();
        debug!("TranslationStore::set_default_language: {}", lang);
        *write(&self.inner.language) = lang;
    }

    /// Switch the language and notify subscribers.
    pub fn set_language(&self, lang: impl Into<String>) {
        let lang = lang.into();
        {
            let mut cur = write(&self.inner.language);
            debug!("TranslationStore::set_language: {} -> {}", *cur, lang);
            *cur = lang;
        }
        self.notify();
    }

    /// Snapshot of the current dictionary.
    pub fn translations(&self) -> Arc<Translations> {
        read(&self.inner.translations).clone()
    }

    pub fn has_translations(&self) -> bool {
        !read(&self.inner.translations).is_empty()
    }

    /// Install `translations` silently if the store has none yet; otherwise
    /// behave like [`set_translations`](Self::set_translations).
    pub fn set_default_translations(&self, translations: Translations) {
        let replaced_existing = {
            let mut cur = write(&self.inner.translations);
            let had_any = !cur.is_empty();
            debug!(
                languages = translations.len(),
                notify = had_any,
                "TranslationStore::set_default_translations"
            );
            *cur = Arc::new(translations);
            had_any
        };

        if replaced_existing {
            self.notify();
        }
    }

    /// Replace the whole dictionary and notify subscribers.
    pub fn set_translations(&self, translations: Translations) {
        debug!(
            languages = translations.len(),
            "TranslationStore::set_translations"
        );
        *write(&self.inner.translations) = Arc::new(translations);
        self.notify();
    }

    /// Parse a YAML dictionary and install it with [`set_translations`](Self::set_translations).
    #[cfg(feature = "yaml")]
    pub fn load_yaml_str(&self, src: &str) -> Result<(), I18nError> {
        self.set_translations(Translations::from_yaml_str(src)?);
        Ok(())
    }

    /// Parse a YAML dictionary and install it with
    /// [`set_default_translations`](Self::set_default_translations).
    #[cfg(feature = "yaml")]
    pub fn load_default_yaml_str(&self, src: &str) -> Result<(), I18nError> {
        self.set_default_translations(Translations::from_yaml_str(src)?);
        Ok(())
    }

    /// Parse a JSON dictionary and install it with [`set_translations`](Self::set_translations).
    #[cfg(feature = "json")]
    pub fn load_json_str(&self, src: &str) -> Result<(), I18nError> {
        self.set_translations(Translations::from_json_str(src)?);
        Ok(())
    }

    /// Parse a JSON dictionary and install it with
    /// [`set_default_translations`](Self::set_default_translations).
    #[cfg(feature = "json")]
    pub fn load_default_json_str(&self, src: &str) -> Result<(), I18nError> {
        self.set_default_translations(Translations::from_json_str(src)?);
        Ok(())
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let callback: Callback = Arc::new(callback);
        self.inner.subscribers.add(callback)
    }

    /// Like [`subscribe`](Self::subscribe), but unsubscribes when the guard drops.
    pub fn subscribe_guarded<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.subscribe(callback);
        Subscription::new(&self.inner.subscribers, id)
    }

    /// Remove a subscriber. Unknown or already-removed ids are ignored.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.subscribers.remove(id);
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }

    fn notify(&self) {
        self.inner.subscribers.notify();
    }

    /// Translate `path` in the current language.
    ///
    /// Falls back to `path` itself when the language or the key is missing.
    pub fn translate(&self, path: &str) -> String {
        self.resolve(path, std::iter::empty())
    }

    /// Translate `path`, substituting the first `{name}` token for each argument.
    pub fn translate_with<I, K, V>(&self, path: &str, args: I) -> String
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<ArgValue>,
    {
        let args: Vec<(K, ArgValue)> = args.into_iter().map(|(k, v)| (k, v.into())).collect();
        self.resolve(path, args.iter().map(|(k, v)| (k.as_ref(), v)))
    }

    /// Translate a [`Message`].
    pub fn tr(&self, msg: &Message) -> String {
        self.resolve(
            msg.path.as_ref(),
            msg.args.iter().map(|(k, v)| (k.as_ref(), v)),
        )
    }

    fn resolve<'a, I>(&self, path: &str, args: I) -> String
    where
        I: IntoIterator<Item = (&'a str, &'a ArgValue)>,
    {
        let lang = self.language();
        let translations = self.translations();

        match translations.lookup(&lang, path) {
            Some(tmpl) => apply_args(tmpl, args),
            None => path.to_string(),
        }
    }
}

impl std::fmt::Debug for TranslationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationStore")
            .field("language", &self.language())
            .field("languages", &self.translations().len())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
