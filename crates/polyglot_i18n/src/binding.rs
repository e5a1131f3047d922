//! UI binding adapters.
//!
//! - [`Translator`]: hook-style. Created when a component mounts, it keeps a
//!   subscription alive that asks the component to re-render, and translates
//!   paths relative to an optional base path. Dropping it unsubscribes.
//! - [`WithTranslation`]: wrapper-style. Pairs a component value with a
//!   [`Translator`] and derefs to the component.

use std::borrow::Cow;
use std::ops::{Deref, DerefMut};

use crate::message::{ArgValue, Message};
use crate::store::TranslationStore;
use crate::subscription::{Subscription, SubscriptionId};

/// Anything that can turn a [`Message`] into display text.
pub trait Translate {
    fn tr(&self, msg: &Message) -> String;

    fn t(&self, path: &str) -> String {
        self.tr(&Message::new(path.to_string()))
    }
}

impl Translate for TranslationStore {
    fn tr(&self, msg: &Message) -> String {
        TranslationStore::tr(self, msg)
    }
}

fn join_path<'a>(base: Option<&str>, path: &'a str) -> Cow<'a, str> {
    match base {
        Some(base) if !base.is_empty() => Cow::Owned(format!("{base}.{path}")),
        _ => Cow::Borrowed(path),
    }
}

/// Translation handle bound to a store and an optional base path.
pub struct Translator {
    store: TranslationStore,
    base_path: Option<String>,
    subscription: Subscription,
}

impl TranslationStore {
    /// Hook-style binding: subscribe `on_change` for as long as the returned
    /// [`Translator`] lives.
    pub fn use_translation<F>(&self, base_path: Option<&str>, on_change: F) -> Translator
    where
        F: Fn() + Send + Sync + 'static,
    {
        Translator {
            store: self.clone(),
            base_path: base_path.map(str::to_string),
            subscription: self.subscribe_guarded(on_change),
        }
    }
}

impl Translator {
    pub fn t(&self, path: &str) -> String {
        self.store
            .translate(&join_path(self.base_path.as_deref(), path))
    }

    pub fn t_with<I, K, V>(&self, path: &str, args: I) -> String
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<ArgValue>,
    {
        self.store
            .translate_with(&join_path(self.base_path.as_deref(), path), args)
    }

    pub fn base_path(&self) -> Option<&str> {
        self.base_path.as_deref()
    }

    pub fn subscription_id(&self) -> SubscriptionId {
        self.subscription.id()
    }

    pub fn store(&self) -> &TranslationStore {
        &self.store
    }
}

impl Translate for Translator {
    fn tr(&self, msg: &Message) -> String {
        match self.base_path.as_deref() {
            Some(base) => self.store.tr(&msg.scoped(base)),
            None => self.store.tr(msg),
        }
    }

    fn t(&self, path: &str) -> String {
        Translator::t(self, path)
    }
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("base_path", &self.base_path)
            .field("subscription", &self.subscription.id())
            .finish()
    }
}

/// A component wrapped with a translation capability.
pub struct WithTranslation<C> {
    component: C,
    translator: Translator,
}

impl<C> WithTranslation<C> {
    pub fn new<F>(
        store: &TranslationStore,
        component: C,
        base_path: Option<&str>,
        on_change: F,
    ) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            component,
            translator: store.use_translation(base_path, on_change),
        }
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn t(&self, path: &str) -> String {
        self.translator.t(path)
    }

    pub fn t_with<I, K, V>(&self, path: &str, args: I) -> String
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<ArgValue>,
    {
        self.translator.t_with(path, args)
    }

    /// Unwrap the component; its subscription ends here.
    pub fn into_inner(self) -> C {
        self.component
    }
}

impl<C> Translate for WithTranslation<C> {
    fn tr(&self, msg: &Message) -> String {
        self.translator.tr(msg)
    }
}

impl<C> Deref for WithTranslation<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.component
    }
}

impl<C> DerefMut for WithTranslation<C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut self.component
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{TranslationTree, Translations};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn store() -> TranslationStore {
        let store = TranslationStore::with_language("en");
        store.set_default_translations(Translations::new().with_language(
            "en",
            TranslationTree::new().text("title", "App").tree(
                "settings",
                TranslationTree::new()
                    .text("title", "Settings")
                    .text("hello", "Hello {name}"),
            ),
        ));
        store
    }

    #[test]
    fn base_path_is_joined_with_dot() {
        let store = store();
        let scoped = store.use_translation(Some("settings"), || {});
        assert_eq!(scoped.t("title"), "Settings");
        assert_eq!(scoped.t_with("hello", [("name", "Ana")]), "Hello Ana");
        assert_eq!(scoped.t("missing"), "settings.missing");

        let root = store.use_translation(None, || {});
        assert_eq!(root.t("title"), "App");

        let empty = store.use_translation(Some(""), || {});
        assert_eq!(empty.t("title"), "App");
    }

    #[test]
    fn translator_rerenders_until_dropped() {
        let store = store();
        let renders = Arc::new(AtomicUsize::new(0));
        let r = renders.clone();
        let translator = store.use_translation(None, move || {
            r.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(store.subscriber_count(), 1);

        store.set_language("pt");
        drop(translator);
        store.set_language("en");

        assert_eq!(renders.load(Ordering::SeqCst), 1);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[derive(Debug, PartialEq)]
    struct Header {
        id: u32,
    }

    impl Header {
        const KIND: &'static str = "header";

        fn render(&self, t: &impl Translate) -> String {
            format!("[{}] {}", self.id, t.t("title"))
        }
    }

    #[test]
    fn wrapper_exposes_component_and_translation() {
        let store = store();
        let mut wrapped = WithTranslation::new(&store, Header { id: 7 }, Some("settings"), || {});

        assert_eq!(wrapped.id, 7);
        wrapped.id = 8;
        assert_eq!(Header::KIND, "header");
        assert_eq!(wrapped.render(&wrapped), "[8] Settings");
        assert_eq!(
            wrapped.tr(&Message::new("hello").arg("name", "Bo")),
            "Hello Bo"
        );

        let header = wrapped.into_inner();
        assert_eq!(header, Header { id: 8 });
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn store_itself_translates() {
        let store = store();
        assert_eq!(Translate::t(&store, "settings.title"), "Settings");
    }
}
