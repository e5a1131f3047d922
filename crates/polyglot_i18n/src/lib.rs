//! Polyglot internationalization (i18n)
//!
//! A translation store for component-based UIs:
//! - Nested translation dictionaries keyed by language, resolved by dotted path
//!   (`"inbox.empty.label"`), falling back to the path itself when missing
//! - `{name}` placeholder substitution
//! - Change subscriptions so mounted components can re-render when the
//!   language or dictionary changes
//! - Dictionaries loaded from YAML (`yaml` feature) or JSON (`json` feature),
//!   optionally driven by a TOML [`I18nConfig`]

mod binding;
mod config;
mod error;
mod format;
mod message;
mod store;
mod subscription;
mod tree;

pub use binding::{Translate, Translator, WithTranslation};
pub use config::{CatalogFormat, CatalogSource, I18nConfig};
pub use error::I18nError;
pub use message::{ArgValue, Message};
pub use store::{TranslationStore, DEFAULT_LANGUAGE};
pub use subscription::{Callback, Subscription, SubscriptionId};
pub use tree::{TranslationNode, TranslationTree, Translations};

/// Translate a path with the process-wide [`TranslationStore`].
pub fn translate(path: &str) -> String {
    TranslationStore::global().translate(path)
}

/// Convenience macro for building a translation path + args as a [`Message`].
///
/// Examples:
/// - `t!("app.title")`
/// - `t!("inbox.summary", { name: user_name, count: 3 })`
#[macro_export]
macro_rules! t {
    ($path:literal) => {
        $crate::Message::new($path)
    };
    ($path:literal, { $($name:ident : $value:expr),* $(,)? }) => {{
        let mut m = $crate::Message::new($path);
        $(
            m = m.arg(stringify!($name), $value);
        )*
        m
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn macro_builds_messages() {
        assert_eq!(t!("app.title"), Message::new("app.title"));

        let count = 3;
        let m = t!("inbox.summary", { name: "Ana", count: count });
        assert_eq!(
            m,
            Message::new("inbox.summary").arg("name", "Ana").arg("count", 3)
        );
    }
}
