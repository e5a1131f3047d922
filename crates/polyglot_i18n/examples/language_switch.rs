//! Language switching demo
//!
//! Run with:
//! `cargo run -p polyglot_i18n --example language_switch`

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use polyglot_i18n::{t, I18nError, TranslationStore};

fn main() -> Result<(), I18nError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let store = TranslationStore::init("en");
    store.load_default_yaml_str(include_str!("../tests/fixtures/app.yaml"))?;

    let renders = Arc::new(AtomicUsize::new(0));
    let r = renders.clone();
    let inbox = store.use_translation(Some("inbox"), move || {
        r.fetch_add(1, Ordering::SeqCst);
    });

    for lang in ["en", "pt", "fr"] {
        store.set_language(lang);
        println!("[{lang}] {}", store.translate("greeting"));
        println!("[{lang}] {}", inbox.t("title"));
        println!(
            "[{lang}] {}",
            store.tr(&t!("inbox.summary", { name: "Ana", count: 3 }))
        );
    }

    println!("re-rendered {} times", renders.load(Ordering::SeqCst));
    Ok(())
}
