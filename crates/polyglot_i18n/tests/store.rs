use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use polyglot_i18n::{t, I18nConfig, TranslationStore, TranslationTree, Translations};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn greetings() -> Translations {
    Translations::new()
        .with_language("en", TranslationTree::new().text("greeting", "Hi"))
        .with_language("pt", TranslationTree::new().text("greeting", "Oi"))
}

#[test]
fn greeting_scenario() {
    init_tracing();
    let store = TranslationStore::new();
    store.set_default_language("en");
    store.set_default_translations(greetings());

    assert_eq!(store.translate("greeting"), "Hi");
    store.set_language("pt");
    assert_eq!(store.translate("greeting"), "Oi");
    assert_eq!(store.translate("missing.path"), "missing.path");
}

#[test]
fn unselected_language_is_unreachable() {
    let store = TranslationStore::with_language("pt");
    store.set_translations(
        Translations::new().with_language("en", TranslationTree::new().text("only_en", "English")),
    );
    assert_eq!(store.translate("only_en"), "only_en");
}

#[test]
fn subscriber_ids_strictly_increase() {
    let store = TranslationStore::new();
    let mut last = 0;
    for _ in 0..5 {
        let id = store.subscribe(|| {});
        assert!(id.get() > last);
        last = id.get();
        store.unsubscribe(id);
    }
    assert_eq!(store.subscriber_count(), 0);
}

#[test]
fn every_live_subscriber_runs_once_per_change() {
    let store = TranslationStore::new();
    let log = Arc::new(Mutex::new(Vec::new()));

    let ids: Vec<_> = (0..3)
        .map(|n| {
            let log = log.clone();
            store.subscribe(move || log.lock().unwrap().push(n))
        })
        .collect();
    store.unsubscribe(ids[1]);

    store.set_translations(greetings());
    let mut seen = log.lock().unwrap().clone();
    seen.sort_unstable();
    assert_eq!(seen, vec![0, 2]);
}

#[test]
fn subscriber_can_switch_language_without_deadlock() {
    let store = TranslationStore::with_language("en");
    store.set_default_translations(greetings());

    let calls = Arc::new(AtomicUsize::new(0));
    let (s, c) = (store.clone(), calls.clone());
    store.subscribe(move || {
        // Only the first notification switches again.
        if c.fetch_add(1, Ordering::SeqCst) == 0 {
            s.set_language("pt");
        }
    });

    store.set_language("en");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(store.translate("greeting"), "Oi");
}

#[test]
fn config_loads_and_merges_catalogs() {
    init_tracing();
    let cfg = I18nConfig::load(fixture("i18n.toml")).unwrap();
    assert_eq!(cfg.default_language, "en");
    assert_eq!(cfg.catalogs.len(), 2);

    let store = TranslationStore::from_config(&cfg).unwrap();
    assert_eq!(store.language(), "en");
    assert_eq!(store.translate("inbox.title"), "Mailbox");
    assert_eq!(
        store.tr(&t!("inbox.summary", { name: "Ana", count: 3 })),
        "Hello Ana, you have 3 messages"
    );

    store.set_language("es");
    assert_eq!(store.translate("greeting"), "Hola");
    assert_eq!(store.translate("inbox.title"), "inbox.title");

    store.set_language("pt");
    assert_eq!(store.translate("inbox.title"), "Caixa de entrada");
}

#[test]
fn scoped_translator_follows_language_changes() {
    let store = TranslationStore::with_language("en");
    store
        .load_default_yaml_str(include_str!("fixtures/app.yaml"))
        .unwrap();

    let renders = Arc::new(AtomicUsize::new(0));
    let r = renders.clone();
    let inbox = store.use_translation(Some("inbox"), move || {
        r.fetch_add(1, Ordering::SeqCst);
    });

    assert_eq!(inbox.t("title"), "Inbox");
    store.set_language("pt");
    assert_eq!(inbox.t("title"), "Caixa de entrada");
    assert_eq!(
        inbox.t_with("summary", [("name", "Ana"), ("count", "2")]),
        "Olá Ana, você tem 2 mensagens"
    );
    assert_eq!(renders.load(Ordering::SeqCst), 1);
}

#[test]
fn global_store_is_shared() {
    let a = TranslationStore::global();
    let b = TranslationStore::init("en");
    assert!(std::ptr::eq(a, b));
    assert!(TranslationStore::try_get().is_some());
    assert_eq!(polyglot_i18n::translate("no.such.key"), "no.such.key");
}
