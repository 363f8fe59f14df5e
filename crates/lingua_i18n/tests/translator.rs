use std::fs;
use std::sync::Arc;
use std::thread;

use lingua_i18n::files::{FilesResources, ResourceDir};
use lingua_i18n::{msg, I18nError, Message, Resource, Resources, Translator};
use pretty_assertions::assert_eq;

fn none() -> [(&'static str, &'static str); 0] {
    []
}

#[test]
fn resolution_tries_alias_target_before_fallback() {
    let t = Translator::builder()
        .mapping([("de-CH", "de")])
        .fallbacks([("de", "fr")])
        .build();
    t.resources()
        .add(Resource::new("app", "fr", [("bye", "au revoir"), ("hi", "salut")]));
    t.resources().add(Resource::new("app", "de", [("hi", "hallo")]));

    assert_eq!(t.candidate_locales(Some("de-CH")), vec!["de", "fr"]);
    assert_eq!(t.translate("hi", none(), Some("de-CH")), "hallo");
    assert_eq!(t.translate("bye", none(), Some("de-CH")), "au revoir");
}

#[test]
fn values_are_not_merged_across_locales() {
    let t = Translator::builder().fallbacks([("de", "en")]).build();
    t.resources()
        .add(Resource::new("app", "en", [("greet", "Hello {name}")]));
    t.resources().add(Resource::new("app", "de", [("other", "x")]));

    assert_eq!(
        t.translate("greet", [("name", "Anna")], Some("de")),
        "Hello Anna"
    );
}

#[test]
fn dynamic_registration_is_visible_immediately() {
    let store = Resources::new();
    let t = Translator::new(store.clone());
    assert_eq!(t.translate("Checkout", none(), Some("de")), "Checkout");

    store.add(Resource::new("shop", "de", [("Checkout", "Kasse")]));
    assert_eq!(t.translate("Checkout", none(), Some("de")), "Kasse");
}

#[test]
fn separate_translators_do_not_share_state() {
    let a = Translator::default();
    let b = Translator::default();
    a.resources().add(Resource::new("app", "en", [("k", "a")]));
    a.set_locale("de");

    assert_eq!(b.translate("k", none(), Some("en")), "k");
    assert_eq!(b.locale(), "en");
}

#[test]
fn macro_builds_scoped_messages() {
    let t = Translator::default();
    t.resources()
        .add(Resource::new("shop", "en", [("items", "{1} one item|[2,*] {count} items")]));
    t.resources()
        .add(Resource::new("other", "en", [("items", "unrelated")]).with_priority(10));

    assert_eq!(t.trans(&msg!("items" => "shop", { count: 4 }), None), "4 items");
    assert_eq!(t.trans(&msg!("items" => "shop", { count: 1 }), None), "one item");
    assert_eq!(t.trans(&msg!("items"), None), "unrelated");
    assert_eq!(
        t.trans(&Message::new("missing {x}").arg("x", true), None),
        "missing true"
    );
}

#[test]
fn concurrent_reads_and_registration() {
    let t = Arc::new(Translator::default());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let t = Arc::clone(&t);
            thread::spawn(move || {
                let key = format!("k{i}");
                t.resources()
                    .add(Resource::new("app", "en", [(key.clone(), format!("v{i}"))]));
                t.translate(&key, none(), None)
            })
        })
        .collect();

    let mut out: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    out.sort();
    assert_eq!(out, vec!["v0", "v1", "v2", "v3"]);
}

#[test]
fn files_layer_by_directory_priority() {
    let base = tempfile::tempdir().unwrap();
    let app = base.path().join("trans");
    let custom = base.path().join("trans-custom");
    fs::create_dir_all(app.join("de")).unwrap();
    fs::create_dir_all(app.join("en")).unwrap();
    fs::create_dir_all(custom.join("de")).unwrap();

    fs::write(app.join("de/de.json"), r#"{"about": "über uns", "Hi :name": "Hallo :name"}"#)
        .unwrap();
    fs::write(app.join("de/shop.json"), r#"{"cart": "Warenkorb"}"#).unwrap();
    fs::write(app.join("en/shop.yaml"), "cart: cart\n").unwrap();
    fs::write(app.join("de/notes.txt"), "ignored").unwrap();
    fs::write(custom.join("de/shop.json"), r#"{"cart": "warenkorb custom"}"#).unwrap();

    let resources = FilesResources::new([
        ResourceDir::new(&custom, 300),
        ResourceDir::new(&app, 100),
        ResourceDir::new(base.path().join("does-not-exist"), 500),
    ])
    .load()
    .unwrap();
    assert_eq!(resources.len(), 4);

    let t = Translator::builder().locale("de").build();
    t.resources().extend(resources);

    assert_eq!(t.translate("cart", [("src", "shop")], None), "warenkorb custom");
    assert_eq!(t.translate("cart", [("src", "shop")], Some("en")), "cart");
    assert_eq!(t.translate("about", none(), None), "über uns");
    assert_eq!(t.translate("Hi :name", [(":name", "John")], None), "Hallo John");
}

#[test]
fn malformed_file_reports_path() {
    let base = tempfile::tempdir().unwrap();
    fs::create_dir_all(base.path().join("en")).unwrap();
    fs::write(base.path().join("en/app.json"), r#"{"about": 1}"#).unwrap();

    let err = FilesResources::new([ResourceDir::new(base.path(), 0)])
        .load()
        .unwrap_err();
    match err {
        I18nError::Parse { path, .. } => assert!(path.ends_with("en/app.json")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn text_with_a_literal_pipe_is_not_pluralized() {
    let t = Translator::builder().locale("de").build();
    assert_eq!(
        t.translate("Terms | Conditions", none(), None),
        "Terms | Conditions"
    );

    t.resources()
        .add(Resource::new("app", "de", [("nav", "Home | Shop")]));
    assert_eq!(t.translate("nav", none(), None), "Home | Shop");
    assert_eq!(
        t.translate("Terms | Conditions", [("name", "x")], Some("fr")),
        "Terms | Conditions"
    );
}

#[test]
fn lookups_see_consistent_locale_settings() {
    let t = Arc::new(Translator::builder().locale("de").fallbacks([("de", "en")]).build());

    let writer = {
        let t = Arc::clone(&t);
        thread::spawn(move || {
            for i in 0..500 {
                if i % 2 == 0 {
                    t.set_locale_settings("fr", [("fr", "it")], [("fr-BE", "fr")]);
                } else {
                    t.set_locale_settings("de", [("de", "en")], [("de-CH", "de")]);
                }
            }
        })
    };

    for _ in 0..500 {
        let chain = t.candidate_locales(None);
        assert!(
            chain == ["fr", "it"] || chain == ["de", "en"],
            "mixed settings: {chain:?}"
        );
    }
    writer.join().unwrap();
}
