use std::fs;

use lingua_app::lingua_i18n::Resource;
use lingua_app::{clear_translator, trans, App, TranslationBoot};
use pretty_assertions::assert_eq;

// Single test: the registered translator is process-wide.
#[test]
fn trans_uses_the_registered_translator() {
    clear_translator();
    assert_eq!(trans("Hi :name", [(":name", "John")], Some("de")), "Hi John");
    assert_eq!(trans("{1} one|[2,*] {count} many", [("count", 4)], None), "4 many");

    let tmp = tempfile::tempdir().unwrap();
    let app_dir = tmp.path().join("app");
    fs::create_dir_all(&app_dir).unwrap();
    let mut app = App::new(&app_dir);
    app.boot(TranslationBoot);
    app.booting().unwrap();

    let translator = app.translator().unwrap();
    translator
        .resources()
        .add(Resource::new("pages", "de", [("about", "über uns")]));

    assert_eq!(trans("about", [("src", "pages")], Some("de")), "über uns");
    assert_eq!(trans("about", [("src", "pages")], Some("fr")), "about");

    clear_translator();
    assert_eq!(trans("about", [("src", "pages")], Some("de")), "about");
}
