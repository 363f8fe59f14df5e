//! Lingua application integration
//!
//! - `TranslationBoot` registers the translator during the app boot sequence
//! - `trans(..)` / `App::trans(..)` call-sites for looking up messages
//! - `TranslationFilesMigration` copies translation files into `<app>/trans/`

pub mod app;
pub mod boot;
pub mod config;
pub mod dirs;
pub mod languages;
pub mod logging;
pub mod migration;
mod trans;

pub use app::{App, Boot};
pub use boot::{build_translator, TranslationBoot, TranslationFilesBoot, TRANS_DIR};
pub use config::TranslationConfig;
pub use dirs::{Dir, Dirs};
pub use languages::{Language, Languages, LocaleSource};
pub use migration::{Action, Actions, Migration, Migrator, TranslationFilesMigration};
pub use trans::{clear as clear_translator, register as register_translator, trans};

pub use lingua_i18n;
