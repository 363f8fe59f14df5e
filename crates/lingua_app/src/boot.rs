//! Boots registering the translator and installing translation files.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use lingua_i18n::files::{FilesResources, ResourceDir};
use lingua_i18n::{Modifiers, ReturnKey, Translator};

use crate::app::{App, Boot};
use crate::config::TranslationConfig;
use crate::migration::TranslationFilesMigration;

/// Name and group of the application translation directory.
pub const TRANS_DIR: &str = "trans";

/// Priority of the default `<app>/trans/` directory.
pub const TRANS_DIR_PRIORITY: i32 = 100;

/// Registers the translator.
///
/// - adds `<app>/trans/` as the `trans` directory unless one is registered
/// - builds the translator lazily from every directory of the `trans` group
#[derive(Clone, Copy, Debug, Default)]
pub struct TranslationBoot;

impl Boot for TranslationBoot {
    fn boot(&self, app: &mut App) -> Result<()> {
        if !app.dirs().has(TRANS_DIR) {
            let path = app.dir("app")?.join(TRANS_DIR);
            debug!(dir = %path.display(), "registering translation dir");
            app.dirs_mut()
                .dir(path, TRANS_DIR, Some(TRANS_DIR), TRANS_DIR_PRIORITY);
        }
        app.set_translator_factory(build_translator);
        Ok(())
    }
}

/// Build the application translator.
///
/// Order of configuration: `translation.toml`, then the app languages.
pub fn build_translator(app: &App) -> Result<Translator> {
    let config = match app.dirs().get("config") {
        Some(dir) => TranslationConfig::load_from_dir(dir)?.unwrap_or_default(),
        None => TranslationConfig::default(),
    };

    let mut dirs: Vec<ResourceDir> = app
        .dirs()
        .group(TRANS_DIR)
        .into_iter()
        .map(|d| ResourceDir::new(d.path, d.priority))
        .collect();
    dirs.extend(config.resource_dirs(app.dir("app")?));

    let resources = FilesResources::new(dirs)
        .load()
        .context("Failed to load translation files")?;

    let builder = Translator::builder().modifiers(Modifiers::default());
    let builder = match app.take_missing_handler() {
        Some(handler) => builder.missing_handler_boxed(handler),
        None => builder.missing_handler(ReturnKey),
    };
    let translator = builder.build();
    translator.resources().extend(resources);

    config.apply(&translator);

    if let Some(languages) = app.languages() {
        translator.set_locale(languages.current_locale());
        translator.set_locale_fallbacks(languages.fallbacks());
    }

    debug!(translator = ?translator, "translator built");
    Ok(translator)
}

/// Installs the translation files found below `source` into the app's
/// `trans` directory.
#[derive(Clone, Debug)]
pub struct TranslationFilesBoot {
    source: PathBuf,
}

impl TranslationFilesBoot {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl Boot for TranslationFilesBoot {
    fn boot(&self, app: &mut App) -> Result<()> {
        let destination = app
            .dir(TRANS_DIR)
            .context("boot TranslationBoot before TranslationFilesBoot")?
            .to_path_buf();
        let migration = TranslationFilesMigration::discover(&self.source, &destination)?;
        app.install(&migration)?;
        Ok(())
    }
}
