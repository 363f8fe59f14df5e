//! Minimal application host: directories, boot sequence and the lazily built
//! translator.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use lingua_i18n::{ArgValue, Message, MissingTranslationHandler, Modifiers, Translator};

use crate::dirs::Dirs;
use crate::languages::LocaleSource;
use crate::migration::{Migration, Migrator};

/// Builds the translator the first time it is requested.
pub type TranslatorFactory = fn(&App) -> Result<Translator>;

type TranslatorHook = Box<dyn FnOnce(&Translator) + Send>;

/// A unit of application setup, run during [`App::booting`].
pub trait Boot {
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn boot(&self, app: &mut App) -> Result<()>;
}

pub struct App {
    dirs: Dirs,
    boots: Vec<Box<dyn Boot>>,
    booted: Vec<&'static str>,
    migrator: Migrator,
    languages: Option<Arc<dyn LocaleSource>>,
    missing_handler: Mutex<Option<Box<dyn MissingTranslationHandler>>>,
    translator_factory: Option<TranslatorFactory>,
    translator_hooks: Mutex<Vec<TranslatorHook>>,
    translator: OnceLock<Arc<Translator>>,
}

impl App {
    /// Create an app rooted at `app_dir`.
    ///
    /// Registers the `app` directory and `<app_dir>/config` as `config`.
    pub fn new(app_dir: impl Into<PathBuf>) -> Self {
        let app_dir = app_dir.into();
        let mut dirs = Dirs::new();
        dirs.dir(&app_dir, "app", Some("app"), 0)
            .dir(app_dir.join("config"), "config", Some("config"), 0);

        Self {
            dirs,
            boots: Vec::new(),
            booted: Vec::new(),
            migrator: Migrator::new(),
            languages: None,
            missing_handler: Mutex::new(None),
            translator_factory: None,
            translator_hooks: Mutex::new(Vec::new()),
            translator: OnceLock::new(),
        }
    }

    pub fn dirs(&self) -> &Dirs {
        &self.dirs
    }

    pub fn dirs_mut(&mut self) -> &mut Dirs {
        &mut self.dirs
    }

    /// Path of a registered directory.
    pub fn dir(&self, name: &str) -> Result<&Path> {
        self.dirs
            .get(name)
            .with_context(|| format!("directory `{name}` is not registered"))
    }

    /// Queue a boot; it runs on the next [`App::booting`].
    pub fn boot(&mut self, boot: impl Boot + 'static) -> &mut Self {
        self.boots.push(Box::new(boot));
        self
    }

    /// Run queued boots in order. A boot type runs at most once.
    pub fn booting(&mut self) -> Result<()> {
        let boots = std::mem::take(&mut self.boots);
        for boot in boots {
            let name = boot.name();
            if self.booted.contains(&name) {
                debug!(boot = name, "already booted, skipped");
                continue;
            }
            debug!(boot = name, "booting");
            boot.boot(self)
                .with_context(|| format!("Failed to boot {name}"))?;
            self.booted.push(name);
        }
        Ok(())
    }

    pub fn is_booted(&self, name: &str) -> bool {
        self.booted.iter().any(|b| *b == name)
    }

    pub fn migrator(&self) -> &Migrator {
        &self.migrator
    }

    pub fn install(&mut self, migration: &dyn Migration) -> Result<Vec<PathBuf>> {
        self.migrator.install(migration)
    }

    pub fn uninstall(&mut self, migration: &dyn Migration) -> Result<Vec<PathBuf>> {
        self.migrator.uninstall(migration)
    }

    /// Supply the current locale and fallbacks for the translator.
    pub fn set_languages(&mut self, languages: impl LocaleSource + 'static) -> &mut Self {
        self.languages = Some(Arc::new(languages));
        self
    }

    pub fn languages(&self) -> Option<Arc<dyn LocaleSource>> {
        self.languages.clone()
    }

    /// Replace the default missing translation handler.
    pub fn set_missing_handler(&mut self, handler: impl MissingTranslationHandler + 'static) {
        *self
            .missing_handler
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(Box::new(handler));
    }

    /// Take the configured missing handler, if any. Used once by the
    /// translator factory.
    pub fn take_missing_handler(&self) -> Option<Box<dyn MissingTranslationHandler>> {
        self.missing_handler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub fn set_translator_factory(&mut self, factory: TranslatorFactory) {
        self.translator_factory = Some(factory);
    }

    /// Run `hook` once the translator exists; immediately if it already does.
    pub fn on_translator(&self, hook: impl FnOnce(&Translator) + Send + 'static) {
        if let Some(translator) = self.translator.get() {
            hook(translator);
            return;
        }
        self.translator_hooks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(hook));
    }

    /// The application translator, built on first use.
    pub fn translator(&self) -> Result<Arc<Translator>> {
        if let Some(translator) = self.translator.get() {
            return Ok(Arc::clone(translator));
        }

        let factory = self
            .translator_factory
            .context("no translator registered, boot TranslationBoot first")?;
        let translator = factory(self)?;

        let hooks = std::mem::take(
            &mut *self
                .translator_hooks
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        );
        for hook in hooks {
            hook(&translator);
        }

        let translator = Arc::clone(self.translator.get_or_init(|| Arc::new(translator)));
        crate::trans::register(Arc::clone(&translator));
        Ok(translator)
    }

    /// Translate a message with the application translator.
    ///
    /// Without a translator the message itself is returned with its
    /// parameters applied.
    pub fn trans<I, K, V>(&self, message: &str, params: I, locale: Option<&str>) -> String
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Cow<'static, str>>,
        V: Into<ArgValue>,
    {
        let msg = Message::with_params(message.to_string(), params);
        match self.translator() {
            Ok(translator) => translator.trans(&msg, locale),
            Err(e) => {
                warn!(error = %e, "translator unavailable");
                Modifiers::default().apply(&msg.id, &msg.args)
            }
        }
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("dirs", &self.dirs)
            .field("booted", &self.booted)
            .field("migrator", &self.migrator)
            .field("translator", &self.translator.get())
            .finish_non_exhaustive()
    }
}
