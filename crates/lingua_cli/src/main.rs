//! Lingua CLI - translate messages and install translation files

mod args;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use lingua_app::{logging, Migrator, TranslationConfig, TranslationFilesMigration};
use lingua_i18n::files::{FilesResources, ResourceDir};
use lingua_i18n::{LogMissing, Message, Resources, Translator};

use crate::args::{Args, Command, MigrateArgs, MigrateCommand, TransArgs};

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        "debug"
    } else {
        args.log_level.as_str()
    };
    logging::init(level)?;
    debug!(command = ?args.command, "lingua started");

    match args.command {
        Command::Trans(t) => cmd_trans(t),
        Command::Migrate(MigrateCommand::Install(m)) => cmd_migrate(m, true),
        Command::Migrate(MigrateCommand::Uninstall(m)) => cmd_migrate(m, false),
    }
}

fn cmd_trans(args: TransArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => TranslationConfig::load(path)?,
        None => TranslationConfig::default(),
    };

    let dirs = translation_dirs(args.dirs, args.config.as_deref(), &config);
    debug!(dirs = ?dirs, "translation dirs");

    let resources = Resources::new();
    resources.extend(
        FilesResources::new(dirs)
            .load()
            .context("Failed to load translation files")?,
    );

    let translator = Translator::builder()
        .resources(resources)
        .missing_handler(LogMissing)
        .build();
    config.apply(&translator);

    let mut msg = Message::new(args.message);
    for (name, value) in args.params {
        msg = msg.arg(name, value);
    }
    if let Some(src) = args.src {
        msg = msg.src(src);
    }

    println!("{}", translator.trans(&msg, args.locale.as_deref()));
    Ok(())
}

/// Command line dirs followed by the config's dirs, which are relative to the
/// config file.
fn translation_dirs(
    mut dirs: Vec<ResourceDir>,
    config_path: Option<&Path>,
    config: &TranslationConfig,
) -> Vec<ResourceDir> {
    if let Some(path) = config_path {
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        dirs.extend(config.resource_dirs(base));
    }
    dirs
}

fn cmd_migrate(args: MigrateArgs, install: bool) -> Result<()> {
    let mut migration = TranslationFilesMigration::discover(&args.from, &args.to)?;
    if !args.locales.is_empty() {
        migration = migration.retain_locales(&args.locales);
    }

    debug!(destinations = migration.files().len(), "translation files discovered");
    let mut migrator = Migrator::new();
    let touched = if install {
        migrator.install(&migration)?
    } else {
        migrator.uninstall(&migration)?
    };
    for path in touched {
        println!("{}", path.display());
    }
    Ok(())
}
