//! Installable file migrations.
//!
//! A [`Migration`] describes the actions to run on install and on uninstall.
//! [`TranslationFilesMigration`] copies translation resource files into the
//! application's translation directory and removes them again.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use tracing::debug;

/// Destination directory → source files.
pub type FileMap = IndexMap<PathBuf, Vec<PathBuf>>;

/// A single migration step.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// Copy every source file into its destination directory.
    FilesCopy(FileMap),
    /// Delete the destination copies of every source file.
    FilesDelete(FileMap),
}

impl Action {
    pub fn description(&self) -> &'static str {
        match self {
            Action::FilesCopy(_) => "files copied",
            Action::FilesDelete(_) => "files deleted",
        }
    }

    /// Run the action, returning the destination paths it touched.
    pub fn process(&self) -> Result<Vec<PathBuf>> {
        match self {
            Action::FilesCopy(files) => copy_files(files),
            Action::FilesDelete(files) => delete_files(files),
        }
    }
}

fn destination(dest_dir: &Path, source: &Path) -> Result<PathBuf> {
    let name = source
        .file_name()
        .with_context(|| format!("{} has no file name", source.display()))?;
    Ok(dest_dir.join(name))
}

fn copy_files(files: &FileMap) -> Result<Vec<PathBuf>> {
    let mut touched = Vec::new();
    for (dest_dir, sources) in files {
        fs::create_dir_all(dest_dir)
            .with_context(|| format!("Failed to create {}", dest_dir.display()))?;
        for source in sources {
            let dest = destination(dest_dir, source)?;
            fs::copy(source, &dest).with_context(|| {
                format!("Failed to copy {} to {}", source.display(), dest.display())
            })?;
            debug!(from = %source.display(), to = %dest.display(), "file copied");
            touched.push(dest);
        }
    }
    Ok(touched)
}

fn delete_files(files: &FileMap) -> Result<Vec<PathBuf>> {
    let mut touched = Vec::new();
    for (dest_dir, sources) in files {
        for source in sources {
            let dest = destination(dest_dir, source)?;
            if !dest.exists() {
                debug!(file = %dest.display(), "file already gone");
                continue;
            }
            fs::remove_file(&dest)
                .with_context(|| format!("Failed to delete {}", dest.display()))?;
            debug!(file = %dest.display(), "file deleted");
            touched.push(dest);
        }
    }
    Ok(touched)
}

/// Ordered actions of a migration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Actions {
    actions: Vec<Action>,
}

impl Actions {
    pub fn new(actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
        }
    }

    pub fn push(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    /// Run every action in order; stops at the first failure.
    pub fn process(&self) -> Result<Vec<PathBuf>> {
        let mut touched = Vec::new();
        for action in &self.actions {
            let paths = action.process()?;
            debug!(count = paths.len(), "{}", action.description());
            touched.extend(paths);
        }
        Ok(touched)
    }
}

pub trait Migration: Send + Sync {
    fn description(&self) -> String;

    fn install(&self) -> Actions;

    fn uninstall(&self) -> Actions;
}

/// Runs migrations and remembers which ones are installed.
#[derive(Debug, Default)]
pub struct Migrator {
    installed: Vec<String>,
}

impl Migrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a migration. Installing the same migration twice is a no-op.
    pub fn install(&mut self, migration: &dyn Migration) -> Result<Vec<PathBuf>> {
        let description = migration.description();
        if self.is_installed(&description) {
            debug!(migration = %description, "already installed");
            return Ok(Vec::new());
        }
        let touched = migration
            .install()
            .process()
            .with_context(|| format!("Failed to install migration `{description}`"))?;
        tracing::info!(migration = %description, files = touched.len(), "migration installed");
        self.installed.push(description);
        Ok(touched)
    }

    pub fn uninstall(&mut self, migration: &dyn Migration) -> Result<Vec<PathBuf>> {
        let description = migration.description();
        let touched = migration
            .uninstall()
            .process()
            .with_context(|| format!("Failed to uninstall migration `{description}`"))?;
        tracing::info!(migration = %description, files = touched.len(), "migration uninstalled");
        self.installed.retain(|d| *d != description);
        Ok(touched)
    }

    pub fn is_installed(&self, description: &str) -> bool {
        self.installed.iter().any(|d| d == description)
    }

    pub fn installed(&self) -> &[String] {
        &self.installed
    }
}

/// Copies `<source>/<locale>/<file>` to `<destination>/<locale>/<file>`.
#[derive(Clone, Debug, PartialEq)]
pub struct TranslationFilesMigration {
    files: FileMap,
}

impl TranslationFilesMigration {
    pub fn new() -> Self {
        Self {
            files: FileMap::new(),
        }
    }

    /// Add files of one locale, named relative to `source/<locale>/`.
    pub fn locale<I, S>(
        mut self,
        source: &Path,
        destination: &Path,
        locale: &str,
        files: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<Path>,
    {
        let sources = files
            .into_iter()
            .map(|f| source.join(locale).join(f.as_ref()));
        self.files
            .entry(destination.join(locale))
            .or_default()
            .extend(sources);
        self
    }

    /// Collect every translation file below `source`.
    ///
    /// Each sub-directory is treated as a locale; `.json`, `.yaml` and `.yml`
    /// files are picked up.
    pub fn discover(source: &Path, destination: &Path) -> Result<Self> {
        let mut migration = Self::new();
        for locale_dir in sorted_dir(source)? {
            if !locale_dir.is_dir() {
                continue;
            }
            let Some(locale) = locale_dir.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let files: Vec<PathBuf> = sorted_dir(&locale_dir)?
                .into_iter()
                .filter(|p| p.is_file() && is_translation_file(p))
                .filter_map(|p| p.file_name().map(PathBuf::from))
                .collect();
            if files.is_empty() {
                continue;
            }
            migration = migration.locale(source, destination, locale, files);
        }
        Ok(migration)
    }

    /// Keep only the files of `locales`.
    pub fn retain_locales(mut self, locales: &[String]) -> Self {
        self.files.retain(|dest, _| {
            dest.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| locales.iter().any(|l| l == n))
        });
        self
    }

    pub fn files(&self) -> &FileMap {
        &self.files
    }
}

impl Default for TranslationFilesMigration {
    fn default() -> Self {
        Self::new()
    }
}

impl Migration for TranslationFilesMigration {
    /// Names the source and destination roots, so migrations from different
    /// directories are installed independently.
    fn description(&self) -> String {
        let sources = roots(self.files.values().flatten().map(|f| f.parent()));
        let destinations = roots(self.files.keys().map(|d| Some(d.as_path())));
        if sources.is_empty() {
            return "Translation files.".to_string();
        }
        format!("Translation files from {sources} to {destinations}.")
    }

    fn install(&self) -> Actions {
        Actions::new([Action::FilesCopy(self.files.clone())])
    }

    fn uninstall(&self) -> Actions {
        Actions::new([Action::FilesDelete(self.files.clone())])
    }
}

/// Distinct parents of `<root>/<locale>` paths, joined with `, `.
fn roots<'a>(locale_dirs: impl Iterator<Item = Option<&'a Path>>) -> String {
    let mut out: Vec<String> = Vec::new();
    for root in locale_dirs.flatten().filter_map(Path::parent) {
        let root = root.display().to_string();
        if !out.contains(&root) {
            out.push(root);
        }
    }
    out.join(", ")
}

fn is_translation_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("json" | "yaml" | "yml")
    )
}

fn sorted_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read {}", dir.display()))?;
    for entry in entries {
        paths.push(entry?.path());
    }
    paths.sort();
    Ok(paths)
}
