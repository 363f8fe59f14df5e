//! Named application directories with groups and priorities.

use std::path::{Path, PathBuf};

/// A registered directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dir {
    pub path: PathBuf,
    pub name: String,
    pub group: Option<String>,
    pub priority: i32,
}

/// Directory registry, in registration order.
#[derive(Clone, Debug, Default)]
pub struct Dirs {
    dirs: Vec<Dir>,
}

impl Dirs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a directory. A directory with the same name is replaced.
    pub fn dir(
        &mut self,
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        group: Option<&str>,
        priority: i32,
    ) -> &mut Self {
        let dir = Dir {
            path: path.into(),
            name: name.into(),
            group: group.map(str::to_string),
            priority,
        };
        match self.dirs.iter_mut().find(|d| d.name == dir.name) {
            Some(existing) => *existing = dir,
            None => self.dirs.push(dir),
        }
        self
    }

    pub fn has(&self, name: &str) -> bool {
        self.dirs.iter().any(|d| d.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&Path> {
        self.dirs
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.path.as_path())
    }

    /// Directories of `group`, highest priority first.
    pub fn group(&self, group: &str) -> Vec<Dir> {
        let mut out: Vec<Dir> = self
            .dirs
            .iter()
            .filter(|d| d.group.as_deref() == Some(group))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.priority.cmp(&a.priority));
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dir> {
        self.dirs.iter()
    }
}
