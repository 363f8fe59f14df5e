//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lingua_i18n::files::ResourceDir;

/// Lingua - translate messages against layered translation files
#[derive(Parser, Debug)]
#[command(name = "lingua")]
#[command(version)]
#[command(about = "Translate messages against layered translation files", long_about = None)]
pub struct Args {
    /// Set the logging level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,

    /// Enable verbose output (equivalent to --log-level debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Translate a message
    Trans(TransArgs),

    /// Install or uninstall translation files
    #[command(subcommand)]
    Migrate(MigrateCommand),
}

#[derive(clap::Args, Debug)]
pub struct TransArgs {
    /// Message key
    pub message: String,

    /// Locale to translate into (default: configured locale)
    #[arg(short, long)]
    pub locale: Option<String>,

    /// Parameter as NAME=VALUE (repeatable)
    #[arg(short, long = "param", value_parser = parse_param)]
    pub params: Vec<(String, String)>,

    /// Restrict the lookup to one resource name
    #[arg(long)]
    pub src: Option<String>,

    /// Translation directory as PATH or PATH:PRIORITY (repeatable)
    #[arg(short, long = "dir", value_parser = parse_dir)]
    pub dirs: Vec<ResourceDir>,

    /// translation.toml with locale, fallbacks, mapping and extra dirs
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum MigrateCommand {
    /// Copy translation files into the destination
    Install(MigrateArgs),
    /// Delete previously copied translation files
    Uninstall(MigrateArgs),
}

#[derive(clap::Args, Debug)]
pub struct MigrateArgs {
    /// Directory with `<locale>/<name>.json` files
    #[arg(long)]
    pub from: PathBuf,

    /// Application translation directory
    #[arg(long)]
    pub to: PathBuf,

    /// Only these locales (repeatable; default: all)
    #[arg(short, long = "locale")]
    pub locales: Vec<String>,
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{s}`"))?;
    if name.is_empty() {
        return Err(format!("empty parameter name in `{s}`"));
    }
    Ok((name.to_string(), value.to_string()))
}

fn parse_dir(s: &str) -> Result<ResourceDir, String> {
    if let Some((path, priority)) = s.rsplit_once(':') {
        if let Ok(priority) = priority.parse::<i32>() {
            return Ok(ResourceDir::new(path, priority));
        }
    }
    Ok(ResourceDir::new(s, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn params_split_on_first_equals() {
        assert_eq!(
            parse_param("name=a=b").unwrap(),
            ("name".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_param(":name=John").unwrap(),
            (":name".to_string(), "John".to_string())
        );
        assert!(parse_param("name").is_err());
        assert!(parse_param("=x").is_err());
    }

    #[test]
    fn dirs_take_optional_priority() {
        assert_eq!(parse_dir("trans:300").unwrap(), ResourceDir::new("trans", 300));
        assert_eq!(parse_dir("trans").unwrap(), ResourceDir::new("trans", 0));
        assert_eq!(parse_dir("C:trans").unwrap(), ResourceDir::new("C:trans", 0));
    }

    #[test]
    fn parses_trans_command() {
        let args = Args::parse_from([
            "lingua", "trans", "Hi :name", "-l", "de", "-p", ":name=John", "-d", "trans:100",
        ]);
        let Command::Trans(t) = args.command else {
            panic!("expected trans");
        };
        assert_eq!(t.locale.as_deref(), Some("de"));
        assert_eq!(t.params, vec![(":name".to_string(), "John".to_string())]);
        assert_eq!(t.dirs, vec![ResourceDir::new("trans", 100)]);
    }

    #[test]
    fn parses_migrate_command() {
        let args = Args::parse_from([
            "lingua", "-v", "migrate", "install", "--from", "vendor", "--to", "app/trans",
        ]);
        assert!(args.verbose);
        let Command::Migrate(MigrateCommand::Install(m)) = args.command else {
            panic!("expected migrate install");
        };
        assert_eq!(m.from, PathBuf::from("vendor"));
        assert!(m.locales.is_empty());
    }
}
