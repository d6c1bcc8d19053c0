//! On-disk layout: where the config file and the favorites database live.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// Directory name used under the XDG base directories.
const APP_DIR: &str = "moviex";

/// Config file name inside the config directory.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Database file name inside the data directory.
const DB_FILE_NAME: &str = "moviex.db";

/// Resolved config and data directories.
///
/// A `--dir` override puts both files side by side in one directory.
/// Otherwise the XDG base directories are used, falling back to
/// `~/.config` and `~/.local/share`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl StorageLayout {
    /// Keeps config and data in the same directory.
    #[must_use]
    pub fn single_dir(dir: &Path) -> Self {
        Self {
            config_dir: dir.to_path_buf(),
            data_dir: dir.to_path_buf(),
        }
    }

    /// Resolves the layout from an optional override and the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if no override is given and neither the XDG variable
    /// nor `HOME` yields an absolute base directory.
    pub fn resolve(dir: Option<&Path>) -> Result<Self> {
        Self::resolve_with(dir, |name| std::env::var_os(name))
    }

    fn resolve_with<F>(dir: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        if let Some(d) = dir {
            return Ok(Self::single_dir(d));
        }

        let home = lookup("HOME").map(PathBuf::from);
        let config_base = xdg_base(
            lookup("XDG_CONFIG_HOME"),
            home.as_deref(),
            &[".config"],
            "XDG_CONFIG_HOME",
        )?;
        let data_base = xdg_base(
            lookup("XDG_DATA_HOME"),
            home.as_deref(),
            &[".local", "share"],
            "XDG_DATA_HOME",
        )?;

        Ok(Self {
            config_dir: config_base.join(APP_DIR),
            data_dir: data_base.join(APP_DIR),
        })
    }

    /// Directory holding `config.toml`.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Directory holding the favorites database.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Full path of the TOML config file.
    #[must_use]
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// Full path of the `SQLite` database.
    #[must_use]
    pub fn database_file(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }
}

/// Picks an XDG base directory; relative or empty values are ignored.
fn xdg_base(
    value: Option<OsString>,
    home: Option<&Path>,
    fallback: &[&str],
    var: &str,
) -> Result<PathBuf> {
    if let Some(path) = value.map(PathBuf::from).filter(|p| p.is_absolute()) {
        return Ok(path);
    }
    match home.filter(|h| h.is_absolute()) {
        Some(h) => Ok(fallback.iter().fold(h.to_path_buf(), |acc, part| acc.join(part))),
        None => bail!("neither {var} nor HOME is set to an absolute path"),
    }
}
