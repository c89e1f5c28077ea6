//! Config file selection and loading.
//!
//! Selection follows a fixed order:
//!
//! 1. `--kouchconfig FILE`: exactly that file, no merging. A missing file is
//!    an error.
//! 2. `$KOUCHCONFIG`: every existing file in the path list, in order, merged.
//!    Missing entries are skipped.
//! 3. `~/.kouch/config`: loaded if present. No config at all is fine.
//!
//! The same [`ConfigSource`] also drives write-back: [`ConfigSource::write_chain`]
//! is the ordered list of files that `config set-context` may write to.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::KouchError;

/// Directory under the user's home holding the default config.
pub const KOUCH_HOME: &str = ".kouch";
/// File name of the default config inside [`KOUCH_HOME`].
pub const DEFAULT_FILE_NAME: &str = "config";

/// Which config files an invocation reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// `--kouchconfig`: one file that must exist.
    Explicit(PathBuf),
    /// `$KOUCHCONFIG`: files merged in order; missing ones skipped.
    Chain(Vec<PathBuf>),
    /// `~/.kouch/config`, optional.
    Default(PathBuf),
    /// No home directory could be determined and nothing else was given.
    None,
}

impl ConfigSource {
    /// Apply the selection policy. Pure: the environment value and home
    /// directory are passed in.
    pub fn select(
        explicit: Option<&Path>,
        env_paths: Option<Vec<PathBuf>>,
        home: Option<&Path>,
    ) -> Self {
        if let Some(path) = explicit {
            return ConfigSource::Explicit(path.to_path_buf());
        }
        if let Some(paths) = env_paths {
            return ConfigSource::Chain(paths);
        }
        match home {
            Some(home) => ConfigSource::Default(default_path(home)),
            None => ConfigSource::None,
        }
    }

    /// Files eligible for write-back, in chain order.
    pub fn write_chain(&self) -> Vec<PathBuf> {
        match self {
            ConfigSource::Explicit(p) | ConfigSource::Default(p) => vec![p.clone()],
            ConfigSource::Chain(paths) => paths.clone(),
            ConfigSource::None => vec![],
        }
    }
}

/// `<home>/.kouch/config`.
pub fn default_path(home: &Path) -> PathBuf {
    home.join(KOUCH_HOME).join(DEFAULT_FILE_NAME)
}

/// The current user's home directory.
pub fn home_dir() -> Option<PathBuf> {
    let user = directories::UserDirs::new()?;
    Some(user.home_dir().to_path_buf())
}

/// Read every file the source selects, in precedence order (first = lowest).
pub fn load_config_files(source: &ConfigSource) -> Result<Vec<(PathBuf, String)>, KouchError> {
    match source {
        ConfigSource::Explicit(path) => match std::fs::read_to_string(path) {
            Ok(content) => {
                debug!(path = %path.display(), "loaded explicit config file");
                Ok(vec![(path.clone(), content)])
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(KouchError::ConfigFileNotFound { path: path.clone() })
            }
            Err(e) => Err(KouchError::IoError {
                path: path.clone(),
                source: e,
            }),
        },
        ConfigSource::Chain(paths) => load_existing(paths),
        ConfigSource::Default(path) => load_existing(std::slice::from_ref(path)),
        ConfigSource::None => Ok(vec![]),
    }
}

/// Load all files that exist. Missing files are silently skipped; other I/O
/// errors are propagated.
fn load_existing(paths: &[PathBuf]) -> Result<Vec<(PathBuf, String)>, KouchError> {
    let mut results = Vec::new();
    for path in paths {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                debug!(path = %path.display(), "loaded config file");
                results.push((path.clone(), content));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "config file not present, skipping");
                continue;
            }
            Err(e) => {
                return Err(KouchError::IoError {
                    path: path.clone(),
                    source: e,
                });
            }
        }
    }
    Ok(results)
}

/// Pick the file a new value is written to: the first file in the chain that
/// exists, else the last one named (which will be created).
pub fn creation_target(chain: &[PathBuf]) -> Option<PathBuf> {
    chain
        .iter()
        .find(|p| p.exists())
        .or_else(|| chain.last())
        .cloned()
}
