//! Config operations: the `config view` listing and the result type every
//! `config` subcommand returns for display.

use std::fmt;
use std::path::PathBuf;

use crate::config::Config;
use crate::context::normalize;
use crate::error::KouchError;

const REDACTED: &str = "<redacted>";

/// Result of a config operation. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigResult {
    /// The merged configuration as flattened key-value pairs.
    Listing {
        files: Vec<PathBuf>,
        entries: Vec<(String, String)>,
    },
    /// Confirmation that a context was written.
    ContextSet { name: String, path: PathBuf },
    /// Confirmation that the default context was changed.
    ContextUsed { name: String, path: PathBuf },
}

impl fmt::Display for ConfigResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigResult::Listing { files, entries } => {
                if files.is_empty() {
                    writeln!(f, "# no config files loaded")?;
                }
                for file in files {
                    writeln!(f, "# {}", file.display())?;
                }
                for (key, value) in entries {
                    writeln!(f, "{key} = {value}")?;
                }
                Ok(())
            }
            ConfigResult::ContextSet { name, path } => {
                writeln!(f, "Context '{name}' written to {}", path.display())
            }
            ConfigResult::ContextUsed { name, path } => {
                writeln!(f, "Switched to context '{name}' in {}", path.display())
            }
        }
    }
}

/// Flatten the merged file configuration into dotted keys. Passwords are
/// replaced with a placeholder and unset fields are omitted. Credentials
/// embedded in a root are listed as separate fields, never inside the root.
pub fn list_values(config: &Config) -> Result<ConfigResult, KouchError> {
    let mut entries = Vec::new();
    if let Some(name) = &config.default_context {
        entries.push(("default-context".to_string(), name.clone()));
    }
    for named in &config.contexts {
        let ctx = normalize(named.context.clone())?;
        let fields = [
            ("root", ctx.root.as_str()),
            ("user", ctx.user.as_str()),
            ("password", ctx.password.as_str()),
        ];
        for (field, value) in fields {
            if value.is_empty() {
                continue;
            }
            let shown = if field == "password" { REDACTED } else { value };
            entries.push((format!("contexts.{}.{field}", named.name), shown.to_string()));
        }
    }
    Ok(ConfigResult::Listing {
        files: config.files.clone(),
        entries,
    })
}
