//! Config write-back: `config set-context` and `config use-context`.
//!
//! Uses `toml_edit` so existing comments and formatting survive the edit.
//! Which file gets written follows the merge chain:
//!
//! - a context that already exists is modified in the file that defined it;
//! - a new value goes to the first file in the chain that exists, or to the
//!   last file named if none exist (created along with its parent directories).

use std::path::{Path, PathBuf};

use toml_edit::{ArrayOfTables, DocumentMut, Item, Table, TableLike, value};
use tracing::debug;

use crate::config::Config;
use crate::context::ContextOverrides;
use crate::credentials::split_user_flag;
use crate::error::KouchError;
use crate::file::creation_target;
use crate::ops::ConfigResult;

const CONTEXTS: &str = "contexts";
const DEFAULT_CONTEXT: &str = "default-context";

/// Pure function: create or update context `name` in a TOML document.
///
/// Only fields present in `fields` are touched; an empty string removes the
/// field. A `user` of the form `name:password` also sets the password unless
/// one is given explicitly.
pub fn set_context_in_document(
    content: Option<&str>,
    path: &Path,
    name: &str,
    fields: &ContextOverrides,
) -> Result<String, KouchError> {
    let mut doc = parse_document(content, path)?;

    let contexts = doc
        .entry(CONTEXTS)
        .or_insert(Item::ArrayOfTables(ArrayOfTables::new()))
        .as_array_of_tables_mut()
        .ok_or_else(|| edit_error(path, "`contexts` is not an array of tables"))?;

    let existing = contexts
        .iter_mut()
        .position(|t| t.get("name").and_then(Item::as_str) == Some(name));
    let entry = match existing {
        Some(index) => contexts
            .get_mut(index)
            .ok_or_else(|| edit_error(path, "context entry vanished during edit"))?,
        None => {
            let mut table = Table::new();
            table.insert("name", value(name));
            contexts.push(table);
            let last = contexts.len() - 1;
            contexts
                .get_mut(last)
                .ok_or_else(|| edit_error(path, "context entry vanished during edit"))?
        }
    };

    let context = entry
        .entry("context")
        .or_insert(Item::Table(Table::new()))
        .as_table_like_mut()
        .ok_or_else(|| edit_error(path, &format!("`context` of '{name}' is not a table")))?;

    let (user, split_password) = match fields.user.as_deref() {
        Some(user) => {
            let (user, password) = split_user_flag(user);
            (Some(user), password)
        }
        None => (None, None),
    };
    let password = fields.password.clone().or(split_password);

    set_field(context, "root", fields.root.as_deref());
    set_field(context, "user", user.as_deref());
    set_field(context, "password", password.as_deref());

    Ok(doc.to_string())
}

/// Pure function: set `default-context` in a TOML document.
pub fn set_default_in_document(
    content: Option<&str>,
    path: &Path,
    name: &str,
) -> Result<String, KouchError> {
    let mut doc = parse_document(content, path)?;
    doc[DEFAULT_CONTEXT] = value(name);
    Ok(doc.to_string())
}

/// Write context `name` to the file chosen by the write-back policy.
pub fn persist_context(
    config: &Config,
    chain: &[PathBuf],
    name: &str,
    fields: &ContextOverrides,
) -> Result<ConfigResult, KouchError> {
    let path = write_target(config.origin_of(name), chain)?;
    debug!(path = %path.display(), context = name, "writing context");
    let content = read_optional(&path)?;
    let updated = set_context_in_document(content.as_deref(), &path, name, fields)?;
    write_file(&path, &updated)?;
    Ok(ConfigResult::ContextSet {
        name: name.to_string(),
        path,
    })
}

/// Make `name` the default context. The context must already exist.
pub fn persist_default(
    config: &Config,
    chain: &[PathBuf],
    name: &str,
) -> Result<ConfigResult, KouchError> {
    if config.context(name).is_none() {
        return Err(KouchError::ContextNotFound(name.to_string()));
    }
    let path = write_target(config.default_origin(), chain)?;
    debug!(path = %path.display(), context = name, "writing default context");
    let content = read_optional(&path)?;
    let updated = set_default_in_document(content.as_deref(), &path, name)?;
    write_file(&path, &updated)?;
    Ok(ConfigResult::ContextUsed {
        name: name.to_string(),
        path,
    })
}

fn write_target(origin: Option<&Path>, chain: &[PathBuf]) -> Result<PathBuf, KouchError> {
    match origin {
        Some(path) => Ok(path.to_path_buf()),
        None => creation_target(chain).ok_or(KouchError::NoConfigFile),
    }
}

fn parse_document(content: Option<&str>, path: &Path) -> Result<DocumentMut, KouchError> {
    content
        .unwrap_or_default()
        .parse::<DocumentMut>()
        .map_err(|e| edit_error(path, &e.to_string()))
}

fn set_field(table: &mut dyn TableLike, key: &str, field: Option<&str>) {
    match field {
        Some("") => {
            table.remove(key);
        }
        Some(v) => {
            table.insert(key, value(v));
        }
        None => {}
    }
}

fn edit_error(path: &Path, reason: &str) -> KouchError {
    KouchError::ConfigFileEdit {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, KouchError> {
    match std::fs::read_to_string(path) {
        Ok(c) => Ok(Some(c)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(KouchError::IoError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

fn write_file(path: &Path, content: &str) -> Result<(), KouchError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| KouchError::WriteError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::write(path, content).map_err(|e| KouchError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}
