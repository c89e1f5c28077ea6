//! Configuration data model.
//!
//! [`ConfigFile`] is the on-disk shape of a single kouchconfig file. [`Config`]
//! is the merged, in-memory view of every file that was loaded, plus the
//! dynamic context built from command-line overrides.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Connection profile: root URL and credentials. Empty fields are unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Context {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub root: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
}

impl Context {
    pub fn with_root(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty() && self.user.is_empty() && self.password.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedContext {
    pub name: String,
    #[serde(default)]
    pub context: Context,
}

impl NamedContext {
    pub fn new(name: impl Into<String>, context: Context) -> Self {
        Self {
            name: name.into(),
            context,
        }
    }
}

/// One kouchconfig file as written on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_context: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contexts: Vec<NamedContext>,
}

/// Identifies the context a [`Config`] treats as its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextKey {
    /// A context defined in a config file.
    Named(String),
    /// The context synthesized from command-line overrides. Never persisted.
    Dynamic,
}

/// Merged configuration for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// `default-context` from the first file that set it.
    pub default_context: Option<String>,
    /// File contexts, unique by name, in first-seen order.
    pub contexts: Vec<NamedContext>,
    /// Overrides from the command line, if any were given.
    pub dynamic: Option<Context>,
    /// Files that were read, in load order.
    pub files: Vec<PathBuf>,
    pub(crate) origins: HashMap<String, PathBuf>,
    pub(crate) default_origin: Option<PathBuf>,
}

impl Config {
    pub fn context(&self, name: &str) -> Option<&NamedContext> {
        self.contexts.iter().find(|c| c.name == name)
    }

    /// The dynamic context when present, else the file default.
    pub fn default_key(&self) -> Option<ContextKey> {
        if self.dynamic.is_some() {
            return Some(ContextKey::Dynamic);
        }
        self.default_context.clone().map(ContextKey::Named)
    }

    /// The file that first defined context `name`.
    pub fn origin_of(&self, name: &str) -> Option<&Path> {
        self.origins.get(name).map(PathBuf::as_path)
    }

    /// The file that set `default-context`.
    pub fn default_origin(&self) -> Option<&Path> {
        self.default_origin.as_deref()
    }

    /// Attach command-line overrides. Empty overrides are ignored.
    pub fn with_dynamic(mut self, overrides: Context) -> Self {
        self.dynamic = (!overrides.is_empty()).then_some(overrides);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_round_trips_through_toml() {
        let content = r#"
default-context = "foo"

[[contexts]]
name = "foo"

[contexts.context]
root = "http://foo.com/"
"#;
        let file: ConfigFile = toml::from_str(content).unwrap();
        assert_eq!(file.default_context.as_deref(), Some("foo"));
        assert_eq!(
            file.contexts,
            vec![NamedContext::new("foo", Context::with_root("http://foo.com/"))]
        );
    }

    #[test]
    fn empty_file_is_valid() {
        let file: ConfigFile = toml::from_str("").unwrap();
        assert_eq!(file, ConfigFile::default());
    }

    #[test]
    fn context_without_body_is_empty() {
        let file: ConfigFile = toml::from_str("[[contexts]]\nname = \"bare\"\n").unwrap();
        assert!(file.contexts[0].context.is_empty());
    }

    #[test]
    fn default_key_prefers_dynamic() {
        let config = Config {
            default_context: Some("foo".into()),
            ..Config::default()
        };
        assert_eq!(config.default_key(), Some(ContextKey::Named("foo".into())));

        let config = config.with_dynamic(Context::with_root("bar.com"));
        assert_eq!(config.default_key(), Some(ContextKey::Dynamic));
    }

    #[test]
    fn empty_overrides_do_not_create_dynamic() {
        let config = Config::default().with_dynamic(Context::default());
        assert!(config.dynamic.is_none());
        assert_eq!(config.default_key(), None);
    }
}
