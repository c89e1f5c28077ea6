use serde::Serialize;

/// Where a request points. Every field is optional until an operation demands it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Target {
    pub root: Option<String>,
    pub database: Option<String>,
    pub document: Option<String>,
    pub filename: Option<String>,
}

/// How deep a positional target string reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetScope {
    Database,
    Document,
    Attachment,
}

impl TargetScope {
    /// Number of trailing path segments the scope addresses.
    pub fn depth(self) -> usize {
        match self {
            TargetScope::Database => 1,
            TargetScope::Document => 2,
            TargetScope::Attachment => 3,
        }
    }
}

/// A config-file operation, independent of any CLI framework.
/// The CLI layer converts parsed clap args into this.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigAction {
    View,
    SetContext {
        name: String,
        root: Option<String>,
        user: Option<String>,
        password: Option<String>,
    },
    UseContext {
        name: String,
    },
}
