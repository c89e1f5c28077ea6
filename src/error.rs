use std::path::PathBuf;
use thiserror::Error;

/// Failed to initialize: bad flags, bad target, nothing to talk to.
pub const EXIT_FAILED_TO_INITIALIZE: i32 = 2;
/// A root or target URL could not be parsed.
pub const EXIT_URL_MALFORMED: i32 = 3;
/// Writing a config file failed.
pub const EXIT_WRITE_ERROR: i32 = 23;
/// Reading a config file failed (missing, unreadable, or unparsable).
pub const EXIT_READ_ERROR: i32 = 26;

#[derive(Debug, Error)]
pub enum KouchError {
    #[error("Invalid target '{target}': {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("Must not use --{flag} and pass {what} as part of the target")]
    ConflictingSpecification {
        flag: &'static str,
        what: &'static str,
    },

    #[error("Config file {path} not found")]
    ConfigFileNotFound { path: PathBuf },

    #[error("Failed to parse {path}: {source}")]
    ConfigFileInvalid {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Unknown key '{key}' in {path} (line {line})")]
    UnknownKey {
        key: String,
        path: PathBuf,
        line: usize,
    },

    #[error("Unknown keys in config file")]
    UnknownKeys(Vec<KouchError>),

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cannot edit {path}: {reason}")]
    ConfigFileEdit { path: PathBuf, reason: String },

    #[error("No config file to write to; pass --kouchconfig or set KOUCHCONFIG")]
    NoConfigFile,

    #[error("No root URL provided")]
    NoRootConfigured,

    #[error("Context '{0}' is not defined")]
    ContextNotFound(String),

    #[error("parse {url}: {reason}")]
    UrlMalformed { url: String, reason: String },

    #[error("No {what} provided")]
    MissingField { what: &'static str },

    #[error("Failed to render output: {0}")]
    Render(#[from] serde_json::Error),

    #[error("Failed to install log subscriber: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
}

impl KouchError {
    /// The process exit status this error maps to.
    pub fn exit_code(&self) -> i32 {
        match self {
            KouchError::InvalidTarget { .. }
            | KouchError::ConflictingSpecification { .. }
            | KouchError::NoRootConfigured
            | KouchError::ContextNotFound(_)
            | KouchError::MissingField { .. }
            | KouchError::Render(_)
            | KouchError::Logging(_) => EXIT_FAILED_TO_INITIALIZE,
            KouchError::UrlMalformed { .. } => EXIT_URL_MALFORMED,
            KouchError::ConfigFileNotFound { .. }
            | KouchError::ConfigFileInvalid { .. }
            | KouchError::UnknownKey { .. }
            | KouchError::UnknownKeys(_)
            | KouchError::ConfigFileEdit { .. }
            | KouchError::IoError { .. } => EXIT_READ_ERROR,
            KouchError::WriteError { .. } | KouchError::NoConfigFile => EXIT_WRITE_ERROR,
        }
    }

    pub(crate) fn invalid_target(target: &str, reason: impl Into<String>) -> Self {
        KouchError::InvalidTarget {
            target: target.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn url_malformed(url: &str, reason: impl Into<String>) -> Self {
        KouchError::UrlMalformed {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_key_formats_correctly() {
        let err = KouchError::UnknownKey {
            key: "contexts.typo".into(),
            path: "/home/user/.kouch/config".into(),
            line: 42,
        };
        let msg = err.to_string();
        assert!(msg.contains("contexts.typo"));
        assert!(msg.contains(".kouch/config"));
        assert!(msg.contains("42"));
    }

    #[test]
    fn conflict_names_flag_and_field() {
        let err = KouchError::ConflictingSpecification {
            flag: "id",
            what: "document ID",
        };
        assert_eq!(
            err.to_string(),
            "Must not use --id and pass document ID as part of the target"
        );
    }

    #[test]
    fn exit_codes_are_distinct_per_family() {
        let init = KouchError::NoRootConfigured.exit_code();
        let url = KouchError::url_malformed("http://x/%xx", "bad escape").exit_code();
        let read = KouchError::ConfigFileNotFound {
            path: "/nope".into(),
        }
        .exit_code();
        assert_eq!(init, EXIT_FAILED_TO_INITIALIZE);
        assert_eq!(url, EXIT_URL_MALFORMED);
        assert_eq!(read, EXIT_READ_ERROR);
        assert_ne!(init, url);
        assert_ne!(url, read);
    }

    #[test]
    fn missing_field_formats() {
        let err = KouchError::MissingField { what: "filename" };
        assert_eq!(err.to_string(), "No filename provided");
    }
}
