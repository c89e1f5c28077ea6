//! Strict-mode validation: detect unknown keys in config files.
//!
//! Uses `serde_ignored` to deserialize into [`ConfigFile`] and capture any keys
//! it doesn't consume. Reports each unknown key with its file path and
//! best-effort line number.

use std::path::Path;

use crate::config::ConfigFile;
use crate::error::KouchError;

/// Parse `content` as a [`ConfigFile`], failing on keys the format doesn't know.
///
/// Unknown keys inside `[[contexts]]` entries are reported with their array
/// index, e.g. `contexts.0.context.hostname`.
pub fn parse_strict(content: &str, path: &Path) -> Result<ConfigFile, KouchError> {
    let mut unknown_keys: Vec<String> = Vec::new();

    let deserializer = toml::Deserializer::new(content);
    let file: ConfigFile = serde_ignored::deserialize(deserializer, |ignored_path| {
        unknown_keys.push(ignored_path.to_string());
    })
    .map_err(|e| KouchError::ConfigFileInvalid {
        path: path.to_path_buf(),
        source: e,
    })?;

    if unknown_keys.is_empty() {
        return Ok(file);
    }

    let errors: Vec<KouchError> = unknown_keys
        .into_iter()
        .map(|key| {
            let line = find_key_line(content, &key);
            KouchError::UnknownKey {
                key,
                path: path.to_path_buf(),
                line,
            }
        })
        .collect();

    Err(KouchError::UnknownKeys(errors))
}

/// Parse `content` as a [`ConfigFile`], silently ignoring unknown keys.
pub fn parse_lenient(content: &str, path: &Path) -> Result<ConfigFile, KouchError> {
    toml::from_str(content).map_err(|e| KouchError::ConfigFileInvalid {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Find the 1-indexed line number for a key in TOML content.
///
/// Tracks `[section]` and `[[array]]` headers while scanning. Numeric path
/// segments select the n-th `[[array]]` entry. Does not handle quoted keys or
/// inline tables. Returns 0 if the key cannot be located.
fn find_key_line(content: &str, dotted_key: &str) -> usize {
    let segments: Vec<&str> = dotted_key.split('.').collect();
    let leaf = segments.last().copied().unwrap_or(dotted_key);
    let parents = &segments[..segments.len().saturating_sub(1)];
    let expected_section: Vec<&str> = parents
        .iter()
        .copied()
        .filter(|s| s.parse::<usize>().is_err())
        .collect();
    let array_index = parents.iter().find_map(|s| s.parse::<usize>().ok());
    let array_name = expected_section.first().copied();

    let mut current_section: Vec<String> = Vec::new();
    let mut array_seen = 0usize;

    for (i, line) in content.lines().enumerate() {
        let trimmed = line.trim();

        if let Some(header) = trimmed
            .strip_prefix("[[")
            .and_then(|rest| rest.strip_suffix("]]"))
        {
            current_section = split_header(header);
            if array_name == Some(header.trim()) {
                array_seen += 1;
            }
            continue;
        }
        if let Some(header) = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
        {
            current_section = split_header(header);
            continue;
        }

        let in_right_section = expected_section.len() == current_section.len()
            && expected_section
                .iter()
                .zip(&current_section)
                .all(|(a, b)| *a == b);
        let in_right_entry = array_index.is_none_or(|idx| array_seen == idx + 1);

        if in_right_section
            && in_right_entry
            && let Some(after_key) = trimmed.strip_prefix(leaf)
            && after_key.trim_start().starts_with('=')
        {
            return i + 1;
        }
    }
    0
}

fn split_header(header: &str) -> Vec<String> {
    header.split('.').map(|s| s.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{FOO_CONFIG, TWO_CONTEXTS};
    use std::path::PathBuf;

    fn path() -> PathBuf {
        PathBuf::from("/test/.kouch/config")
    }

    fn single_unknown(content: &str) -> (String, usize) {
        match parse_strict(content, &path()).unwrap_err() {
            KouchError::UnknownKeys(keys) => {
                assert_eq!(keys.len(), 1);
                match &keys[0] {
                    KouchError::UnknownKey { key, line, .. } => (key.clone(), *line),
                    other => panic!("Expected UnknownKey, got: {other:?}"),
                }
            }
            other => panic!("Expected UnknownKeys, got: {other:?}"),
        }
    }

    #[test]
    fn valid_config_passes() {
        let file = parse_strict(FOO_CONFIG, &path()).unwrap();
        assert_eq!(file.default_context.as_deref(), Some("foo"));
        assert!(parse_strict(TWO_CONTEXTS, &path()).is_ok());
    }

    #[test]
    fn empty_content_ok() {
        assert!(parse_strict("", &path()).is_ok());
    }

    #[test]
    fn unknown_top_level_key() {
        let (key, line) = single_unknown("default-context = \"foo\"\ncurrent-context = \"x\"\n");
        assert_eq!(key, "current-context");
        assert_eq!(line, 2);
    }

    #[test]
    fn unknown_key_in_second_context() {
        let content = "\
[[contexts]]
name = \"a\"

[contexts.context]
root = \"a.com\"

[[contexts]]
name = \"b\"

[contexts.context]
root = \"b.com\"
hostname = \"oops\"
";
        let (key, line) = single_unknown(content);
        assert_eq!(key, "contexts.1.context.hostname");
        assert_eq!(line, 12);
    }

    #[test]
    fn multiple_unknown_keys() {
        match parse_strict("typo1 = 1\ntypo2 = 2\n", &path()).unwrap_err() {
            KouchError::UnknownKeys(keys) => assert_eq!(keys.len(), 2),
            other => panic!("Expected UnknownKeys, got: {other:?}"),
        }
    }

    #[test]
    fn syntax_error_is_invalid_with_path() {
        let err = parse_strict("default-context = \n", &path()).unwrap_err();
        assert!(matches!(err, KouchError::ConfigFileInvalid { .. }));
        assert!(err.to_string().contains(".kouch/config"));
    }

    #[test]
    fn wrong_type_is_invalid() {
        let err = parse_lenient("contexts = 5\n", &path()).unwrap_err();
        assert!(matches!(err, KouchError::ConfigFileInvalid { .. }));
    }

    #[test]
    fn lenient_ignores_unknown() {
        let file = parse_lenient("typo = 1\ndefault-context = \"foo\"\n", &path()).unwrap();
        assert_eq!(file.default_context.as_deref(), Some("foo"));
    }
}
