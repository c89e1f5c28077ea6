//! Config resolution pipeline: loaded file contents in, merged [`Config`] out.
//!
//! Operates on pre-loaded data (`ResolveInput`) with no I/O, making the whole
//! pipeline testable with synthetic inputs. Steps:
//!
//! 1. Parse each file into a [`ConfigFile`](crate::config::ConfigFile),
//!    rejecting unknown keys in strict mode
//! 2. Merge files in order (contexts by name, later non-empty fields win)

use std::path::PathBuf;

use tracing::debug;

use crate::config::Config;
use crate::error::KouchError;
use crate::merge::merge_file;
use crate::validate;

/// All pre-loaded data needed to resolve a config. No I/O happens here.
pub struct ResolveInput {
    /// File contents in load order: first = lowest priority.
    pub files: Vec<(PathBuf, String)>,
    /// Whether to reject unknown keys in config files.
    pub strict: bool,
}

pub fn resolve(input: ResolveInput) -> Result<Config, KouchError> {
    let mut config = Config::default();
    for (path, content) in &input.files {
        let file = if input.strict {
            validate::parse_strict(content, path)?
        } else {
            validate::parse_lenient(content, path)?
        };
        debug!(
            path = %path.display(),
            contexts = file.contexts.len(),
            "merging config file"
        );
        merge_file(&mut config, path, file);
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Context, NamedContext};
    use crate::fixtures::test::{FOO_CONFIG, TWO_CONTEXTS};

    fn input(files: &[(&str, &str)]) -> ResolveInput {
        ResolveInput {
            files: files
                .iter()
                .map(|(p, c)| (PathBuf::from(p), c.to_string()))
                .collect(),
            strict: true,
        }
    }

    #[test]
    fn no_files_is_empty_config() {
        let config = resolve(input(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn single_file() {
        let config = resolve(input(&[("/home/u/.kouch/config", FOO_CONFIG)])).unwrap();
        assert_eq!(config.default_context.as_deref(), Some("foo"));
        assert_eq!(
            config.contexts,
            vec![NamedContext::new("foo", Context::with_root("http://foo.com/"))]
        );
        assert_eq!(config.files, vec![PathBuf::from("/home/u/.kouch/config")]);
    }

    #[test]
    fn merged_files_keep_first_default() {
        let config = resolve(input(&[("/a", FOO_CONFIG), ("/b", TWO_CONTEXTS)])).unwrap();
        assert_eq!(config.default_context.as_deref(), Some("foo"));
        let names: Vec<&str> = config.contexts.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["foo", "prod", "local"]);
    }

    #[test]
    fn same_name_later_file_overrides_per_field() {
        let later = "[[contexts]]\nname = \"prod\"\n[contexts.context]\npassword = \"rotated\"\n";
        let config = resolve(input(&[("/a", TWO_CONTEXTS), ("/b", later)])).unwrap();
        let prod = &config.context("prod").unwrap().context;
        assert_eq!(prod.root, "https://db.example.com/");
        assert_eq!(prod.user, "admin");
        assert_eq!(prod.password, "rotated");
    }

    #[test]
    fn invalid_file_names_its_path() {
        let result = resolve(input(&[("/a", FOO_CONFIG), ("/broken", "contexts = [")]));
        let err = result.unwrap_err();
        assert!(matches!(err, KouchError::ConfigFileInvalid { .. }));
        assert!(err.to_string().contains("/broken"));
    }

    #[test]
    fn strict_rejects_unknown_key() {
        let result = resolve(input(&[("/a", "typo = 1\n")]));
        assert!(matches!(result, Err(KouchError::UnknownKeys(_))));
    }

    #[test]
    fn lenient_allows_unknown_key() {
        let mut lenient = input(&[("/a", "typo = 1\ndefault-context = \"x\"\n")]);
        lenient.strict = false;
        let config = resolve(lenient).unwrap();
        assert_eq!(config.default_context.as_deref(), Some("x"));
    }
}
