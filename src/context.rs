//! Context resolution: pick the context a request runs against.
//!
//! The effective context starts from a named file context (the one chosen with
//! `--context`, else `default-context`) and overlays every non-empty field of
//! the dynamic context built from `--root`/`--user`/`--password`. The file
//! context itself is never modified.

use tracing::debug;

use crate::config::{Config, Context, NamedContext};
use crate::credentials::{Credentials, apply_flags, strip_root_credentials};
use crate::error::KouchError;
use crate::merge::overlay;

/// Connection overrides given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextOverrides {
    pub root: Option<String>,
    /// `name` or curl-style `name:password`.
    pub user: Option<String>,
    pub password: Option<String>,
}

impl ContextOverrides {
    pub fn is_empty(&self) -> bool {
        self.root.is_none() && self.user.is_none() && self.password.is_none()
    }
}

/// Build the dynamic context from command-line overrides.
///
/// Credentials embedded in `--root` are stripped from the root; `--user` and
/// `--password` then override them field by field. Returns `None` when no
/// override was given.
pub fn construct_context(overrides: &ContextOverrides) -> Result<Option<Context>, KouchError> {
    if overrides.is_empty() {
        return Ok(None);
    }
    let (root, embedded) = match overrides.root.as_deref() {
        Some(root) => strip_root_credentials(root)?,
        None => (String::new(), Credentials::default()),
    };
    let creds = apply_flags(
        embedded,
        overrides.user.as_deref(),
        overrides.password.as_deref(),
    );
    Ok(Some(Context {
        root,
        user: creds.user,
        password: creds.password,
    }))
}

/// The file context named by `selected`, falling back to `default-context`.
pub fn select_named<'a>(
    config: &'a Config,
    selected: Option<&str>,
) -> Result<Option<&'a NamedContext>, KouchError> {
    let Some(name) = selected.or(config.default_context.as_deref()) else {
        return Ok(None);
    };
    config
        .context(name)
        .map(Some)
        .ok_or_else(|| KouchError::ContextNotFound(name.to_string()))
}

/// Resolve the effective context, or `None` when neither a file context nor
/// any override exists.
pub fn effective_context(
    config: &Config,
    selected: Option<&str>,
) -> Result<Option<Context>, KouchError> {
    let named = match select_named(config, selected) {
        // A dangling default does not matter when --root names the server.
        Err(KouchError::ContextNotFound(_)) if selected.is_none() && has_dynamic_root(config) => {
            None
        }
        other => other?,
    };
    let merged = match (named, &config.dynamic) {
        (Some(named), Some(dynamic)) => overlay(named.context.clone(), dynamic),
        (Some(named), None) => named.context.clone(),
        (None, Some(dynamic)) => dynamic.clone(),
        (None, None) => return Ok(None),
    };
    let merged = normalize(merged)?;
    debug!(
        context = named.map(|n| n.name.as_str()).unwrap_or("<none>"),
        default = ?config.default_key(),
        root = %merged.root,
        "resolved effective context"
    );
    Ok(Some(merged))
}

fn has_dynamic_root(config: &Config) -> bool {
    config.dynamic.as_ref().is_some_and(|d| !d.root.is_empty())
}

/// Like [`effective_context`], but a missing context or an empty root is
/// [`KouchError::NoRootConfigured`].
pub fn require_root(config: &Config, selected: Option<&str>) -> Result<Context, KouchError> {
    match effective_context(config, selected)? {
        Some(ctx) if !ctx.root.is_empty() => Ok(ctx),
        _ => Err(KouchError::NoRootConfigured),
    }
}

/// Move user-info left in a file context's root into empty credential fields.
pub(crate) fn normalize(mut ctx: Context) -> Result<Context, KouchError> {
    if ctx.root.is_empty() {
        return Ok(ctx);
    }
    let (root, embedded) = strip_root_credentials(&ctx.root)?;
    ctx.root = root;
    if ctx.user.is_empty() {
        ctx.user = embedded.user;
    }
    if ctx.password.is_empty() {
        ctx.password = embedded.password;
    }
    Ok(ctx)
}
