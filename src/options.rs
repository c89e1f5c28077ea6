//! Options builder: one immutable [`RequestOptions`] per invocation.
//!
//! Addressing fields come from two sources, the positional target and the
//! `--filename`/`--id`/`--database` flags. Each field may be set by at most one
//! of them; setting it from both is [`KouchError::ConflictingSpecification`].
//! A root still missing after target parsing is taken from the effective
//! context. Fields nobody set stay empty and are checked by the operation that
//! consumes the options (see [`request`](crate::request)).

use serde::Serialize;
use tracing::debug;

use crate::builder::Session;
use crate::credentials::{Credentials, apply_flags};
use crate::error::KouchError;
use crate::query::{Query, QueryFlags};
use crate::target::{self, ParsedTarget};
use crate::types::{Target, TargetScope};

/// Addressing fields given as flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetFlags {
    pub filename: Option<String>,
    pub document: Option<String>,
    pub database: Option<String>,
}

/// Request-shaping flags that are not query options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFlags {
    pub if_none_match: Option<String>,
    pub rev: Option<String>,
    pub full_commit: bool,
    /// Send HEAD instead of GET.
    pub head: bool,
}

/// Everything a `get` invocation says about its request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetArgs {
    pub target: Option<String>,
    pub fields: TargetFlags,
    pub request: RequestFlags,
    pub query: QueryFlags,
}

/// The resolved description of one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestOptions {
    pub target: Target,
    pub query: Query,
    /// Raw entity tag; see [`RequestOptions::if_none_match_header`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub if_none_match: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    pub full_commit: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credentials>,
}

impl RequestOptions {
    /// `If-None-Match` value in entity-tag syntax. Already-quoted and weak
    /// (`W/"..."`) tags pass through unchanged.
    pub fn if_none_match_header(&self) -> Option<String> {
        let tag = self.if_none_match.as_deref()?;
        if (tag.len() >= 2 && tag.starts_with('"') && tag.ends_with('"')) || tag.starts_with("W/\"")
        {
            return Some(tag.to_string());
        }
        Some(format!("\"{tag}\""))
    }
}

/// Resolve `args` in `scope` against the session's configuration.
pub fn build(
    scope: TargetScope,
    args: &GetArgs,
    session: &Session,
) -> Result<RequestOptions, KouchError> {
    let ParsedTarget {
        target: mut resolved,
        credentials: embedded,
    } = match args.target.as_deref() {
        Some(src) => target::parse(scope, src)?,
        None => ParsedTarget::default(),
    };

    merge_field(&mut resolved.filename, &args.fields.filename, "filename", "filename")?;
    merge_field(&mut resolved.document, &args.fields.document, "id", "document ID")?;
    merge_field(&mut resolved.database, &args.fields.database, "database", "database")?;

    let overrides = session.overrides();
    let credentials = if resolved.root.is_some() {
        apply_flags(
            embedded,
            overrides.user.as_deref(),
            overrides.password.as_deref(),
        )
    } else {
        match session.effective_context()? {
            Some(ctx) => {
                if !ctx.root.is_empty() {
                    resolved.root = Some(ctx.root);
                }
                Credentials::new(ctx.user, ctx.password)
            }
            None => Credentials::default(),
        }
    };

    debug!(
        root = resolved.root.as_deref().unwrap_or(""),
        database = resolved.database.as_deref().unwrap_or(""),
        document = resolved.document.as_deref().unwrap_or(""),
        filename = resolved.filename.as_deref().unwrap_or(""),
        "resolved target"
    );

    Ok(RequestOptions {
        target: resolved,
        query: args.query.to_query(),
        if_none_match: non_empty(&args.request.if_none_match),
        rev: non_empty(&args.request.rev),
        full_commit: args.request.full_commit,
        credentials: (!credentials.is_empty()).then_some(credentials),
    })
}

/// Fill `slot` from `flag`, refusing to overwrite a value from the target.
fn merge_field(
    slot: &mut Option<String>,
    flag: &Option<String>,
    flag_name: &'static str,
    what: &'static str,
) -> Result<(), KouchError> {
    let Some(value) = non_empty(flag) else {
        return Ok(());
    };
    if slot.as_deref().is_some_and(|s| !s.is_empty()) {
        return Err(KouchError::ConflictingSpecification {
            flag: flag_name,
            what,
        });
    }
    *slot = Some(value);
    Ok(())
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}
