//! Per-operation validation and the request plan handed to the transport.
//!
//! [`RequestOptions`] may leave fields empty; each [`Operation`] decides which
//! fields it needs and fails with the first one missing. A valid combination
//! renders into a [`RequestPlan`]: method, fully escaped URL, and headers.
//!
//! Escaping follows the server's expectations: database names and filenames are
//! query-escaped (space becomes `+`, `/` becomes `%2F`), document IDs are
//! path-escaped, and the `_design/` and `_local/` prefixes of a document ID stay
//! literal.

use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;

use crate::error::KouchError;
use crate::options::RequestOptions;
use crate::types::{Target, TargetScope};

/// Unreserved characters in a query component. Everything else is escaped.
const QUERY: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Characters left alone in a single path segment. `/` is always escaped.
const PATH_SEGMENT: &AsciiSet = &QUERY
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b':')
    .remove(b'=')
    .remove(b'@');

const DOC_PREFIXES: [&str; 2] = ["_design/", "_local/"];

/// Number of UUIDs `get uuids` asks for by default.
pub const DEFAULT_UUID_COUNT: u32 = 1;

/// A read operation against the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GetDatabase,
    GetDocument,
    GetAttachment,
    /// Server-generated UUIDs. Needs only a root.
    GetUuids { count: u32 },
}

impl Operation {
    /// The target grammar this operation parses its positional argument with,
    /// or `None` for server-level operations that take no target.
    pub fn scope(self) -> Option<TargetScope> {
        match self {
            Operation::GetDatabase => Some(TargetScope::Database),
            Operation::GetDocument => Some(TargetScope::Document),
            Operation::GetAttachment => Some(TargetScope::Attachment),
            Operation::GetUuids { .. } => None,
        }
    }

    /// Check that every field this operation needs is present.
    pub fn validate(self, target: &Target) -> Result<(), KouchError> {
        if let Operation::GetUuids { .. } = self {
            return require_root(target);
        }
        if self == Operation::GetAttachment && is_blank(&target.filename) {
            return Err(KouchError::MissingField { what: "filename" });
        }
        if self != Operation::GetDatabase && is_blank(&target.document) {
            return Err(KouchError::MissingField {
                what: "document ID",
            });
        }
        if is_blank(&target.database) {
            return Err(KouchError::MissingField {
                what: "database name",
            });
        }
        require_root(target)
    }

    /// Escaped request path. Only meaningful after [`Operation::validate`].
    fn path(self, target: &Target) -> String {
        let database = query_escape(target.database.as_deref().unwrap_or_default());
        let document = encode_doc_id(target.document.as_deref().unwrap_or_default());
        let filename = query_escape(target.filename.as_deref().unwrap_or_default());
        match self {
            Operation::GetDatabase => format!("/{database}"),
            Operation::GetDocument => format!("/{database}/{document}"),
            Operation::GetAttachment => format!("/{database}/{document}/{filename}"),
            Operation::GetUuids { .. } => "/_uuids".to_string(),
        }
    }
}

/// What the transport should send. Never carries the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestPlan {
    pub method: &'static str,
    pub url: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

/// Validate `opts` for `op` and render the request.
pub fn plan(op: Operation, opts: &RequestOptions, head: bool) -> Result<RequestPlan, KouchError> {
    op.validate(&opts.target)?;
    let root = opts.target.root.as_deref().unwrap_or_default();

    let mut url = base_url(root);
    url.push_str(&op.path(&opts.target));

    let mut query = opts.query.clone();
    if let Some(rev) = &opts.rev {
        query.entry("rev".to_string()).or_default().push(rev.clone());
    }
    if let Operation::GetUuids { count } = op {
        query.insert("count".to_string(), vec![count.to_string()]);
    }
    let pairs: Vec<String> = query
        .iter()
        .flat_map(|(key, values)| {
            values
                .iter()
                .map(move |value| format!("{}={}", query_escape(key), query_escape(value)))
        })
        .collect();
    if !pairs.is_empty() {
        url.push('?');
        url.push_str(&pairs.join("&"));
    }

    let mut headers = BTreeMap::new();
    if let Some(tag) = opts.if_none_match_header() {
        headers.insert("If-None-Match".to_string(), tag);
    }
    if opts.full_commit {
        headers.insert("X-Couch-Full-Commit".to_string(), "true".to_string());
    }

    Ok(RequestPlan {
        method: if head { "HEAD" } else { "GET" },
        url,
        headers,
        user: opts
            .credentials
            .as_ref()
            .map(|c| c.user.clone())
            .filter(|u| !u.is_empty()),
    })
}

/// Form-style escaping: space becomes `+`, everything outside `[A-Za-z0-9._~-]`
/// is percent-encoded.
pub fn query_escape(s: &str) -> String {
    utf8_percent_encode(s, QUERY).to_string().replace("%20", "+")
}

/// Escape a document ID for use as a path segment, keeping a `_design/` or
/// `_local/` prefix literal.
pub fn encode_doc_id(id: &str) -> String {
    for prefix in DOC_PREFIXES {
        if let Some(rest) = id.strip_prefix(prefix) {
            return format!("{prefix}{}", utf8_percent_encode(rest, PATH_SEGMENT));
        }
    }
    utf8_percent_encode(id, PATH_SEGMENT).to_string()
}

/// Root without a trailing slash; schemeless roots get `http://`.
fn base_url(root: &str) -> String {
    let root = root.trim_end_matches('/');
    if root.contains("://") {
        root.to_string()
    } else {
        format!("http://{root}")
    }
}

fn require_root(target: &Target) -> Result<(), KouchError> {
    if is_blank(&target.root) {
        return Err(KouchError::NoRootConfigured);
    }
    Ok(())
}

fn is_blank(field: &Option<String>) -> bool {
    field.as_deref().is_none_or(str::is_empty)
}
