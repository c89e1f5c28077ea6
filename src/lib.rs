//! Addressing and configuration resolution for a CouchDB-style command-line
//! client.
//!
//! Before any request is sent, kouch turns three independent sources into one
//! consistent request description:
//!
//! - a positional **target** string (`{filename}`, `{id}/{filename}`,
//!   `/{db}/{id}/{filename}`, or a full URL), parsed per scope;
//! - explicit **flags** (`--database`, `--id`, `--filename`, `--root`,
//!   `--user`, `--password`, query flags);
//! - merged **config files** holding named contexts.
//!
//! ```ignore
//! let session = Kouch::builder()
//!     .root(cli.root)
//!     .user(cli.user)
//!     .load()?;
//! let plan = session.plan(Operation::GetDocument, &args)?;
//! ```
//!
//! # Config files
//!
//! Config files are TOML:
//!
//! ```toml
//! default-context = "local"
//!
//! [[contexts]]
//! name = "local"
//!
//! [contexts.context]
//! root = "http://localhost:5984/"
//! user = "admin"
//! password = "secret"
//! ```
//!
//! Which files are read:
//!
//! 1. `--kouchconfig FILE`: exactly that file, which must exist.
//! 2. `$KOUCHCONFIG`: a path list; every existing file is merged in order.
//!    Contexts are unioned by name and later non-empty fields win.
//!    `default-context` comes from the first file that sets it.
//! 3. `~/.kouch/config` if it exists. No config at all is valid.
//!
//! Strict mode is on by default: unknown keys fail loading with the file,
//! key, and line. Turn it off with [`.strict(false)`](KouchBuilder::strict).
//!
//! # Contexts
//!
//! The effective context is the one named by `--context` (else
//! `default-context`) with every non-empty field from `--root`, `--user`, and
//! `--password` laid over it. Credentials embedded in a root URL are stripped
//! from the root; `--user name` drops the embedded password, `--user
//! name:pass` sets both, and `--password` replaces only the password.
//!
//! # Conflicts
//!
//! Each of database, document ID, and filename may come from the target or
//! from its flag, never both. A field set twice is an error, not an override.
//!
//! # Error handling
//!
//! All fallible operations return [`KouchError`]. Each variant maps to a
//! stable process exit code via [`KouchError::exit_code`].

pub mod config;
pub mod context;
pub mod credentials;
pub mod error;
pub mod logging;
pub mod options;
pub mod query;
pub mod request;
pub mod target;
pub mod types;

mod builder;
#[cfg(feature = "clap")]
mod cli;
mod env;
mod file;
pub(crate) mod merge;
mod ops;
mod persist;
mod resolve;
mod validate;

#[cfg(test)]
mod fixtures;

pub use builder::{Kouch, KouchBuilder, Session};
#[cfg(feature = "clap")]
pub use cli::{
    AttachmentArgs, Cli, Command, ConfigArgs, ConfigSubcommand, DatabaseArgs, DocumentArgs,
    GetCommand, GlobalArgs, QueryArgs, RequestArgs, UuidsArgs,
};
pub use config::{Config, ConfigFile, Context, ContextKey, NamedContext};
pub use context::ContextOverrides;
pub use credentials::Credentials;
pub use env::KOUCHCONFIG_ENV;
pub use error::KouchError;
pub use file::ConfigSource;
pub use ops::ConfigResult;
pub use options::{GetArgs, RequestFlags, RequestOptions, TargetFlags};
pub use query::QueryFlags;
pub use request::{DEFAULT_UUID_COUNT, Operation, RequestPlan};
pub use types::{ConfigAction, Target, TargetScope};
