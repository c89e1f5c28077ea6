//! Clap adapter for the `kouch` binary.
//!
//! Compiled only with the `clap` Cargo feature (on by default). The types here
//! do nothing but parse; [`GetCommand::into_request`] and
//! [`ConfigArgs::into_action`] convert them into the framework-agnostic
//! [`GetArgs`] and [`ConfigAction`] that the core works with.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::builder::{Kouch, KouchBuilder};
use crate::options::{GetArgs, RequestFlags, TargetFlags};
use crate::query::QueryFlags;
use crate::request::{DEFAULT_UUID_COUNT, Operation};
use crate::types::ConfigAction;

/// Command-line client for CouchDB-style document databases.
#[derive(Debug, Parser)]
#[command(name = "kouch", version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Connection and config flags accepted by every subcommand.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Server root URL, e.g. http://localhost:5984/. May embed user:password@.
    #[arg(long, short = 'S', global = true)]
    pub root: Option<String>,

    /// User name, or user:password.
    #[arg(long, short = 'u', global = true)]
    pub user: Option<String>,

    #[arg(long, short = 'p', global = true)]
    pub password: Option<String>,

    /// Read only this config file; no merging.
    #[arg(long, global = true, value_name = "FILE")]
    pub kouchconfig: Option<PathBuf>,

    /// Use this named context instead of the default one.
    #[arg(long, global = true, value_name = "NAME")]
    pub context: Option<String>,

    /// Log resolution steps to stderr.
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    /// A builder carrying every global flag.
    pub fn builder(&self) -> KouchBuilder {
        Kouch::builder()
            .config_file(self.kouchconfig.clone())
            .context(self.context.clone())
            .root(self.root.clone())
            .user(self.user.clone())
            .password(self.password.clone())
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch a database, document, or attachment.
    #[command(subcommand)]
    Get(GetCommand),
    /// View or modify kouchconfig files.
    Config(ConfigArgs),
}

#[derive(Debug, Subcommand)]
pub enum GetCommand {
    /// Fetch a file attachment.
    ///
    /// Target: {filename}, {id}/{filename}, /{db}/{id}/{filename}, or a full
    /// URL such as http://host.com/{db}/{id}/{filename}.
    #[command(visible_alias = "att")]
    Attachment(AttachmentArgs),
    /// Fetch a document.
    ///
    /// Target: {id}, /{db}/{id}, {root}/{db}/{id}, or a full URL.
    #[command(visible_alias = "doc")]
    Document(DocumentArgs),
    /// Fetch database information.
    ///
    /// Target: {db}, /{db}, {root}/{db}, or a full URL.
    #[command(visible_alias = "db")]
    Database(DatabaseArgs),
    /// Fetch server-generated UUIDs from the default context's server.
    Uuids(UuidsArgs),
}

#[derive(Debug, Args)]
pub struct AttachmentArgs {
    pub target: Option<String>,

    /// Attachment filename. Needed when the filename contains slashes.
    #[arg(long)]
    pub filename: Option<String>,

    /// Document ID.
    #[arg(long)]
    pub id: Option<String>,

    #[arg(long)]
    pub database: Option<String>,

    #[command(flatten)]
    pub request: RequestArgs,
}

#[derive(Debug, Args)]
pub struct DocumentArgs {
    pub target: Option<String>,

    /// Document ID. Needed when the ID contains slashes.
    #[arg(long)]
    pub id: Option<String>,

    #[arg(long)]
    pub database: Option<String>,

    #[command(flatten)]
    pub request: RequestArgs,

    #[command(flatten)]
    pub query: QueryArgs,
}

#[derive(Debug, Args)]
pub struct DatabaseArgs {
    pub target: Option<String>,

    #[arg(long)]
    pub database: Option<String>,

    #[command(flatten)]
    pub request: RequestArgs,
}

#[derive(Debug, Args)]
pub struct UuidsArgs {
    /// Number of UUIDs to return.
    #[arg(long, short = 'C', default_value_t = DEFAULT_UUID_COUNT)]
    pub count: u32,
}

#[derive(Debug, Args)]
pub struct RequestArgs {
    /// Fetch this revision.
    #[arg(long, short = 'r')]
    pub rev: Option<String>,

    /// Return 304 Not Modified if the entity tag matches.
    #[arg(long)]
    pub if_none_match: Option<String>,

    /// Ask the server to commit to disk before responding.
    #[arg(long)]
    pub full_commit: bool,

    /// Send HEAD instead of GET.
    #[arg(long, short = 'I')]
    pub head: bool,
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    #[arg(long)]
    pub include_attachments: bool,
    #[arg(long)]
    pub include_att_encoding: bool,
    #[arg(long)]
    pub include_conflicts: bool,
    #[arg(long)]
    pub include_deleted_conflicts: bool,
    #[arg(long)]
    pub force_latest: bool,
    #[arg(long)]
    pub include_local_seq: bool,
    #[arg(long)]
    pub meta: bool,
    #[arg(long)]
    pub revs: bool,
    #[arg(long)]
    pub revs_info: bool,
    /// Comma-separated revisions whose attachments are already known.
    #[arg(long, value_name = "REVS")]
    pub attachments_since: Option<String>,
    /// Comma-separated revisions to fetch.
    #[arg(long, value_name = "REVS")]
    pub open_revs: Option<String>,
}

impl From<RequestArgs> for RequestFlags {
    fn from(args: RequestArgs) -> Self {
        RequestFlags {
            if_none_match: args.if_none_match,
            rev: args.rev,
            full_commit: args.full_commit,
            head: args.head,
        }
    }
}

impl From<QueryArgs> for QueryFlags {
    fn from(args: QueryArgs) -> Self {
        QueryFlags {
            include_attachments: args.include_attachments,
            include_att_encoding: args.include_att_encoding,
            include_conflicts: args.include_conflicts,
            include_deleted_conflicts: args.include_deleted_conflicts,
            force_latest: args.force_latest,
            include_local_seq: args.include_local_seq,
            meta: args.meta,
            revs: args.revs,
            revs_info: args.revs_info,
            attachments_since: args.attachments_since,
            open_revs: args.open_revs,
        }
    }
}

impl GetCommand {
    /// Convert clap-parsed args into an operation and its framework-agnostic args.
    pub fn into_request(self) -> (Operation, GetArgs) {
        match self {
            GetCommand::Attachment(a) => (
                Operation::GetAttachment,
                GetArgs {
                    target: a.target,
                    fields: TargetFlags {
                        filename: a.filename,
                        document: a.id,
                        database: a.database,
                    },
                    request: a.request.into(),
                    query: QueryFlags::default(),
                },
            ),
            GetCommand::Document(d) => (
                Operation::GetDocument,
                GetArgs {
                    target: d.target,
                    fields: TargetFlags {
                        filename: None,
                        document: d.id,
                        database: d.database,
                    },
                    request: d.request.into(),
                    query: d.query.into(),
                },
            ),
            GetCommand::Database(d) => (
                Operation::GetDatabase,
                GetArgs {
                    target: d.target,
                    fields: TargetFlags {
                        database: d.database,
                        ..TargetFlags::default()
                    },
                    request: d.request.into(),
                    query: QueryFlags::default(),
                },
            ),
            GetCommand::Uuids(u) => (Operation::GetUuids { count: u.count }, GetArgs::default()),
        }
    }
}

/// Clap-derived args for the `config` subcommand group.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigSubcommand>,
}

/// Available config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Show the merged configuration. Passwords are redacted.
    View,
    /// Create or update a context from --root, --user, and --password.
    SetContext {
        name: String,
    },
    /// Make a context the default.
    UseContext {
        name: String,
    },
}

impl ConfigArgs {
    /// Convert clap-parsed args into a framework-agnostic `ConfigAction`.
    ///
    /// Bare `config` (no subcommand) and explicit `config view` both map to
    /// `ConfigAction::View`. `set-context` takes its fields from the global
    /// connection flags.
    pub fn into_action(self, global: &GlobalArgs) -> ConfigAction {
        match self.action {
            None | Some(ConfigSubcommand::View) => ConfigAction::View,
            Some(ConfigSubcommand::SetContext { name }) => ConfigAction::SetContext {
                name,
                root: global.root.clone(),
                user: global.user.clone(),
                password: global.password.clone(),
            },
            Some(ConfigSubcommand::UseContext { name }) => ConfigAction::UseContext { name },
        }
    }
}
