use std::ffi::OsString;
use std::path::PathBuf;

use tracing::debug;

use crate::config::{Config, Context};
use crate::context::{self, ContextOverrides};
use crate::credentials::Credentials;
use crate::env;
use crate::error::KouchError;
use crate::file::{self, ConfigSource};
use crate::ops::{self, ConfigResult};
use crate::options::{self, GetArgs, RequestOptions};
use crate::persist;
use crate::request::{self, Operation, RequestPlan};
use crate::resolve::{self, ResolveInput};
use crate::types::{ConfigAction, Target, TargetScope};

/// Entry point for building a kouch session.
pub struct Kouch;

impl Kouch {
    pub fn builder() -> KouchBuilder {
        KouchBuilder::new()
    }
}

/// Where the `KOUCHCONFIG` value comes from.
#[derive(Debug, Clone)]
enum EnvSource {
    Process,
    Value(OsString),
    Disabled,
}

/// Builder for one invocation's configuration.
///
/// Collects the inputs that decide which config files are read
/// ([`config_file()`](Self::config_file), `KOUCHCONFIG`, the home directory)
/// and the command-line connection overrides, then either
/// [`load()`](Self::load)s a [`Session`] or [`handle()`](Self::handle)s a
/// `config` subcommand.
pub struct KouchBuilder {
    config_file: Option<PathBuf>,
    env: EnvSource,
    home: Option<PathBuf>,
    strict: bool,
    context_name: Option<String>,
    overrides: ContextOverrides,
}

impl KouchBuilder {
    fn new() -> Self {
        Self {
            config_file: None,
            env: EnvSource::Process,
            home: None,
            strict: true,
            context_name: None,
            overrides: ContextOverrides::default(),
        }
    }

    /// `--kouchconfig`: read exactly this file. `None` is ignored.
    pub fn config_file<P: Into<PathBuf>>(mut self, path: Option<P>) -> Self {
        if let Some(p) = path {
            self.config_file = Some(p.into());
        }
        self
    }

    /// Use this value instead of the process's `KOUCHCONFIG`.
    pub fn kouchconfig(mut self, value: impl Into<OsString>) -> Self {
        self.env = EnvSource::Value(value.into());
        self
    }

    /// Ignore `KOUCHCONFIG` entirely.
    pub fn no_env(mut self) -> Self {
        self.env = EnvSource::Disabled;
        self
    }

    /// Home directory for the default `~/.kouch/config` (default: the current
    /// user's home).
    pub fn home_dir(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    /// Enable or disable strict mode (default: `true`).
    /// In strict mode, unknown keys in config files produce errors.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// `--context`: use this named context instead of `default-context`.
    pub fn context<S: Into<String>>(mut self, name: Option<S>) -> Self {
        if let Some(n) = name {
            self.context_name = Some(n.into());
        }
        self
    }

    /// `--root`. `None` is ignored.
    pub fn root<S: Into<String>>(mut self, root: Option<S>) -> Self {
        if let Some(r) = root {
            self.overrides.root = Some(r.into());
        }
        self
    }

    /// `--user`, as `name` or `name:password`. `None` is ignored.
    pub fn user<S: Into<String>>(mut self, user: Option<S>) -> Self {
        if let Some(u) = user {
            self.overrides.user = Some(u.into());
        }
        self
    }

    /// `--password`. `None` is ignored.
    pub fn password<S: Into<String>>(mut self, password: Option<S>) -> Self {
        if let Some(p) = password {
            self.overrides.password = Some(p.into());
        }
        self
    }

    /// Apply the file selection policy to the builder's inputs.
    fn source(&self) -> ConfigSource {
        let env_value = match &self.env {
            EnvSource::Process => env::kouchconfig_var(),
            EnvSource::Value(v) => Some(v.clone()),
            EnvSource::Disabled => None,
        };
        let home = self.home.clone().or_else(file::home_dir);
        let source = ConfigSource::select(
            self.config_file.as_deref(),
            env::config_paths(env_value.as_deref()),
            home.as_deref(),
        );
        debug!(?source, "selected config source");
        source
    }

    fn read_config(&self, source: &ConfigSource) -> Result<Config, KouchError> {
        let files = file::load_config_files(source)?;
        resolve::resolve(ResolveInput {
            files,
            strict: self.strict,
        })
    }

    /// Load the configuration and attach the command-line overrides.
    pub fn load(self) -> Result<Session, KouchError> {
        let source = self.source();
        let config = self.read_config(&source)?;
        let mut session = Session::new(config, self.context_name, self.overrides)?;
        session.source = source;
        Ok(session)
    }

    /// Handle a `config` subcommand and print the result to stdout.
    pub fn handle_and_print(self, action: &ConfigAction) -> Result<(), KouchError> {
        let result = self.handle(action)?;
        print!("{result}");
        Ok(())
    }

    /// Handle a `config` subcommand (view / set-context / use-context).
    pub fn handle(self, action: &ConfigAction) -> Result<ConfigResult, KouchError> {
        let source = self.source();
        match action {
            ConfigAction::View => {
                let config = self.read_config(&source)?;
                ops::list_values(&config)
            }
            ConfigAction::SetContext {
                name,
                root,
                user,
                password,
            } => {
                let config = self.read_for_edit(&source)?;
                let fields = ContextOverrides {
                    root: root.clone(),
                    user: user.clone(),
                    password: password.clone(),
                };
                persist::persist_context(&config, &source.write_chain(), name, &fields)
            }
            ConfigAction::UseContext { name } => {
                let config = self.read_for_edit(&source)?;
                persist::persist_default(&config, &source.write_chain(), name)
            }
        }
    }

    /// Like `read_config`, but a missing `--kouchconfig` file is an empty
    /// config so that `set-context` can create it.
    fn read_for_edit(&self, source: &ConfigSource) -> Result<Config, KouchError> {
        match self.read_config(source) {
            Err(KouchError::ConfigFileNotFound { path }) => {
                debug!(path = %path.display(), "config file will be created");
                Ok(Config::default())
            }
            other => other,
        }
    }
}

/// Request-scoped configuration: built once per invocation and passed to
/// everything that needs to resolve a request.
#[derive(Debug, Clone)]
pub struct Session {
    config: Config,
    source: ConfigSource,
    context_name: Option<String>,
    overrides: ContextOverrides,
}

impl Session {
    /// Wrap an already-loaded config. The dynamic context is built from
    /// `overrides` here, so a malformed `--root` fails early.
    pub fn new(
        config: Config,
        context_name: Option<String>,
        overrides: ContextOverrides,
    ) -> Result<Self, KouchError> {
        let config = match context::construct_context(&overrides)? {
            Some(dynamic) => config.with_dynamic(dynamic),
            None => config,
        };
        Ok(Self {
            config,
            source: ConfigSource::None,
            context_name,
            overrides,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The config files this session was selected from.
    pub fn source(&self) -> &ConfigSource {
        &self.source
    }

    /// Files that were read, in load order.
    pub fn files(&self) -> &[PathBuf] {
        &self.config.files
    }

    pub fn context_name(&self) -> Option<&str> {
        self.context_name.as_deref()
    }

    pub fn overrides(&self) -> &ContextOverrides {
        &self.overrides
    }

    /// See [`context::effective_context`].
    pub fn effective_context(&self) -> Result<Option<Context>, KouchError> {
        context::effective_context(&self.config, self.context_name.as_deref())
    }

    /// The root a request falls back to when its target names none.
    pub fn root(&self) -> Result<String, KouchError> {
        context::require_root(&self.config, self.context_name.as_deref()).map(|ctx| ctx.root)
    }

    /// Resolve `args` into request options for `scope`.
    pub fn request_options(
        &self,
        scope: TargetScope,
        args: &GetArgs,
    ) -> Result<RequestOptions, KouchError> {
        options::build(scope, args, self)
    }

    /// Resolve and validate `args` for `op`, producing the request to send.
    ///
    /// Operations without a target scope reject a positional target and only
    /// resolve the root.
    pub fn plan(&self, op: Operation, args: &GetArgs) -> Result<RequestPlan, KouchError> {
        let opts = match op.scope() {
            Some(scope) => self.request_options(scope, args)?,
            None => {
                if let Some(src) = &args.target {
                    return Err(KouchError::invalid_target(src, "this command takes no target"));
                }
                let ctx = context::require_root(&self.config, self.context_name.as_deref())?;
                let credentials = Credentials::new(ctx.user, ctx.password);
                RequestOptions {
                    target: Target {
                        root: Some(ctx.root),
                        ..Target::default()
                    },
                    query: args.query.to_query(),
                    credentials: (!credentials.is_empty()).then_some(credentials),
                    ..RequestOptions::default()
                }
            }
        };
        request::plan(op, &opts, args.request.head)
    }
}
