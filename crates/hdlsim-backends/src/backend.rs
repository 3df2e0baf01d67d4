//! The simulator backend contract shared by every tool.
//!
//! A backend is driven through three phases, each a blocking call:
//! `configure` writes the tool's project files into the work root, `build`
//! compiles the simulation model, and `run` executes it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::{Arg, ArgAction, ArgMatches, Command};
use hdlsim_core::{ParamDatatype, ParamValue, Parameters, SystemDescriptor};
use tracing::Span;

use crate::error::Result;

/// A simulation tool driven by hdlsim.
pub trait SimulatorBackend {
    /// Registry name of the tool, e.g. `verilator`.
    fn tool_name(&self) -> &'static str;

    /// Directory holding all generated files and build products.
    fn work_root(&self) -> &Path;

    /// Validate the system and write the tool's project files.
    ///
    /// `args` are the user's simulation arguments. Re-running regenerates
    /// every file from scratch.
    fn configure(&mut self, args: &[String]) -> Result<()>;

    /// Compile the simulation model.
    fn build(&mut self) -> Result<()>;

    /// Execute the compiled model with the user's simulation arguments.
    fn run(&mut self, args: &[String]) -> Result<()>;
}

/// Per-invocation state handed to a backend at construction.
#[derive(Debug, Clone)]
pub struct BackendContext {
    /// Working directory owned by this invocation.
    pub work_root: PathBuf,
    /// Environment given to every child process, and consulted for tool lookup.
    pub env: BTreeMap<String, String>,
    /// Span that all of the backend's log events are recorded in.
    pub span: Span,
}

impl BackendContext {
    /// A context with an empty environment and no span.
    pub fn new(work_root: impl Into<PathBuf>) -> Self {
        Self {
            work_root: work_root.into(),
            env: BTreeMap::new(),
            span: Span::none(),
        }
    }

    /// A context inheriting the current process environment.
    pub fn from_process_env(work_root: impl Into<PathBuf>) -> Self {
        Self::new(work_root).with_env(std::env::vars().collect())
    }

    pub fn with_env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = env;
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Set one environment variable.
    pub fn set_env(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let _ = self.env.insert(key.into(), value.into());
    }

    /// Look up a non-empty environment variable.
    pub fn env_var(&self, key: &str) -> Option<&str> {
        self.env
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Conventional work root: `<build_root>/<sanitized system name>/sim-<tool>`.
    pub fn default_work_root(build_root: &Path, system: &SystemDescriptor, tool: &str) -> PathBuf {
        build_root
            .join(system.sanitized_name())
            .join(format!("sim-{tool}"))
    }

    /// Create the work root if it does not exist yet.
    pub fn prepare(&self) -> Result<()> {
        std::fs::create_dir_all(&self.work_root)?;
        Ok(())
    }
}

/// Parse `args` against the system's parameter declarations.
///
/// Each declared parameter becomes a `--<name>[=<value>]` option. Boolean
/// options may be given bare. Declared defaults fill in anything not given;
/// parameters with neither are left out.
pub fn parse_parameter_args(system: &SystemDescriptor, args: &[String]) -> Result<Parameters> {
    let matches = parameter_command(system).try_get_matches_from(args)?;
    Ok(collect_parameters(system, &matches))
}

fn parameter_command(system: &SystemDescriptor) -> Command {
    let mut command = Command::new(system.sanitized_name())
        .no_binary_name(true)
        .disable_help_flag(true)
        .about(format!("Simulation parameters of {}", system.name));

    // A declared parameter may take the `help` name, and then owns `--help`.
    if !system.parameters.contains_key("help") {
        command = command.arg(
            Arg::new("help")
                .short('h')
                .long("help")
                .action(ArgAction::Help)
                .help("Print help"),
        );
    }

    for (name, decl) in &system.parameters {
        let mut arg = Arg::new(name.clone()).long(name.clone());
        arg = match decl.datatype {
            ParamDatatype::Bool => arg
                .num_args(0..=1)
                .require_equals(true)
                .default_missing_value("true")
                .value_parser(clap::builder::BoolishValueParser::new()),
            ParamDatatype::Int => arg
                .allow_negative_numbers(true)
                .value_parser(clap::value_parser!(i64)),
            ParamDatatype::Str => arg.value_parser(clap::value_parser!(String)),
        };
        if let Some(ref help) = decl.description {
            arg = arg.help(help.clone());
        }
        command = command.arg(arg);
    }
    command
}

fn collect_parameters(system: &SystemDescriptor, matches: &ArgMatches) -> Parameters {
    let mut params = Parameters::new();
    for (name, decl) in &system.parameters {
        let given = match decl.datatype {
            ParamDatatype::Bool => matches.get_one::<bool>(name).copied().map(ParamValue::Bool),
            ParamDatatype::Int => matches.get_one::<i64>(name).copied().map(ParamValue::Int),
            ParamDatatype::Str => matches.get_one::<String>(name).cloned().map(ParamValue::Str),
        };
        if let Some(value) = given.or_else(|| decl.default.clone()) {
            params.insert(decl.paramtype, name.clone(), value);
        }
    }
    params
}
