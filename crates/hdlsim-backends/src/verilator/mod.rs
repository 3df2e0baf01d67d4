//! Verilator backend.
//!
//! Configuration writes three files into the work root:
//! - `<sanitized name>.vc`: the Verilator file-list
//! - `Makefile`: static driver that runs Verilator and the generated sub-makefile
//! - `config.mk`: top module, file-list name and extra Verilator options
//!
//! `build` runs `make` there and `run` executes the resulting `V<top_module>`.

pub mod filelist;
pub mod makefile;

use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use hdlsim_core::{Parameters, SystemDescriptor, VerilatorSection};
use tracing::{debug, info};

use crate::backend::{parse_parameter_args, BackendContext, SimulatorBackend};
use crate::error::{BackendError, Result};
use crate::launcher::Launcher;
use crate::param::param_value_str;

/// Registry name of this backend.
pub const TOOL_NAME: &str = "verilator";

/// Environment variable naming a local Verilator installation.
pub const VERILATOR_ROOT: &str = "VERILATOR_ROOT";

/// Log files receiving the build's standard output and standard error.
pub const BUILD_STDOUT_LOG: &str = "verilator.out.log";
pub const BUILD_STDERR_LOG: &str = "verilator.err.log";

/// Drives Verilator for one system.
#[derive(Debug)]
pub struct VerilatorBackend {
    system: SystemDescriptor,
    ctx: BackendContext,
    parameters: Parameters,
}

impl VerilatorBackend {
    pub fn new(system: SystemDescriptor, ctx: BackendContext) -> Self {
        Self {
            system,
            ctx,
            parameters: Parameters::new(),
        }
    }

    /// File-list name, `<sanitized name>.vc`.
    pub fn filelist_name(&self) -> String {
        format!("{}.vc", self.system.sanitized_name())
    }

    /// Path of the compiled simulation model.
    pub fn executable(&self) -> Result<PathBuf> {
        let top_module = &verilator_section(&self.system)?.top_module;
        Ok(self.ctx.work_root.join(format!("V{top_module}")))
    }

    /// Arguments the simulation model is launched with.
    ///
    /// With a pass-through argument convention `args` are used unchanged.
    /// Otherwise they are parsed as parameters and re-emitted as
    /// `+name=value` plusargs followed by `--name=value` arguments.
    pub fn run_args(&self, args: &[String]) -> Result<Vec<String>> {
        let section = verilator_section(&self.system)?;
        if section.cli_parser.is_passthrough() {
            return Ok(args.to_vec());
        }

        let params = parse_parameter_args(&self.system, args)?;
        let plusargs = params
            .plusarg
            .iter()
            .map(|(name, value)| format!("+{name}={}", param_value_str(value)));
        let cmdlineargs = params
            .cmdlinearg
            .iter()
            .map(|(name, value)| format!("--{name}={}", param_value_str(value)));
        Ok(plusargs.chain(cmdlineargs).collect())
    }

    fn write_config_files(&self, section: &VerilatorSection) -> Result<()> {
        let work_root = &self.ctx.work_root;
        let vc_file = self.filelist_name();
        let fileset = self.system.fileset();
        let libs = self.system.verilator_libs();

        let vc_path = work_root.join(&vc_file);
        let mut out = BufWriter::new(File::create(&vc_path)?);
        filelist::write_filelist(&mut out, section, &libs, &fileset, &self.parameters)?;
        out.flush()?;
        info!(path = %vc_path.display(), "Wrote file-list");

        makefile::write_build_scripts(
            work_root,
            &section.top_module,
            &vc_file,
            &section.verilator_options,
        )?;
        debug!(work_root = %work_root.display(), "wrote Makefile and {}", makefile::CONFIG_MK);
        Ok(())
    }
}

impl SimulatorBackend for VerilatorBackend {
    fn tool_name(&self) -> &'static str {
        TOOL_NAME
    }

    fn work_root(&self) -> &Path {
        &self.ctx.work_root
    }

    fn configure(&mut self, args: &[String]) -> Result<()> {
        let span = self.ctx.span.clone();
        let _guard = span.enter();

        let section = verilator_section(&self.system)?.clone();
        if section.top_module.is_empty() {
            return Err(BackendError::MissingTopModule {
                system: self.system.name.clone(),
            });
        }
        info!(system = %self.system.name, top_module = %section.top_module, "Configuring");

        // Pass-through systems bind no parameters; `run` forwards raw args.
        self.parameters = if section.cli_parser.is_passthrough() {
            Parameters::new()
        } else {
            parse_parameter_args(&self.system, args)?
        };

        self.ctx.prepare()?;
        self.write_config_files(&section)
    }

    fn build(&mut self) -> Result<()> {
        let span = self.ctx.span.clone();
        let _guard = span.enter();

        info!("Building simulation model");
        match find_verilator(&self.ctx) {
            Some(verilator) => debug!(verilator = %verilator.display(), "found toolchain"),
            None => return Err(BackendError::ToolchainNotFound),
        }

        let jobs = make_job_count(detected_cpus());
        debug!(jobs, "running make");

        let work_root = &self.ctx.work_root;
        let stdout = File::create(work_root.join(BUILD_STDOUT_LOG))?;
        let stderr = File::create(work_root.join(BUILD_STDERR_LOG))?;
        Launcher::new("make", vec!["-j".to_string(), jobs.to_string()])
            .cwd(work_root)
            .env(self.ctx.env.clone())
            .stdout(stdout)
            .stderr(stderr)
            .run()
    }

    fn run(&mut self, args: &[String]) -> Result<()> {
        let span = self.ctx.span.clone();
        let _guard = span.enter();

        let sim_args = self.run_args(args)?;
        let executable = std::path::absolute(self.executable()?)?;
        info!("Running simulation");
        debug!(executable = %executable.display(), args = ?sim_args, "simulation command");

        Launcher::new(executable, sim_args)
            .cwd(&self.ctx.work_root)
            .env(self.ctx.env.clone())
            .run()
    }
}

fn verilator_section(system: &SystemDescriptor) -> Result<&VerilatorSection> {
    system
        .verilator
        .as_ref()
        .ok_or_else(|| BackendError::MissingToolSection {
            system: system.name.clone(),
        })
}

/// Locate the Verilator executable as seen through the context environment.
///
/// `VERILATOR_ROOT` wins when set; otherwise `verilator` is searched for on
/// the context's `PATH`.
pub fn find_verilator(ctx: &BackendContext) -> Option<PathBuf> {
    if let Some(root) = ctx.env_var(VERILATOR_ROOT) {
        return Some(Path::new(root).join("bin").join("verilator"));
    }
    let path = ctx.env_var("PATH")?;
    which::which_in("verilator", Some(path), &ctx.work_root).ok()
}

/// Parallel `make` jobs for a host with `cpus` logical CPUs: two per CPU.
pub fn make_job_count(cpus: usize) -> usize {
    cpus * 2
}

/// Logical CPUs of this host, at least one.
pub fn detected_cpus() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}
