//! hdlsim CLI: configure, build and run HDL simulations.

mod commands;
mod manifest;

use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand};
use hdlsim_backends::BackendError;
use tracing_subscriber::EnvFilter;

use commands::sim::Stop;
use commands::SimTarget;
use manifest::HdlsimManifest;

#[derive(Parser)]
#[command(name = "hdlsim", version, about = "Drive HDL simulators from a project manifest")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new hdlsim project
    Init {
        /// Project name
        name: String,
        /// Top-level module name (default: the project name)
        #[arg(long)]
        top: Option<String>,
    },
    /// Write the simulator's project files into the work root
    Configure {
        #[command(flatten)]
        target: TargetArgs,
        /// Simulation parameters, e.g. `-- --cycles=100 --vcd`
        #[arg(last = true)]
        args: Vec<String>,
    },
    /// Compile the simulation model
    Build {
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Run the compiled simulation model
    Run {
        #[command(flatten)]
        target: TargetArgs,
        /// Simulation parameters, e.g. `-- --cycles=100 --vcd`
        #[arg(last = true)]
        args: Vec<String>,
    },
    /// Configure, build and run in one step
    Sim {
        #[command(flatten)]
        target: TargetArgs,
        /// Stop after configuring
        #[arg(long)]
        setup: bool,
        /// Stop after building
        #[arg(long)]
        build_only: bool,
        /// Simulation parameters, e.g. `-- --cycles=100 --vcd`
        #[arg(last = true)]
        args: Vec<String>,
    },
    /// Remove build artifacts
    Clean {
        /// Build root to remove (default: the manifest's build_root)
        #[arg(long)]
        build_root: Option<PathBuf>,
    },
    /// Check toolchain and project status
    Doctor,
}

#[derive(Args)]
struct TargetArgs {
    /// Simulator to use (default: the manifest's project.tool)
    #[arg(long)]
    tool: Option<String>,
    /// Directory receiving work roots (default: the manifest's build_root)
    #[arg(long)]
    build_root: Option<PathBuf>,
    /// Standalone system description file
    #[arg(long)]
    system: Option<PathBuf>,
}

impl From<TargetArgs> for SimTarget {
    fn from(args: TargetArgs) -> Self {
        SimTarget {
            tool: args.tool,
            build_root: args.build_root,
            system: args.system,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        // `-- --help` asks the parameter parser for its usage text.
        if let Some(BackendError::Arguments(clap_err)) = e.downcast_ref::<BackendError>() {
            if !clap_err.use_stderr() {
                let _ = clap_err.print();
                process::exit(0);
            }
        }
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Commands::Init { name, top } => {
            let top = top.unwrap_or_else(|| name.replace('-', "_"));
            commands::init::run(&name, &top)
        }

        Commands::Configure { target, args } => {
            let (manifest, project_dir) = load_manifest_optional(&cwd)?;
            let project_dir = project_dir.unwrap_or(cwd);
            commands::configure::run(&project_dir, manifest.as_ref(), &target.into(), &args)
        }

        Commands::Build { target } => {
            let (manifest, project_dir) = load_manifest_optional(&cwd)?;
            let project_dir = project_dir.unwrap_or(cwd);
            commands::build::run(&project_dir, manifest.as_ref(), &target.into())
        }

        Commands::Run { target, args } => {
            let (manifest, project_dir) = load_manifest_optional(&cwd)?;
            let project_dir = project_dir.unwrap_or(cwd);
            commands::run::run(&project_dir, manifest.as_ref(), &target.into(), &args)
        }

        Commands::Sim {
            target,
            setup,
            build_only,
            args,
        } => {
            let (manifest, project_dir) = load_manifest_optional(&cwd)?;
            let project_dir = project_dir.unwrap_or(cwd);
            commands::sim::run(
                &project_dir,
                manifest.as_ref(),
                &target.into(),
                Stop::from_flags(setup, build_only),
                &args,
            )
        }

        Commands::Clean { build_root } => {
            let (manifest, project_dir) = load_manifest_optional(&cwd)?;
            let project_dir = project_dir.unwrap_or(cwd);
            let root = commands::build_root(&project_dir, manifest.as_ref(), build_root.as_deref());
            commands::clean::run(&root)
        }

        Commands::Doctor => {
            let (_, project_dir) = load_manifest_optional(&cwd)?;
            let project_dir = project_dir.unwrap_or(cwd);
            commands::doctor::run(&project_dir)
        }
    }
}

/// Try to load a manifest from the current directory upward. Returns (None, None) if not found.
fn load_manifest_optional(cwd: &Path) -> anyhow::Result<(Option<HdlsimManifest>, Option<PathBuf>)> {
    match HdlsimManifest::find_and_load(cwd)? {
        Some((manifest, dir)) => Ok((Some(manifest), Some(dir))),
        None => Ok((None, None)),
    }
}
