//! `hdlsim doctor`: toolchain diagnostics.

use std::path::Path;
use std::process::Command;

use anyhow::Result;
use hdlsim_backends::verilator::{detected_cpus, find_verilator, make_job_count, VERILATOR_ROOT};
use hdlsim_backends::{available_tools, BackendContext};

use crate::manifest::HdlsimManifest;

/// Print toolchain diagnostic information.
pub fn run(project_dir: &Path) -> Result<()> {
    println!("=== hdlsim doctor ===");
    println!();

    println!("hdlsim version: {}", env!("CARGO_PKG_VERSION"));
    println!("Simulators:     {}", available_tools().join(", "));
    println!();

    println!("--- Verilator ---");
    let ctx = BackendContext::from_process_env(project_dir);
    match ctx.env_var(VERILATOR_ROOT) {
        Some(root) => println!("  {VERILATOR_ROOT}: {root}"),
        None => println!("  {VERILATOR_ROOT}: not set"),
    }
    match find_verilator(&ctx) {
        Some(path) => print_tool_status("verilator", &path.display().to_string(), &["--version"]),
        None => println!("  verilator: not found"),
    }
    match which::which("make") {
        Ok(path) => print_tool_status("make", &path.display().to_string(), &["--version"]),
        Err(_) => println!("  make: not found"),
    }
    let cpus = detected_cpus();
    println!("  CPUs: {cpus} (make -j {})", make_job_count(cpus));
    println!();

    println!("--- Project Status ---");
    match HdlsimManifest::find_and_load(project_dir) {
        Ok(Some((manifest, dir))) => {
            println!("  hdlsim.toml: found at {}", dir.display());
            println!("  Project:     {}", manifest.project.name);
            println!("  Tool:        {}", manifest.project.tool);
            match manifest.resolve_system(&dir) {
                Ok(system) => {
                    println!("  System:      {}", system.name);
                    match system.verilator {
                        Some(ref v) if !v.top_module.is_empty() => {
                            println!("  Top module:  {}", v.top_module)
                        }
                        Some(_) => println!("  Top module:  (missing)"),
                        None => println!("  Top module:  (no verilator section)"),
                    }
                }
                Err(e) => println!("  System:      error: {e:#}"),
            }
        }
        Ok(None) => println!("  hdlsim.toml: not found"),
        Err(e) => println!("  hdlsim.toml: error: {e:#}"),
    }

    Ok(())
}

fn print_tool_status(name: &str, program: &str, args: &[&str]) {
    match Command::new(program).args(args).output() {
        Ok(output) => {
            let version = String::from_utf8_lossy(&output.stdout);
            let first_line = version.lines().next().unwrap_or("(unknown version)");
            println!("  {name}: {first_line} ({program})");
        }
        Err(_) => println!("  {name}: {program} (not runnable)"),
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn doctor_runs_without_error() {
        let dir = tempfile::tempdir().unwrap();
        super::run(dir.path()).unwrap();
    }
}
