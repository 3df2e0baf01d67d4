//! `hdlsim.toml` manifest parsing and project configuration.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use hdlsim_core::parse::{load_system_toml, validate_system, Severity};
use hdlsim_core::SystemDescriptor;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// Manifest file name searched for from the working directory upward.
pub const MANIFEST_NAME: &str = "hdlsim.toml";

/// The top-level manifest structure of an hdlsim project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HdlsimManifest {
    /// Project metadata (required).
    pub project: ProjectConfig,
    /// Inline system description.
    #[serde(default)]
    pub system: Option<SystemDescriptor>,
}

/// Project metadata section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name (required).
    pub name: String,
    /// Directory receiving all work roots, relative to the project.
    #[serde(default = "default_build_root")]
    pub build_root: PathBuf,
    /// Simulator used when none is given on the command line.
    #[serde(default = "default_tool")]
    pub tool: String,
    /// Separate system description file, used instead of an inline `[system]`.
    #[serde(default)]
    pub system: Option<PathBuf>,
}

fn default_build_root() -> PathBuf {
    PathBuf::from("build")
}

fn default_tool() -> String {
    "verilator".to_string()
}

impl HdlsimManifest {
    /// Search upward from `start_dir` for an `hdlsim.toml` file, parse and return
    /// it along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(MANIFEST_NAME);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let manifest: HdlsimManifest = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse a manifest from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing hdlsim.toml")
    }

    /// The project's system with file paths resolved against `project_dir`.
    pub fn resolve_system(&self, project_dir: &Path) -> Result<SystemDescriptor> {
        match (&self.system, &self.project.system) {
            (Some(_), Some(_)) => {
                bail!("{MANIFEST_NAME} has both a [system] table and project.system; keep one")
            }
            (Some(system), None) => Ok(resolve_paths(system.clone(), project_dir)),
            (None, Some(path)) => load_system_file(&project_dir.join(path)),
            (None, None) => bail!(
                "{MANIFEST_NAME} describes no system: add a [system] table or set project.system"
            ),
        }
    }

    /// Generate a starter manifest.
    pub fn template(name: &str, top_module: &str) -> String {
        format!(
            r#"[project]
name = "{name}"

[system]
name = "::{name}:0.1.0"

[system.verilator]
top_module = "{top_module}"
verilator_options = ["-Wall"]

[[system.cores]]
name = "::{name}:0.1.0"

[[system.cores.files]]
path = "rtl/{top_module}.v"
file_type = "verilogSource"

[[system.cores.files]]
path = "tb/main.cpp"
file_type = "cppSource"
"#
        )
    }
}

/// Load a standalone system description; its paths are relative to its own directory.
pub fn load_system_file(path: &Path) -> Result<SystemDescriptor> {
    let system = load_system_toml(path).with_context(|| format!("loading {}", path.display()))?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    Ok(resolve_paths(system, base))
}

/// Make every file path and include directory absolute against `base`.
pub fn resolve_paths(mut system: SystemDescriptor, base: &Path) -> SystemDescriptor {
    for core in &mut system.cores {
        for file in &mut core.files {
            file.path = base.join(&file.path);
            if let Some(ref dir) = file.include_dir {
                file.include_dir = Some(base.join(dir));
            }
        }
    }
    system
}

/// Log validation issues; any error aborts.
pub fn check_system(system: &SystemDescriptor) -> Result<()> {
    if let Err(issues) = validate_system(system) {
        let mut errors = 0;
        for issue in &issues {
            match issue.severity {
                Severity::Error => {
                    errors += 1;
                    error!("{}", issue.message);
                }
                Severity::Warning => warn!("{}", issue.message),
            }
        }
        if errors > 0 {
            bail!("system '{}' has {errors} validation error(s)", system.name);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const INLINE: &str = r#"
[project]
name = "blinky"

[system]
name = "::blinky:1.0"

[system.verilator]
top_module = "blinky"
cli_parser = "raw"

[[system.cores]]
name = "::blinky:1.0"

[[system.cores.files]]
path = "rtl/blinky.v"
file_type = "verilogSource"
include_dir = "rtl/inc"
"#;

    #[test]
    fn parse_inline_manifest() {
        let manifest = HdlsimManifest::from_str(INLINE).unwrap();
        assert_eq!(manifest.project.name, "blinky");
        assert_eq!(manifest.project.build_root, PathBuf::from("build"));
        assert_eq!(manifest.project.tool, "verilator");
        let system = manifest.system.as_ref().unwrap();
        assert!(system.verilator.as_ref().unwrap().cli_parser.is_passthrough());
    }

    #[test]
    fn inline_paths_resolve_against_project() {
        let manifest = HdlsimManifest::from_str(INLINE).unwrap();
        let system = manifest.resolve_system(Path::new("/work/blinky")).unwrap();
        let file = &system.cores[0].files[0];
        assert_eq!(file.path, PathBuf::from("/work/blinky/rtl/blinky.v"));
        assert_eq!(file.include_dir, Some(PathBuf::from("/work/blinky/rtl/inc")));
    }

    #[test]
    fn external_system_file() {
        let dir = tempfile::tempdir().unwrap();
        let sys_dir = dir.path().join("hw");
        std::fs::create_dir(&sys_dir).unwrap();
        std::fs::write(
            sys_dir.join("uart.system.toml"),
            "name = \"uart\"\n[verilator]\ntop_module = \"uart\"\n[[cores]]\nname = \"uart\"\n[[cores.files]]\npath = \"uart.sv\"\nfile_type = \"systemVerilogSource\"\n",
        )
        .unwrap();
        let manifest = HdlsimManifest::from_str(
            "[project]\nname = \"uart\"\nsystem = \"hw/uart.system.toml\"\n",
        )
        .unwrap();
        let system = manifest.resolve_system(dir.path()).unwrap();
        assert_eq!(system.cores[0].files[0].path, sys_dir.join("uart.sv"));
    }

    #[test]
    fn manifest_without_system_is_rejected() {
        let manifest = HdlsimManifest::from_str("[project]\nname = \"empty\"\n").unwrap();
        assert!(manifest.resolve_system(Path::new("/tmp")).is_err());
    }

    #[test]
    fn manifest_with_two_systems_is_rejected() {
        let mut manifest = HdlsimManifest::from_str(INLINE).unwrap();
        manifest.project.system = Some("other.system.toml".into());
        assert!(manifest.resolve_system(Path::new("/tmp")).is_err());
    }

    #[test]
    fn reject_invalid_toml() {
        assert!(HdlsimManifest::from_str("this is not valid toml [[[").is_err());
    }

    #[test]
    fn template_is_valid() {
        let manifest = HdlsimManifest::from_str(&HdlsimManifest::template("demo", "top")).unwrap();
        let system = manifest.resolve_system(Path::new("/p")).unwrap();
        assert_eq!(system.verilator.unwrap().top_module, "top");
        assert_eq!(system.cores[0].files[0].path, PathBuf::from("/p/rtl/top.v"));
    }

    #[test]
    fn check_system_rejects_errors_only() {
        let mut system = SystemDescriptor::new("ok");
        system.verilator = Some(hdlsim_core::VerilatorSection::new(""));
        check_system(&system).unwrap();
        assert!(check_system(&SystemDescriptor::new("")).is_err());
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn check_system_logs_both_severities() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .without_time()
            .finish();

        let mut system = SystemDescriptor::new("");
        system.verilator = Some(hdlsim_core::VerilatorSection::new(""));
        let result = tracing::subscriber::with_default(subscriber, || check_system(&system));

        let err = result.unwrap_err();
        assert!(err.to_string().contains("1 validation error(s)"));
        let logged = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(logged.lines().any(|l| l.contains("ERROR")));
        assert!(logged.lines().any(|l| l.contains("WARN")));
    }

    #[test]
    fn find_and_load_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_NAME), INLINE).unwrap();
        let nested = dir.path().join("rtl").join("sub");
        std::fs::create_dir_all(&nested).unwrap();

        let (manifest, found_dir) = HdlsimManifest::find_and_load(&nested).unwrap().unwrap();
        assert_eq!(manifest.project.name, "blinky");
        assert_eq!(found_dir, dir.path());
    }
}
