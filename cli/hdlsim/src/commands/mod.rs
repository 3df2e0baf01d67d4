//! CLI command implementations.

pub mod build;
pub mod clean;
pub mod configure;
pub mod doctor;
pub mod init;
pub mod run;
pub mod sim;

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use hdlsim_backends::{create_backend, BackendContext, SimulatorBackend};
use tracing::info_span;

use crate::manifest::{check_system, load_system_file, HdlsimManifest};

/// Where the system comes from and where its simulation is built.
#[derive(Debug, Default, Clone)]
pub struct SimTarget {
    /// Simulator name; defaults to the manifest's `project.tool`.
    pub tool: Option<String>,
    /// Build root; defaults to the manifest's `project.build_root`.
    pub build_root: Option<PathBuf>,
    /// Standalone system description overriding the manifest's system.
    pub system: Option<PathBuf>,
}

/// Resolve the system and create its backend.
pub fn open_backend(
    project_dir: &Path,
    manifest: Option<&HdlsimManifest>,
    target: &SimTarget,
) -> Result<Box<dyn SimulatorBackend>> {
    let system = match (&target.system, manifest) {
        (Some(path), _) => load_system_file(&project_dir.join(path))?,
        (None, Some(manifest)) => manifest.resolve_system(project_dir)?,
        (None, None) => bail!("no hdlsim.toml found (run `hdlsim init` first) and no --system given"),
    };
    check_system(&system)?;

    let tool = target
        .tool
        .clone()
        .or_else(|| manifest.map(|m| m.project.tool.clone()))
        .unwrap_or_else(|| "verilator".to_string());
    let build_root = build_root(project_dir, manifest, target.build_root.as_deref());
    let work_root = BackendContext::default_work_root(&build_root, &system, &tool);

    let span = info_span!("sim", tool = %tool, system = %system.name);
    let mut ctx = BackendContext::from_process_env(work_root).with_span(span);
    ctx.set_env("SYSTEM_ROOT", project_dir.display().to_string());

    Ok(create_backend(&tool, system, ctx)?)
}

/// Build root: explicit flag, then manifest setting, then `build/`.
pub fn build_root(
    project_dir: &Path,
    manifest: Option<&HdlsimManifest>,
    flag: Option<&Path>,
) -> PathBuf {
    match (flag, manifest) {
        (Some(dir), _) => project_dir.join(dir),
        (None, Some(manifest)) => project_dir.join(&manifest.project.build_root),
        (None, None) => project_dir.join("build"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_root_precedence() {
        let manifest = HdlsimManifest::from_str(
            "[project]\nname = \"p\"\nbuild_root = \"out/sim\"\n",
        )
        .unwrap();
        let dir = Path::new("/p");
        assert_eq!(
            build_root(dir, Some(&manifest), Some(Path::new("scratch"))),
            PathBuf::from("/p/scratch")
        );
        assert_eq!(build_root(dir, Some(&manifest), None), PathBuf::from("/p/out/sim"));
        assert_eq!(build_root(dir, None, None), PathBuf::from("/p/build"));
    }

    #[test]
    fn open_backend_needs_a_system() {
        let dir = tempfile::tempdir().unwrap();
        assert!(open_backend(dir.path(), None, &SimTarget::default()).is_err());
    }

    #[test]
    fn open_backend_rejects_unknown_tool() {
        let manifest = HdlsimManifest::from_str(&HdlsimManifest::template("demo", "top")).unwrap();
        let target = SimTarget {
            tool: Some("modelsim".into()),
            ..SimTarget::default()
        };
        let err = open_backend(Path::new("/p"), Some(&manifest), &target)
            .err()
            .unwrap();
        assert!(err.to_string().contains("unknown simulator 'modelsim'"));
    }

    #[test]
    fn open_backend_uses_conventional_work_root() {
        let manifest = HdlsimManifest::from_str(&HdlsimManifest::template("demo", "top")).unwrap();
        let backend = open_backend(Path::new("/p"), Some(&manifest), &SimTarget::default()).unwrap();
        assert_eq!(backend.tool_name(), "verilator");
        assert_eq!(
            backend.work_root(),
            Path::new("/p/build/__demo_0.1.0/sim-verilator")
        );
    }
}
