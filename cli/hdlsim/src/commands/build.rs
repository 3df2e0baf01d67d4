//! `hdlsim build`: compile the simulation model.

use std::path::Path;

use anyhow::{Context, Result};

use super::{open_backend, SimTarget};
use crate::manifest::HdlsimManifest;

/// Build the simulation model of an already configured work root.
pub fn run(project_dir: &Path, manifest: Option<&HdlsimManifest>, target: &SimTarget) -> Result<()> {
    let mut backend = open_backend(project_dir, manifest, target)?;
    let work_root = backend.work_root().to_path_buf();
    if !work_root.is_dir() {
        anyhow::bail!(
            "{} does not exist. Run `hdlsim configure` first.",
            work_root.display()
        );
    }
    backend
        .build()
        .with_context(|| format!("building in {} (see its build logs)", work_root.display()))?;
    println!("Built simulation model in {}", work_root.display());
    Ok(())
}
