//! `hdlsim configure`: write the simulator's project files.

use std::path::Path;

use anyhow::Result;

use super::{open_backend, SimTarget};
use crate::manifest::HdlsimManifest;

/// Configure the simulation in its work root.
pub fn run(
    project_dir: &Path,
    manifest: Option<&HdlsimManifest>,
    target: &SimTarget,
    args: &[String],
) -> Result<()> {
    let mut backend = open_backend(project_dir, manifest, target)?;
    backend.configure(args)?;
    println!(
        "Configured {} in {}",
        backend.tool_name(),
        backend.work_root().display()
    );
    Ok(())
}
