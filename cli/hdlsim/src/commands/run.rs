//! `hdlsim run`: execute the compiled simulation model.

use std::path::Path;

use anyhow::Result;

use super::{open_backend, SimTarget};
use crate::manifest::HdlsimManifest;

/// Run the simulation with the user's arguments.
pub fn run(
    project_dir: &Path,
    manifest: Option<&HdlsimManifest>,
    target: &SimTarget,
    args: &[String],
) -> Result<()> {
    let mut backend = open_backend(project_dir, manifest, target)?;
    backend.run(args)?;
    Ok(())
}
