//! `hdlsim sim`: configure, build and run in one go.

use std::path::Path;

use anyhow::Result;

use super::{open_backend, SimTarget};
use crate::manifest::HdlsimManifest;

/// Which phases `hdlsim sim` stops after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stop {
    AfterConfigure,
    AfterBuild,
    AfterRun,
}

impl Stop {
    pub fn from_flags(setup: bool, build_only: bool) -> Self {
        if setup {
            Stop::AfterConfigure
        } else if build_only {
            Stop::AfterBuild
        } else {
            Stop::AfterRun
        }
    }
}

/// Run the configure, build and run phases up to `stop`.
pub fn run(
    project_dir: &Path,
    manifest: Option<&HdlsimManifest>,
    target: &SimTarget,
    stop: Stop,
    args: &[String],
) -> Result<()> {
    let mut backend = open_backend(project_dir, manifest, target)?;
    backend.configure(args)?;
    if stop == Stop::AfterConfigure {
        println!("Configured {}", backend.work_root().display());
        return Ok(());
    }
    backend.build()?;
    if stop == Stop::AfterBuild {
        println!("Built simulation model in {}", backend.work_root().display());
        return Ok(());
    }
    backend.run(args)?;
    Ok(())
}
