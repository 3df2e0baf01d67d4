//! `hdlsim clean`: remove build artifacts.

use std::fs;
use std::path::Path;

use anyhow::Result;

/// Remove the build root and every work root under it.
pub fn run(build_root: &Path) -> Result<()> {
    if build_root.exists() {
        fs::remove_dir_all(build_root)?;
        println!("Removed {}", build_root.display());
    } else {
        println!("Already clean: {} does not exist", build_root.display());
    }
    Ok(())
}
