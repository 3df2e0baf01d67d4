//! `hdlsim init`: project scaffolding.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::manifest::{HdlsimManifest, MANIFEST_NAME};

/// Create a new project in directory `name`, relative to the current directory.
pub fn run(name: &str, top_module: &str) -> Result<()> {
    create_project(Path::new(name), name, top_module)
}

pub(crate) fn create_project(project_dir: &Path, name: &str, top_module: &str) -> Result<()> {
    if project_dir.exists() {
        bail!("directory '{}' already exists", project_dir.display());
    }

    fs::create_dir_all(project_dir.join("rtl")).context("creating rtl/ directory")?;
    fs::create_dir_all(project_dir.join("tb")).context("creating tb/ directory")?;

    fs::write(
        project_dir.join(MANIFEST_NAME),
        HdlsimManifest::template(name, top_module),
    )
    .with_context(|| format!("writing {MANIFEST_NAME}"))?;

    fs::write(
        project_dir.join("rtl").join(format!("{top_module}.v")),
        verilog_template(top_module),
    )
    .context("writing top module")?;

    fs::write(
        project_dir.join("tb").join("main.cpp"),
        testbench_template(top_module),
    )
    .context("writing tb/main.cpp")?;

    fs::write(project_dir.join(".gitignore"), "build/\n").context("writing .gitignore")?;

    println!("Created project '{name}'");
    println!("  {name}/{MANIFEST_NAME}");
    println!("  {name}/rtl/{top_module}.v");
    println!("  {name}/tb/main.cpp");
    println!("  {name}/.gitignore");

    Ok(())
}

fn verilog_template(top_module: &str) -> String {
    format!(
        r#"module {top_module};
  initial begin
    $display("Hello from {top_module}");
    $finish;
  end
endmodule
"#
    )
}

fn testbench_template(top_module: &str) -> String {
    format!(
        r#"#include "V{top_module}.h"
#include "verilated.h"

int main(int argc, char** argv) {{
    VerilatedContext* context = new VerilatedContext;
    context->commandArgs(argc, argv);
    V{top_module}* top = new V{top_module}{{context}};
    while (!context->gotFinish()) {{
        top->eval();
        context->timeInc(1);
    }}
    top->final();
    delete top;
    delete context;
    return 0;
}}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_creates_project_structure() {
        let dir = tempfile::tempdir().unwrap();
        let project_path = dir.path().join("blinky");

        create_project(&project_path, "blinky", "blinky").unwrap();

        assert!(project_path.join(MANIFEST_NAME).is_file());
        assert!(project_path.join("rtl/blinky.v").is_file());
        assert!(project_path.join("tb/main.cpp").is_file());
        assert!(project_path.join(".gitignore").is_file());
    }

    #[test]
    fn init_generates_loadable_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let project_path = dir.path().join("counter");
        create_project(&project_path, "counter", "counter").unwrap();

        let (manifest, found) = HdlsimManifest::find_and_load(&project_path).unwrap().unwrap();
        assert_eq!(found, project_path);
        let system = manifest.resolve_system(&found).unwrap();
        assert_eq!(system.cores[0].files.len(), 2);
        assert!(system.cores[0].files.iter().all(|f| f.path.exists()));
    }

    #[test]
    fn testbench_names_the_model() {
        let tb = testbench_template("soc");
        assert!(tb.contains("#include \"Vsoc.h\""));
        assert!(tb.contains("new Vsoc{context}"));
    }

    #[test]
    fn init_refuses_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(create_project(dir.path(), "x", "x").is_err());
    }
}
