//! Generated `Makefile` and `config.mk` that drive the Verilator build.

use std::fs;
use std::path::Path;

use crate::error::Result;

/// Name of the generated build configuration fragment.
pub const CONFIG_MK: &str = "config.mk";

/// Static Makefile: regenerates the model with Verilator when its sub-makefile
/// is missing, then delegates the C++ build to that sub-makefile.
pub const MAKEFILE_TEMPLATE: &str = "\
#Auto generated by hdlsim

include config.mk

#Assume a local installation if VERILATOR_ROOT is set
ifeq ($(VERILATOR_ROOT),)
VERILATOR ?= verilator
else
VERILATOR ?= $(VERILATOR_ROOT)/bin/verilator
endif

V$(TOP_MODULE): V$(TOP_MODULE).mk
\t$(MAKE) -f $<

V$(TOP_MODULE).mk:
\t$(VERILATOR) -f $(VC_FILE) $(VERILATOR_OPTIONS)
";

/// Render `config.mk` for one configuration.
pub fn render_config_mk(top_module: &str, vc_file: &str, verilator_options: &[String]) -> String {
    format!(
        "#Auto generated by hdlsim\n\
         \n\
         TOP_MODULE        := {top_module}\n\
         VC_FILE           := {vc_file}\n\
         VERILATOR_OPTIONS := {}\n",
        verilator_options.join(" ")
    )
}

/// Write `Makefile` and `config.mk` into `work_root`, replacing old copies.
pub fn write_build_scripts(
    work_root: &Path,
    top_module: &str,
    vc_file: &str,
    verilator_options: &[String],
) -> Result<()> {
    fs::write(work_root.join("Makefile"), MAKEFILE_TEMPLATE)?;
    fs::write(
        work_root.join(CONFIG_MK),
        render_config_mk(top_module, vc_file, verilator_options),
    )?;
    Ok(())
}
