//! Verilator `.vc` file-list emission.

use std::io::{self, Write};

use hdlsim_core::{Fileset, Parameters, SourceType, VerilatorSection};

use crate::param::param_value_str;

/// Write the Verilator file-list for one configuration.
///
/// Directive order: `--Mdir .`, the mode flag, one `-LDFLAGS` per library in
/// link order, `+incdir+`/`-CFLAGS -I` per include directory, HDL sources,
/// `--top-module`, the `--exe` block of C-family sources, then `-G` and `-D`
/// flags.
pub fn write_filelist<W: Write>(
    out: &mut W,
    section: &VerilatorSection,
    libs: &[&str],
    fileset: &Fileset,
    params: &Parameters,
) -> io::Result<()> {
    writeln!(out, "--Mdir .")?;
    match section.source_type {
        SourceType::SystemC => writeln!(out, "--sc")?,
        SourceType::Verilog => writeln!(out, "--cc")?,
    }

    for lib in libs {
        writeln!(out, "-LDFLAGS {lib}")?;
    }

    for dir in &fileset.include_dirs {
        writeln!(out, "+incdir+{}", dir.display())?;
        writeln!(out, "-CFLAGS -I{}", dir.display())?;
    }

    for file in fileset.hdl_sources() {
        writeln!(out, "{}", file.path.display())?;
    }

    writeln!(out, "--top-module {}", section.top_module)?;
    writeln!(out, "--exe")?;
    let c_sources: Vec<String> = fileset
        .c_sources()
        .map(|f| f.path.display().to_string())
        .collect();
    writeln!(out, "{}", c_sources.join("\n"))?;

    for (name, value) in &params.vlogparam {
        writeln!(out, "-G{name}={}", param_value_str(value))?;
    }
    for (name, value) in &params.vlogdefine {
        writeln!(out, "-D{name}={}", param_value_str(value))?;
    }
    Ok(())
}
