//! TOML loading and validation for system descriptions.
//!
//! A system description is a TOML document with `name` at the top level and
//! optional `[verilator]`, `[parameters.<name>]` and `[[cores]]` tables.

use std::collections::BTreeSet;
use std::path::Path;

use crate::error::{ModelError, Result};
use crate::fileset::FileKind;
use crate::system::SystemDescriptor;

/// Severity of a [`ValidationIssue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// A validation issue found in a system description.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
}

/// Load a system description from a TOML file.
pub fn load_system_toml(path: &Path) -> Result<SystemDescriptor> {
    if !path.exists() {
        return Err(ModelError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    parse_system_toml(&content)
}

/// Parse a system description from a TOML string.
pub fn parse_system_toml(toml_str: &str) -> Result<SystemDescriptor> {
    let system: SystemDescriptor = toml::from_str(toml_str)?;
    Ok(system)
}

/// Validate a system description for structural correctness.
///
/// Returns `Ok(())` if there is nothing to report, or `Err(issues)` otherwise.
/// Callers decide whether warnings alone are fatal.
pub fn validate_system(system: &SystemDescriptor) -> std::result::Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    if system.name.trim().is_empty() {
        issues.push(ValidationIssue {
            severity: Severity::Error,
            message: "system name is empty".into(),
        });
    }

    if let Some(ref verilator) = system.verilator {
        if verilator.top_module.is_empty() {
            issues.push(ValidationIssue {
                severity: Severity::Warning,
                message: "verilator section has no top_module".into(),
            });
        }
    }

    for (name, decl) in &system.parameters {
        if let Some(ref default) = decl.default {
            if default.datatype() != decl.datatype {
                issues.push(ValidationIssue {
                    severity: Severity::Error,
                    message: format!(
                        "parameter '{name}' is declared {} but its default is {}",
                        decl.datatype,
                        default.datatype()
                    ),
                });
            }
        }
    }

    let mut seen = BTreeSet::new();
    for core in &system.cores {
        if !seen.insert(core.name.as_str()) {
            issues.push(ValidationIssue {
                severity: Severity::Warning,
                message: format!("core '{}' is listed more than once", core.name),
            });
        }
        for file in &core.files {
            if file.path.as_os_str().is_empty() {
                issues.push(ValidationIssue {
                    severity: Severity::Error,
                    message: format!("core '{}' has a file with an empty path", core.name),
                });
            } else if !file.is_include_file && file.kind() == FileKind::Other {
                issues.push(ValidationIssue {
                    severity: Severity::Warning,
                    message: format!(
                        "file '{}' has unrecognized type '{}' and will be skipped",
                        file.path.display(),
                        file.file_type
                    ),
                });
            }
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::{ParamDatatype, ParamType, ParamValue};
    use crate::system::{CliParser, SourceType};

    const BLINKY: &str = r#"
name = "::blinky:1.0"

[verilator]
top_module = "blinky"
source_type = "systemC"
verilator_options = ["-Wno-fatal", "--trace"]
cli_parser = "fusesoc"
libs = ["-lm"]

[parameters.WIDTH]
datatype = "int"
paramtype = "vlogparam"
default = 8

[parameters.seed]
datatype = "int"
paramtype = "plusarg"
description = "Random seed"

[[cores]]
name = "::util:0"
[[cores.files]]
path = "util/inc/defs.vh"
file_type = "verilogSource"
is_include_file = true
[cores.verilator]
libs = ["-lz"]

[[cores]]
name = "::blinky:1.0"
[[cores.files]]
path = "rtl/blinky.v"
file_type = "verilogSource-2005"
[[cores.files]]
path = "tb/main.cpp"
file_type = "cppSource"
include_dir = "tb"
"#;

    #[test]
    fn parse_full_description() {
        let system = parse_system_toml(BLINKY).unwrap();
        assert_eq!(system.name, "::blinky:1.0");
        let verilator = system.verilator.as_ref().unwrap();
        assert_eq!(verilator.top_module, "blinky");
        assert_eq!(verilator.source_type, SourceType::SystemC);
        assert_eq!(verilator.cli_parser, CliParser::Fusesoc);
        assert_eq!(verilator.verilator_options.len(), 2);

        let width = &system.parameters["WIDTH"];
        assert_eq!(width.datatype, ParamDatatype::Int);
        assert_eq!(width.paramtype, ParamType::Vlogparam);
        assert_eq!(width.default, Some(ParamValue::Int(8)));
        assert_eq!(
            system.parameters["seed"].description.as_deref(),
            Some("Random seed")
        );

        assert_eq!(system.cores.len(), 2);
        assert_eq!(system.verilator_libs(), vec!["-lz", "-lm"]);
        let fileset = system.fileset();
        assert_eq!(fileset.files.len(), 2);
        assert_eq!(fileset.include_dirs.len(), 2);
        assert!(validate_system(&system).is_ok());
    }

    #[test]
    fn parse_minimal_description() {
        let system = parse_system_toml("name = \"bare\"\n").unwrap();
        assert!(system.verilator.is_none());
        assert!(system.parameters.is_empty());
        assert!(system.cores.is_empty());
    }

    #[test]
    fn sparse_verilator_section_uses_defaults() {
        let system = parse_system_toml("name = \"x\"\n[verilator]\n").unwrap();
        let verilator = system.verilator.unwrap();
        assert!(verilator.top_module.is_empty());
        assert_eq!(verilator.source_type, SourceType::Verilog);
        assert_eq!(verilator.cli_parser, CliParser::Fusesoc);
    }

    #[test]
    fn reject_invalid_toml() {
        assert!(parse_system_toml("name = [[[").is_err());
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_system_toml(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ModelError::NotFound { .. }));
    }

    #[test]
    fn load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blinky.system.toml");
        std::fs::write(&path, BLINKY).unwrap();
        let system = load_system_toml(&path).unwrap();
        assert_eq!(system.sanitized_name(), "__blinky_1.0");
    }

    #[test]
    fn validate_reports_mismatched_default() {
        let system = parse_system_toml(
            r#"
name = "x"
[parameters.DEPTH]
datatype = "int"
paramtype = "vlogdefine"
default = "deep"
"#,
        )
        .unwrap();
        let issues = validate_system(&system).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
        assert!(issues[0].message.contains("DEPTH"));
    }

    #[test]
    fn validate_warns_on_unknown_file_type_and_missing_top() {
        let system = parse_system_toml(
            r#"
name = "x"
[verilator]
[[cores]]
name = "x"
[[cores.files]]
path = "doc/readme.md"
file_type = "user"
"#,
        )
        .unwrap();
        let issues = validate_system(&system).unwrap_err();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.severity == Severity::Warning));
    }

    #[test]
    fn validate_rejects_empty_name() {
        let system = SystemDescriptor::new("  ");
        let issues = validate_system(&system).unwrap_err();
        assert_eq!(issues[0].severity, Severity::Error);
    }
}
