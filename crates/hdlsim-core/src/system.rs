//! The resolved hardware system under build.
//!
//! Constructed once per invocation (normally from a TOML description) and
//! read-only to simulator backends.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::fileset::{Fileset, SourceFile};
use crate::param::ParameterDecl;

/// A resolved hardware system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemDescriptor {
    /// System name, e.g. `::blinky:1.0`.
    pub name: String,
    /// Verilator section. Absent when the system does not support Verilator.
    #[serde(default)]
    pub verilator: Option<VerilatorSection>,
    /// Parameter declarations keyed by name.
    #[serde(default)]
    pub parameters: BTreeMap<String, ParameterDecl>,
    /// Cores in resolved dependency order, the system's own core last.
    #[serde(default)]
    pub cores: Vec<CoreDescriptor>,
}

impl SystemDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            verilator: None,
            parameters: BTreeMap::new(),
            cores: Vec::new(),
        }
    }

    /// Name usable as a file name: every character outside `[A-Za-z0-9_.-]`
    /// becomes `_`.
    pub fn sanitized_name(&self) -> String {
        self.name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }

    /// The resolved file set across all cores.
    pub fn fileset(&self) -> Fileset {
        Fileset::from_cores(&self.cores)
    }

    /// Verilator libraries in link order: each core's libraries in dependency
    /// order, then the system-level libraries.
    pub fn verilator_libs(&self) -> Vec<&str> {
        let core_libs = self
            .cores
            .iter()
            .filter_map(|core| core.verilator.as_ref())
            .flat_map(|v| v.libs.iter());
        let system_libs = self.verilator.iter().flat_map(|v| v.libs.iter());
        core_libs.chain(system_libs).map(String::as_str).collect()
    }
}

/// Verilator-specific configuration of a system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerilatorSection {
    /// Top module compiled into the simulation model.
    #[serde(default)]
    pub top_module: String,
    #[serde(default)]
    pub source_type: SourceType,
    /// Extra options passed to every `verilator` invocation.
    #[serde(default)]
    pub verilator_options: Vec<String>,
    #[serde(default)]
    pub cli_parser: CliParser,
    /// Libraries linked into the model, after those of the cores.
    #[serde(default)]
    pub libs: Vec<String>,
}

impl VerilatorSection {
    pub fn new(top_module: impl Into<String>) -> Self {
        Self {
            top_module: top_module.into(),
            ..Self::default()
        }
    }
}

/// Language of the generated model.
///
/// Only `systemC` selects SystemC; any other text means Verilog/C++.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SourceType {
    #[default]
    Verilog,
    SystemC,
}

impl From<String> for SourceType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "systemC" => SourceType::SystemC,
            _ => SourceType::Verilog,
        }
    }
}

impl From<SourceType> for String {
    fn from(t: SourceType) -> Self {
        match t {
            SourceType::Verilog => "verilog".into(),
            SourceType::SystemC => "systemC".into(),
        }
    }
}

/// Which argument convention a system's simulation uses.
///
/// `fusesoc` lets the backend parse declared parameters; any other value
/// forwards run arguments to the simulation unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CliParser {
    #[default]
    Fusesoc,
    Passthrough,
}

impl CliParser {
    pub fn is_passthrough(self) -> bool {
        self == CliParser::Passthrough
    }
}

impl From<String> for CliParser {
    fn from(s: String) -> Self {
        match s.as_str() {
            "fusesoc" => CliParser::Fusesoc,
            _ => CliParser::Passthrough,
        }
    }
}

impl From<CliParser> for String {
    fn from(p: CliParser) -> Self {
        match p {
            CliParser::Fusesoc => "fusesoc".into(),
            CliParser::Passthrough => "passthrough".into(),
        }
    }
}

/// One core contributing files (and optionally libraries) to the system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreDescriptor {
    pub name: String,
    #[serde(default)]
    pub files: Vec<SourceFile>,
    #[serde(default)]
    pub verilator: Option<CoreVerilator>,
}

impl CoreDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Verilator-specific data contributed by a core.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreVerilator {
    #[serde(default)]
    pub libs: Vec<String>,
}
