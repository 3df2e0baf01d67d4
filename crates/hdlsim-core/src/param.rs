//! Typed parameter values and their declarations.
//!
//! A parameter is declared once on the system with a datatype and a binding
//! (`paramtype`). Resolved values are collected into [`Parameters`], one
//! dictionary per binding, each enumerated in key order.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// A parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl ParamValue {
    /// The datatype this value naturally belongs to.
    pub fn datatype(&self) -> ParamDatatype {
        match self {
            ParamValue::Bool(_) => ParamDatatype::Bool,
            ParamValue::Int(_) => ParamDatatype::Int,
            ParamValue::Str(_) => ParamDatatype::Str,
        }
    }

    /// Interpret `text` as a value of `datatype`.
    ///
    /// Booleans accept `1`/`0` as well as `true`/`false`.
    pub fn parse_as(datatype: ParamDatatype, text: &str) -> Result<Self> {
        let invalid = || ModelError::InvalidValue {
            datatype: datatype.name(),
            value: text.to_string(),
        };
        match datatype {
            ParamDatatype::Bool => match text {
                "1" | "true" => Ok(ParamValue::Bool(true)),
                "0" | "false" => Ok(ParamValue::Bool(false)),
                _ => Err(invalid()),
            },
            ParamDatatype::Int => text
                .parse::<i64>()
                .map(ParamValue::Int)
                .map_err(|_| invalid()),
            ParamDatatype::Str => Ok(ParamValue::Str(text.to_string())),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Str(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Str(v)
    }
}

/// Declared datatype of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamDatatype {
    Bool,
    Int,
    /// Free-form text. File names are declared as `file` and treated as text.
    #[serde(alias = "file")]
    Str,
}

impl ParamDatatype {
    /// Name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            ParamDatatype::Bool => "bool",
            ParamDatatype::Int => "int",
            ParamDatatype::Str => "str",
        }
    }
}

impl fmt::Display for ParamDatatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a parameter is bound when handed to a simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// Verilog parameter / generic on the top module.
    Vlogparam,
    /// Verilog preprocessor define.
    Vlogdefine,
    /// Runtime `+name=value` argument.
    Plusarg,
    /// Runtime `--name=value` argument.
    Cmdlinearg,
}

/// A parameter declaration on the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDecl {
    pub datatype: ParamDatatype,
    pub paramtype: ParamType,
    /// Value used when none is given on the command line.
    #[serde(default)]
    pub default: Option<ParamValue>,
    /// Help text shown by the argument parser.
    #[serde(default)]
    pub description: Option<String>,
}

impl ParameterDecl {
    /// Create a declaration without default or description.
    pub fn new(datatype: ParamDatatype, paramtype: ParamType) -> Self {
        Self {
            datatype,
            paramtype,
            default: None,
            description: None,
        }
    }

    /// Attach a default value.
    pub fn with_default(mut self, value: impl Into<ParamValue>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// Resolved parameter values, one dictionary per binding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    pub vlogparam: BTreeMap<String, ParamValue>,
    pub vlogdefine: BTreeMap<String, ParamValue>,
    pub plusarg: BTreeMap<String, ParamValue>,
    pub cmdlinearg: BTreeMap<String, ParamValue>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `value` in the dictionary selected by `paramtype`.
    pub fn insert(&mut self, paramtype: ParamType, name: impl Into<String>, value: ParamValue) {
        let _ = self.dict_mut(paramtype).insert(name.into(), value);
    }

    fn dict_mut(&mut self, paramtype: ParamType) -> &mut BTreeMap<String, ParamValue> {
        match paramtype {
            ParamType::Vlogparam => &mut self.vlogparam,
            ParamType::Vlogdefine => &mut self.vlogdefine,
            ParamType::Plusarg => &mut self.plusarg,
            ParamType::Cmdlinearg => &mut self.cmdlinearg,
        }
    }
}
