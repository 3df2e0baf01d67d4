//! Tool-agnostic hardware system model for the hdlsim simulator driver.
//!
//! A resolved hardware system is described by:
//! - **System:** name, tool sections, parameter declarations
//! - **Cores:** the dependency-ordered cores with their source files and libraries
//! - **Parameters:** typed values bound as Verilog parameters, defines, plusargs,
//!   or command-line arguments
//!
//! Simulator backends consume this model read-only.

pub mod error;
pub mod fileset;
pub mod param;
pub mod parse;
pub mod system;

pub use error::{ModelError, Result};
pub use fileset::{FileKind, Fileset, SourceFile};
pub use param::{ParamDatatype, ParamType, ParamValue, ParameterDecl, Parameters};
pub use system::{CliParser, CoreDescriptor, CoreVerilator, SourceType, SystemDescriptor, VerilatorSection};
