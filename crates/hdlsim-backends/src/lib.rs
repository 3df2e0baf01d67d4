//! Simulator backends for hdlsim.
//!
//! Turns a resolved [`hdlsim_core::SystemDescriptor`] into the project files a
//! simulation tool needs, then drives the tool's build and the compiled
//! simulation as blocking subprocesses.
//!
//! Backends are selected by name through [`create_backend`]; Verilator is the
//! only registered tool.

pub mod backend;
pub mod error;
pub mod launcher;
pub mod param;
pub mod registry;
pub mod verilator;

pub use backend::{parse_parameter_args, BackendContext, SimulatorBackend};
pub use error::{BackendError, Result};
pub use launcher::Launcher;
pub use param::param_value_str;
pub use registry::{available_tools, create_backend};
pub use verilator::VerilatorBackend;
