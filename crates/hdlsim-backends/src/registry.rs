//! Lookup of simulator backends by tool name.

use hdlsim_core::SystemDescriptor;

use crate::backend::{BackendContext, SimulatorBackend};
use crate::error::{BackendError, Result};
use crate::verilator::{self, VerilatorBackend};

/// Names of all registered tools.
pub fn available_tools() -> Vec<&'static str> {
    vec![verilator::TOOL_NAME]
}

/// Create the backend registered under `tool`.
pub fn create_backend(
    tool: &str,
    system: SystemDescriptor,
    ctx: BackendContext,
) -> Result<Box<dyn SimulatorBackend>> {
    match tool {
        verilator::TOOL_NAME => Ok(Box::new(VerilatorBackend::new(system, ctx))),
        other => Err(BackendError::UnknownTool {
            name: other.to_string(),
            available: available_tools(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_verilator() {
        let backend = create_backend(
            "verilator",
            SystemDescriptor::new("x"),
            BackendContext::new("build/x/sim-verilator"),
        )
        .unwrap();
        assert_eq!(backend.tool_name(), "verilator");
        assert_eq!(backend.work_root(), std::path::Path::new("build/x/sim-verilator"));
    }

    #[test]
    fn unknown_tool_lists_alternatives() {
        let err = create_backend("icarus", SystemDescriptor::new("x"), BackendContext::new("w"))
            .err()
            .unwrap();
        assert_eq!(
            err.to_string(),
            "unknown simulator 'icarus' (available: verilator)"
        );
    }
}
