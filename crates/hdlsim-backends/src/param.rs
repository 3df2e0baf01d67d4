//! Rendering parameter values as simulator flag text.

use hdlsim_core::ParamValue;

/// Render `value` the way a `-G`, `-D`, `+plusarg` or `--arg` flag expects it.
///
/// Integers are decimal, booleans are `1`/`0`, strings are passed through
/// without quoting.
pub fn param_value_str(value: &ParamValue) -> String {
    match value {
        ParamValue::Int(v) => v.to_string(),
        ParamValue::Bool(true) => "1".to_string(),
        ParamValue::Bool(false) => "0".to_string(),
        ParamValue::Str(s) => s.clone(),
    }
}
