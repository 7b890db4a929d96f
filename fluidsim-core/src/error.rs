use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, SimError>;

/// Errors raised while building or reconfiguring a simulation.
///
/// Ticks never fail: numerical degeneracies inside a step are resolved with
/// fixed fallback values instead of surfacing here.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// A configuration value is out of its valid range.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),
}

impl SimError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidParam(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_names_the_parameter() {
        let e = SimError::invalid("smoothing_radius must be > 0");
        let msg = format!("{e}");
        assert!(msg.contains("invalid parameter"));
        assert!(msg.contains("smoothing_radius"));
    }
}
