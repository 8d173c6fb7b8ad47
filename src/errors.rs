/// Domain-specific error types for the pricing engine and vector generator.
/// - Domain and NumericOverflow abort a single scenario, never the batch
/// - ToleranceViolation is a failed check and always gets reported
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("domain error: {field} = {value} ({reason})")]
    Domain {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("numeric overflow computing {quantity}: {value}")]
    NumericOverflow { quantity: &'static str, value: f64 },

    #[error(
        "tolerance violation in {check}: computed {computed}, expected {expected}, \
         deviation {deviation:e} exceeds {tolerance:e}"
    )]
    ToleranceViolation {
        check: String,
        computed: f64,
        expected: f64,
        deviation: f64,
        tolerance: f64,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialize(String),
}

impl EngineError {
    /// True for errors that only invalidate the scenario that raised them.
    #[inline]
    pub fn is_scenario_local(&self) -> bool {
        matches!(self, EngineError::Domain { .. } | EngineError::NumericOverflow { .. })
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Serialize(e.to_string())
    }
}

impl From<std::io::Error> for EngineError {
    fn from(e: std::io::Error) -> Self {
        EngineError::Io(e.to_string())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_local_kinds() {
        let domain = EngineError::Domain { field: "volatility", value: 0.0, reason: "must be > 0" };
        let overflow = EngineError::NumericOverflow { quantity: "discount factor", value: 0.0 };
        let violation = EngineError::ToleranceViolation {
            check: "parity".into(),
            computed: 1.0,
            expected: 2.0,
            deviation: 1.0,
            tolerance: 1e-10,
        };
        assert!(domain.is_scenario_local());
        assert!(overflow.is_scenario_local());
        assert!(!violation.is_scenario_local());
    }

    #[test]
    fn test_violation_message_carries_values() {
        let err = EngineError::ToleranceViolation {
            check: "call price".into(),
            computed: 10.5,
            expected: 10.4,
            deviation: 0.1,
            tolerance: 0.001,
        };
        let msg = err.to_string();
        assert!(msg.contains("call price"), "{msg}");
        assert!(msg.contains("10.5") && msg.contains("10.4"), "{msg}");
    }
}
