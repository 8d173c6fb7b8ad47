use crate::errors::{EngineError, EngineResult};
use crate::models::normal::NormalProvider;
use crate::verify::tolerance::ToleranceContract;
use std::path::PathBuf;
use std::str::FromStr;

/// Output flavour for the generated vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Move-style `let` bindings for the fixed-point unit tests
    Move,
    Json,
    /// Full human-readable report (per-scenario detail, parity sweep, vectors)
    Report,
}

impl FromStr for OutputFormat {
    type Err = EngineError;

    fn from_str(s: &str) -> EngineResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "move" => Ok(Self::Move),
            "json" => Ok(Self::Json),
            "report" => Ok(Self::Report),
            other => Err(EngineError::Config(format!("OUTPUT_FORMAT: unknown format {other:?}"))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub output_format: OutputFormat,
    pub output_path: Option<PathBuf>,
    pub normal_provider: NormalProvider,
    pub parity_tolerance: f64,
    pub tolerance: ToleranceContract,
}

impl AppConfig {
    pub fn from_env() -> EngineResult<Self> {
        dotenvy::dotenv().ok();

        let output_format = env_var_or("OUTPUT_FORMAT", "move").parse::<OutputFormat>()?;
        let normal_provider = env_var_or("NORMAL_PROVIDER", "builtin").parse::<NormalProvider>()?;

        let parity_tolerance = parse_tolerance("PARITY_TOLERANCE", "1e-10")?;
        let price_rel = parse_tolerance("PRICE_REL_TOLERANCE", "0.001")?;
        let greek_rel = parse_tolerance("GREEK_REL_TOLERANCE", "0.005")?;

        Ok(Self {
            output_format,
            output_path: std::env::var("OUTPUT_PATH").ok().filter(|p| !p.is_empty()).map(PathBuf::from),
            normal_provider,
            parity_tolerance,
            tolerance: ToleranceContract { price_rel, greek_rel },
        })
    }
}

fn parse_tolerance(key: &str, default: &str) -> EngineResult<f64> {
    let value = env_var_or(key, default)
        .parse::<f64>()
        .map_err(|e| EngineError::Config(format!("{key}: {e}")))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(EngineError::Config(format!("{key}: must be positive and finite, got {value}")));
    }
    Ok(value)
}

fn env_var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("move".parse::<OutputFormat>().ok(), Some(OutputFormat::Move));
        assert_eq!(" JSON ".parse::<OutputFormat>().ok(), Some(OutputFormat::Json));
        assert_eq!("report".parse::<OutputFormat>().ok(), Some(OutputFormat::Report));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_unset_tolerance_uses_default() {
        let tol = parse_tolerance("WAD_GREEKS_TEST_UNSET_TOLERANCE", "0.005");
        assert!(matches!(tol, Ok(v) if (v - 0.005).abs() < 1e-15));
    }

    #[test]
    fn test_rejects_non_positive_tolerance() {
        assert!(parse_tolerance("WAD_GREEKS_TEST_UNSET_TOLERANCE", "0").is_err());
        assert!(parse_tolerance("WAD_GREEKS_TEST_UNSET_TOLERANCE", "-1e-10").is_err());
        assert!(parse_tolerance("WAD_GREEKS_TEST_UNSET_TOLERANCE", "nan").is_err());
    }
}
