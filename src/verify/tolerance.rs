use crate::errors::{EngineError, EngineResult};
use crate::state::PricingResult;
use crate::vectors::generator::ReferenceVector;
use crate::wad::from_scaled;

/// Which side of the tolerance contract a quantity falls under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityKind {
    Price,
    Greek,
}

/// Relative tolerances the fixed-point consumer is held to.
/// Prices within 0.1%, Greeks within 0.5%.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToleranceContract {
    pub price_rel: f64,
    pub greek_rel: f64,
}

impl Default for ToleranceContract {
    fn default() -> Self {
        Self {
            price_rel: 0.001,
            greek_rel: 0.005,
        }
    }
}

/// |computed - expected| / |expected|, absolute when expected is zero.
#[inline]
pub fn relative_error(computed: f64, expected: f64) -> f64 {
    let diff = (computed - expected).abs();
    if expected == 0.0 {
        diff
    } else {
        diff / expected.abs()
    }
}

impl ToleranceContract {
    #[inline]
    pub fn limit(&self, kind: QuantityKind) -> f64 {
        match kind {
            QuantityKind::Price => self.price_rel,
            QuantityKind::Greek => self.greek_rel,
        }
    }

    /// Returns the relative error, or a ToleranceViolation naming the quantity.
    pub fn check(&self, kind: QuantityKind, name: &str, computed: f64, expected: f64) -> EngineResult<f64> {
        let deviation = relative_error(computed, expected);
        let tolerance = self.limit(kind);
        // NaN deviation fails too
        if deviation <= tolerance {
            Ok(deviation)
        } else {
            Err(EngineError::ToleranceViolation {
                check: name.to_string(),
                computed,
                expected,
                deviation,
                tolerance,
            })
        }
    }

    /// Compares every price and Greek of `computed` against `expected`.
    /// Returns all violations; empty means the results agree.
    pub fn compare_results(&self, computed: &PricingResult, expected: &PricingResult) -> Vec<EngineError> {
        let prices = [
            ("call_price", computed.call_price, expected.call_price),
            ("put_price", computed.put_price, expected.put_price),
        ];
        let greeks = computed
            .greeks()
            .into_iter()
            .zip(expected.greeks())
            .map(|((name, c), (_, e))| (name, c, e));

        prices
            .into_iter()
            .map(|(name, c, e)| self.check(QuantityKind::Price, name, c, e))
            .chain(greeks.map(|(name, c, e)| self.check(QuantityKind::Greek, name, c, e)))
            .filter_map(Result::err)
            .collect()
    }

    /// Validates an external implementation's WAD call/put outputs against a vector.
    pub fn compare_scaled(&self, vector: &ReferenceVector, call_scaled: i128, put_scaled: i128) -> Vec<EngineError> {
        [
            ("call_price", call_scaled, vector.expected_call_scaled),
            ("put_price", put_scaled, vector.expected_put_scaled),
        ]
        .into_iter()
        .filter_map(|(name, got, want)| {
            self.check(
                QuantityKind::Price,
                &format!("{} {name}", vector.label),
                from_scaled(got),
                from_scaled(want),
            )
            .err()
        })
        .collect()
    }
}
