use crate::errors::{EngineError, EngineResult};

/// WAD fixed-point scale: 10^18.
pub const WAD: i128 = 1_000_000_000_000_000_000;

/// WAD as f64. 1e18 is exactly representable.
const WAD_F64: f64 = 1e18;

/// Float to WAD integer, truncating toward zero.
///
/// The product `x * 1e18` is formed in f64 first and then cast, which is the
/// integer-cast rule the fixed-point consumer applies. Do not round here.
#[inline]
pub fn to_scaled(x: f64) -> EngineResult<i128> {
    let product = x * WAD_F64;
    // i128::MAX ~ 1.7e38; the bound itself is 2^127 exactly in f64
    if !product.is_finite() || product.abs() >= i128::MAX as f64 {
        return Err(EngineError::NumericOverflow {
            quantity: "WAD scaling",
            value: x,
        });
    }
    Ok(product.trunc() as i128)
}

/// WAD integer back to float.
#[inline]
pub fn from_scaled(n: i128) -> f64 {
    n as f64 / WAD_F64
}

/// Whole-dollar amount to WAD, exact integer arithmetic (`dollars * SCALE`).
#[inline]
pub fn dollars_to_scaled(dollars: u64) -> i128 {
    i128::from(dollars) * WAD
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_model_parameters_scale_exactly() {
        assert_eq!(to_scaled(1.0).ok(), Some(WAD));
        assert_eq!(to_scaled(0.25).ok(), Some(250_000_000_000_000_000));
        assert_eq!(to_scaled(0.05).ok(), Some(50_000_000_000_000_000));
        assert_eq!(to_scaled(0.2).ok(), Some(200_000_000_000_000_000));
        assert_eq!(to_scaled(0.1).ok(), Some(100_000_000_000_000_000));
        assert_eq!(to_scaled(0.4).ok(), Some(400_000_000_000_000_000));
    }

    #[test]
    fn test_truncates_toward_zero_not_rounds() {
        assert_eq!(to_scaled(1.9e-18).ok(), Some(1));
        assert_eq!(to_scaled(-1.9e-18).ok(), Some(-1));
        assert_eq!(to_scaled(0.9e-18).ok(), Some(0));
        assert_eq!(to_scaled(-0.9e-18).ok(), Some(0));
    }

    #[test]
    fn test_price_sized_values_match_float_cast() {
        // 10.450583572185565 * 1e18 in f64 is 10450583572185565184
        assert_eq!(to_scaled(10.450_583_572_185_565).ok(), Some(10_450_583_572_185_565_184));
        assert_eq!(to_scaled(-6.414_027_546_438_197).ok().map(i128::signum), Some(-1));
    }

    #[test]
    fn test_overflow_is_reported() {
        assert!(to_scaled(f64::NAN).is_err());
        assert!(to_scaled(f64::INFINITY).is_err());
        assert!(to_scaled(1e21).is_err());
        assert!(to_scaled(-1e21).is_err());
        assert!(to_scaled(1e19).is_ok());
    }

    #[test]
    fn test_dollars_and_inverse() {
        assert_eq!(dollars_to_scaled(100), 100 * WAD);
        assert_eq!(dollars_to_scaled(0), 0);
        assert!((from_scaled(dollars_to_scaled(120)) - 120.0).abs() < 1e-12);
        assert_eq!(from_scaled(WAD / 4), 0.25);
    }

    proptest! {
        #[test]
        fn prop_round_trip_biased_toward_zero(x in -1e6f64..1e6) {
            let n = to_scaled(x).expect("in range");
            let back = from_scaled(n);
            // Truncation never moves away from zero (up to f64 resolution of `back`)
            let slack = x.abs() * f64::EPSILON * 2.0;
            prop_assert!(back.abs() <= x.abs() + slack, "x={x} back={back}");
            prop_assert!((back - x).abs() < 1e-18 + slack, "x={x} back={back}");
            prop_assert!(n == 0 || n.signum() == x.signum() as i128);
        }
    }
}
