use crate::errors::{EngineError, EngineResult};

// ── Model inputs ──

/// Raw Black-Scholes inputs. Stack-allocated, Copy.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
#[repr(C)]
pub struct ModelInputs {
    pub spot: f64,
    pub strike: f64,
    /// Years
    pub time_to_expiry: f64,
    pub risk_free_rate: f64,
    pub volatility: f64,
}

impl ModelInputs {
    #[inline]
    pub fn new(spot: f64, strike: f64, time_to_expiry: f64, risk_free_rate: f64, volatility: f64) -> Self {
        Self {
            spot,
            strike,
            time_to_expiry,
            risk_free_rate,
            volatility,
        }
    }

    /// Rejects inputs outside the closed form's domain. Runs before any formula.
    pub fn validate(&self) -> EngineResult<()> {
        positive("spot", self.spot)?;
        positive("strike", self.strike)?;
        positive("time_to_expiry", self.time_to_expiry)?;
        positive("volatility", self.volatility)?;
        if !self.risk_free_rate.is_finite() {
            return Err(EngineError::Domain {
                field: "risk_free_rate",
                value: self.risk_free_rate,
                reason: "must be finite",
            });
        }
        Ok(())
    }

    /// K * e^(-rT), surfaced as overflow rather than saturating to 0 or inf.
    #[inline]
    pub fn discounted_strike(&self) -> EngineResult<f64> {
        let discount = discount_factor(self.risk_free_rate, self.time_to_expiry)?;
        finite("discounted strike", self.strike * discount)
    }
}

fn positive(field: &'static str, value: f64) -> EngineResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EngineError::Domain {
            field,
            value,
            reason: "must be positive and finite",
        })
    }
}

#[inline]
pub(crate) fn finite(quantity: &'static str, value: f64) -> EngineResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EngineError::NumericOverflow { quantity, value })
    }
}

/// Rejects a value that has saturated onto (or past) either bound of the
/// open interval (lo, hi), e.g. a delta rounded to exactly 1.0.
pub(crate) fn strictly_within(
    quantity: &'static str,
    value: f64,
    lo: f64,
    hi: f64,
) -> EngineResult<f64> {
    let value = finite(quantity, value)?;
    if value > lo && value < hi {
        Ok(value)
    } else {
        Err(EngineError::NumericOverflow { quantity, value })
    }
}

fn discount_factor(rate: f64, time: f64) -> EngineResult<f64> {
    let rt = rate * time;
    let discount = (-rt).exp();
    // exp underflows to 0 once r*T passes ~745
    if !discount.is_finite() || discount == 0.0 {
        return Err(EngineError::NumericOverflow {
            quantity: "discount factor e^(-rT)",
            value: rt,
        });
    }
    Ok(discount)
}

// ── Precomputed parameters ──

/// Quantities shared by every closed-form term, computed once per pricing.
#[derive(Debug, Clone, Copy)]
#[repr(C)]
pub struct ModelParams {
    pub spot: f64,
    pub strike: f64,
    pub ttl_years: f64,
    pub rate: f64,
    pub sigma: f64,
    // Precomputed
    pub ln_s_k: f64,
    pub sqrt_t: f64,
    pub sigma_sqrt_t: f64,
    pub half_sigma_sq: f64,
    pub discount: f64,
}

impl ModelParams {
    pub fn from_inputs(inputs: &ModelInputs) -> EngineResult<Self> {
        inputs.validate()?;

        let ln_s_k = finite("ln(S/K)", (inputs.spot / inputs.strike).ln())?;
        let sqrt_t = inputs.time_to_expiry.sqrt();
        let sigma_sqrt_t = inputs.volatility * sqrt_t;
        if !sigma_sqrt_t.is_normal() {
            return Err(EngineError::NumericOverflow {
                quantity: "sigma * sqrt(T)",
                value: sigma_sqrt_t,
            });
        }
        let half_sigma_sq = finite("sigma^2 / 2", 0.5 * inputs.volatility * inputs.volatility)?;
        let discount = discount_factor(inputs.risk_free_rate, inputs.time_to_expiry)?;

        Ok(Self {
            spot: inputs.spot,
            strike: inputs.strike,
            ttl_years: inputs.time_to_expiry,
            rate: inputs.risk_free_rate,
            sigma: inputs.volatility,
            ln_s_k,
            sqrt_t,
            sigma_sqrt_t,
            half_sigma_sq,
            discount,
        })
    }
}

// ── Pricing output ──

/// Full Black-Scholes result set. Built once per pricing, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
#[repr(C)]
pub struct PricingResult {
    pub d1: f64,
    pub d2: f64,
    pub call_price: f64,
    pub put_price: f64,
    pub delta_call: f64,
    pub delta_put: f64,
    pub gamma: f64,
    pub vega: f64,
    pub theta_call: f64,
    pub theta_put: f64,
    pub rho_call: f64,
    pub rho_put: f64,
}

impl PricingResult {
    /// Named Greeks in a fixed order, for tolerance sweeps and reports.
    pub fn greeks(&self) -> [(&'static str, f64); 8] {
        [
            ("delta_call", self.delta_call),
            ("delta_put", self.delta_put),
            ("gamma", self.gamma),
            ("vega", self.vega),
            ("theta_call", self.theta_call),
            ("theta_put", self.theta_put),
            ("rho_call", self.rho_call),
            ("rho_put", self.rho_put),
        ]
    }

    #[inline]
    pub fn intrinsic_call(inputs: &ModelInputs) -> f64 {
        (inputs.spot - inputs.strike).max(0.0)
    }

    /// Call premium above intrinsic value.
    #[inline]
    pub fn time_value(&self, inputs: &ModelInputs) -> f64 {
        self.call_price - Self::intrinsic_call(inputs)
    }
}
