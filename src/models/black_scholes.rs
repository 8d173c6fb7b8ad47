use crate::errors::EngineResult;
use crate::models::normal::StandardNormal;
use crate::models::NormalDistribution;
use crate::state::{finite, strictly_within, ModelInputs, ModelParams, PricingResult};

/// Black-Scholes European option engine.
///
/// d1 = (ln(S/K) + (r + sigma^2/2)*T) / (sigma * sqrt(T))
/// d2 = d1 - sigma * sqrt(T)
/// C  = S*Phi(d1) - K*e^(-rT)*Phi(d2)
/// P  = K*e^(-rT)*Phi(-d2) - S*Phi(-d1)
///
/// Theta is per year, vega and rho per unit (not per 1%) move.
/// All computation runs on precomputed ModelParams. No allocations.
pub struct BlackScholesEngine {
    /// Normal provider (created once, reused)
    normal: Box<dyn NormalDistribution>,
}

impl BlackScholesEngine {
    pub fn new(normal: Box<dyn NormalDistribution>) -> Self {
        Self { normal }
    }

    #[inline]
    pub fn provider_name(&self) -> &'static str {
        self.normal.name()
    }

    /// Closed-form prices and Greeks. Domain errors are raised before any
    /// formula runs; a non-finite output is reported, never returned.
    /// At extreme moneyness Phi(d1) rounds to exactly 0 or 1 and phi(d1)
    /// underflows; those saturated Greeks surface as NumericOverflow.
    pub fn price(&self, inputs: &ModelInputs) -> EngineResult<PricingResult> {
        let p = ModelParams::from_inputs(inputs)?;

        let d1 = finite("d1", (p.ln_s_k + (p.rate + p.half_sigma_sq) * p.ttl_years) / p.sigma_sqrt_t)?;
        let d2 = d1 - p.sigma_sqrt_t;

        let n = &*self.normal;
        let cdf_d1 = n.cdf(d1);
        let cdf_d2 = n.cdf(d2);
        let cdf_neg_d1 = n.cdf(-d1);
        let cdf_neg_d2 = n.cdf(-d2);
        let pdf_d1 = n.pdf(d1);

        let k_disc = p.strike * p.discount;

        let call_price = p.spot * cdf_d1 - k_disc * cdf_d2;
        let put_price = k_disc * cdf_neg_d2 - p.spot * cdf_neg_d1;

        // Shared time-decay term: -S*phi(d1)*sigma / (2*sqrt(T))
        let decay = -p.spot * pdf_d1 * p.sigma / (2.0 * p.sqrt_t);

        let result = PricingResult {
            d1,
            d2,
            call_price: finite("call price", call_price)?,
            put_price: finite("put price", put_price)?,
            delta_call: strictly_within("delta call", cdf_d1, 0.0, 1.0)?,
            delta_put: strictly_within("delta put", cdf_d1 - 1.0, -1.0, 0.0)?,
            gamma: strictly_within("gamma", pdf_d1 / (p.spot * p.sigma_sqrt_t), 0.0, f64::MAX)?,
            vega: strictly_within("vega", p.spot * pdf_d1 * p.sqrt_t, 0.0, f64::MAX)?,
            theta_call: finite("theta call", decay - p.rate * k_disc * cdf_d2)?,
            theta_put: finite("theta put", decay + p.rate * k_disc * cdf_neg_d2)?,
            rho_call: finite("rho call", k_disc * p.ttl_years * cdf_d2)?,
            rho_put: finite("rho put", -k_disc * p.ttl_years * cdf_neg_d2)?,
        };

        tracing::trace!(
            provider = self.normal.name(),
            spot = p.spot,
            strike = p.strike,
            d1 = result.d1,
            call = result.call_price,
            put = result.put_price,
            "priced"
        );

        Ok(result)
    }
}

impl Default for BlackScholesEngine {
    fn default() -> Self {
        Self::new(Box::new(StandardNormal::new()))
    }
}
