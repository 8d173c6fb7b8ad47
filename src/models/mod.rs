pub mod normal;
pub mod black_scholes;

/// Standard normal distribution seam for the pricing engine.
/// cdf()/pdf() must be pure functions: deterministic output from x only.
/// Send + Sync so one provider can back engines on any thread.
pub trait NormalDistribution: Send + Sync {
    fn name(&self) -> &'static str;

    /// P(Z <= x) for standard normal Z. Returns a value in [0, 1]. Never panics.
    fn cdf(&self, x: f64) -> f64;

    /// Standard normal density at x.
    fn pdf(&self, x: f64) -> f64;
}
