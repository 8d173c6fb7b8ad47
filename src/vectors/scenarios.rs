use crate::state::ModelInputs;

/// One named pricing case. Spot and strike are whole dollars so their WAD
/// form is an exact integer multiple of the scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scenario {
    pub label: &'static str,
    pub spot: u64,
    pub strike: u64,
    /// Years
    pub time: f64,
    pub rate: f64,
    pub volatility: f64,
}

impl Scenario {
    #[inline]
    pub fn inputs(&self) -> ModelInputs {
        ModelInputs::new(self.spot as f64, self.strike as f64, self.time, self.rate, self.volatility)
    }
}

/// At-the-money baseline every table varies one parameter from.
pub const ATM: Scenario = Scenario {
    label: "ATM standard",
    spot: 100,
    strike: 100,
    time: 1.0,
    rate: 0.05,
    volatility: 0.2,
};

/// Cases emitted as fixed-point test vectors, in emission order.
pub const VECTOR_SCENARIOS: &[Scenario] = &[
    ATM,
    Scenario { label: "ITM call", spot: 120, ..ATM },
    Scenario { label: "OTM call", spot: 80, ..ATM },
    Scenario { label: "Short expiry", time: 0.25, ..ATM },
    Scenario { label: "Higher vol", volatility: 0.4, ..ATM },
    Scenario { label: "Higher rate", rate: 0.10, ..ATM },
];

/// Cases detailed in the human-readable report.
pub const REPORT_SCENARIOS: &[Scenario] = &[
    Scenario { label: "ATM Option", ..ATM },
    Scenario { label: "ITM Call", spot: 120, ..ATM },
    Scenario { label: "OTM Call", spot: 80, ..ATM },
    Scenario { label: "Deep ITM Call", spot: 200, ..ATM },
    Scenario { label: "Deep OTM Call", spot: 50, ..ATM },
    Scenario { label: "Short Expiry", time: 0.25, ..ATM },
    Scenario { label: "High Volatility", volatility: 0.5, ..ATM },
];

/// Cases swept by the put-call parity check.
pub const PARITY_SCENARIOS: &[Scenario] = &[
    Scenario { label: "ATM", ..ATM },
    Scenario { label: "ITM", spot: 120, ..ATM },
    Scenario { label: "OTM", spot: 80, ..ATM },
    Scenario { label: "Short expiry", time: 0.25, ..ATM },
    Scenario { label: "Higher rate and vol", rate: 0.10, volatility: 0.3, ..ATM },
];
