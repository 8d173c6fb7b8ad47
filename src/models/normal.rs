use crate::errors::{EngineError, EngineResult};
use crate::models::NormalDistribution;
use statrs::distribution::{Continuous, ContinuousCDF, Normal};
use std::str::FromStr;

/// 1 / sqrt(2 * pi)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Upper bound of the central region, roughly Phi^{-1}(0.75)
const CENTRAL_BOUND: f64 = 0.674_489_75;

/// Upper bound of the intermediate region, sqrt(32)
const SQRT_32: f64 = 5.656_854_249_492_380;

// Cody rational Chebyshev coefficients, central region |x| <= 0.674
const A: [f64; 5] = [
    2.235_252_035_460_683_9,
    161.028_231_068_555_88,
    1_067.689_485_460_370_9,
    18_154.981_253_343_561,
    0.065_682_337_918_207_45,
];
const B: [f64; 4] = [
    47.202_581_904_688_24,
    976.098_551_737_776_7,
    10_260.932_208_618_978,
    45_507.789_335_026_73,
];

// Intermediate region 0.674 < |x| <= sqrt(32)
const C: [f64; 9] = [
    0.398_941_512_088_134_66,
    8.883_149_794_388_376,
    93.506_656_132_177_86,
    597.270_276_394_800_3,
    2_494.537_585_290_372_7,
    6_848.190_450_536_282,
    11_602.651_437_647_35,
    9_842.714_838_383_978,
    1.076_557_677_372_019_2e-8,
];
const D: [f64; 8] = [
    22.266_688_044_328_117,
    235.387_901_782_625,
    1_519.377_599_407_554_8,
    6_485.558_298_266_761,
    18_615.571_640_885_098,
    34_900.952_721_145_98,
    38_912.003_286_093_27,
    19_685.429_676_859_99,
];

// Tail region |x| > sqrt(32)
const P: [f64; 6] = [
    0.215_898_534_057_957,
    0.127_401_161_160_247_36,
    0.022_235_277_870_649_807,
    0.001_421_619_193_227_893_5,
    2.911_287_495_116_879e-5,
    0.023_073_441_764_940_173,
];
const Q: [f64; 5] = [
    1.284_260_096_144_911_2,
    0.468_238_212_480_865_1,
    0.065_988_137_868_928_55,
    0.003_782_396_332_027_582_4,
    7.297_515_550_839_662e-5,
];

/// Self-contained standard normal, W. J. Cody's rational Chebyshev
/// approximation of Phi (ACM TOMS 715). Absolute error is below 1e-15
/// on the whole real line, well inside the 1e-12 the Greeks need.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardNormal;

impl StandardNormal {
    pub fn new() -> Self {
        Self
    }
}

/// exp(-y^2 / 2) split as exp(-ys^2/2) * exp(-(y-ys)(y+ys)/2) with ys = trunc(16y)/16,
/// which keeps the exponent's cancellation error out of the tail.
#[inline]
fn gaussian_kernel(y: f64) -> f64 {
    let ys = (y * 16.0).trunc() / 16.0;
    let del = (y - ys) * (y + ys);
    (-ys * ys * 0.5).exp() * (-del * 0.5).exp()
}

impl NormalDistribution for StandardNormal {
    #[inline]
    fn name(&self) -> &'static str {
        "cody"
    }

    fn cdf(&self, x: f64) -> f64 {
        if x.is_nan() {
            return f64::NAN;
        }
        let y = x.abs();

        if y <= CENTRAL_BOUND {
            let (mut xnum, mut xden) = (0.0, 0.0);
            if y > f64::EPSILON * 0.5 {
                let xsq = x * x;
                xnum = A[4] * xsq;
                xden = xsq;
                for i in 0..3 {
                    xnum = (xnum + A[i]) * xsq;
                    xden = (xden + B[i]) * xsq;
                }
            }
            return 0.5 + x * (xnum + A[3]) / (xden + B[3]);
        }

        // Lower tail P(Z <= -y)
        let tail = if y <= SQRT_32 {
            let mut xnum = C[8] * y;
            let mut xden = y;
            for i in 0..7 {
                xnum = (xnum + C[i]) * y;
                xden = (xden + D[i]) * y;
            }
            gaussian_kernel(y) * (xnum + C[7]) / (xden + D[7])
        } else {
            let xsq = 1.0 / (x * x);
            let mut xnum = P[5] * xsq;
            let mut xden = xsq;
            for i in 0..4 {
                xnum = (xnum + P[i]) * xsq;
                xden = (xden + Q[i]) * xsq;
            }
            let r = xsq * (xnum + P[4]) / (xden + Q[4]);
            gaussian_kernel(y) * (FRAC_1_SQRT_2PI - r) / y
        };

        if x > 0.0 {
            1.0 - tail
        } else {
            tail
        }
    }

    #[inline]
    fn pdf(&self, x: f64) -> f64 {
        FRAC_1_SQRT_2PI * (-0.5 * x * x).exp()
    }
}

/// statrs-backed standard normal. Its CDF is only good to a few 1e-11, so it
/// serves as the cross-check reference and never drives vector generation.
pub struct StatrsNormal {
    /// Standard normal distribution (created once, reused)
    normal: Normal,
}

impl StatrsNormal {
    pub fn new() -> Self {
        Self {
            normal: Normal::standard(),
        }
    }
}

impl Default for StatrsNormal {
    fn default() -> Self {
        Self::new()
    }
}

impl NormalDistribution for StatrsNormal {
    #[inline]
    fn name(&self) -> &'static str {
        "statrs"
    }

    #[inline]
    fn cdf(&self, x: f64) -> f64 {
        self.normal.cdf(x)
    }

    #[inline]
    fn pdf(&self, x: f64) -> f64 {
        self.normal.pdf(x)
    }
}

/// Which normal implementation drives the engine. Only `Builtin` can be
/// configured; `Statrs` exists as its cross-check counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalProvider {
    Builtin,
    Statrs,
}

impl NormalProvider {
    pub fn build(self) -> Box<dyn NormalDistribution> {
        match self {
            Self::Builtin => Box::new(StandardNormal::new()),
            Self::Statrs => Box::new(StatrsNormal::new()),
        }
    }

    /// The other implementation, used as the cross-check reference.
    pub fn counterpart(self) -> Self {
        match self {
            Self::Builtin => Self::Statrs,
            Self::Statrs => Self::Builtin,
        }
    }
}

impl FromStr for NormalProvider {
    type Err = EngineError;

    fn from_str(s: &str) -> EngineResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "builtin" | "cody" => Ok(Self::Builtin),
            "statrs" => Err(EngineError::Config(
                "NORMAL_PROVIDER: statrs misses the 1e-12 CDF accuracy vectors require; \
                 it is used only as the cross-check reference"
                    .into(),
            )),
            other => Err(EngineError::Config(format!("NORMAL_PROVIDER: unknown provider {other:?}"))),
        }
    }
}
