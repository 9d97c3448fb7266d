use serde::Serialize;

/// Number of discarded steps before the first keystream byte.
pub const WARMUP_DEFAULT: u32 = 5000;

const SIGMA: f64 = 10.0;
const RHO: f64 = 28.0;
const BETA: f64 = 8.0 / 3.0;
const DT: f64 = 0.01;

/// Fixed Lorenz parameter set used by every cipher operation.
///
/// The values place the system in its classically chaotic regime and are
/// the only ones the statistical properties of the keystream have been
/// checked against. Fields are private: the set can be read but never
/// altered by callers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CipherParams {
    sigma: f64,
    rho: f64,
    beta: f64,
    dt: f64,
    warmup: u32,
}

impl CipherParams {
    /// The validated parameter set: sigma=10, rho=28, beta=8/3, dt=0.01,
    /// warmup=5000.
    pub const fn init() -> Self {
        Self {
            sigma: SIGMA,
            rho: RHO,
            beta: BETA,
            dt: DT,
            warmup: WARMUP_DEFAULT,
        }
    }

    /// Same dynamics with a shorter warmup. Only used to render trajectories,
    /// never to encrypt.
    pub(crate) const fn with_trace_warmup(warmup: u32) -> Self {
        let mut params = Self::init();
        params.warmup = warmup;
        params
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn rho(&self) -> f64 {
        self.rho
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn warmup(&self) -> u32 {
        self.warmup
    }
}

impl Default for CipherParams {
    fn default() -> Self {
        Self::init()
    }
}
