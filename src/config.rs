/// Slack allowed when checking that a transition row sums to one.
pub const ROW_SUM_TOLERANCE: f64 = 1e-9;

/// Number of matrix powers kept by a `PowerCache` unless told otherwise.
pub const POWER_CACHE_CAPACITY: usize = 16;

/// Tunables of a `MarkovChain`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainConfig {
    pub row_sum_tolerance: f64,
    pub power_cache_capacity: usize,
}

impl Default for ChainConfig {
    fn default() -> Self {
        ChainConfig {
            row_sum_tolerance: ROW_SUM_TOLERANCE,
            power_cache_capacity: POWER_CACHE_CAPACITY,
        }
    }
}

/// Finest step `Polynomial::find_rough_roots` will walk, as a power of ten.
pub const MAX_ROOT_RESOLUTION: u32 = 9;

/// Sampling window of `Polynomial::find_rough_roots`: the interval
/// `[-span, span]` walked with a step of `10^-resolution`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootSearch {
    pub span: f64,
    pub resolution: u32,
}

impl Default for RootSearch {
    fn default() -> Self {
        RootSearch {
            span: 100.0,
            resolution: 3,
        }
    }
}
