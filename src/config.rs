/// How many samples to draw from `[min, max]` and how many decimals to keep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeSpec {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub decimals: usize,
}

impl RangeSpec {
    pub const fn new(count: usize, min: f64, max: f64, decimals: usize) -> Self {
        Self {
            count,
            min,
            max,
            decimals,
        }
    }
}

/// Ranges covering sub-milliether amounts up to the full 210M supply, each at
/// a short (4) and the full wei (18) precision.
pub const DEFAULT_RANGES: [RangeSpec; 15] = [
    RangeSpec::new(2, 0.0, 0.001, 4),
    RangeSpec::new(2, 0.0, 0.001, 18),
    RangeSpec::new(2, 0.0, 0.1, 4),
    RangeSpec::new(2, 0.0, 0.1, 18),
    RangeSpec::new(2, 0.0, 1.0, 18),
    RangeSpec::new(2, 0.0, 1.0, 4),
    RangeSpec::new(2, 0.0, 1.0, 18),
    RangeSpec::new(2, 0.0, 100.0, 4),
    RangeSpec::new(2, 0.0, 100.0, 18),
    RangeSpec::new(2, 0.0, 10000.0, 4),
    RangeSpec::new(2, 0.0, 10000.0, 18),
    RangeSpec::new(2, 0.0, 1000000.0, 4),
    RangeSpec::new(2, 0.0, 1000000.0, 18),
    RangeSpec::new(2, 0.0, 210000000.0, 4),
    RangeSpec::new(2, 0.0, 210000000.0, 18),
];
