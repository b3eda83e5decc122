use rand::Rng;

use crate::config::RangeSpec;

/// Draws a uniform value in `[min, max]` and rounds it to `decimals` digits.
///
/// The rounding goes through the decimal text form, so the result prints with
/// at most `decimals` fractional digits. Rounding may land exactly on `max`.
pub fn sample<R: Rng + ?Sized>(rng: &mut R, min: f64, max: f64, decimals: usize) -> f64 {
    let raw = rng.gen::<f64>() * (max - min) + min;
    let text = format!("{:.*}", decimals, raw);
    text.parse().unwrap_or(raw)
}

pub fn generate<R: Rng + ?Sized>(rng: &mut R, spec: &RangeSpec) -> Vec<f64> {
    (0..spec.count)
        .map(|_| sample(rng, spec.min, spec.max, spec.decimals))
        .collect()
}

/// Samples every range in order and flattens the results.
pub fn generate_batch<R: Rng + ?Sized>(rng: &mut R, specs: &[RangeSpec]) -> Vec<f64> {
    specs.iter().flat_map(|spec| generate(rng, spec)).collect()
}
