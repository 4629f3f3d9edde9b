use crate::data::FossilRecord;

/// Smallest glyph size, scene units
pub const MIN_SIZE: f64 = 8.0;
/// Largest glyph size, scene units
pub const MAX_SIZE: f64 = 35.0;

/// Square-root scale from body length onto `[MIN_SIZE, MAX_SIZE]`.
///
/// The domain is `[0, max]` where `max` is the largest non-NaN length; an
/// empty, zero or negative maximum falls back to 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SizeScale {
    max: f64,
}

impl SizeScale {
    pub fn from_lengths(lengths: impl IntoIterator<Item = f64>) -> Self {
        let max = lengths
            .into_iter()
            .filter(|v| !v.is_nan())
            .fold(f64::NEG_INFINITY, f64::max);
        let max = if max.is_finite() && max > 0.0 { max } else { 1.0 };
        Self { max }
    }

    pub fn from_records(records: &[FossilRecord]) -> Self {
        Self::from_lengths(records.iter().map(|r| r.length_m))
    }

    #[cfg(test)]
    fn domain_max(&self) -> f64 {
        self.max
    }

    /// Glyph size for a body length. NaN stays NaN.
    pub fn size(&self, length: f64) -> f64 {
        if length.is_nan() {
            return f64::NAN;
        }
        // Negative lengths sit below the domain
        let t = length.max(0.0).sqrt() / self.max.sqrt();
        (MIN_SIZE + (MAX_SIZE - MIN_SIZE) * t).clamp(MIN_SIZE, MAX_SIZE)
    }
}
