//! Non-linear lowpass response table.
//!
//! Maps a quantized pixel difference to the correction that pulls the
//! current sample toward its reference. Small differences (noise) are
//! corrected strongly, large differences (edges) are left mostly alone.

/// Offset that turns a signed difference bucket into a slot index.
pub const BUCKET_OFFSET: i32 = 16 * 256;

/// Number of slots in a table; covers every bucket a 16-bit difference can produce.
pub const TABLE_LEN: usize = 512 * 16;

/// Largest bucket magnitude the builder fills.
pub const BUCKET_RANGE: i32 = 255 * 16;

/// Strength above which the falloff curve no longer changes.
const MAX_STRENGTH: f64 = 252.0;

/// Keeps the logarithm argument positive when the strength saturates.
const LOG_EPSILON: f64 = 0.00001;

/// Precomputed correction table for one strength value.
///
/// Slot 0 (bucket `-4096`) is repurposed as the has-effect flag: it holds 1
/// when the table was built from a non-zero strength and 0 otherwise. The
/// filter consults [`CoefficientTable::has_effect`] to skip spatial blending
/// entirely when the spatial table is a no-op.
#[derive(Clone)]
pub struct CoefficientTable {
    slots: Box<[i16]>,
    strength: f64,
    gamma: f64,
    has_effect: bool,
}

impl CoefficientTable {
    /// Builds the table for `strength`.
    ///
    /// The caller is responsible for rejecting negative or NaN strengths;
    /// see [`crate::config::Strengths::validate`].
    pub fn build(strength: f64) -> Self {
        let gamma = gamma_for(strength);
        let mut slots = vec![0i16; TABLE_LEN].into_boxed_slice();

        for i in -BUCKET_RANGE..=BUCKET_RANGE {
            // lowpass() truncates the difference, so sample the bin midpoint
            let f = (f64::from(i) + 15.0 / 32.0) / 16.0;
            let similarity = 1.0 - f.abs() / 255.0;
            let correction = similarity.powf(gamma) * 256.0 * f;
            slots[(i + BUCKET_OFFSET) as usize] = correction.round_ties_even() as i16;
        }

        let has_effect = strength != 0.0;
        slots[0] = i16::from(has_effect);

        tracing::trace!(strength, gamma, has_effect, "Built coefficient table");

        Self {
            slots,
            strength,
            gamma,
            has_effect,
        }
    }

    /// Returns true if the table was built from a non-zero strength.
    #[inline]
    pub fn has_effect(&self) -> bool {
        self.has_effect
    }

    /// Returns the strength this table was built from.
    #[inline]
    pub fn strength(&self) -> f64 {
        self.strength
    }

    /// Returns the exponent of the similarity curve.
    #[inline]
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Returns the correction stored for a difference bucket.
    ///
    /// # Panics
    ///
    /// Panics if `bucket` lies outside `[-4096, 4095]`.
    #[inline]
    pub fn correction(&self, bucket: i32) -> i16 {
        self.slots[(bucket + BUCKET_OFFSET) as usize]
    }

    /// Blends `cur` toward `prev`.
    ///
    /// Both values are on the normalized 16-bit scale; so is the result.
    #[inline(always)]
    pub fn lowpass(&self, prev: u32, cur: u32) -> u32 {
        let d = (prev as i32 - cur as i32) >> 4;
        let blended = cur as i32 + i32::from(self.slots[(d + BUCKET_OFFSET) as usize]);
        blended.clamp(0, 0xFFFF) as u32
    }
}

impl std::fmt::Debug for CoefficientTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoefficientTable")
            .field("strength", &self.strength)
            .field("gamma", &self.gamma)
            .field("has_effect", &self.has_effect)
            .finish_non_exhaustive()
    }
}

fn gamma_for(strength: f64) -> f64 {
    0.25f64.ln() / (1.0 - strength.min(MAX_STRENGTH) / 255.0 - LOG_EPSILON).ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_strength_is_no_op() {
        let table = CoefficientTable::build(0.0);

        assert!(!table.has_effect());
        assert!(table.gamma().is_finite());
        for bucket in -BUCKET_OFFSET..BUCKET_OFFSET {
            assert_eq!(table.correction(bucket), 0, "bucket {bucket}");
        }
    }

    #[test]
    fn test_flag_slot() {
        let table = CoefficientTable::build(4.0);

        assert!(table.has_effect());
        assert_eq!(table.correction(-BUCKET_OFFSET), 1);
    }

    #[test]
    fn test_saturated_strength_has_finite_gamma() {
        let table = CoefficientTable::build(255.0);

        assert!(table.gamma().is_finite());
        assert!(table.gamma() > 0.0);
        assert_eq!(table.gamma(), CoefficientTable::build(1000.0).gamma());
    }

    #[test]
    fn test_zero_difference_bounded_by_recentering() {
        for strength in [0.5, 4.0, 6.0, 50.0, 252.0] {
            let table = CoefficientTable::build(strength);
            let c = table.correction(0);
            // 256 * (15/32) / 16 = 7.5 is the undamped midpoint correction
            assert!((0..=8).contains(&c), "strength {strength}: {c}");
        }
    }

    #[test]
    fn test_identical_values_unchanged_after_store() {
        let table = CoefficientTable::build(4.0);
        let v = 128u32 << 8;

        let out = table.lowpass(v, v);
        assert_eq!((out + 127) >> 8, 128);
    }

    #[test]
    fn test_correction_pulls_toward_reference() {
        let table = CoefficientTable::build(4.0);

        let up = table.lowpass(5000, 4000);
        assert!(up > 4000 && up < 5000);

        let down = table.lowpass(4000, 5000);
        assert!(down > 4000 && down < 5000);
    }

    #[test]
    fn test_large_differences_preserved() {
        let table = CoefficientTable::build(4.0);

        // 255 against 16 on the 8-bit scale is an edge, not noise
        assert_eq!(table.lowpass(16 << 8, 255 << 8), 255 << 8);
    }

    #[test]
    fn test_lowpass_stays_in_range() {
        let table = CoefficientTable::build(252.0);

        assert!(table.lowpass(0xFFFF, 0xFFFF) <= 0xFFFF);
        assert_eq!(table.lowpass(0, 0xFFFF) >> 16, 0);
    }

    proptest! {
        #[test]
        fn prop_falloff_is_monotonic_past_peak(strength in 0.5f64..200.0) {
            let table = CoefficientTable::build(strength);
            // |C(f)| = 256 |f| (1 - |f|/255)^gamma peaks at |f| = 255 / (1 + gamma)
            let peak = 255.0 / (1.0 + table.gamma());
            let start = (peak * 16.0).ceil() as i32 + 1;

            for i in start..BUCKET_RANGE {
                let near = i32::from(table.correction(i)).abs();
                let far = i32::from(table.correction(i + 1)).abs();
                prop_assert!(far <= near, "bucket {}: {} -> {}", i, near, far);
            }
            for i in (start + 1)..BUCKET_RANGE {
                let near = i32::from(table.correction(-i)).abs();
                let far = i32::from(table.correction(-i - 1)).abs();
                prop_assert!(far <= near, "bucket {}: {} -> {}", -i, near, far);
            }
        }

        #[test]
        fn prop_corrections_never_overshoot(strength in 0.0f64..300.0, bucket in -4080i32..4080) {
            let table = CoefficientTable::build(strength);
            let c = i32::from(table.correction(bucket));
            // the correction never exceeds the bucket's own difference (plus half a bin)
            prop_assert!(c.abs() <= (bucket.abs() + 1) * 16);
            if bucket > 0 {
                prop_assert!(c >= 0);
            } else if bucket < -1 {
                prop_assert!(c <= 0);
            }
        }
    }
}
