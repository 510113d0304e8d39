//! Plane comparison statistics.

use crate::video::Plane;

/// Change statistics between an input plane and its filtered output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneStatistics {
    /// Mean absolute sample change.
    pub mean_abs_change: f64,
    /// Largest absolute sample change.
    pub max_abs_change: u16,
    /// PSNR of the output against the input in dB (infinite when identical).
    pub psnr: f64,
    /// Mean squared horizontal difference of the input.
    pub input_hf_energy: f64,
    /// Mean squared horizontal difference of the output.
    pub output_hf_energy: f64,
    /// Number of samples compared.
    pub sample_count: usize,
}

impl PlaneStatistics {
    /// Compares two planes of equal dimensions.
    ///
    /// Returns `None` if the dimensions or depths differ, or the planes are empty.
    pub fn compare(input: &Plane, output: &Plane) -> Option<Self> {
        if input.width() != output.width()
            || input.height() != output.height()
            || input.depth() != output.depth()
            || input.width() == 0
            || input.height() == 0
        {
            return None;
        }

        let (w, h) = (input.width(), input.height());
        let mut abs_sum = 0u64;
        let mut sq_sum = 0u64;
        let mut max_abs_change = 0u16;

        for y in 0..h {
            for x in 0..w {
                let d = input.sample(x, y).abs_diff(output.sample(x, y));
                abs_sum += u64::from(d);
                sq_sum += u64::from(d) * u64::from(d);
                max_abs_change = max_abs_change.max(d);
            }
        }

        let n = (w * h) as f64;
        let mse = sq_sum as f64 / n;
        let peak = f64::from(input.depth().max_value());
        let psnr = if mse == 0.0 {
            f64::INFINITY
        } else {
            10.0 * (peak * peak / mse).log10()
        };

        Some(Self {
            mean_abs_change: abs_sum as f64 / n,
            max_abs_change,
            psnr,
            input_hf_energy: Self::hf_energy(input),
            output_hf_energy: Self::hf_energy(output),
            sample_count: w * h,
        })
    }

    /// Mean squared difference between horizontal neighbors.
    fn hf_energy(plane: &Plane) -> f64 {
        let (w, h) = (plane.width(), plane.height());
        if w < 2 {
            return 0.0;
        }

        let mut sum = 0u64;
        for y in 0..h {
            for x in 1..w {
                let d = u64::from(plane.sample(x, y).abs_diff(plane.sample(x - 1, y)));
                sum += d * d;
            }
        }
        sum as f64 / ((w - 1) * h) as f64
    }

    /// Returns true if the output carries less high-frequency energy.
    pub fn smoothed(&self) -> bool {
        self.output_hf_energy < self.input_hf_energy
    }
}
