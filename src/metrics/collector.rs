//! Metrics collection and registry.

use crate::analysis::PlaneStatistics;
use crate::filter::Denoiser;
use crate::video::PLANE_COUNT;
use prometheus::{Encoder, Gauge, IntCounter, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// A snapshot of denoiser state for metrics update.
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    /// Frames denoised.
    pub frames_processed: u64,
    /// Planes denoised.
    pub planes_processed: u64,
    /// Samples denoised across all planes.
    pub pixels_processed: u64,
    /// Temporal memories allocated.
    pub temporal_buffers_allocated: u64,
    /// Mean absolute luma change of the latest frame.
    pub luma_mean_abs_change: Option<f64>,
    /// Luma PSNR of the latest frame.
    pub luma_psnr: Option<f64>,
}

/// Prometheus metrics registry for the denoiser.
pub struct MetricsRegistry {
    registry: Registry,

    // Throughput
    frames_processed: IntCounter,
    planes_processed: IntCounter,
    pixels_processed: IntCounter,

    // State
    temporal_buffers_allocated: IntCounter,

    // Quality
    luma_mean_abs_change: Gauge,
    luma_psnr: Gauge,
}

impl MetricsRegistry {
    /// Creates a new metrics registry with all denoiser metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let frames_processed =
            IntCounter::new("hqdn3d_frames_processed_total", "Total frames denoised")?;
        let planes_processed =
            IntCounter::new("hqdn3d_planes_processed_total", "Total planes denoised")?;
        let pixels_processed = IntCounter::new(
            "hqdn3d_pixels_processed_total",
            "Total samples denoised across all planes",
        )?;
        let temporal_buffers_allocated = IntCounter::new(
            "hqdn3d_temporal_buffers_allocated_total",
            "Temporal memories seeded from a first frame",
        )?;
        let luma_mean_abs_change = Gauge::new(
            "hqdn3d_luma_mean_abs_change",
            "Mean absolute luma change of the latest frame",
        )?;
        let luma_psnr = Gauge::new(
            "hqdn3d_luma_psnr_db",
            "Luma PSNR of the latest output against its input",
        )?;

        registry.register(Box::new(frames_processed.clone()))?;
        registry.register(Box::new(planes_processed.clone()))?;
        registry.register(Box::new(pixels_processed.clone()))?;
        registry.register(Box::new(temporal_buffers_allocated.clone()))?;
        registry.register(Box::new(luma_mean_abs_change.clone()))?;
        registry.register(Box::new(luma_psnr.clone()))?;

        Ok(Self {
            registry,
            frames_processed,
            planes_processed,
            pixels_processed,
            temporal_buffers_allocated,
            luma_mean_abs_change,
            luma_psnr,
        })
    }

    /// Updates all metrics from a snapshot.
    pub fn update(&self, snapshot: &MetricsSnapshot) {
        // Counters only move forward, by the difference
        for (counter, value) in [
            (&self.frames_processed, snapshot.frames_processed),
            (&self.planes_processed, snapshot.planes_processed),
            (&self.pixels_processed, snapshot.pixels_processed),
            (
                &self.temporal_buffers_allocated,
                snapshot.temporal_buffers_allocated,
            ),
        ] {
            let current = counter.get();
            if value > current {
                counter.inc_by(value - current);
            }
        }

        if let Some(change) = snapshot.luma_mean_abs_change {
            self.luma_mean_abs_change.set(change);
        }
        if let Some(psnr) = snapshot.luma_psnr {
            self.luma_psnr.set(psnr);
        }
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl MetricsSnapshot {
    /// Creates a snapshot from the denoiser and the latest luma comparison.
    pub fn from_components(denoiser: &Denoiser, luma: Option<&PlaneStatistics>) -> Self {
        let frames = denoiser.frames_processed();
        let samples_per_frame = denoiser
            .layout()
            .map(|layout| {
                (0..PLANE_COUNT)
                    .map(|i| {
                        let (w, h) = layout.plane_dimensions(i);
                        (w * h) as u64
                    })
                    .sum::<u64>()
            })
            .unwrap_or(0);

        Self {
            frames_processed: frames,
            planes_processed: frames * PLANE_COUNT as u64,
            pixels_processed: frames * samples_per_frame,
            temporal_buffers_allocated: denoiser.temporal_allocations(),
            luma_mean_abs_change: luma.map(|s| s.mean_abs_change),
            luma_psnr: luma.map(|s| s.psnr),
        }
    }
}
