//! Prometheus metrics for denoiser monitoring.
//!
//! Metrics are collected into a private registry and rendered in the
//! Prometheus text format, typically written to a file when a run ends.
//!
//! # Metrics Exposed
//!
//! ## Throughput
//! - `hqdn3d_frames_processed_total` - Frames denoised
//! - `hqdn3d_planes_processed_total` - Planes denoised
//! - `hqdn3d_pixels_processed_total` - Samples denoised across all planes
//!
//! ## State
//! - `hqdn3d_temporal_buffers_allocated_total` - Temporal memories seeded
//!
//! ## Quality
//! - `hqdn3d_luma_mean_abs_change` - Mean absolute luma change of the last frame
//! - `hqdn3d_luma_psnr_db` - Luma PSNR of the last output against its input
//!
//! # Example
//!
//! ```no_run
//! use hqdn3d::metrics::{MetricsRegistry, MetricsSnapshot};
//!
//! let registry = MetricsRegistry::new().expect("Failed to create registry");
//!
//! let snapshot = MetricsSnapshot {
//!     frames_processed: 10,
//!     planes_processed: 30,
//!     pixels_processed: 30_720,
//!     temporal_buffers_allocated: 3,
//!     luma_mean_abs_change: Some(0.8),
//!     luma_psnr: Some(44.1),
//! };
//!
//! registry.update(&snapshot);
//! println!("{}", registry.encode().unwrap());
//! ```

mod collector;

pub use collector::{MetricsError, MetricsRegistry, MetricsSnapshot};
