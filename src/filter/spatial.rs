//! Combined spatial and temporal path.
//!
//! A single causal pass: each pixel is blended against its left and
//! upper neighbors, then against the previous output at the same
//! position. `line_ant` carries the spatial result of the row above,
//! `pixel_ant` the running result of the pixels to the left.

use super::sample::{load, store};
use super::PlaneGeometry;
use crate::coefficients::CoefficientTable;

pub(super) fn denoise_spatial<const DEPTH: u32>(
    src: &[u8],
    dst: &mut [u8],
    line_ant: &mut [u16],
    frame_ant: &mut [u16],
    geometry: PlaneGeometry,
    spatial: &CoefficientTable,
    temporal: &CoefficientTable,
) {
    let w = geometry.width;
    let mut rows = src
        .chunks(geometry.src_stride)
        .zip(dst.chunks_mut(geometry.dst_stride))
        .zip(frame_ant.chunks_exact_mut(w))
        .take(geometry.height);

    // First line has no top neighbor, only the left one
    let Some(((src_row, dst_row), frame_row)) = rows.next() else {
        return;
    };
    let mut pixel_ant = load::<DEPTH>(src_row, 0);
    for x in 0..w {
        pixel_ant = spatial.lowpass(pixel_ant, load::<DEPTH>(src_row, x));
        line_ant[x] = pixel_ant as u16;
        let tmp = temporal.lowpass(u32::from(frame_row[x]), pixel_ant);
        frame_row[x] = tmp as u16;
        store::<DEPTH>(dst_row, x, tmp);
    }

    for ((src_row, dst_row), frame_row) in rows {
        let mut pixel_ant = load::<DEPTH>(src_row, 0);
        for x in 0..w - 1 {
            let tmp = spatial.lowpass(u32::from(line_ant[x]), pixel_ant);
            line_ant[x] = tmp as u16;
            // advance the left neighbor one column ahead
            pixel_ant = spatial.lowpass(pixel_ant, load::<DEPTH>(src_row, x + 1));
            let tmp = temporal.lowpass(u32::from(frame_row[x]), tmp);
            frame_row[x] = tmp as u16;
            store::<DEPTH>(dst_row, x, tmp);
        }
        let x = w - 1;
        let tmp = spatial.lowpass(u32::from(line_ant[x]), pixel_ant);
        line_ant[x] = tmp as u16;
        let tmp = temporal.lowpass(u32::from(frame_row[x]), tmp);
        frame_row[x] = tmp as u16;
        store::<DEPTH>(dst_row, x, tmp);
    }
}

#[cfg(test)]
mod tests {
    use super::super::sample::bytes_per_sample;
    use super::*;
    use proptest::prelude::*;

    /// Straightforward two-step formulation: a full horizontal pass over the
    /// row, then the vertical and temporal blends.
    fn reference<const DEPTH: u32>(
        src: &[u8],
        frame_ant: &mut [u16],
        width: usize,
        height: usize,
        spatial: &CoefficientTable,
        temporal: &CoefficientTable,
    ) -> Vec<u32> {
        let stride = width * bytes_per_sample::<DEPTH>();
        let mut out = Vec::with_capacity(width * height);
        let mut above = vec![0u32; width];

        for y in 0..height {
            let row = &src[y * stride..(y + 1) * stride];
            let mut horizontal = vec![0u32; width];
            let mut acc = load::<DEPTH>(row, 0);
            for (x, h) in horizontal.iter_mut().enumerate() {
                if y == 0 || x > 0 {
                    acc = spatial.lowpass(acc, load::<DEPTH>(row, x));
                }
                *h = acc;
            }
            for x in 0..width {
                let value = if y == 0 {
                    horizontal[x]
                } else {
                    spatial.lowpass(above[x], horizontal[x])
                };
                above[x] = value;
                let idx = y * width + x;
                let t = temporal.lowpass(u32::from(frame_ant[idx]), value);
                frame_ant[idx] = t as u16;
                out.push(t);
            }
        }
        out
    }

    fn run_both<const DEPTH: u32>(samples: &[u16], width: usize, height: usize) {
        let spatial = CoefficientTable::build(4.0);
        let temporal = CoefficientTable::build(6.0);
        let bps = bytes_per_sample::<DEPTH>();
        let src: Vec<u8> = samples
            .iter()
            .flat_map(|&v| {
                if DEPTH == 8 {
                    vec![v as u8]
                } else {
                    v.to_le_bytes().to_vec()
                }
            })
            .collect();
        let seed: Vec<u16> = (0..width * height)
            .map(|i| load::<DEPTH>(&src, i) as u16)
            .collect();

        let mut expected_state = seed.clone();
        let expected = reference::<DEPTH>(&src, &mut expected_state, width, height, &spatial, &temporal);

        let mut dst = vec![0u8; src.len()];
        let mut line = vec![0u16; width];
        let mut state = seed;
        denoise_spatial::<DEPTH>(
            &src,
            &mut dst,
            &mut line,
            &mut state,
            PlaneGeometry::packed(width, height, bps),
            &spatial,
            &temporal,
        );

        assert_eq!(state, expected_state);
        for (i, &t) in expected.iter().enumerate() {
            let mut cell = vec![0u8; bps];
            store::<DEPTH>(&mut cell, 0, t);
            assert_eq!(&dst[i * bps..(i + 1) * bps], &cell[..], "pixel {i}");
        }
    }

    #[test]
    fn test_single_column() {
        let spatial = CoefficientTable::build(4.0);
        let temporal = CoefficientTable::build(6.0);
        let src = [50u8, 52, 48];
        let mut dst = [0u8; 3];
        let mut line = [0u16; 1];
        let mut frame_ant = [50 << 8, 52 << 8, 48 << 8];

        denoise_spatial::<8>(
            &src,
            &mut dst,
            &mut line,
            &mut frame_ant,
            PlaneGeometry::packed(1, 3, 1),
            &spatial,
            &temporal,
        );

        assert_eq!(dst[0], 50);
        // pulled toward the row above
        assert!(dst[1] <= 52 && dst[2] >= 48);
    }

    proptest! {
        #[test]
        fn prop_matches_two_step_formulation_8bit(
            (width, height, samples) in (1usize..7, 1usize..5)
                .prop_flat_map(|(w, h)| (Just(w), Just(h), proptest::collection::vec(0u16..256, w * h)))
        ) {
            run_both::<8>(&samples, width, height);
        }

        #[test]
        fn prop_matches_two_step_formulation_9bit(
            (width, height, samples) in (1usize..7, 1usize..5)
                .prop_flat_map(|(w, h)| (Just(w), Just(h), proptest::collection::vec(0u16..512, w * h)))
        ) {
            run_both::<9>(&samples, width, height);
        }

        #[test]
        fn prop_matches_two_step_formulation_10bit(
            (width, height, samples) in (1usize..7, 1usize..5)
                .prop_flat_map(|(w, h)| (Just(w), Just(h), proptest::collection::vec(0u16..1024, w * h)))
        ) {
            run_both::<10>(&samples, width, height);
        }
    }
}
