//! Depth-specialized sample access.
//!
//! Samples are widened to a common 16-bit scale on load and narrowed with
//! rounding on store. `DEPTH` is a const parameter so each supported depth
//! gets its own instantiation of the filter loops.

/// Returns the storage size of one sample at `DEPTH`.
#[cfg(test)]
pub(crate) const fn bytes_per_sample<const DEPTH: u32>() -> usize {
    if DEPTH == 8 {
        1
    } else {
        2
    }
}

/// Reads sample `x` of `row` and normalizes it to 16 bits.
///
/// Bits above `DEPTH` in a stored word are ignored.
#[inline(always)]
pub(crate) fn load<const DEPTH: u32>(row: &[u8], x: usize) -> u32 {
    let raw = if DEPTH == 8 {
        u32::from(row[x])
    } else {
        u32::from(u16::from_le_bytes([row[2 * x], row[2 * x + 1]])) & ((1 << DEPTH) - 1)
    };
    raw << (16 - DEPTH)
}

/// Narrows a 16-bit value back to `DEPTH` bits and writes it as sample `x`.
#[inline(always)]
pub(crate) fn store<const DEPTH: u32>(row: &mut [u8], x: usize, value: u32) {
    let max = (1u32 << DEPTH) - 1;
    let v = rightshift(value, 16 - DEPTH).min(max);
    if DEPTH == 8 {
        row[x] = v as u8;
    } else {
        row[2 * x..2 * x + 2].copy_from_slice(&(v as u16).to_le_bytes());
    }
}

/// Shift right by `b`, rounding half down.
#[inline(always)]
fn rightshift(a: u32, b: u32) -> u32 {
    (a + (((1 << b) - 1) >> 1)) >> b
}
