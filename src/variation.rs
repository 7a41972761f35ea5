//! Per segment brightness jitter, which breaks up the regular look of a perfect weave
use crate::Vec2d;

/// Largest brightness factor a segment can get
const MAX_VARIATION: f64 = 10.0;

/// Rounds of the Tiny Encryption Algorithm used for hashing segment coordinates
const TEA_ROUNDS: u32 = 8;

/// Hashes two integers with the Tiny Encryption Algorithm.
///
/// See Zafar, Olano and Curtis, *GPU Random Numbers via the Tiny Encryption Algorithm*, HPG 2010.
#[must_use]
pub fn sample_tea(mut v0: u32, mut v1: u32, rounds: u32) -> u64 {
    let mut sum: u32 = 0;
    for _ in 0..rounds {
        sum = sum.wrapping_add(0x9e37_79b9);
        v0 = v0.wrapping_add(
            (v1 << 4).wrapping_add(0xa341_316c)
                ^ v1.wrapping_add(sum)
                ^ (v1 >> 5).wrapping_add(0xc801_3ea4),
        );
        v1 = v1.wrapping_add(
            (v0 << 4).wrapping_add(0xad90_777d)
                ^ v0.wrapping_add(sum)
                ^ (v0 >> 5).wrapping_add(0x7e95_761e),
        );
    }
    (u64::from(v1) << 32) | u64::from(v0)
}

/// Uniformly distributed value in (0,1] derived from [`sample_tea`]
#[must_use]
pub fn sample_tea_unit(v0: u32, v1: u32, rounds: u32) -> f64 {
    #[allow(clippy::cast_possible_truncation)]
    let mantissa = ((sample_tea(v0, v1, rounds) >> 9) as u32) & 0x007f_ffff;
    1.0 - f64::from(mantissa) / f64::from(1_u32 << 23)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn quantize(coord: f64, fineness: f64) -> u32 {
    // negative cells wrap around instead of collapsing onto 0
    (coord * fineness).floor() as i64 as u32
}

/// Brightness factor of the segment centered at `segment_center`.
///
/// Segments are grouped on a grid with `fineness` cells per pattern cell, all segments in the same
/// grid cell get the same factor. The factors follow an exponential distribution with mean 1,
/// truncated at [`MAX_VARIATION`].
#[must_use]
pub fn intensity_variation(segment_center: Vec2d, fineness: f64) -> f64 {
    let r1 = quantize(segment_center.x, fineness);
    let r2 = quantize(segment_center.y, fineness);
    let xi = sample_tea_unit(r1, r2, TEA_ROUNDS);
    (-xi.ln()).min(MAX_VARIATION)
}
