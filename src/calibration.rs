//! One time estimation of the specular energy of a weave
use std::f64::consts;

use crate::{utils, Vec2d, Vec3d};

/// Estimates the factor that rescales `kernel` so that its average under diffuse illumination
/// becomes `1 / pi`.
///
/// `kernel` is called with a cosine distributed incident direction, a cosine distributed outgoing
/// direction and a uniformly distributed surface coordinate in \[0,1)². The random generator lives
/// only for the duration of this call and is seeded with `seed`, so the result is reproducible.
///
/// Returns `0.0` if the kernel never reflects any energy.
pub fn specular_normalization<F>(samples: usize, seed: u64, mut kernel: F) -> f64
where
    F: FnMut(Vec3d, Vec3d, Vec2d) -> f64,
{
    let mut rd = fastrand::Rng::with_seed(seed);
    let mut sum = 0.0;
    let mut hits = 0_usize;
    for _ in 0..samples {
        let (wi, _) = utils::hemispherical_sample_cos_weighted_uv(rd.f64(), rd.f64());
        let (wo, _) = utils::hemispherical_sample_cos_weighted_uv(rd.f64(), rd.f64());
        let uv = Vec2d::new(rd.f64(), rd.f64());
        let value = kernel(wi, wo, uv);
        if value > 0.0 {
            hits += 1;
        }
        sum += value;
    }

    if !(sum > 0.0 && sum.is_finite()) {
        log::warn!(
            "specular calibration collapsed after {samples} samples (sum: {sum}), disabling specular reflection"
        );
        return 0.0;
    }

    let normalization = samples as f64 / (sum * consts::PI);
    log::debug!(
        "specular normalization {normalization} from {hits} of {samples} samples reflecting"
    );
    normalization
}
