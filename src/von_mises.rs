//! The von Mises distribution, a normal distribution wrapped around the circle
use std::f64::consts;

/// Modified Bessel function of the first kind of order zero.
///
/// Uses the polynomial approximations from Abramowitz and Stegun (9.8.1 and 9.8.2), relative error
/// below `1e-7`.
#[must_use]
pub fn bessel_i0(x: f64) -> f64 {
    let x = x.abs();
    if x <= 3.75 {
        let t = (x / 3.75).powi(2);
        1.0 + t
            * (3.515_622_9
                + t * (3.089_942_4
                    + t * (1.206_749_2 + t * (0.265_973_2 + t * (0.036_076_8 + t * 0.004_581_3)))))
    } else {
        let t = 3.75 / x;
        x.exp() / x.sqrt()
            * (0.398_942_28
                + t * (0.013_285_92
                    + t * (0.002_253_19
                        + t * (-0.001_575_65
                            + t * (0.009_162_81
                                + t * (-0.020_577_06
                                    + t * (0.026_355_37
                                        + t * (-0.016_476_33 + t * 0.003_923_77))))))))
    }
}

/// Density of the von Mises distribution with mean `0` and concentration `b` at the angle whose
/// cosine is `cos_x`.
///
/// `b` is expected to be non-negative, larger values concentrate the lobe around `cos_x = 1`.
#[must_use]
pub fn von_mises(cos_x: f64, b: f64) -> f64 {
    (b * cos_x).exp() / (2.0 * consts::PI * bessel_i0(b))
}
