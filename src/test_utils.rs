pub trait ApproxEqual: Copy {
    fn equals_approx(self, other: Self, eps: Self, eps_rel: Self) -> bool;
    fn equals_approx_abs(self, other: Self, eps: Self) -> bool;
}

macro_rules! assert_eq_approx {
    ($lhs:expr, $rhs:expr, $eps_abs:expr, $eps_rel:expr) => {
        assert!(
            $crate::test_utils::ApproxEqual::equals_approx($lhs, $rhs, $eps_abs, $eps_rel),
            r#"assert_eq_abs failed:
    {}: {:?}
    {}: {:?}
    {} (maximum absolute error): {:?}
    {} (maximum relative error): {:?}"#,
            stringify!($lhs),
            $lhs,
            stringify!($rhs),
            $rhs,
            stringify!($eps_abs),
            $eps_abs,
            stringify!($eps_rel),
            $eps_rel,
        );
    };

    ($lhs:expr, $rhs:expr, $eps_abs: expr, $eps_rel:expr, $($arg:tt)+) => {
        assert!($crate::test_utils::ApproxEqual::equals_approx($lhs, $rhs, $eps_abs, $eps_rel), $($arg)*);
    }
}

macro_rules! assert_eq_approx_abs {
    ($lhs:expr, $rhs:expr, $eps_abs:expr) => {
        assert!(
            $crate::test_utils::ApproxEqual::equals_approx_abs($lhs, $rhs, $eps_abs),
            r#"assert_eq_abs failed:
    {}: {:?}
    {}: {:?}
    {} (maximum absolute error): {:?}"#,
            stringify!($lhs),
            $lhs,
            stringify!($rhs),
            $rhs,
            stringify!($eps_abs),
            $eps_abs,
        )
    };

    ($lhs:expr, $rhs:expr, $eps_abs:expr, $($arg:tt)+) => {
        assert!($crate::test_utils::ApproxEqual::equals_approx_abs($lhs, $rhs, $eps_abs),
        $($arg)*);
    };
}

macro_rules! assert_in_range {
    ($value:expr, $lower:expr, $upper:expr) => {
        assert!(
            $lower <= $value && $value <= $upper,
            r#"assert_in_range failed:
    {} (value): {:?}
    {} (lower bound): {:?}
    {} (upper bound): {:?}"#,
            stringify!($value),
            $value,
            stringify!($lower),
            $lower,
            stringify!($upper),
            $upper
        )
    };
}

macro_rules! impl_approx_equal {
    ($scalar:ty, $vector2:ty, $vector3:ty) => {
        impl ApproxEqual for $scalar {
            fn equals_approx(self, other: Self, eps: Self, eps_rel: Self) -> bool {
                #[allow(clippy::float_cmp)]
                if self == other || (self - other).abs() <= eps {
                    true
                } else {
                    let diff = (self - other).abs();
                    let max = self.abs().max(other.abs());
                    diff <= max * eps_rel
                }
            }

            fn equals_approx_abs(self, other: Self, eps: Self) -> bool {
                #[allow(clippy::float_cmp)]
                if self == other {
                    true
                } else {
                    (self - other).abs() <= eps
                }
            }

        }

        impl ApproxEqual for $vector2 {
            fn equals_approx_abs(self, other: Self, eps: Self) -> bool {
                $crate::test_utils::ApproxEqual::equals_approx_abs(self.x, other.x, eps.x)
                    && $crate::test_utils::ApproxEqual::equals_approx_abs(self.y, other.y, eps.y)
            }
            fn equals_approx(self, other: Self, eps_abs: Self, eps_rel: Self) -> bool {
                $crate::test_utils::ApproxEqual::equals_approx(
                    self.x, other.x, eps_abs.x, eps_rel.x,
                ) && $crate::test_utils::ApproxEqual::equals_approx(
                    self.y, other.y, eps_abs.y, eps_rel.y,
                )
            }
        }

        impl ApproxEqual for $vector3 {
            fn equals_approx_abs(self, other: Self, eps: Self) -> bool {
                $crate::test_utils::ApproxEqual::equals_approx_abs(self.x, other.x, eps.x)
                    && $crate::test_utils::ApproxEqual::equals_approx_abs(self.y, other.y, eps.y)
                    && $crate::test_utils::ApproxEqual::equals_approx_abs(self.z, other.z, eps.z)
            }
            fn equals_approx(self, other: Self, eps_abs: Self, eps_rel: Self) -> bool {
                $crate::test_utils::ApproxEqual::equals_approx(
                    self.x, other.x, eps_abs.x, eps_rel.x,
                ) && $crate::test_utils::ApproxEqual::equals_approx(
                    self.y, other.y, eps_abs.y, eps_rel.y,
                ) && $crate::test_utils::ApproxEqual::equals_approx(
                    self.z, other.z, eps_abs.z, eps_rel.z,
                )
            }
        }
    };
}

impl_approx_equal!(f64, Vec2d, Vec3d);

use std::f64::consts;

pub(crate) use assert_eq_approx;
pub(crate) use assert_eq_approx_abs;
pub(crate) use assert_in_range;

use crate::{SampleIncomingResponse, Vec2d, Vec3d, BSDF};

pub trait FloatExt {
    fn sq(self) -> Self;
}

impl FloatExt for f64 {
    fn sq(self) -> Self {
        self * self
    }
}

pub trait SamplerExt {
    fn vec2d(&mut self) -> Vec2d;
}

impl SamplerExt for fastrand::Rng {
    fn vec2d(&mut self) -> Vec2d {
        Vec2d::new(self.f64(), self.f64())
    }
}

/** sample a direction with density 1 / 4pi */
pub fn spherical_sample(rd: &mut fastrand::Rng) -> Vec3d {
    let u = rd.f64();
    let v = rd.f64();
    spherical_sample_uv(u, v)
}

fn spherical_sample_uv(u: f64, v: f64) -> Vec3d {
    #[allow(clippy::suboptimal_flops)]
    let cos_theta = 2.0 * u - 1.0;
    #[allow(clippy::suboptimal_flops)]
    let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
    let phi = v * 2.0 * consts::PI;
    let (sin_phi, cos_phi) = phi.sin_cos();
    Vec3d::new(sin_theta * sin_phi, sin_theta * cos_phi, cos_theta)
}

/** sample a direction in the upper hemisphere with density 1 / 2pi */
pub fn hemispherical_sample(rd: &mut fastrand::Rng) -> Vec3d {
    let omega = spherical_sample(rd);
    Vec3d::new(omega.x, omega.y, omega.z.abs())
}

pub fn test_bsdf_non_negative<T: BSDF>(material: &T, seed: u64) {
    let mut rd = fastrand::Rng::with_seed(seed);
    let runs = 10000;
    for _ in 0..runs {
        let omega_o = spherical_sample(&mut rd);
        let omega_i = spherical_sample(&mut rd);
        let bsdf = material.evaluate(omega_o, omega_i);
        let pdf = material.sample_incoming_pdf(omega_o, omega_i);

        assert!(
            bsdf.is_finite() && bsdf.min_element() >= 0.0,
            "bsdf: {bsdf:?}, omega_o: {omega_o:?}, omega_i: {omega_i:?}"
        );
        assert!(
            pdf.is_finite() && pdf >= 0.0,
            "pdf: {pdf}, omega_o: {omega_o:?}, omega_i: {omega_i:?}"
        );
    }
}

/// Compares the histogram of sampled directions with the integrated pdf.
///
/// Bins are equally sized in `(cos² theta, phi)`, so a cosine distribution fills them evenly.
#[allow(clippy::cast_precision_loss)]
pub fn test_chi_square<T: BSDF>(material: &T, omega_o: Vec3d, seed: u64) {
    const BINS: usize = 10;
    const SUBDIVISIONS: usize = 16;
    let num_samples: u32 = 100_000;

    let mut rd = fastrand::Rng::with_seed(seed);
    let mut observed = [[0.0_f64; BINS]; BINS];
    for _ in 0..num_samples {
        let SampleIncomingResponse { omega_i, pdf, .. } =
            material.sample_incoming(omega_o, rd.vec2d());
        if pdf <= 0.0 || omega_i.z <= 0.0 {
            continue;
        }
        let phi = omega_i.x.atan2(omega_i.y).rem_euclid(2.0 * consts::PI);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let row = ((omega_i.z.sq() * BINS as f64) as usize).min(BINS - 1);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let column = ((phi / (2.0 * consts::PI) * BINS as f64) as usize).min(BINS - 1);
        observed[row][column] += 1.0;
    }

    let d_phi = 2.0 * consts::PI / BINS as f64;
    let mut chi_square = 0.0;
    for (row, observed_row) in observed.iter().enumerate() {
        let z0 = (row as f64 / BINS as f64).sqrt();
        let z1 = ((row + 1) as f64 / BINS as f64).sqrt();
        for (column, observed_count) in observed_row.iter().enumerate() {
            // midpoint rule over z and phi, the solid angle element is dz dphi
            let mut integral = 0.0;
            let dz = (z1 - z0) / SUBDIVISIONS as f64;
            let dp = d_phi / SUBDIVISIONS as f64;
            for i in 0..SUBDIVISIONS {
                for j in 0..SUBDIVISIONS {
                    let z = z0 + (i as f64 + 0.5) * dz;
                    let phi = (column as f64).mul_add(d_phi, (j as f64 + 0.5) * dp);
                    let sin_theta = (1.0 - z * z).max(0.0).sqrt();
                    let omega_i =
                        Vec3d::new(sin_theta * phi.sin(), sin_theta * phi.cos(), z);
                    integral += material.sample_incoming_pdf(omega_o, omega_i) * dz * dp;
                }
            }
            let expected = integral * f64::from(num_samples);
            assert!(
                expected > 5.0,
                "bin ({row}, {column}) is too small for the test: {expected}"
            );
            chi_square += (observed_count - expected).sq() / expected;
        }
    }

    // 99 degrees of freedom, mean 99 and standard deviation 14
    assert!(
        chi_square < 160.0,
        "sampled directions do not follow the pdf. chi square: {chi_square}, omega_o: {omega_o:?}"
    );
}

/// Integrates `1 / pdf` with a mixture of spherical samples and samples of the material. This
/// approaches 1 if the pdf of the samples matches [`BSDF::sample_incoming_pdf`].
///
/// Only directions `omega_o` above the surface are tested, there the material always samples.
pub fn test_integrate_inverse_pdf<T: BSDF>(material: &T, seed: u64) {
    const DOMAIN: f64 = 4.0 * std::f64::consts::PI;

    let mut rd = fastrand::Rng::with_seed(seed);
    let runs = 10;
    let num_samples: u32 = 200_000;
    for i in 0..runs {
        let omega_o = hemispherical_sample(&mut rd);
        let mut sum = 0.0;
        let mut sum_of_squared = 0.0;
        for _ in 0..num_samples {
            let pdf = if rd.f32() > 0.5 {
                let SampleIncomingResponse { pdf: pdf_bsdf, .. } =
                    material.sample_incoming(omega_o, rd.vec2d());
                let spheric_pdf = 1.0 / 4.0 / std::f64::consts::PI;
                #[allow(clippy::suboptimal_flops)]
                {
                    0.5 * spheric_pdf + 0.5 * pdf_bsdf
                }
            } else {
                let omega_i = spherical_sample(&mut rd);
                let spheric_pdf = 1.0 / 4.0 / std::f64::consts::PI;
                let pdf_bsdf = material.sample_incoming_pdf(omega_o, omega_i);
                #[allow(clippy::suboptimal_flops)]
                {
                    0.5 * spheric_pdf + 0.5 * pdf_bsdf
                }
            };
            let value = 1.0 / pdf;
            sum += value;
            sum_of_squared += value.sq();
        }
        sum /= DOMAIN * f64::from(num_samples);
        sum_of_squared /= DOMAIN.sq() * f64::from(num_samples);
        let variance_unscaled = sum_of_squared - sum.sq();

        let sample_standard_deviation = (f64::from(num_samples) / f64::from(num_samples - 1)
            * variance_unscaled)
            .sqrt();
        let standard_error = sample_standard_deviation / f64::from(num_samples).sqrt();

        let confidence_thres = 4.0 * standard_error;
        assert_eq_approx_abs!(
            sum,
            1.0,
            confidence_thres,
            r#"
    expected the monte carlo test to approach 1.
    But it approached {sum} after {num_samples} Samples with a standard error of {standard_error}.
    Required Confidence is {}.
    Difference is {}.
    omega_o: {omega_o:?}
    i: {i}"#,
            confidence_thres,
            (sum - 1.0).abs()
        );

        assert!(
            standard_error < 0.005,
            "standard_error: {standard_error} is not below threshold."
        );
    }
}
