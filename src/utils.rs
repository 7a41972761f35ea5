use crate::{RgbD, RgbF, Vec3d};

pub trait SafeCast<Target> {
    fn safe_cast(self) -> Target;
}

impl SafeCast<RgbD> for RgbF {
    fn safe_cast(self) -> RgbD {
        RgbD {
            x: self.x as f64,
            y: self.y as f64,
            z: self.z as f64,
        }
    }
}

/* pdf is cos(theta) / pi */
#[must_use]
pub fn hemispherical_sample_cos_weighted_uv(u: f64, v: f64) -> (Vec3d, f64) {
    let eps_theta_sample = u.clamp(1e-6, 1.0); // prevent division by zero (division by pdf)
    let cos_theta = eps_theta_sample.sqrt();
    let sin_theta = (1.0 - eps_theta_sample).sqrt();
    let phi = 2.0 * std::f64::consts::PI * v;
    let (sin_phi, cos_phi) = phi.sin_cos();
    let omega = Vec3d {
        x: sin_theta * sin_phi,
        y: sin_theta * cos_phi,
        z: cos_theta,
    };
    (omega, cos_theta / std::f64::consts::PI)
}

/// Density of [`hemispherical_sample_cos_weighted_uv`] for an arbitrary direction
#[must_use]
pub fn hemispherical_cos_weighted_pdf(omega: Vec3d) -> f64 {
    if omega.z > 0.0 {
        omega.z / std::f64::consts::PI
    } else {
        0.0
    }
}

/// Decodes a single gamma encoded sRGB channel
#[must_use]
pub fn srgb_to_linear(s: f32) -> f64 {
    let s = s as f64;
    if s <= 0.04045 {
        s / 12.92
    } else {
        ((s + 0.055) / 1.055).powf(2.4)
    }
}

#[must_use]
pub fn srgb_to_linear_color(s: RgbF) -> RgbD {
    RgbD::new(srgb_to_linear(s.x), srgb_to_linear(s.y), srgb_to_linear(s.z))
}
