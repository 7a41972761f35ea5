//! Specular reflection of a single yarn segment.
//!
//! Both kernels follow *Irawan and Marschner, Specular Reflection from Woven Cloth, ACM TOG 2012*:
//! a yarn is a bent cylinder of fibers, and a fiber reflects light when its tangent is
//! perpendicular to the half vector. For filament yarn the fibers run along the yarn, so the
//! highlight position is found along the yarn. For staple yarn the fibers are twisted by `psi`,
//! so the highlight is found across the yarn.
use std::f64::consts::{FRAC_PI_2, PI};

use crate::{
    von_mises::von_mises,
    yarn::{PatternData, WeaveParameters, YarnKind},
    Vec3d,
};

/// Radius of the yarn cross section
const YARN_RADIUS: f64 = 1.0;

/// A highlight that reaches the outgoing direction
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Highlight {
    /// normalized half vector, in the canonical yarn orientation
    pub half_vector: Vec3d,

    /// normal of the fiber that reflects the light, in the canonical yarn orientation
    pub normal: Vec3d,

    /// the reflected energy
    pub reflection: f64,
}

/// Specular reflection from `wi` to `wo` for the segment described by `data`.
///
/// Directions are given in the unperturbed shading frame.
#[must_use]
pub fn specular(params: &WeaveParameters, wi: Vec3d, wo: Vec3d, data: &PatternData) -> f64 {
    trace(params, wi, wo, data).map_or(0.0, |highlight| highlight.reflection)
}

/// Like [`specular`], but also returns the geometry of the highlight.
/// Returns `None` if no highlight of the segment reflects light from `wi` to `wo`.
#[must_use]
pub fn trace(
    params: &WeaveParameters,
    wi: Vec3d,
    wo: Vec3d,
    data: &PatternData,
) -> Option<Highlight> {
    let (wi, wo) = if data.warp_above {
        (wi, wo)
    } else {
        (to_warp_orientation(wi), to_warp_orientation(wo))
    };
    match params.yarn {
        YarnKind::Filament => filament(params, wi, wo, data),
        YarnKind::Staple { psi } => staple(params, psi, wi, wo, data),
    }
}

/// Rotates by 90 degrees around the normal, so that weft yarn runs along the y axis
const fn to_warp_orientation(v: Vec3d) -> Vec3d {
    Vec3d::new(-v.y, v.x, v.z)
}

fn curvature_radius(params: &WeaveParameters) -> f64 {
    1.0 / params.umax.sin()
}

/// Forward and uniform scattering inside the fiber
fn scattering(params: &WeaveParameters, wi: Vec3d, wo: Vec3d) -> f64 {
    params.alpha + von_mises(-wi.dot(wo), params.beta)
}

/// Attenuation by the fiber, zero if either direction is below the fiber
fn attenuation(wi: Vec3d, wo: Vec3d, normal: Vec3d) -> f64 {
    let wi_dot_n = wi.dot(normal);
    let wo_dot_n = wo.dot(normal);
    if wi_dot_n <= 0.0 || wo_dot_n <= 0.0 {
        return 0.0;
    }
    wi_dot_n * wo_dot_n / (4.0 * PI * (wi_dot_n + wo_dot_n))
}

/// Clamps a highlight position so that its footprint stays inside the segment
fn clamp_to_segment(position: f64, delta_x: f64) -> f64 {
    position.clamp(-1.0 + delta_x, 1.0 - delta_x)
}

fn filament(
    params: &WeaveParameters,
    wi: Vec3d,
    wo: Vec3d,
    data: &PatternData,
) -> Option<Highlight> {
    let h = (wi + wo).try_normalize()?;

    let specular_u = (-h.z).atan2(h.y) + FRAC_PI_2;
    if specular_u.abs() >= params.umax {
        return None;
    }

    let specular_y = clamp_to_segment(specular_u / params.umax, params.delta_x);
    if (specular_y - data.y).abs() >= params.delta_x {
        return None;
    }

    let v = data.v;
    let (sin_u, cos_u) = specular_u.sin_cos();
    let normal = Vec3d::new(v.sin(), sin_u * v.cos(), cos_u * v.cos()).normalize();
    let tangent = Vec3d::new(0.0, cos_u, -sin_u);

    let a = attenuation(wi, wo, normal);
    let tangent_cross = tangent.cross(h).x.abs();
    if a <= 0.0 || tangent_cross <= f64::EPSILON {
        return None;
    }

    let geometry = YARN_RADIUS * YARN_RADIUS.mul_add(v.cos(), curvature_radius(params))
        / ((wi + wo).length() * tangent_cross);
    let fc = scattering(params, wi, wo);
    let reflection = 2.0 * data.length * params.umax * fc * geometry * a / params.delta_x;

    Some(Highlight {
        half_vector: h,
        normal,
        reflection,
    })
}

fn staple(
    params: &WeaveParameters,
    psi: f64,
    wi: Vec3d,
    wo: Vec3d,
    data: &PatternData,
) -> Option<Highlight> {
    let h = (wi + wo).try_normalize()?;

    let (sin_u, cos_u) = data.u.sin_cos();
    let across = h.y.mul_add(sin_u, h.z * cos_u);
    let d = h.y.mul_add(cos_u, -h.z * sin_u) / h.x.hypot(across) / psi.tan();
    if d.is_nan() {
        return None;
    }
    // D leaves [-1, 1] for grazing half vectors
    let specular_v = (-across).atan2(h.x) + d.clamp(-1.0, 1.0).acos();
    if specular_v.abs() >= FRAC_PI_2 {
        return None;
    }

    let specular_x = clamp_to_segment(specular_v / FRAC_PI_2, params.delta_x);
    if (specular_x - data.x).abs() >= params.delta_x {
        return None;
    }

    let (sin_v, cos_v) = specular_v.sin_cos();
    let normal = Vec3d::new(sin_v, sin_u * cos_v, cos_u * cos_v).normalize();

    let a = attenuation(wi, wo, normal);
    let n_dot_h = normal.dot(h);
    if a <= 0.0 || n_dot_h <= 0.0 {
        return None;
    }

    let geometry = YARN_RADIUS * YARN_RADIUS.mul_add(cos_v, curvature_radius(params))
        / ((wi + wo).length() * n_dot_h * psi.sin().abs());
    let fc = scattering(params, wi, wo);
    let reflection = 2.0 * data.width * params.umax * fc * geometry * a / params.delta_x;

    Some(Highlight {
        half_vector: h,
        normal,
        reflection,
    })
}
