//! Maps surface coordinates to the local coordinates of the yarn segment below them
use std::f64::consts::FRAC_PI_2;

use crate::{
    frame::Frame,
    pattern::{PatternTable, SegmentSteps},
    utils, RgbD, Vec2d, Vec3d,
};

/// Which highlight model is used for the yarn
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum YarnKind {
    /// Yarn made of long continuous fibers that all run along the yarn
    Filament,

    /// Yarn spun from short fibers which are twisted around the yarn axis by `psi` radians
    Staple { psi: f64 },
}

/// Immutable parameters of the weave, fixed when the cloth is built
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeaveParameters {
    /// pattern repetitions per unit of surface u
    pub uscale: f64,
    /// pattern repetitions per unit of surface v
    pub vscale: f64,
    /// maximum inclination of the yarn cross section, in radians
    pub umax: f64,
    pub yarn: YarnKind,
    /// uniform scattering weight
    pub alpha: f64,
    /// forward scattering concentration
    pub beta: f64,
    /// half width of a highlight in normalized segment units
    pub delta_x: f64,
    /// blend weight between the diffuse and the specular component
    pub specular_strength: f64,
    /// resolution of the brightness variation grid, `0.0` disables the variation
    pub intensity_fineness: f64,
    /// rescales the specular component to be roughly energy conserving
    pub specular_normalization: f64,
}

/// The geometry a shading query is evaluated at.
///
/// All vectors are expressed in the local shading space, i.e. the shading normal is `+z`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfacePoint {
    /// parametric surface coordinate
    pub uv: Vec2d,
    /// derivative of the position with respect to u
    pub dpdu: Vec3d,
    /// derivative of the position with respect to v
    pub dpdv: Vec3d,
    /// normal of the underlying geometry
    pub geometric_normal: Vec3d,
}

impl SurfacePoint {
    /// A point on a flat surface whose tangents coincide with the shading frame
    #[must_use]
    pub const fn flat(uv: Vec2d) -> Self {
        Self {
            uv,
            dpdu: Vec3d::X,
            dpdv: Vec3d::Y,
            geometric_normal: Vec3d::Z,
        }
    }
}

/// Everything that is known about the yarn below a surface point
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PatternData {
    /// linear color of the visible thread
    pub color: RgbD,
    /// the shading frame perturbed by the yarn curvature
    pub frame: Frame,
    /// angle along the yarn
    pub u: f64,
    /// angle around the yarn
    pub v: f64,
    /// segment extent along the yarn, in cells
    pub length: f64,
    /// segment extent across the yarn, in cells
    pub width: f64,
    /// position across the segment in \[-1,1\]
    pub x: f64,
    /// position along the segment in \[-1,1\]
    pub y: f64,
    /// absolute cell index in u
    pub total_x: f64,
    /// absolute cell index in v
    pub total_y: f64,
    /// center of the whole segment in absolute cell coordinates, not canonicalized
    pub segment_center: Vec2d,
    pub warp_above: bool,
}

/// Fractional part of `coord`, always in \[0,1)
fn repeat(coord: f64) -> f64 {
    let fract = coord.rem_euclid(1.0);
    // rem_euclid rounds tiny negative values up to 1.0
    if fract < 1.0 {
        fract
    } else {
        0.0
    }
}

fn cell_index(repeat: f64, size: usize) -> usize {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let index = (repeat * size as f64) as usize;
    debug_assert!(index < size, "pattern index {index} out of bounds {size}");
    index.min(size - 1)
}

/// Absolute index of the first cell of a segment that contains the cell `total`.
/// A thread that stays on top over the whole row or column has no first cell, it is anchored at
/// the start of the pattern tile.
fn segment_start(total: f64, pattern_coord: usize, steps: SegmentSteps, size: usize) -> f64 {
    if steps.cells() == size {
        total - pattern_coord as f64
    } else {
        total - steps.left as f64
    }
}

/// Looks up the pattern at `surface` and computes the yarn local coordinates there.
///
/// Coordinates are canonicalized so that the yarn always runs along the local y axis: for cells
/// where the weft is on top, x and y as well as length and width are swapped.
#[must_use]
pub fn sample_pattern(
    table: &PatternTable,
    params: &WeaveParameters,
    surface: &SurfacePoint,
) -> PatternData {
    let pattern_width = table.width() as f64;
    let pattern_height = table.height() as f64;

    let u_scaled = surface.uv.x * params.uscale;
    let v_scaled = surface.uv.y * params.vscale;
    let u_repeat = repeat(u_scaled);
    let v_repeat = repeat(v_scaled);

    let pattern_x = cell_index(u_repeat, table.width());
    let pattern_y = cell_index(v_repeat, table.height());
    let entry = table.entry(pattern_x, pattern_y);

    let steps = table.locate_segment(entry.warp_above, pattern_x, pattern_y);
    let none = SegmentSteps { left: 0, right: 0 };
    let (warp_steps, weft_steps) = if entry.warp_above {
        (steps, none)
    } else {
        (none, steps)
    };

    let mut length = warp_steps.cells() as f64;
    let mut y = (v_repeat.mul_add(pattern_height, -(pattern_y as f64)) + warp_steps.left as f64)
        / length;
    let mut width = weft_steps.cells() as f64;
    let mut x =
        (u_repeat.mul_add(pattern_width, -(pattern_x as f64)) + weft_steps.left as f64) / width;

    x = x.mul_add(2.0, -1.0);
    y = y.mul_add(2.0, -1.0);

    let total_x = (u_scaled * pattern_width).floor();
    let total_y = (v_scaled * pattern_height).floor();
    let segment_center = Vec2d::new(
        segment_start(total_x, pattern_x, weft_steps, table.width()) + width / 2.0,
        segment_start(total_y, pattern_y, warp_steps, table.height()) + length / 2.0,
    );

    if !entry.warp_above {
        (x, y) = (-y, x);
        std::mem::swap(&mut length, &mut width);
    }

    // NOTE: linear in the segment position, not the inverse sine mapping of Irawan's model
    let segment_u = y * params.umax;
    let segment_v = x * FRAC_PI_2;

    let (sin_u, cos_u) = segment_u.sin_cos();
    let (sin_v, cos_v) = segment_v.sin_cos();
    let mut normal = Vec3d::new(sin_v, sin_u * cos_v, cos_u * cos_v);
    if !entry.warp_above {
        normal = Vec3d::new(normal.y, -normal.x, normal.z);
    }

    // displace the surface tangents by the slope of the yarn
    let n = Vec3d::Z;
    let dpdu = surface.dpdu + n * (-normal.x - n.dot(surface.dpdu));
    let dpdv = surface.dpdv + n * (-normal.y - n.dot(surface.dpdv));
    let frame =
        Frame::from_tangents(dpdu, dpdv, surface.geometric_normal).unwrap_or(Frame::IDENTITY);

    PatternData {
        color: utils::srgb_to_linear_color(entry.color),
        frame,
        u: segment_u,
        v: segment_v,
        length,
        width,
        x,
        y,
        total_x,
        total_y,
        segment_center,
        warp_above: entry.warp_above,
    }
}
