//! Orthonormal shading frames
use crate::Vec3d;

/// An orthonormal basis. `n` is the normal, `s` and `t` span the tangent plane.
///
/// The basis is not required to be right handed: flipping the normal of a frame keeps it
/// orthonormal, which is all [`Frame::to_local`] relies on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub s: Vec3d,
    pub t: Vec3d,
    pub n: Vec3d,
}

impl Frame {
    /// The frame whose axes coincide with the coordinate axes
    pub const IDENTITY: Self = Self {
        s: Vec3d::X,
        t: Vec3d::Y,
        n: Vec3d::Z,
    };

    /// Builds a frame from two (not necessarily orthogonal) tangent vectors.
    /// The normal is flipped into the hemisphere of `hemisphere`.
    ///
    /// Returns `None` if the tangents are degenerate.
    #[must_use]
    pub fn from_tangents(dpdu: Vec3d, dpdv: Vec3d, hemisphere: Vec3d) -> Option<Self> {
        let n = dpdu.cross(dpdv).try_normalize()?;
        let s = (dpdu - n * n.dot(dpdu)).try_normalize()?;
        let t = n.cross(s);
        let n = if n.dot(hemisphere) < 0.0 { -n } else { n };
        Some(Self { s, t, n })
    }

    #[must_use]
    pub fn to_local(&self, v: Vec3d) -> Vec3d {
        Vec3d::new(v.dot(self.s), v.dot(self.t), v.dot(self.n))
    }

    #[must_use]
    pub fn to_world(&self, v: Vec3d) -> Vec3d {
        self.s * v.x + self.t * v.y + self.n * v.z
    }

    #[must_use]
    pub fn cos_theta(&self, v: Vec3d) -> f64 {
        v.dot(self.n)
    }
}
