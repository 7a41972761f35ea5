//! [BSDF] of woven cloth, with a procedural yarn micro geometry
use std::f64::consts;

use crate::{
    calibration,
    error::{ClothError, Result},
    pattern::PatternTable,
    specular::{self, Highlight},
    utils::{self, SafeCast},
    variation,
    yarn::{self, PatternData, SurfacePoint, WeaveParameters, YarnKind},
    RgbD, RgbF, SampleIncomingResponse, ScatterFlags, Vec2d, Vec3d, BSDF,
};

/// User facing parameters of a [`Cloth`]. Angles are in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClothConfig {
    /// Tints the diffuse component. Every component should be in \[0,1\].
    pub reflectance: RgbF,

    /// How often the pattern repeats along the surface u coordinate
    pub utiling: f32,

    /// How often the pattern repeats along the surface v coordinate
    pub vtiling: f32,

    /// Maximum inclination of a yarn along its length. Must be in (0, pi/2].
    pub umax: f32,

    /// Fiber twist of staple yarn. `0.0` selects filament yarn, whose fibers are not twisted.
    pub psi: f32,

    /// Uniform scattering inside the fibers
    pub alpha: f32,

    /// Forward scattering inside the fibers, higher values concentrate it
    pub beta: f32,

    /// Half width of a highlight relative to the segment. Must be in (0, 1).
    pub delta_x: f32,

    /// Weight of the specular component, the diffuse component gets the rest. Must be in \[0,1\].
    pub specular_strength: f32,

    /// Cells per pattern cell of the grid used for brightness variation. `0.0` disables it.
    pub intensity_fineness: f32,

    /// Number of samples used to normalize the specular component
    pub calibration_samples: usize,

    /// Seed for the calibration samples
    pub calibration_seed: u64,
}

impl Default for ClothConfig {
    fn default() -> Self {
        Self {
            reflectance: RgbF::splat(0.5),
            utiling: 1.0,
            vtiling: 1.0,
            umax: 0.7,
            psi: std::f32::consts::FRAC_PI_2,
            alpha: 0.05,
            beta: 2.0,
            delta_x: 0.5,
            specular_strength: 0.5,
            intensity_fineness: 0.0,
            calibration_samples: 10_000,
            calibration_seed: 0x5eed_c107,
        }
    }
}

fn check(name: &'static str, value: f32, valid: bool, reason: &'static str) -> Result<()> {
    if value.is_finite() && valid {
        Ok(())
    } else {
        Err(ClothError::InvalidParameter {
            name,
            value,
            reason,
        })
    }
}

impl ClothConfig {
    /// Checks that all parameters are in their valid ranges.
    ///
    /// # Errors
    /// Returns the first invalid parameter found.
    pub fn validate(&self) -> Result<()> {
        if !(self.delta_x > 0.0 && self.delta_x < 1.0) {
            return Err(ClothError::InvalidDeltaX(self.delta_x));
        }
        if !(0.0..=1.0).contains(&self.specular_strength) {
            return Err(ClothError::InvalidSpecularStrength(self.specular_strength));
        }
        if self.calibration_samples == 0 {
            return Err(ClothError::NoCalibrationSamples);
        }
        for value in self.reflectance.to_array() {
            check("reflectance", value, value >= 0.0, "must not be negative")?;
        }
        check("utiling", self.utiling, self.utiling > 0.0, "must be positive")?;
        check("vtiling", self.vtiling, self.vtiling > 0.0, "must be positive")?;
        check(
            "umax",
            self.umax,
            self.umax > 0.0 && self.umax <= std::f32::consts::FRAC_PI_2,
            "must be in (0, pi/2]",
        )?;
        check(
            "psi",
            self.psi,
            (0.0..=std::f32::consts::FRAC_PI_2).contains(&self.psi),
            "must be in [0, pi/2]",
        )?;
        check("alpha", self.alpha, self.alpha >= 0.0, "must not be negative")?;
        check("beta", self.beta, self.beta >= 0.0, "must not be negative")?;
        check(
            "intensity_fineness",
            self.intensity_fineness,
            self.intensity_fineness >= 0.0,
            "must not be negative",
        )
    }

    fn weave_parameters(&self) -> WeaveParameters {
        let yarn = if self.psi == 0.0 {
            YarnKind::Filament
        } else {
            YarnKind::Staple {
                psi: f64::from(self.psi),
            }
        };
        WeaveParameters {
            uscale: f64::from(self.utiling),
            vscale: f64::from(self.vtiling),
            umax: f64::from(self.umax),
            yarn,
            alpha: f64::from(self.alpha),
            beta: f64::from(self.beta),
            delta_x: f64::from(self.delta_x),
            specular_strength: f64::from(self.specular_strength),
            intensity_fineness: f64::from(self.intensity_fineness),
            specular_normalization: 1.0,
        }
    }
}

/// A woven cloth material.
///
/// Every point of the surface belongs to a yarn segment of the weave pattern. The segment tilts
/// the shading normal of the diffuse component and produces the anisotropic highlights of
/// *Irawan and Marschner, Specular Reflection from Woven Cloth*.
///
/// Building a cloth runs a short Monte Carlo calibration. Afterwards the cloth is immutable and
/// can be shared between threads.
#[derive(Clone, Debug)]
pub struct Cloth {
    pattern: PatternTable,
    params: WeaveParameters,
    reflectance: RgbD,
}

impl Cloth {
    /// Builds the cloth and normalizes its specular component.
    ///
    /// # Errors
    /// Fails if `config` is invalid, see [`ClothConfig::validate`].
    pub fn new(config: ClothConfig, pattern: PatternTable) -> Result<Self> {
        config.validate()?;
        let mut params = config.weave_parameters();
        let normalization = calibration::specular_normalization(
            config.calibration_samples,
            config.calibration_seed,
            |wi, wo, uv| {
                let data = yarn::sample_pattern(&pattern, &params, &SurfacePoint::flat(uv));
                specular::specular(&params, wi, wo, &data)
            },
        );
        params.specular_normalization = normalization;
        log::debug!(
            "built {}x{} cloth with {:?} yarn",
            pattern.width(),
            pattern.height(),
            params.yarn
        );
        Ok(Self {
            pattern,
            params,
            reflectance: config.reflectance.safe_cast(),
        })
    }

    /// Builds a cloth with the built in [`PatternTable::polyester`] pattern
    ///
    /// # Errors
    /// See [`Cloth::new`].
    pub fn polyester(config: ClothConfig) -> Result<Self> {
        Self::new(config, PatternTable::polyester())
    }

    #[must_use]
    pub const fn pattern(&self) -> &PatternTable {
        &self.pattern
    }

    #[must_use]
    pub const fn parameters(&self) -> &WeaveParameters {
        &self.params
    }

    #[must_use]
    pub const fn specular_normalization(&self) -> f64 {
        self.params.specular_normalization
    }

    /// The yarn segment below `surface`
    #[must_use]
    pub fn pattern_data(&self, surface: &SurfacePoint) -> PatternData {
        yarn::sample_pattern(&self.pattern, &self.params, surface)
    }

    /// The unnormalized highlight that reflects light from `wi` to `wo` at `surface`, if any.
    /// Useful to inspect the highlight geometry.
    #[must_use]
    pub fn trace_specular(&self, surface: &SurfacePoint, wi: Vec3d, wo: Vec3d) -> Option<Highlight> {
        specular::trace(&self.params, wi, wo, &self.pattern_data(surface))
    }

    /// Binds the cloth to a surface point
    #[must_use]
    pub const fn at(&self, surface: SurfacePoint) -> ClothPoint<'_> {
        ClothPoint {
            cloth: self,
            surface,
        }
    }
}

/// Result of [`ClothPoint::sample`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClothSample {
    /// the sampled direction
    pub wo: Vec3d,

    /// value times cosine divided by the pdf
    pub weight: RgbD,

    /// density of `wo`
    pub pdf: f64,

    pub flags: ScatterFlags,
}

/// A [`Cloth`] at a specific surface point.
///
/// `wi` and `wo` are expressed in the local shading frame of the surface point. Both have to point
/// away from the surface, directions below the surface never reflect light.
#[derive(Clone, Copy, Debug)]
pub struct ClothPoint<'a> {
    cloth: &'a Cloth,
    surface: SurfacePoint,
}

impl<'a> ClothPoint<'a> {
    fn pattern_data(&self) -> PatternData {
        self.cloth.pattern_data(&self.surface)
    }

    fn diffuse(&self, data: &PatternData) -> RgbD {
        self.cloth.reflectance * data.color * (1.0 - self.cloth.params.specular_strength)
    }

    /// Reflected radiance from `wi` to `wo` per unit irradiance, including the cosine of `wo`
    #[must_use]
    pub fn eval(&self, wi: Vec3d, wo: Vec3d) -> RgbD {
        if wi.z <= 0.0 || wo.z <= 0.0 {
            return RgbD::ZERO;
        }
        let params = &self.cloth.params;
        let data = self.pattern_data();

        // the tilted yarn shadows directions that are below it
        let perturbed_wo = data.frame.to_local(wo);
        let diffuse_mask = if wo.z * perturbed_wo.z <= 0.0 { 0.0 } else { 1.0 };

        let intensity_variation = if params.intensity_fineness > 0.0 {
            variation::intensity_variation(data.segment_center, params.intensity_fineness)
        } else {
            1.0
        };

        let specular = params.specular_strength
            * intensity_variation
            * params.specular_normalization
            * specular::specular(params, wi, wo, &data);

        self.diffuse(&data) * diffuse_mask * (perturbed_wo.z * consts::FRAC_1_PI)
            + RgbD::splat(specular * wo.z)
    }

    /// Density of sampling `wo` given `wi`. Only the diffuse component is importance sampled.
    #[must_use]
    pub fn pdf(&self, wi: Vec3d, wo: Vec3d) -> f64 {
        if wi.z <= 0.0 || wo.z <= 0.0 {
            return 0.0;
        }
        let data = self.pattern_data();
        utils::hemispherical_cos_weighted_pdf(data.frame.to_local(wo))
    }

    /// Samples an outgoing direction with a cosine distribution around the unperturbed normal.
    ///
    /// The diffuse weight compensates for the difference between the perturbed and the sampled
    /// cosine. The specular component is added on top without importance sampling.
    /// Returns `None` if `wi` is below the surface.
    #[must_use]
    pub fn sample(&self, wi: Vec3d, rnd: Vec2d) -> Option<ClothSample> {
        if wi.z <= 0.0 {
            return None;
        }
        let params = &self.cloth.params;
        let data = self.pattern_data();
        let perturbed_wi = data.frame.to_local(wi);

        let (wo, pdf) = utils::hemispherical_sample_cos_weighted_uv(rnd.x, rnd.y);
        let perturbed_wo = data.frame.to_local(wo);
        let diffuse_mask = if perturbed_wo.z * wo.z > 0.0 {
            perturbed_wo.z / wo.z
        } else {
            0.0
        };

        let specular = params.specular_strength
            * params.specular_normalization
            * specular::specular(params, perturbed_wi, wo, &data);

        Some(ClothSample {
            wo,
            weight: self.diffuse(&data) * diffuse_mask + RgbD::splat(specular),
            pdf,
            flags: ScatterFlags::SPATIALLY_VARYING_DIFFUSE,
        })
    }
}

/// `omega_o` plays the role of `wi` and `omega_i` the role of `wo`: the known direction points
/// towards the observer and light arrives from the sampled one.
impl<'a> BSDF for ClothPoint<'a> {
    fn sample_incoming(&self, omega_o: Vec3d, rdf: Vec2d) -> SampleIncomingResponse {
        assert!(omega_o.is_normalized());
        match self.sample(omega_o, rdf) {
            Some(sample) => SampleIncomingResponse {
                omega_i: sample.wo,
                bsdf: sample.weight * sample.pdf / sample.wo.z,
                pdf: sample.pdf,
                flags: sample.flags,
            },
            None => SampleIncomingResponse {
                omega_i: Vec3d::Z,
                bsdf: RgbD::ZERO,
                pdf: 0.0,
                flags: ScatterFlags::SPATIALLY_VARYING_DIFFUSE,
            },
        }
    }

    fn evaluate(&self, omega_o: Vec3d, omega_i: Vec3d) -> RgbD {
        assert!(omega_o.is_normalized() && omega_i.is_normalized());
        if omega_i.z <= 0.0 {
            return RgbD::ZERO;
        }
        self.eval(omega_o, omega_i) / omega_i.z
    }

    fn sample_incoming_pdf(&self, omega_o: Vec3d, omega_i: Vec3d) -> f64 {
        assert!(omega_o.is_normalized() && omega_i.is_normalized());
        self.pdf(omega_o, omega_i)
    }

    fn base_color(&self, _omega_o: Vec3d) -> RgbD {
        self.cloth.reflectance * self.pattern_data().color
    }
}
