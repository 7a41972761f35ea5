/// used for colors
pub type RgbD = glam::f64::DVec3;
/// used for colors
pub type RgbF = glam::f32::Vec3;

/// used for direction vectors
pub type Vec3d = glam::f64::DVec3;
/// used for direction vectors and surface coordinates
pub type Vec2d = glam::f64::DVec2;

/// The kind of lobe a sample was drawn from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lobe {
    /// Light is scattered diffusely to the same side of the surface
    DiffuseReflection,
}

/// Describes where a sampled direction came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScatterFlags {
    /// The lobe that generated the direction
    pub lobe: Lobe,

    /// Whether the value of the lobe changes across the surface
    pub spatially_varying: bool,
}

impl ScatterFlags {
    /// A diffuse reflection lobe that is modulated by surface position
    pub const SPATIALLY_VARYING_DIFFUSE: Self = Self {
        lobe: Lobe::DiffuseReflection,
        spatially_varying: true,
    };
}

/// Contains the Data that is returned by [`BSDF::sample_incoming`]
pub struct SampleIncomingResponse {
    /// # Incoming Direction
    ///The direction where light could be arriving at the surface
    pub omega_i: Vec3d,

    /// The value at for the BSDF. Indicates how much light is scattered from the incoming
    /// direction to the outgoing direction
    pub bsdf: RgbD,

    /// The probability distribution for choosing `omega_i` given `omega_o`
    pub pdf: f64,

    /// The lobe that was sampled
    pub flags: ScatterFlags,
}

/// Contains the Data that is returned by [`BSDF::sample_outgoing`]
pub struct SampleOutgoingResponse {
    /// The direction to which light is scattered to
    pub omega_o: Vec3d,

    /// The value at for the BSDF. Indicates how much light is scattered from the incoming
    /// direction to the outgoing direction
    pub bsdf: RgbD,

    /// The probability distribution for choosing `omega_o` given `omega_i`
    pub pdf: f64,

    /// The lobe that was sampled
    pub flags: ScatterFlags,
}

/// Bidirectional Scattering Distribution Functions. A trait that describes the surface properties
/// of a material if you will.
///
/// This trait contains functions to importance sample and evaluate a specific BSDF
pub trait BSDF {
    /// Given a direction where light is scattered to, samples an incident direction, from which the light
    /// may come from
    ///
    /// # Arguments
    /// * `omega_o` - The direction where light is scattered to. Outgoing direction
    /// * `rdf` - A random distribution for sampling
    ///
    /// # Return
    /// See [`SampleIncomingResponse`]
    fn sample_incoming(&self, omega_o: Vec3d, rdf: Vec2d) -> SampleIncomingResponse;

    /// Given an incident light direction, samples a direction where light is scattered to
    ///
    /// # Arguments
    /// * `omega_i` - A direction where light is coming from
    /// * `rdf` - A random distribution for sampling
    /// # Return
    /// See [`SampleOutgoingResponse`]
    fn sample_outgoing(&self, omega_i: Vec3d, rdf: Vec2d) -> SampleOutgoingResponse {
        assert!(omega_i.is_normalized());
        let response = self.sample_incoming(omega_i, rdf);
        SampleOutgoingResponse {
            omega_o: response.omega_i,
            bsdf: response.bsdf,
            pdf: response.pdf,
            flags: response.flags,
        }
    }

    /// Returns the value of the BSDF at the given directions
    ///
    /// # Arguments
    /// * `omega_o` - Exitant light direction
    /// * `omega_i` - Incident light direction
    fn evaluate(&self, omega_o: Vec3d, omega_i: Vec3d) -> RgbD;

    /// Returns the probability density sampling an incoming direction given an outgoing direction
    /// See [`BSDF::sample_incoming`] and [`SampleIncomingResponse`]
    fn sample_incoming_pdf(&self, omega_o: Vec3d, omega_i: Vec3d) -> f64;

    /// Returns the probability density sampling an outgoing direction given an incoming direction
    /// See [`BSDF::sample_outgoing`] and [`SampleOutgoingResponse`]
    fn sample_outgoing_pdf(&self, omega_o: Vec3d, omega_i: Vec3d) -> f64 {
        assert!(omega_o.is_normalized());
        assert!(omega_i.is_normalized());
        self.sample_incoming_pdf(omega_i, omega_o)
    }

    /// Returns the base color of the surface.
    /// This function is used to generate auxiliary images for AI tools such as Open Image Denoise
    fn base_color(&self, omega_o: Vec3d) -> RgbD;
}
