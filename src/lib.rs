#![warn(clippy::pedantic)]
#![warn(clippy::perf)]
#![warn(clippy::nursery)]
#![warn(clippy::suboptimal_flops)]
#![deny(clippy::return_self_not_must_use)]
#![allow(clippy::similar_names)]
#![deny(clippy::semicolon_if_nothing_returned)]
#![deny(clippy::must_use_candidate)]
#![deny(clippy::double_must_use)]
#![deny(clippy::use_self)]
#![deny(clippy::unreadable_literal)]
#![deny(clippy::explicit_iter_loop)]
// these are lints to enable later
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]

//! A reflectance model for woven cloth, meant to be plugged into a path tracer.
//!
//! The cloth is described by a periodic weave pattern. Each cell of the pattern tells whether the
//! warp or the weft thread lies on top. Neighbouring cells where the same thread is on top form a
//! yarn segment, and every shading query is mapped to a position on such a segment. The yarn
//! curvature at that position tilts the normal of the diffuse component, and the fibers of the
//! yarn produce the characteristic anisotropic highlights.
//!
//! # Usage
//! Build a [`Cloth`] once from a [`ClothConfig`] and a [`PatternTable`]. Construction validates
//! the parameters and runs a short Monte Carlo calibration of the specular energy. Afterwards the
//! cloth is immutable, so it can be shared between any number of threads.
//!
//! For every shading query bind the cloth to a [`SurfacePoint`] with [`Cloth::at`], then call
//! [`ClothPoint::eval`], [`ClothPoint::pdf`] or [`ClothPoint::sample`]. [`ClothPoint`] also
//! implements [`BSDF`].
//!
//! # Design Decisions
//! Lighting calculations are done exclusively in [f64]s. However, material parameters are
//! stored as [f32]s for a minimal memory footprint.
//!
//! All directions are given in a local space. That means, the surface is assumed to be the
//! xy-plane and the z-vector is assumed to be the normal. Surface tangents are expressed in the same
//! space.
//!
//! [`ClothPoint::eval`] includes the cosine of the outgoing direction, [`BSDF::evaluate`] does
//! not. Only the diffuse component is importance sampled. The specular component is added to the
//! sample weight without being divided by the sampling density.
//!
//! `sample` functions are deterministic. That means you are responsible for generating [f64]s in
//! the range of `0.0..1.0`, passed as a [Vec2d].
//!
//! This crate is built on [glam] for a simple but fast vector math library at the core.
//!
//! # References
//! * Piti Irawan and Steve Marschner. Specular reflection from woven cloth. *ACM Transactions on
//!     Graphics, 31(1):11:1–11:20,* 2012.
//! * Fahad Zafar, Marc Olano and Aaron Curtis. GPU random numbers via the tiny encryption
//!     algorithm. *High Performance Graphics,* 2010.
//! * Milton Abramowitz and Irene Stegun. *Handbook of Mathematical Functions,* 1964.

mod core;

pub use core::{
    Lobe, RgbD, RgbF, SampleIncomingResponse, SampleOutgoingResponse, ScatterFlags, Vec2d, Vec3d,
    BSDF,
};

#[cfg(test)]
pub(crate) mod test_utils;
pub(crate) mod utils;

pub mod calibration;
pub mod cloth;
pub mod error;
pub mod frame;
pub mod pattern;
pub mod specular;
pub mod variation;
pub mod von_mises;
pub mod yarn;

pub use cloth::{Cloth, ClothConfig, ClothPoint, ClothSample};
pub use error::{ClothError, Result};
pub use pattern::{PaletteEntry, PatternTable};
pub use specular::Highlight;
pub use yarn::{PatternData, SurfacePoint, WeaveParameters, YarnKind};
