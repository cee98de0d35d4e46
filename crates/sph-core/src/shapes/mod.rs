//! Regions that seed a fluid body and the generators that fill them.

pub mod generator;
pub mod primitives;

pub use generator::{GeneratedParticles, LatticeGenerator, ParticleGenerator, ReloadGenerator};
pub use primitives::{BoundingBox, Polygon, Shape};
