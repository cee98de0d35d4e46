//! Error types for the SPH core.
//!
//! Every failure in this crate is a configuration or logic defect; nothing is
//! retried. Callers get one of the variants below and decide whether to abort.

use std::fmt;

use crate::math::{Real, Vecd};

/// Errors raised while configuring or advancing a simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum SphError {
    /// A parameter was rejected before the simulation started.
    InvalidConfig {
        parameter: &'static str,
        reason: String,
    },
    /// A particle left the bounding box along an axis without a periodic rule.
    ParticleOutOfDomain { particle: usize, position: Vecd },
    /// The cell-linked list did not place every particle after a rebuild.
    IndexInconsistency { expected: usize, placed: usize },
    /// A neighbor relation was used after the spatial index moved on.
    StaleRelation { relation: u64, index: u64 },
    /// Density or pressure became non-physical after a relaxation sub-step.
    NumericalInstability {
        particle: usize,
        iteration: usize,
        quantity: &'static str,
        value: Real,
    },
    /// A particle hook replaced the particle set with one of another size.
    ParticleCountChanged { expected: usize, found: usize },
    /// A restart buffer could not be decoded.
    RestartDecode(String),
}

impl SphError {
    pub(crate) fn invalid_config(parameter: &'static str, reason: impl Into<String>) -> Self {
        SphError::InvalidConfig {
            parameter,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SphError::InvalidConfig { parameter, reason } => {
                write!(f, "Invalid configuration for `{}`: {}", parameter, reason)
            }
            SphError::ParticleOutOfDomain { particle, position } => write!(
                f,
                "Particle {} at ({}, {}) left the domain along a non-periodic axis",
                particle, position.x, position.y
            ),
            SphError::IndexInconsistency { expected, placed } => write!(
                f,
                "Cell-linked list placed {} of {} particles after rebuild",
                placed, expected
            ),
            SphError::StaleRelation { relation, index } => write!(
                f,
                "Neighbor relation generation {} does not match spatial index generation {}",
                relation, index
            ),
            SphError::NumericalInstability {
                particle,
                iteration,
                quantity,
                value,
            } => write!(
                f,
                "Numerical instability at iteration {}: particle {} has {} = {}",
                iteration, particle, quantity, value
            ),
            SphError::ParticleCountChanged { expected, found } => write!(
                f,
                "Particle hook changed the particle count from {} to {}",
                expected, found
            ),
            SphError::RestartDecode(msg) => write!(f, "Failed to decode restart state: {}", msg),
        }
    }
}

impl std::error::Error for SphError {}

pub type Result<T> = std::result::Result<T, SphError>;
