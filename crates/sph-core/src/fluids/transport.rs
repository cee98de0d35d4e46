use crate::dynamics::InteractionDynamics;
use crate::math::{Real, Vecd};
use crate::particle::FluidParticles;
use crate::relation::Neighbor;

/// Transport-velocity correction.
///
/// Particles are advected with a velocity slightly different from the
/// momentum-carrying one. Over an advection cycle this amounts to a position
/// shift `dx_i = -2 C h^2 sum_j V_j grad_i W_ij`, which moves particles away
/// from clusters toward voids. It does not touch velocity or pressure, so it
/// adds no kinetic energy. On a uniform lattice the sum vanishes.
pub struct TransportVelocityCorrection {
    coefficient: Real,
    smoothing_length_sqr: Real,
}

impl TransportVelocityCorrection {
    pub fn new(coefficient: Real, smoothing_length: Real) -> Self {
        Self {
            coefficient,
            smoothing_length_sqr: smoothing_length * smoothing_length,
        }
    }
}

impl InteractionDynamics for TransportVelocityCorrection {
    type Output = Vecd;

    fn interact(&self, particles: &FluidParticles, neighbors: &[Neighbor], _index: usize, _dt: Real) -> Vecd {
        let mut acceleration_trans = Vecd::ZERO;
        for n in neighbors {
            acceleration_trans -= n.grad_w() * (2.0 * particles.volume(n.index));
        }
        acceleration_trans * (self.coefficient * self.smoothing_length_sqr)
    }

    fn apply(&self, particles: &mut FluidParticles, index: usize, shift: Vecd, _dt: Real) {
        particles.position[index] += shift;
    }
}
