use crate::dynamics::InteractionDynamics;
use crate::materials::WeaklyCompressibleFluid;
use crate::math::{Real, Vecd};
use crate::particle::FluidParticles;
use crate::relation::Neighbor;

/// Viscous acceleration from the pairwise velocity difference.
///
/// Formula: a_i += 2 mu / rho_i * sum_j { V_j (v_i - v_j) / (r_ij + 0.01 h) * dW_ij }
///
/// `dW_ij <= 0`, so each pair pulls the two velocities together. The result is
/// added to `acceleration_prior`, which must have been reset for the cycle.
pub struct ViscousAcceleration {
    mu: Real,
    smoothing_length: Real,
}

impl ViscousAcceleration {
    pub fn new(material: &WeaklyCompressibleFluid, smoothing_length: Real) -> Self {
        Self {
            mu: material.mu,
            smoothing_length,
        }
    }
}

impl InteractionDynamics for ViscousAcceleration {
    type Output = Vecd;

    fn interact(&self, particles: &FluidParticles, neighbors: &[Neighbor], index: usize, _dt: Real) -> Vecd {
        let vel_i = particles.velocity[index];
        let regularization = 0.01 * self.smoothing_length;

        let mut acceleration = Vecd::ZERO;
        for n in neighbors {
            let j = n.index;
            let vel_derivative = (vel_i - particles.velocity[j]) / (n.r + regularization);
            acceleration += vel_derivative * (2.0 * self.mu * particles.volume(j) * n.dw);
        }
        acceleration / particles.density[index]
    }

    fn apply(&self, particles: &mut FluidParticles, index: usize, acceleration: Vecd, _dt: Real) {
        particles.acceleration_prior[index] += acceleration;
    }
}
