//! Split pressure/density relaxation for one acoustic sub-step.
//!
//! Within a sub-step the pressure phase always runs first:
//!
//! 1. pressure relaxation: half-step density from the last density rate,
//!    pressure from the equation of state, velocity from the pressure
//!    gradient, then position with the updated velocity over `dt`;
//! 2. density relaxation: density rate from the interface velocity of each
//!    pair, second half-step of density.

use crate::dynamics::{interaction_exec, local_exec, InteractionDynamics, LocalDynamics};
use crate::fluids::riemann::{FluidState, RiemannKind, RiemannSolver};
use crate::materials::{EquationOfState, WeaklyCompressibleFluid};
use crate::math::{Real, Vecd};
use crate::particle::FluidParticles;
use crate::relation::{InnerRelation, Neighbor};

#[inline]
fn state_of(particles: &FluidParticles, index: usize) -> FluidState {
    FluidState::new(
        particles.density[index],
        particles.velocity[index],
        particles.pressure[index],
    )
}

pub struct PressureRelaxation {
    material: WeaklyCompressibleFluid,
    riemann: RiemannSolver,
}

impl PressureRelaxation {
    pub fn new(material: WeaklyCompressibleFluid, riemann: RiemannKind) -> Self {
        Self {
            material,
            riemann: RiemannSolver::new(riemann, material),
        }
    }

    pub fn exec(&self, particles: &mut FluidParticles, relation: &InnerRelation, dt: Real) {
        local_exec(self, particles, dt);
        interaction_exec(self, particles, relation, dt);
    }
}

impl LocalDynamics for PressureRelaxation {
    /// Half-step density and its pressure
    type Output = (Real, Real);

    fn update(&self, particles: &FluidParticles, index: usize, dt: Real) -> (Real, Real) {
        let rho = particles.density[index] + particles.density_rate[index] * dt * 0.5;
        (rho, self.material.pressure(rho))
    }

    fn commit(&self, particles: &mut FluidParticles, index: usize, (rho, p): (Real, Real)) {
        particles.density[index] = rho;
        particles.pressure[index] = p;
    }
}

impl InteractionDynamics for PressureRelaxation {
    type Output = Vecd;

    fn interact(&self, particles: &FluidParticles, neighbors: &[Neighbor], index: usize, _dt: Real) -> Vecd {
        let state_i = state_of(particles, index);
        let mut acceleration = Vecd::ZERO;
        for n in neighbors {
            let state_j = state_of(particles, n.index);
            let p_star = self.riemann.p_star(&state_i, &state_j, n.e_ij);
            acceleration -= n.grad_w() * (2.0 * p_star * particles.volume(n.index));
        }
        particles.acceleration_prior[index] + acceleration / state_i.rho
    }

    fn apply(&self, particles: &mut FluidParticles, index: usize, acceleration: Vecd, dt: Real) {
        particles.acceleration[index] = acceleration;
        particles.velocity[index] += acceleration * dt;
        particles.position[index] += particles.velocity[index] * dt;
    }
}

pub struct DensityRelaxation {
    riemann: RiemannSolver,
}

impl DensityRelaxation {
    pub fn new(material: WeaklyCompressibleFluid, riemann: RiemannKind) -> Self {
        Self {
            riemann: RiemannSolver::new(riemann, material),
        }
    }

    pub fn exec(&self, particles: &mut FluidParticles, relation: &InnerRelation, dt: Real) {
        interaction_exec(self, particles, relation, dt);
    }
}

impl InteractionDynamics for DensityRelaxation {
    type Output = Real;

    fn interact(&self, particles: &FluidParticles, neighbors: &[Neighbor], index: usize, _dt: Real) -> Real {
        let state_i = state_of(particles, index);
        let mut density_change_rate = 0.0;
        for n in neighbors {
            let state_j = state_of(particles, n.index);
            let vel_star = self.riemann.v_star(&state_i, &state_j, n.e_ij);
            density_change_rate +=
                2.0 * state_i.rho * particles.volume(n.index) * (state_i.vel - vel_star).dot(n.e_ij) * n.dw;
        }
        density_change_rate
    }

    fn apply(&self, particles: &mut FluidParticles, index: usize, density_rate: Real, dt: Real) {
        particles.density_rate[index] = density_rate;
        particles.density[index] += density_rate * dt * 0.5;
    }
}
