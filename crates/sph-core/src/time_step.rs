use crate::dynamics::{LocalDynamics, ReduceDynamics, ReduceMax};
use crate::materials::{EquationOfState, WeaklyCompressibleFluid};
use crate::math::{Real, Vecd, TINY_REAL};
use crate::particle::FluidParticles;

/// Resets the prior acceleration to the body force at the start of an
/// advection cycle, before viscous forces are accumulated into it.
pub struct TimeStepInitialization {
    body_force: Vecd,
}

impl TimeStepInitialization {
    pub fn new(body_force: Vecd) -> Self {
        Self { body_force }
    }
}

impl Default for TimeStepInitialization {
    fn default() -> Self {
        Self::new(Vecd::ZERO)
    }
}

impl LocalDynamics for TimeStepInitialization {
    type Output = Vecd;

    fn update(&self, _particles: &FluidParticles, _index: usize, _dt: Real) -> Vecd {
        self.body_force
    }

    fn commit(&self, particles: &mut FluidParticles, index: usize, acceleration: Vecd) {
        particles.acceleration_prior[index] = acceleration;
    }
}

/// Advection step `Dt = CFL * h / max(U_ref, max_i |v_i|)`.
pub struct AdvectionTimeStepSize {
    cfl: Real,
    smoothing_length: Real,
    reference_speed_sqr: Real,
}

impl AdvectionTimeStepSize {
    pub fn new(cfl: Real, smoothing_length: Real, characteristic_velocity: Real) -> Self {
        Self {
            cfl,
            smoothing_length,
            reference_speed_sqr: characteristic_velocity * characteristic_velocity,
        }
    }
}

impl ReduceDynamics for AdvectionTimeStepSize {
    type Operation = ReduceMax;
    type Output = Real;

    fn reference(&self) -> Real {
        self.reference_speed_sqr
    }

    fn reduce(&self, particles: &FluidParticles, index: usize) -> Real {
        particles.velocity[index].length_squared()
    }

    fn output(&self, reduced: Real) -> Real {
        self.cfl * self.smoothing_length / (reduced.sqrt() + TINY_REAL)
    }
}

/// Acoustic step `dt = CFL * h / max_i (c_i + |v_i|)`.
///
/// The caller clamps the result to the remaining advection budget.
pub struct AcousticTimeStepSize {
    cfl: Real,
    smoothing_length: Real,
    material: WeaklyCompressibleFluid,
}

impl AcousticTimeStepSize {
    pub fn new(cfl: Real, smoothing_length: Real, material: WeaklyCompressibleFluid) -> Self {
        Self {
            cfl,
            smoothing_length,
            material,
        }
    }
}

impl ReduceDynamics for AcousticTimeStepSize {
    type Operation = ReduceMax;
    type Output = Real;

    fn reference(&self) -> Real {
        0.0
    }

    fn reduce(&self, particles: &FluidParticles, index: usize) -> Real {
        let c = self
            .material
            .sound_speed(particles.pressure[index], particles.density[index]);
        c + particles.velocity[index].length()
    }

    fn output(&self, reduced: Real) -> Real {
        self.cfl * self.smoothing_length / (reduced + TINY_REAL)
    }
}
