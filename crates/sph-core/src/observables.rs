//! Body-wide quantities recorded while the simulation runs.

use crate::dynamics::{ReduceDynamics, ReduceMax, ReduceSum};
use crate::math::Real;
use crate::particle::FluidParticles;

/// Kinetic energy `sum_i m_i |v_i|^2 / 2` (no body force potential).
pub struct TotalMechanicalEnergy;

impl ReduceDynamics for TotalMechanicalEnergy {
    type Operation = ReduceSum;
    type Output = Real;

    fn reference(&self) -> Real {
        0.0
    }

    fn reduce(&self, particles: &FluidParticles, index: usize) -> Real {
        0.5 * particles.mass()[index] * particles.velocity[index].length_squared()
    }

    fn output(&self, reduced: Real) -> Real {
        reduced
    }
}

pub struct MaximumSpeed;

impl ReduceDynamics for MaximumSpeed {
    type Operation = ReduceMax;
    type Output = Real;

    fn reference(&self) -> Real {
        0.0
    }

    fn reduce(&self, particles: &FluidParticles, index: usize) -> Real {
        particles.velocity[index].length()
    }

    fn output(&self, reduced: Real) -> Real {
        reduced
    }
}

pub struct TotalMass;

impl ReduceDynamics for TotalMass {
    type Operation = ReduceSum;
    type Output = Real;

    fn reference(&self) -> Real {
        0.0
    }

    fn reduce(&self, particles: &FluidParticles, index: usize) -> Real {
        particles.mass()[index]
    }

    fn output(&self, reduced: Real) -> Real {
        reduced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamics::reduce_exec;
    use crate::math::Vecd;

    #[test]
    fn test_energy_and_speed() {
        let mut particles = FluidParticles::new(vec![Vecd::ZERO; 2], vec![2.0, 4.0], 1.0);
        particles.velocity = vec![Vecd::new(3.0, 4.0), Vecd::new(0.0, 1.0)];
        assert!((reduce_exec(&TotalMechanicalEnergy, &particles) - 27.0).abs() < 1e-12);
        assert!((reduce_exec(&MaximumSpeed, &particles) - 5.0).abs() < 1e-12);
        assert!((reduce_exec(&TotalMass, &particles) - 6.0).abs() < 1e-12);
    }
}
