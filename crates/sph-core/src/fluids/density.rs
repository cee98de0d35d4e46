use crate::dynamics::InteractionDynamics;
use crate::kernel::Kernel;
use crate::math::Real;
use crate::particle::FluidParticles;
use crate::relation::Neighbor;

/// Density by kernel summation, `rho_i = m_i W(0) + sum_j m_j W_ij`.
///
/// An isolated particle keeps its self-contribution only.
pub struct DensitySummation {
    w0: Real,
}

impl DensitySummation {
    pub fn new<K: Kernel + ?Sized>(kernel: &K) -> Self {
        Self { w0: kernel.w0() }
    }
}

impl InteractionDynamics for DensitySummation {
    type Output = Real;

    fn interact(&self, particles: &FluidParticles, neighbors: &[Neighbor], index: usize, _dt: Real) -> Real {
        let mass = particles.mass();
        let sigma: Real = neighbors.iter().map(|n| mass[n.index] * n.w).sum();
        mass[index] * self.w0 + sigma
    }

    fn apply(&self, particles: &mut FluidParticles, index: usize, density: Real, _dt: Real) {
        particles.density[index] = density;
    }
}
