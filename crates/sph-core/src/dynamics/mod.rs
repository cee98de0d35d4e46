//! Interaction capabilities shared by every numerical method of a body.
//!
//! Methods are plain structs chosen when the solver is assembled. Each one
//! implements one of three traits and is run by the matching executor:
//!
//! - [`LocalDynamics`]: per-particle update that reads the owning particle,
//!   computed for every particle before any of them is written.
//! - [`InteractionDynamics`]: per-particle sum over neighbors. `interact`
//!   reads the pre-stage state of the whole body, `apply` writes the owning
//!   particle once every `interact` has finished.
//! - [`ReduceDynamics`]: per-particle value merged into one scalar.

pub mod exec;

use crate::math::Real;
use crate::particle::FluidParticles;
use crate::relation::{InnerRelation, Neighbor};

use exec::{particle_map, particle_reduce};

pub trait LocalDynamics: Sync {
    type Output: Send;

    fn update(&self, particles: &FluidParticles, index: usize, dt: Real) -> Self::Output;

    fn commit(&self, particles: &mut FluidParticles, index: usize, output: Self::Output);
}

pub trait InteractionDynamics: Sync {
    type Output: Send;

    fn interact(
        &self,
        particles: &FluidParticles,
        neighbors: &[Neighbor],
        index: usize,
        dt: Real,
    ) -> Self::Output;

    fn apply(&self, particles: &mut FluidParticles, index: usize, output: Self::Output, dt: Real);
}

/// Associative merge used by [`ReduceDynamics`].
pub trait ReduceOperation {
    type Value: Copy + Send + Sync;
    fn merge(a: Self::Value, b: Self::Value) -> Self::Value;
}

pub struct ReduceMax;

impl ReduceOperation for ReduceMax {
    type Value = Real;

    #[inline]
    fn merge(a: Real, b: Real) -> Real {
        a.max(b)
    }
}

pub struct ReduceSum;

impl ReduceOperation for ReduceSum {
    type Value = Real;

    #[inline]
    fn merge(a: Real, b: Real) -> Real {
        a + b
    }
}

pub trait ReduceDynamics: Sync {
    type Operation: ReduceOperation;
    type Output;

    /// Starting value of the reduction, neutral for the merge.
    fn reference(&self) -> <Self::Operation as ReduceOperation>::Value;

    fn reduce(
        &self,
        particles: &FluidParticles,
        index: usize,
    ) -> <Self::Operation as ReduceOperation>::Value;

    fn output(&self, reduced: <Self::Operation as ReduceOperation>::Value) -> Self::Output;
}

pub fn local_exec<D: LocalDynamics>(dynamics: &D, particles: &mut FluidParticles, dt: Real) {
    let outputs = {
        let snapshot: &FluidParticles = particles;
        particle_map(snapshot.len(), |i| dynamics.update(snapshot, i, dt))
    };
    for (i, output) in outputs.into_iter().enumerate() {
        dynamics.commit(particles, i, output);
    }
}

pub fn interaction_exec<D: InteractionDynamics>(
    dynamics: &D,
    particles: &mut FluidParticles,
    relation: &InnerRelation,
    dt: Real,
) {
    let outputs = {
        let snapshot: &FluidParticles = particles;
        particle_map(snapshot.len(), |i| {
            dynamics.interact(snapshot, relation.neighbors_of(i), i, dt)
        })
    };
    for (i, output) in outputs.into_iter().enumerate() {
        dynamics.apply(particles, i, output, dt);
    }
}

pub fn reduce_exec<D: ReduceDynamics>(dynamics: &D, particles: &FluidParticles) -> D::Output {
    let reduced = particle_reduce(
        particles.len(),
        dynamics.reference(),
        |i| dynamics.reduce(particles, i),
        <D::Operation as ReduceOperation>::merge,
    );
    dynamics.output(reduced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vecd;

    /// Copies the density of the next particle, so the result depends on
    /// whether neighbors were already written.
    struct ShiftDensity;

    impl LocalDynamics for ShiftDensity {
        type Output = Real;

        fn update(&self, particles: &FluidParticles, index: usize, _dt: Real) -> Real {
            particles.density[(index + 1) % particles.len()]
        }

        fn commit(&self, particles: &mut FluidParticles, index: usize, density: Real) {
            particles.density[index] = density;
        }
    }

    #[test]
    fn test_local_updates_read_pre_stage_state() {
        let mut particles = FluidParticles::new(vec![Vecd::ZERO; 4], vec![1.0; 4], 1.0);
        particles.density = vec![1.0, 2.0, 3.0, 4.0];
        local_exec(&ShiftDensity, &mut particles, 0.0);
        assert_eq!(particles.density, vec![2.0, 3.0, 4.0, 1.0]);
    }
}
