use crate::dynamics::{local_exec, LocalDynamics};
use crate::math::{component, set_component, wrap_periodic, Real, Vecd, DIMENSIONS};
use crate::particle::FluidParticles;
use crate::shapes::primitives::BoundingBox;

/// Wraps positions that crossed the domain edge along one axis back to the
/// opposite side. Velocity and every other field are left untouched.
#[derive(Clone, Copy, Debug)]
pub struct PeriodicBounding {
    axis: usize,
    lower: Real,
    length: Real,
}

impl PeriodicBounding {
    pub fn new(bounds: &BoundingBox, axis: usize) -> Self {
        Self {
            axis,
            lower: component(bounds.lower, axis),
            length: bounds.length(axis),
        }
    }

    pub fn axis(&self) -> usize {
        self.axis
    }
}

impl LocalDynamics for PeriodicBounding {
    type Output = Vecd;

    fn update(&self, particles: &FluidParticles, index: usize, _dt: Real) -> Vecd {
        let mut pos = particles.position[index];
        let x = component(pos, self.axis);
        if x < self.lower || x >= self.lower + self.length {
            set_component(&mut pos, self.axis, wrap_periodic(x, self.lower, self.length));
        }
        pos
    }

    fn commit(&self, particles: &mut FluidParticles, index: usize, position: Vecd) {
        particles.position[index] = position;
    }
}

/// Periodic conditions of a body, one bounding per periodic axis.
///
/// Bounding runs after the relaxation sub-steps of a cycle; the index refresh
/// is the rebuild of the body's cell-linked list, which wraps cell lookups on
/// the same axes.
#[derive(Clone, Debug, Default)]
pub struct PeriodicConditions {
    bounding: Vec<PeriodicBounding>,
}

impl PeriodicConditions {
    pub fn new(bounds: &BoundingBox, periodic: [bool; DIMENSIONS]) -> Self {
        let bounding = (0..DIMENSIONS)
            .filter(|axis| periodic[*axis])
            .map(|axis| PeriodicBounding::new(bounds, axis))
            .collect();
        Self { bounding }
    }

    pub fn bounding(&self, particles: &mut FluidParticles) {
        for axis in &self.bounding {
            local_exec(axis, particles, 0.0);
        }
    }

    pub fn axes(&self) -> impl Iterator<Item = usize> + '_ {
        self.bounding.iter().map(|b| b.axis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_wraps_both_edges_and_keeps_velocity() {
        let bounds = BoundingBox::new(Vecd::ZERO, Vecd::new(2.0, 1.0));
        let conditions = PeriodicConditions::new(&bounds, [true, false]);
        let mut particles = FluidParticles::new(
            vec![Vecd::new(-0.25, 0.5), Vecd::new(2.25, 0.5), Vecd::new(1.0, 1.5)],
            vec![1.0; 3],
            1.0,
        );
        particles.velocity[0] = Vecd::new(-3.0, 1.0);
        conditions.bounding(&mut particles);

        assert!((particles.position[0].x - 1.75).abs() < 1e-12);
        assert!((particles.position[1].x - 0.25).abs() < 1e-12);
        // y is not periodic: left alone
        assert_eq!(particles.position[2], Vecd::new(1.0, 1.5));
        assert_eq!(particles.velocity[0], Vecd::new(-3.0, 1.0));
        assert_eq!(conditions.axes().collect::<Vec<_>>(), vec![0]);
    }
}
