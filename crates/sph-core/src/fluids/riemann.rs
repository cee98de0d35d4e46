use crate::materials::{EquationOfState, WeaklyCompressibleFluid};
use crate::math::{Real, Vecd};

/// Which interface solver couples a particle pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RiemannKind {
    /// Density-weighted averages, no dissipation.
    #[default]
    None,
    /// Linearised acoustic solver with impedance `rho * c`.
    Acoustic,
}

/// State on one side of a particle-pair interface.
#[derive(Clone, Copy, Debug)]
pub struct FluidState {
    pub rho: Real,
    pub vel: Vecd,
    pub p: Real,
}

impl FluidState {
    pub fn new(rho: Real, vel: Vecd, p: Real) -> Self {
        Self { rho, vel, p }
    }
}

/// Interface pressure `p*` and velocity `v*` between particles `i` and `j`,
/// with `e_ij` the unit vector from `j` to `i`.
#[derive(Clone, Copy, Debug)]
pub struct RiemannSolver {
    kind: RiemannKind,
    material: WeaklyCompressibleFluid,
}

impl RiemannSolver {
    pub fn new(kind: RiemannKind, material: WeaklyCompressibleFluid) -> Self {
        Self { kind, material }
    }

    pub fn kind(&self) -> RiemannKind {
        self.kind
    }

    pub fn p_star(&self, i: &FluidState, j: &FluidState, e_ij: Vecd) -> Real {
        match self.kind {
            RiemannKind::None => (i.p * j.rho + j.p * i.rho) / (i.rho + j.rho),
            RiemannKind::Acoustic => {
                let (z_i, z_j) = self.impedances(i, j);
                let ul = -e_ij.dot(i.vel);
                let ur = -e_ij.dot(j.vel);
                (i.p * z_j + j.p * z_i + z_i * z_j * (ul - ur)) / (z_i + z_j)
            }
        }
    }

    pub fn v_star(&self, i: &FluidState, j: &FluidState, e_ij: Vecd) -> Vecd {
        match self.kind {
            RiemannKind::None => (i.vel * i.rho + j.vel * j.rho) / (i.rho + j.rho),
            RiemannKind::Acoustic => {
                let (z_i, z_j) = self.impedances(i, j);
                let ul = -e_ij.dot(i.vel);
                let ur = -e_ij.dot(j.vel);
                let u_star = (ul * z_i + ur * z_j + i.p - j.p) / (z_i + z_j);
                let average = (i.vel * z_i + j.vel * z_j) / (z_i + z_j);
                // Swap the interface-normal component for the solved one
                average - e_ij * (u_star + e_ij.dot(average))
            }
        }
    }

    #[inline]
    fn impedances(&self, i: &FluidState, j: &FluidState) -> (Real, Real) {
        (
            i.rho * self.material.sound_speed(i.p, i.rho),
            j.rho * self.material.sound_speed(j.p, j.rho),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water() -> WeaklyCompressibleFluid {
        WeaklyCompressibleFluid::new(1.0, 10.0, 0.01).unwrap()
    }

    #[test]
    fn test_identical_states_are_preserved() {
        let state = FluidState::new(1.0, Vecd::new(0.3, -0.2), 4.0);
        let e = Vecd::X;
        for kind in [RiemannKind::None, RiemannKind::Acoustic] {
            let solver = RiemannSolver::new(kind, water());
            assert!((solver.p_star(&state, &state, e) - 4.0).abs() < 1e-12);
            assert!((solver.v_star(&state, &state, e) - state.vel).length() < 1e-12);
        }
    }

    #[test]
    fn test_acoustic_compression_raises_interface_pressure() {
        let solver = RiemannSolver::new(RiemannKind::Acoustic, water());
        // j sits at +x of i; e_ij points from j to i, i.e. -x
        let e_ij = -Vecd::X;
        let i = FluidState::new(1.0, Vecd::new(1.0, 0.0), 0.0);
        let j = FluidState::new(1.0, Vecd::new(-1.0, 0.0), 0.0);
        assert!(solver.p_star(&i, &j, e_ij) > 0.0);
        let none = RiemannSolver::new(RiemannKind::None, water());
        assert_eq!(none.p_star(&i, &j, e_ij), 0.0);
    }

    #[test]
    fn test_acoustic_tangential_velocity_is_averaged() {
        let solver = RiemannSolver::new(RiemannKind::Acoustic, water());
        let e_ij = Vecd::X;
        let i = FluidState::new(1.0, Vecd::new(0.0, 1.0), 0.0);
        let j = FluidState::new(1.0, Vecd::new(0.0, 3.0), 0.0);
        let v = solver.v_star(&i, &j, e_ij);
        assert!((v.y - 2.0).abs() < 1e-12);
        assert!(v.x.abs() < 1e-12);
    }
}
