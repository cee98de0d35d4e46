use crate::math::{Real, Vecd};

/// SoA storage for the particles of one fluid body.
///
/// Particle identity is the index into these arrays; it is stable for the
/// whole run since particles are never created or destroyed mid-run. Outside
/// the crate the fields are reachable only as fixed-length slices.
#[derive(Clone, Debug)]
pub struct FluidParticles {
    count: usize,
    pub(crate) position: Vec<Vecd>,
    pub(crate) velocity: Vec<Vecd>,
    /// Total acceleration of the current acoustic sub-step
    pub(crate) acceleration: Vec<Vecd>,
    /// Acceleration from viscous and body forces, fixed over an advection cycle
    pub(crate) acceleration_prior: Vec<Vecd>,
    pub(crate) density: Vec<Real>,
    pub(crate) pressure: Vec<Real>,
    /// Rate of change of density from the last density relaxation
    pub(crate) density_rate: Vec<Real>,
    /// Mass is set once from the generator and never written afterwards
    mass: Vec<Real>,
}

impl FluidParticles {
    /// Particles at `positions` carrying `mass`, at rest with density `rho0`.
    pub fn new(positions: Vec<Vecd>, mass: Vec<Real>, rho0: Real) -> Self {
        debug_assert_eq!(positions.len(), mass.len());
        let count = positions.len();
        Self {
            count,
            position: positions,
            velocity: vec![Vecd::ZERO; count],
            acceleration: vec![Vecd::ZERO; count],
            acceleration_prior: vec![Vecd::ZERO; count],
            density: vec![rho0; count],
            pressure: vec![0.0; count],
            density_rate: vec![0.0; count],
            mass,
        }
    }

    pub fn position(&self) -> &[Vecd] {
        &self.position
    }

    pub fn position_mut(&mut self) -> &mut [Vecd] {
        &mut self.position
    }

    pub fn velocity(&self) -> &[Vecd] {
        &self.velocity
    }

    pub fn velocity_mut(&mut self) -> &mut [Vecd] {
        &mut self.velocity
    }

    pub fn density(&self) -> &[Real] {
        &self.density
    }

    pub fn density_mut(&mut self) -> &mut [Real] {
        &mut self.density
    }

    pub fn pressure(&self) -> &[Real] {
        &self.pressure
    }

    pub fn pressure_mut(&mut self) -> &mut [Real] {
        &mut self.pressure
    }

    pub fn acceleration(&self) -> &[Vecd] {
        &self.acceleration
    }

    pub fn acceleration_prior(&self) -> &[Vecd] {
        &self.acceleration_prior
    }

    pub fn density_rate(&self) -> &[Real] {
        &self.density_rate
    }

    pub fn mass(&self) -> &[Real] {
        &self.mass
    }

    /// Replace the mass array when restoring a saved state.
    pub(crate) fn reinitialize_mass(&mut self, mass: Vec<Real>) {
        debug_assert_eq!(mass.len(), self.count);
        self.mass = mass;
    }

    pub fn total_mass(&self) -> Real {
        self.mass.iter().sum()
    }

    /// Current particle volume `m / rho`.
    #[inline]
    pub fn volume(&self, index: usize) -> Real {
        self.mass[index] / self.density[index]
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
