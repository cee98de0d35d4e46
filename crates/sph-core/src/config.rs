use crate::error::{Result, SphError};
use crate::fluids::riemann::RiemannKind;
use crate::kernel::WendlandC2;
use crate::materials::WeaklyCompressibleFluid;
use crate::math::{Real, Vecd, DIMENSIONS};
use crate::shapes::primitives::BoundingBox;

/// Material parameters of the fluid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FluidParameters {
    pub reference_density: Real,
    pub sound_speed: Real,
    /// Dynamic viscosity
    pub viscosity: Real,
    /// Reference speed for the advection time step
    pub characteristic_velocity: Real,
}

impl Default for FluidParameters {
    fn default() -> Self {
        Self {
            reference_density: 1.0,
            sound_speed: 10.0,
            viscosity: 0.01,
            characteristic_velocity: 1.0,
        }
    }
}

impl FluidParameters {
    pub fn material(&self) -> Result<WeaklyCompressibleFluid> {
        WeaklyCompressibleFluid::new(self.reference_density, self.sound_speed, self.viscosity)
    }
}

/// Numerical parameters of the time integration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverConfig {
    pub particle_spacing: Real,
    /// Smoothing length over particle spacing
    pub smoothing_length_ratio: Real,
    pub cfl_advection: Real,
    pub cfl_acoustic: Real,
    pub transport_velocity_correction: bool,
    pub transport_coefficient: Real,
    pub pressure_riemann: RiemannKind,
    pub density_riemann: RiemannKind,
    pub end_time: Real,
    /// Iterations between progress lines
    pub screen_output_interval: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            particle_spacing: 0.01,
            smoothing_length_ratio: 1.3,
            cfl_advection: 0.25,
            cfl_acoustic: 0.6,
            transport_velocity_correction: true,
            transport_coefficient: 0.2,
            pressure_riemann: RiemannKind::None,
            density_riemann: RiemannKind::Acoustic,
            end_time: 5.0,
            screen_output_interval: 100,
        }
    }
}

impl SolverConfig {
    pub fn smoothing_length(&self) -> Real {
        self.particle_spacing * self.smoothing_length_ratio
    }

    pub fn kernel(&self) -> WendlandC2 {
        WendlandC2::from_spacing(self.particle_spacing, self.smoothing_length_ratio)
    }

    pub fn cutoff_radius(&self) -> Real {
        WendlandC2::KERNEL_SIZE * self.smoothing_length()
    }
}

/// Simulation box and the axes that wrap around.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DomainConfig {
    pub bounds: BoundingBox,
    pub periodic: [bool; DIMENSIONS],
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            bounds: BoundingBox::new(Vecd::ZERO, Vecd::ONE),
            periodic: [true, true],
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimulationConfig {
    pub fluid: FluidParameters,
    pub solver: SolverConfig,
    pub domain: DomainConfig,
}

impl SimulationConfig {
    /// Reject configurations the solver cannot run. Called before any
    /// particle is touched.
    pub fn validate(&self) -> Result<()> {
        self.fluid.material()?;
        let u_ref = self.fluid.characteristic_velocity;
        if !(u_ref > 0.0) || !u_ref.is_finite() {
            return Err(SphError::invalid_config(
                "characteristic_velocity",
                format!("must be positive and finite, got {}", u_ref),
            ));
        }

        let s = &self.solver;
        for (name, value) in [
            ("particle_spacing", s.particle_spacing),
            ("smoothing_length_ratio", s.smoothing_length_ratio),
            ("cfl_advection", s.cfl_advection),
            ("cfl_acoustic", s.cfl_acoustic),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(SphError::invalid_config(
                    name,
                    format!("must be positive and finite, got {}", value),
                ));
            }
        }
        if s.transport_velocity_correction && !(s.transport_coefficient >= 0.0) {
            return Err(SphError::invalid_config(
                "transport_coefficient",
                format!("must be non-negative, got {}", s.transport_coefficient),
            ));
        }

        let bounds = &self.domain.bounds;
        if bounds.is_degenerate() {
            return Err(SphError::invalid_config(
                "domain",
                "bounding box has no interior",
            ));
        }
        let cutoff = s.cutoff_radius();
        for axis in 0..DIMENSIONS {
            if self.domain.periodic[axis] && cutoff > 0.5 * bounds.length(axis) {
                return Err(SphError::invalid_config(
                    "periodic",
                    format!(
                        "cutoff radius {} exceeds half the domain extent {} on axis {}",
                        cutoff,
                        0.5 * bounds.length(axis),
                        axis
                    ),
                ));
            }
        }
        Ok(())
    }
}
