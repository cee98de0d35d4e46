use log::{debug, error, info};

use crate::body::{run_hook, FluidBody, ParticleHook};
use crate::config::SimulationConfig;
use crate::dynamics::exec::particle_find_first;
use crate::dynamics::{interaction_exec, local_exec, reduce_exec};
use crate::error::{Result, SphError};
use crate::fluids::{
    DensityRelaxation, DensitySummation, PressureRelaxation, TransportVelocityCorrection,
    ViscousAcceleration,
};
use crate::math::Real;
use crate::observables::{MaximumSpeed, TotalMass, TotalMechanicalEnergy};
use crate::particle::FluidParticles;
use crate::periodic::PeriodicConditions;
use crate::shapes::generator::{GeneratedParticles, ParticleGenerator};
use crate::state::{BodySnapshot, RestartState};
use crate::time_step::{AcousticTimeStepSize, AdvectionTimeStepSize, TimeStepInitialization};

/// Relative slack under which the last acoustic sub-step absorbs the rest of
/// the advection budget.
const BUDGET_TOLERANCE: Real = 1.0e-12;

/// Physical time and completed advection cycles of one simulation instance.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimulationContext {
    pub physical_time: Real,
    pub iteration: usize,
}

/// Step sizes used by one advection cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct CycleReport {
    pub iteration: usize,
    pub advection_dt: Real,
    pub acoustic_dts: Vec<Real>,
}

impl CycleReport {
    pub fn relaxation_time(&self) -> Real {
        self.acoustic_dts.iter().sum()
    }
}

/// Weakly-compressible SPH solver for a single fluid body.
///
/// One call to [`FluidSolver::advance_cycle`] runs the fixed pipeline:
/// time-step initialization, advection step, density summation, viscous
/// acceleration, transport-velocity correction, then acoustic sub-steps of
/// pressure and density relaxation until the advection step is consumed.
/// Boundary conditions, periodic bounding and the rebuild of the spatial
/// index and neighbor relation close the cycle.
pub struct FluidSolver {
    config: SimulationConfig,
    body: FluidBody,
    context: SimulationContext,
    periodic: PeriodicConditions,
    boundary_conditions: Vec<Box<dyn ParticleHook>>,

    initialization: TimeStepInitialization,
    density_summation: DensitySummation,
    viscous_acceleration: ViscousAcceleration,
    transport_correction: Option<TransportVelocityCorrection>,
    pressure_relaxation: PressureRelaxation,
    density_relaxation: DensityRelaxation,
    advection_step: AdvectionTimeStepSize,
    acoustic_step: AcousticTimeStepSize,
}

impl FluidSolver {
    pub fn new(config: SimulationConfig, generated: GeneratedParticles) -> Result<Self> {
        config.validate()?;
        if generated.is_empty() {
            return Err(SphError::invalid_config("particles", "generator produced no particles"));
        }

        let material = config.fluid.material()?;
        let kernel = config.solver.kernel();
        let h = config.solver.smoothing_length();
        let solver_config = &config.solver;

        let mut body = FluidBody::new("WaterBody", generated, material, Box::new(kernel), &config.domain)?;
        body.update_cell_linked_list()?;
        body.update_configuration()?;

        info!(
            "{}: {} particles, dp = {}, h = {}, c0 = {}, mu = {}",
            body.name(),
            body.particles.len(),
            solver_config.particle_spacing,
            h,
            material.c0,
            material.mu
        );
        let dims = body.cell_linked_list().dims();
        info!("cell-linked list: {}x{} cells, periodic {:?}", dims[0], dims[1], config.domain.periodic);

        let transport_correction = solver_config
            .transport_velocity_correction
            .then(|| TransportVelocityCorrection::new(solver_config.transport_coefficient, h));

        Ok(Self {
            periodic: PeriodicConditions::new(&config.domain.bounds, config.domain.periodic),
            boundary_conditions: Vec::new(),
            initialization: TimeStepInitialization::default(),
            density_summation: DensitySummation::new(&kernel),
            viscous_acceleration: ViscousAcceleration::new(&material, h),
            transport_correction,
            pressure_relaxation: PressureRelaxation::new(material, solver_config.pressure_riemann),
            density_relaxation: DensityRelaxation::new(material, solver_config.density_riemann),
            advection_step: AdvectionTimeStepSize::new(
                solver_config.cfl_advection,
                h,
                config.fluid.characteristic_velocity,
            ),
            acoustic_step: AcousticTimeStepSize::new(solver_config.cfl_acoustic, h, material),
            context: SimulationContext::default(),
            body,
            config,
        })
    }

    pub fn with_generator<G: ParticleGenerator + ?Sized>(
        config: SimulationConfig,
        generator: &G,
    ) -> Result<Self> {
        let generated = generator.generate()?;
        Self::new(config, generated)
    }

    /// Run `hook` once over every particle with `dt = 0`. The spatial index and
    /// relation are rebuilt afterwards in case the hook moved particles.
    pub fn apply_initial_condition<H: ParticleHook>(&mut self, mut hook: H) -> Result<()> {
        self.body.apply_hook(&mut hook, 0.0)?;
        self.update_configuration()
    }

    /// Register a hook run over every particle at the end of each advection
    /// cycle, before periodic bounding, with the cycle's advection step.
    pub fn add_boundary_condition<H: ParticleHook + 'static>(&mut self, hook: H) {
        self.boundary_conditions.push(Box::new(hook));
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn context(&self) -> SimulationContext {
        self.context
    }

    pub fn body(&self) -> &FluidBody {
        &self.body
    }

    pub fn particles(&self) -> &FluidParticles {
        &self.body.particles
    }

    /// Advance by one advection cycle.
    pub fn advance_cycle(&mut self) -> Result<CycleReport> {
        let (particles, relation) = self.body.particles_and_relation()?;

        local_exec(&self.initialization, particles, 0.0);
        let advection_dt = reduce_exec(&self.advection_step, particles);
        interaction_exec(&self.density_summation, particles, relation, advection_dt);
        interaction_exec(&self.viscous_acceleration, particles, relation, advection_dt);
        if let Some(transport) = &self.transport_correction {
            interaction_exec(transport, particles, relation, advection_dt);
        }

        let mut acoustic_dts = Vec::new();
        let mut relaxation_time = 0.0;
        loop {
            let remaining = advection_dt - relaxation_time;
            let mut dt = reduce_exec(&self.acoustic_step, particles).min(remaining);
            let last = remaining - dt <= advection_dt * BUDGET_TOLERANCE;
            if last {
                dt = remaining;
            }

            self.pressure_relaxation.exec(particles, relation, dt);
            self.density_relaxation.exec(particles, relation, dt);
            check_stability(particles, self.context.iteration)?;

            relaxation_time += dt;
            self.context.physical_time += dt;
            acoustic_dts.push(dt);
            if last {
                break;
            }
        }

        for hook in self.boundary_conditions.iter_mut() {
            run_hook(hook.as_mut(), particles, advection_dt)?;
        }

        let report = CycleReport {
            iteration: self.context.iteration,
            advection_dt,
            acoustic_dts,
        };
        self.context.iteration += 1;

        let interval = self.config.solver.screen_output_interval;
        if interval > 0 && report.iteration % interval == 0 {
            info!(
                "N={} Time={:.6} Dt={:.6e} dt={:.6e}",
                report.iteration,
                self.context.physical_time,
                advection_dt,
                report.acoustic_dts.last().copied().unwrap_or(0.0)
            );
        }
        debug!(
            "cycle {}: {} acoustic sub-steps over Dt = {:.6e}",
            report.iteration,
            report.acoustic_dts.len(),
            advection_dt
        );

        self.periodic.bounding(&mut self.body.particles);
        self.update_configuration()?;
        Ok(report)
    }

    pub fn run_cycles(&mut self, cycles: usize) -> Result<()> {
        for _ in 0..cycles {
            self.advance_cycle()?;
        }
        Ok(())
    }

    /// Advance whole cycles until the physical time reaches `end_time`.
    /// Returns the number of cycles run.
    pub fn run_until(&mut self, end_time: Real) -> Result<usize> {
        let mut cycles = 0;
        while self.context.physical_time < end_time {
            self.advance_cycle()?;
            cycles += 1;
        }
        Ok(cycles)
    }

    pub fn snapshot(&self) -> BodySnapshot {
        BodySnapshot::capture(
            &self.body.particles,
            self.context.physical_time,
            self.context.iteration,
        )
    }

    pub fn restart_state(&self) -> RestartState {
        RestartState::capture(
            &self.body.particles,
            self.context.physical_time,
            self.context.iteration,
        )
    }

    /// Overwrite particles, physical time and iteration counter from `state`,
    /// then rebuild the spatial index and relation.
    pub fn restore(&mut self, state: &RestartState) -> Result<()> {
        state.restore_into(&mut self.body.particles)?;
        self.context = SimulationContext {
            physical_time: state.physical_time,
            iteration: state.iteration,
        };
        self.update_configuration()?;
        info!(
            "restored {} particles at N={} Time={:.6}",
            state.records.len(),
            state.iteration,
            state.physical_time
        );
        Ok(())
    }

    pub fn total_mechanical_energy(&self) -> Real {
        reduce_exec(&TotalMechanicalEnergy, &self.body.particles)
    }

    pub fn maximum_speed(&self) -> Real {
        reduce_exec(&MaximumSpeed, &self.body.particles)
    }

    pub fn total_mass(&self) -> Real {
        reduce_exec(&TotalMass, &self.body.particles)
    }

    fn update_configuration(&mut self) -> Result<()> {
        self.body.update_cell_linked_list()?;
        self.body.update_configuration()
    }
}

/// Density must stay positive and finite, pressure and velocity finite.
fn instability(particles: &FluidParticles, index: usize) -> Option<(&'static str, Real)> {
    let rho = particles.density[index];
    let p = particles.pressure[index];
    let speed = particles.velocity[index].length();
    if !(rho.is_finite() && rho > 0.0) {
        Some(("density", rho))
    } else if !p.is_finite() {
        Some(("pressure", p))
    } else if !speed.is_finite() {
        Some(("velocity", speed))
    } else {
        None
    }
}

/// Scan every particle and report the lowest-indexed non-physical one.
fn check_stability(particles: &FluidParticles, iteration: usize) -> Result<()> {
    let Some((particle, (quantity, value))) =
        particle_find_first(particles.len(), |i| instability(particles, i))
    else {
        return Ok(());
    };
    error!(
        "numerical instability at iteration {}: particle {} at {:?} has {} = {}",
        iteration, particle, particles.position[particle], quantity, value
    );
    Err(SphError::NumericalInstability {
        particle,
        iteration,
        quantity,
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vecd;

    #[test]
    fn test_stability_accepts_negative_pressure() {
        let mut particles = FluidParticles::new(vec![Vecd::ZERO; 2], vec![1.0; 2], 1.0);
        particles.pressure[1] = -3.0;
        assert!(check_stability(&particles, 0).is_ok());
    }

    #[test]
    fn test_stability_names_particle_and_quantity() {
        let mut particles = FluidParticles::new(vec![Vecd::ZERO; 3], vec![1.0; 3], 1.0);
        particles.density[2] = Real::NAN;
        match check_stability(&particles, 5) {
            Err(SphError::NumericalInstability {
                particle,
                iteration,
                quantity,
                ..
            }) => {
                assert_eq!(particle, 2);
                assert_eq!(iteration, 5);
                assert_eq!(quantity, "density");
            }
            other => panic!("expected instability, got {:?}", other),
        }
    }

    #[test]
    fn test_stability_reports_lowest_index() {
        let mut particles = FluidParticles::new(vec![Vecd::ZERO; 5000], vec![1.0; 5000], 1.0);
        particles.pressure[4321] = Real::INFINITY;
        particles.velocity[1234] = Vecd::new(0.0, Real::NAN);
        match check_stability(&particles, 0) {
            Err(SphError::NumericalInstability { particle, quantity, .. }) => {
                assert_eq!(particle, 1234);
                assert_eq!(quantity, "velocity");
            }
            other => panic!("expected instability, got {:?}", other),
        }
    }
}
