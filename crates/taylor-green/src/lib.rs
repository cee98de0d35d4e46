//! Two-dimensional Taylor-Green vortex in a periodic unit box.
//!
//! The vortex decays under viscosity with kinetic energy
//! `E(t) = E0 exp(-16 pi^2 nu t)`, which makes it a convenient check of the
//! viscous and pressure terms of the solver.

use std::time::{Duration, Instant};

use log::info;
use sph_core::body::ParticleHook;
use sph_core::config::SimulationConfig;
use sph_core::math::{Real, Vecd, PI};
use sph_core::particle::FluidParticles;
use sph_core::shapes::LatticeGenerator;
use sph_core::{FluidSolver, Result};

/// Domain length and height
pub const DL: Real = 1.0;
pub const DH: Real = 1.0;
pub const RHO0: Real = 1.0;
/// Characteristic velocity
pub const U_F: Real = 1.0;
pub const C_F: Real = 10.0 * U_F;
pub const REYNOLDS: Real = 100.0;
pub const MU_F: Real = RHO0 * U_F * DL / REYNOLDS;

pub const END_TIME: Real = 5.0;
pub const OUTPUT_INTERVAL: Real = 0.1;
pub const SCREEN_OUTPUT_INTERVAL: usize = 100;
/// Particles across the domain length
pub const DEFAULT_RESOLUTION: usize = 100;

/// Analytic velocity field of the vortex at `t = 0`.
pub fn taylor_green_velocity(position: Vecd) -> Vecd {
    let (x, y) = (2.0 * PI * position.x, 2.0 * PI * position.y);
    Vecd::new(-x.cos() * y.sin(), x.sin() * y.cos())
}

/// Sets every particle's velocity to the analytic field at its position.
#[derive(Clone, Copy, Debug, Default)]
pub struct TaylorGreenInitialCondition;

impl ParticleHook for TaylorGreenInitialCondition {
    fn update(&mut self, particles: &mut FluidParticles, index: usize, _dt: Real) {
        let velocity = taylor_green_velocity(particles.position()[index]);
        particles.velocity_mut()[index] = velocity;
    }
}

/// Outcome of [`TaylorGreenCase::run`].
#[derive(Clone, Debug)]
pub struct RunSummary {
    pub cycles: usize,
    pub physical_time: Real,
    pub kinetic_energy: Real,
    pub analytic_energy: Real,
    pub wall_time: Duration,
}

pub struct TaylorGreenCase {
    solver: FluidSolver,
    initial_energy: Real,
    output_interval: Real,
}

impl TaylorGreenCase {
    /// Solver settings for `resolution` particles across the box.
    pub fn config(resolution: usize) -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.fluid.reference_density = RHO0;
        config.fluid.sound_speed = C_F;
        config.fluid.viscosity = MU_F;
        config.fluid.characteristic_velocity = U_F;
        config.domain.bounds.upper = Vecd::new(DL, DH);
        config.domain.periodic = [true, true];
        config.solver.particle_spacing = DL / resolution as Real;
        config.solver.end_time = END_TIME;
        config.solver.screen_output_interval = SCREEN_OUTPUT_INTERVAL;
        config
    }

    pub fn new(resolution: usize) -> Result<Self> {
        Self::with_config(Self::config(resolution))
    }

    /// Fill the box with a lattice and apply the vortex initial condition.
    pub fn with_config(config: SimulationConfig) -> Result<Self> {
        let bounds = config.domain.bounds;
        let generator = LatticeGenerator::new(&bounds, config.solver.particle_spacing);
        let mut solver = FluidSolver::with_generator(config, &generator)?;
        solver.apply_initial_condition(TaylorGreenInitialCondition)?;

        let initial_energy = solver.total_mechanical_energy();
        info!("Taylor-Green vortex: Re = {}, initial kinetic energy {:.6}", REYNOLDS, initial_energy);
        Ok(Self {
            solver,
            initial_energy,
            output_interval: OUTPUT_INTERVAL,
        })
    }

    pub fn solver(&self) -> &FluidSolver {
        &self.solver
    }

    pub fn solver_mut(&mut self) -> &mut FluidSolver {
        &mut self.solver
    }

    pub fn initial_energy(&self) -> Real {
        self.initial_energy
    }

    /// `E0 exp(-16 pi^2 nu t)` with `nu = mu / rho0`.
    pub fn analytic_energy(&self, time: Real) -> Real {
        let nu = self.solver.body().material().kinematic_viscosity();
        self.initial_energy * (-16.0 * PI * PI * nu * time).exp()
    }

    /// Drive the case to its configured end time, logging the energy decay
    /// once per output interval.
    pub fn run(&mut self) -> Result<RunSummary> {
        let end_time = self.solver.config().solver.end_time;
        let start = Instant::now();
        let mut cycles = 0;

        while self.solver.context().physical_time < end_time {
            let next_output = (self.solver.context().physical_time + self.output_interval).min(end_time);
            cycles += self.solver.run_until(next_output)?;

            let time = self.solver.context().physical_time;
            let energy = self.solver.total_mechanical_energy();
            let analytic = self.analytic_energy(time);
            info!(
                "Time={:.4} kinetic energy {:.6e} (analytic {:.6e}, ratio {:.4}), max speed {:.4}",
                time,
                energy,
                analytic,
                energy / analytic,
                self.solver.maximum_speed()
            );
        }

        let wall_time = start.elapsed();
        info!("Total wall time for computation: {:.3} seconds.", wall_time.as_secs_f64());

        let physical_time = self.solver.context().physical_time;
        Ok(RunSummary {
            cycles,
            physical_time,
            kinetic_energy: self.solver.total_mechanical_energy(),
            analytic_energy: self.analytic_energy(physical_time),
            wall_time,
        })
    }
}
