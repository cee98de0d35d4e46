//! Weakly-compressible SPH core for 2D single-fluid flows in periodic boxes.

pub mod body;
pub mod config;
pub mod dynamics;
pub mod error;
pub mod fluids;
pub mod grid;
pub mod kernel;
pub mod materials;
pub mod math;
pub mod observables;
pub mod particle;
pub mod periodic;
pub mod relation;
pub mod shapes;
pub mod solver;
pub mod state;
pub mod time_step;

pub use error::{Result, SphError};
pub use math::{Real, Vecd};
pub use solver::{CycleReport, FluidSolver, SimulationContext};
