//! Fluid dynamics of a weakly-compressible body over its inner relation.

pub mod density;
pub mod relaxation;
pub mod riemann;
pub mod transport;
pub mod viscosity;

pub use density::DensitySummation;
pub use relaxation::{DensityRelaxation, PressureRelaxation};
pub use riemann::{FluidState, RiemannKind, RiemannSolver};
pub use transport::TransportVelocityCorrection;
pub use viscosity::ViscousAcceleration;
