use crate::error::{Result, SphError};
use crate::math::Real;

/// Density/pressure closure of a fluid.
pub trait EquationOfState: Send + Sync {
    fn pressure(&self, density: Real) -> Real;
    fn density(&self, pressure: Real) -> Real;
    fn sound_speed(&self, pressure: Real, density: Real) -> Real;
    fn reference_density(&self) -> Real;
}

/// Weakly-compressible fluid with the linear closure
/// `p = c0^2 (rho - rho0)` and a constant dynamic viscosity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeaklyCompressibleFluid {
    pub rho0: Real,
    pub c0: Real,
    pub mu: Real,
}

impl WeaklyCompressibleFluid {
    pub fn new(rho0: Real, c0: Real, mu: Real) -> Result<Self> {
        let fluid = Self { rho0, c0, mu };
        fluid.validate()?;
        Ok(fluid)
    }

    /// Fluid for a flow with characteristic velocity `u` over length `l` at
    /// Reynolds number `re`; the sound speed is `mach_factor * u`.
    pub fn for_reynolds(rho0: Real, u: Real, l: Real, re: Real, mach_factor: Real) -> Result<Self> {
        if !(re > 0.0) {
            return Err(SphError::invalid_config(
                "reynolds_number",
                format!("must be positive, got {}", re),
            ));
        }
        Self::new(rho0, mach_factor * u, rho0 * u * l / re)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.rho0 > 0.0) {
            return Err(SphError::invalid_config(
                "reference_density",
                format!("must be positive, got {}", self.rho0),
            ));
        }
        if !(self.c0 > 0.0) {
            return Err(SphError::invalid_config(
                "sound_speed",
                format!("must be positive, got {}", self.c0),
            ));
        }
        if !(self.mu > 0.0) {
            return Err(SphError::invalid_config(
                "viscosity",
                format!("must be positive, got {}", self.mu),
            ));
        }
        Ok(())
    }

    /// Kinematic viscosity `mu / rho0`.
    pub fn kinematic_viscosity(&self) -> Real {
        self.mu / self.rho0
    }
}

impl EquationOfState for WeaklyCompressibleFluid {
    #[inline]
    fn pressure(&self, density: Real) -> Real {
        self.c0 * self.c0 * (density - self.rho0)
    }

    #[inline]
    fn density(&self, pressure: Real) -> Real {
        self.rho0 + pressure / (self.c0 * self.c0)
    }

    #[inline]
    fn sound_speed(&self, _pressure: Real, _density: Real) -> Real {
        self.c0
    }

    fn reference_density(&self) -> Real {
        self.rho0
    }
}
