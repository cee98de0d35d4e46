use crate::error::{Result, SphError};
use crate::math::{Real, Vecd};
use crate::shapes::primitives::Shape;

/// Initial particle distribution handed to a fluid body.
#[derive(Clone, Debug, Default)]
pub struct GeneratedParticles {
    pub positions: Vec<Vecd>,
    /// Volume represented by each particle.
    pub volumes: Vec<Real>,
}

impl GeneratedParticles {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Produces the finalized initial positions for a body.
pub trait ParticleGenerator {
    fn generate(&self) -> Result<GeneratedParticles>;
}

/// Places one particle at the centre of every lattice cell inside `shape`.
pub struct LatticeGenerator<'a, S: Shape> {
    shape: &'a S,
    spacing: Real,
}

impl<'a, S: Shape> LatticeGenerator<'a, S> {
    pub fn new(shape: &'a S, spacing: Real) -> Self {
        Self { shape, spacing }
    }
}

impl<S: Shape> ParticleGenerator for LatticeGenerator<'_, S> {
    fn generate(&self) -> Result<GeneratedParticles> {
        if !(self.spacing > 0.0) {
            return Err(SphError::invalid_config(
                "particle_spacing",
                format!("must be positive, got {}", self.spacing),
            ));
        }
        let bounds = self.shape.bounding_box();
        if bounds.is_degenerate() {
            return Err(SphError::invalid_config(
                "shape",
                "bounding box has no interior",
            ));
        }

        let dp = self.spacing;
        let extent = bounds.extent();
        let nx = lattice_count(extent.x, dp);
        let ny = lattice_count(extent.y, dp);
        let volume = dp * dp;

        let mut out = GeneratedParticles::default();
        out.positions.reserve(nx * ny);
        for j in 0..ny {
            for i in 0..nx {
                let p = bounds.lower + Vecd::new((i as Real + 0.5) * dp, (j as Real + 0.5) * dp);
                if self.shape.contains(p) {
                    out.positions.push(p);
                    out.volumes.push(volume);
                }
            }
        }
        log::debug!("lattice generator produced {} particles", out.len());
        Ok(out)
    }
}

/// Number of lattice cells covering `length`, tolerant to spacings that
/// divide the length only up to float noise.
fn lattice_count(length: Real, spacing: Real) -> usize {
    let n = length / spacing;
    if (n - n.round()).abs() < 1.0e-9 {
        n.round() as usize
    } else {
        n.ceil() as usize
    }
}

/// Re-uses a relaxed particle distribution loaded elsewhere.
pub struct ReloadGenerator {
    positions: Vec<Vecd>,
    volumes: Vec<Real>,
}

impl ReloadGenerator {
    pub fn new(positions: Vec<Vecd>, volumes: Vec<Real>) -> Self {
        Self { positions, volumes }
    }

    /// All particles share the same volume `spacing^2`.
    pub fn uniform(positions: Vec<Vecd>, spacing: Real) -> Self {
        let volumes = vec![spacing * spacing; positions.len()];
        Self { positions, volumes }
    }
}

impl ParticleGenerator for ReloadGenerator {
    fn generate(&self) -> Result<GeneratedParticles> {
        if self.positions.len() != self.volumes.len() {
            return Err(SphError::invalid_config(
                "reload",
                format!(
                    "{} positions but {} volumes",
                    self.positions.len(),
                    self.volumes.len()
                ),
            ));
        }
        if let Some(v) = self.volumes.iter().find(|v| !(**v > 0.0)) {
            return Err(SphError::invalid_config(
                "reload",
                format!("particle volume must be positive, got {}", v),
            ));
        }
        Ok(GeneratedParticles {
            positions: self.positions.clone(),
            volumes: self.volumes.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::primitives::BoundingBox;

    #[test]
    fn test_lattice_fills_unit_box() {
        let domain = BoundingBox::new(Vecd::ZERO, Vecd::ONE);
        let generated = LatticeGenerator::new(&domain, 0.1).generate().unwrap();
        assert_eq!(generated.len(), 100);
        assert!((generated.positions[0] - Vecd::new(0.05, 0.05)).length() < 1e-12);
        assert!(generated.volumes.iter().all(|v| (*v - 0.01).abs() < 1e-15));
    }

    #[test]
    fn test_lattice_rejects_zero_spacing() {
        let domain = BoundingBox::new(Vecd::ZERO, Vecd::ONE);
        assert!(LatticeGenerator::new(&domain, 0.0).generate().is_err());
    }

    #[test]
    fn test_reload_length_mismatch() {
        let reload = ReloadGenerator::new(vec![Vecd::ZERO; 3], vec![1.0; 2]);
        assert!(matches!(
            reload.generate(),
            Err(SphError::InvalidConfig { parameter: "reload", .. })
        ));
    }
}
