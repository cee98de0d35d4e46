use crate::config::DomainConfig;
use crate::error::{Result, SphError};
use crate::grid::CellLinkedList;
use crate::kernel::Kernel;
use crate::materials::WeaklyCompressibleFluid;
use crate::math::Real;
use crate::particle::FluidParticles;
use crate::relation::InnerRelation;
use crate::shapes::generator::GeneratedParticles;

/// Externally supplied per-particle update: initial conditions (run once) or
/// persistent boundary conditions (run every advection cycle).
///
/// Hooks write particle fields through the slice accessors of
/// [`FluidParticles`]; the particle count must not change.
pub trait ParticleHook {
    fn update(&mut self, particles: &mut FluidParticles, index: usize, dt: Real);
}

impl<F> ParticleHook for F
where
    F: FnMut(&mut FluidParticles, usize, Real),
{
    fn update(&mut self, particles: &mut FluidParticles, index: usize, dt: Real) {
        self(particles, index, dt)
    }
}

/// A fluid body: its particles, material, kernel, spatial index and inner
/// neighbor relation.
pub struct FluidBody {
    name: String,
    pub(crate) particles: FluidParticles,
    material: WeaklyCompressibleFluid,
    kernel: Box<dyn Kernel>,
    cell_list: CellLinkedList,
    relation: InnerRelation,
}

impl FluidBody {
    /// Create the body from generated particles. Particle mass is
    /// `rho0 * volume` and stays fixed for the rest of the run.
    ///
    /// The spatial index is not built yet; call [`FluidBody::update_cell_linked_list`]
    /// and [`FluidBody::update_configuration`] before running any interaction.
    pub fn new(
        name: impl Into<String>,
        generated: GeneratedParticles,
        material: WeaklyCompressibleFluid,
        kernel: Box<dyn Kernel>,
        domain: &DomainConfig,
    ) -> Result<Self> {
        material.validate()?;
        if generated.positions.len() != generated.volumes.len() {
            return Err(SphError::invalid_config(
                "particles",
                "every generated particle needs a volume",
            ));
        }
        let mass = generated.volumes.iter().map(|v| material.rho0 * v).collect();
        let particles = FluidParticles::new(generated.positions, mass, material.rho0);
        let cell_list = CellLinkedList::new(domain.bounds, kernel.cutoff_radius(), domain.periodic)?;

        Ok(Self {
            name: name.into(),
            particles,
            material,
            kernel,
            cell_list,
            relation: InnerRelation::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn particles(&self) -> &FluidParticles {
        &self.particles
    }

    /// Field access without a relation check. Call
    /// [`FluidBody::update_cell_linked_list`] and
    /// [`FluidBody::update_configuration`] after moving particles.
    pub fn particles_mut(&mut self) -> &mut FluidParticles {
        &mut self.particles
    }

    pub fn material(&self) -> &WeaklyCompressibleFluid {
        &self.material
    }

    pub fn kernel(&self) -> &dyn Kernel {
        self.kernel.as_ref()
    }

    pub fn cell_linked_list(&self) -> &CellLinkedList {
        &self.cell_list
    }

    /// Rebuild the spatial index from current positions.
    pub fn update_cell_linked_list(&mut self) -> Result<()> {
        self.cell_list.build(&self.particles.position)
    }

    /// Rebuild the inner relation against the current spatial index.
    pub fn update_configuration(&mut self) -> Result<()> {
        self.relation
            .update(&self.cell_list, &self.particles.position, self.kernel.as_ref())
    }

    /// The inner relation, provided it matches the current spatial index.
    pub fn inner_relation(&self) -> Result<&InnerRelation> {
        self.relation.ensure_fresh(&self.cell_list)?;
        Ok(&self.relation)
    }

    /// Mutable particles together with a fresh inner relation.
    pub fn particles_and_relation(&mut self) -> Result<(&mut FluidParticles, &InnerRelation)> {
        self.relation.ensure_fresh(&self.cell_list)?;
        Ok((&mut self.particles, &self.relation))
    }

    /// Run `hook` once for every particle.
    pub fn apply_hook<H: ParticleHook + ?Sized>(&mut self, hook: &mut H, dt: Real) -> Result<()> {
        run_hook(hook, &mut self.particles, dt)
    }
}

/// Run `hook` over every particle index, stopping as soon as the particle
/// count moves away from its value on entry.
pub(crate) fn run_hook<H: ParticleHook + ?Sized>(
    hook: &mut H,
    particles: &mut FluidParticles,
    dt: Real,
) -> Result<()> {
    let expected = particles.len();
    for i in 0..expected {
        hook.update(particles, i, dt);
        if particles.len() != expected {
            return Err(SphError::ParticleCountChanged {
                expected,
                found: particles.len(),
            });
        }
    }
    Ok(())
}
