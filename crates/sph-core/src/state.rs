//! Read-only snapshots and restart state of a fluid body.

use bytemuck::{Pod, Zeroable};

use crate::error::{Result, SphError};
use crate::math::{Real, Vecd};
use crate::particle::FluidParticles;

/// Copy of the observable particle fields at a completed cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct BodySnapshot {
    pub physical_time: Real,
    pub iteration: usize,
    pub position: Vec<Vecd>,
    pub velocity: Vec<Vecd>,
    pub density: Vec<Real>,
    pub pressure: Vec<Real>,
}

impl BodySnapshot {
    pub fn capture(particles: &FluidParticles, physical_time: Real, iteration: usize) -> Self {
        Self {
            physical_time,
            iteration,
            position: particles.position.clone(),
            velocity: particles.velocity.clone(),
            density: particles.density.clone(),
            pressure: particles.pressure.clone(),
        }
    }
}

/// Flat per-particle restart record, 64 bytes, no padding.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ParticleRecord {
    pub position: [f64; 2],
    pub velocity: [f64; 2],
    pub density: f64,
    pub pressure: f64,
    pub density_rate: f64,
    pub mass: f64,
}

const MAGIC: &[u8; 8] = b"SPHRST01";
const HEADER_LEN: usize = 8 + 8 + 8 + 8;

/// Everything needed to resume a run: physical time, iteration counter and
/// the full particle state.
#[derive(Clone, Debug, PartialEq)]
pub struct RestartState {
    pub physical_time: Real,
    pub iteration: usize,
    pub records: Vec<ParticleRecord>,
}

impl RestartState {
    pub fn capture(particles: &FluidParticles, physical_time: Real, iteration: usize) -> Self {
        let records = (0..particles.len())
            .map(|i| ParticleRecord {
                position: particles.position[i].to_array(),
                velocity: particles.velocity[i].to_array(),
                density: particles.density[i],
                pressure: particles.pressure[i],
                density_rate: particles.density_rate[i],
                mass: particles.mass()[i],
            })
            .collect();
        Self {
            physical_time,
            iteration,
            records,
        }
    }

    /// Overwrite every field of `particles` from the records. The particle
    /// count must match; acceleration buffers are reset.
    pub fn restore_into(&self, particles: &mut FluidParticles) -> Result<()> {
        if self.records.len() != particles.len() {
            return Err(SphError::RestartDecode(format!(
                "restart holds {} particles, body has {}",
                self.records.len(),
                particles.len()
            )));
        }
        for (i, r) in self.records.iter().enumerate() {
            particles.position[i] = Vecd::from_array(r.position);
            particles.velocity[i] = Vecd::from_array(r.velocity);
            particles.density[i] = r.density;
            particles.pressure[i] = r.pressure;
            particles.density_rate[i] = r.density_rate;
            particles.acceleration[i] = Vecd::ZERO;
            particles.acceleration_prior[i] = Vecd::ZERO;
        }
        particles.reinitialize_mass(self.records.iter().map(|r| r.mass).collect());
        Ok(())
    }

    /// Encode as `magic | iteration | physical_time | count | records`, header
    /// little-endian, records in native byte order.
    pub fn to_bytes(&self) -> Vec<u8> {
        let body: &[u8] = bytemuck::cast_slice(&self.records);
        let mut bytes = Vec::with_capacity(HEADER_LEN + body.len());
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(&(self.iteration as u64).to_le_bytes());
        bytes.extend_from_slice(&self.physical_time.to_le_bytes());
        bytes.extend_from_slice(&(self.records.len() as u64).to_le_bytes());
        bytes.extend_from_slice(body);
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(SphError::RestartDecode(format!(
                "buffer of {} bytes is shorter than the header",
                bytes.len()
            )));
        }
        if &bytes[..8] != MAGIC {
            return Err(SphError::RestartDecode("bad magic".to_string()));
        }
        let iteration = read_u64(&bytes[8..16]) as usize;
        let physical_time = f64::from_le_bytes(word(&bytes[16..24]));
        let count = read_u64(&bytes[24..32]);

        let record_len = std::mem::size_of::<ParticleRecord>();
        let expected_len = usize::try_from(count)
            .ok()
            .and_then(|count| count.checked_mul(record_len))
            .ok_or_else(|| {
                SphError::RestartDecode(format!("record count {} exceeds the addressable size", count))
            })?;
        let body = &bytes[HEADER_LEN..];
        if body.len() != expected_len {
            return Err(SphError::RestartDecode(format!(
                "expected {} records ({} bytes), found {} bytes",
                count,
                expected_len,
                body.len()
            )));
        }
        // Unaligned reads: the header offsets the records by 32 bytes
        let records = body
            .chunks_exact(record_len)
            .map(bytemuck::pod_read_unaligned::<ParticleRecord>)
            .collect();

        Ok(Self {
            physical_time,
            iteration,
            records,
        })
    }
}

fn word(bytes: &[u8]) -> [u8; 8] {
    let mut out = [0u8; 8];
    out.copy_from_slice(bytes);
    out
}

fn read_u64(bytes: &[u8]) -> u64 {
    u64::from_le_bytes(word(bytes))
}
