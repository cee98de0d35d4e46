use crate::dynamics::exec::particle_map;
use crate::error::{Result, SphError};
use crate::grid::CellLinkedList;
use crate::kernel::Kernel;
use crate::math::{Real, Vecd, TINY_REAL};

/// One interacting pair as seen from the owning particle `i`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    /// `|x_i - x_j|` (periodic minimum image)
    pub r: Real,
    /// Unit vector from `j` to `i`
    pub e_ij: Vecd,
    /// `W(r, h)`
    pub w: Real,
    /// `dW/dr`, so that `grad_i W = dw * e_ij`
    pub dw: Real,
}

impl Neighbor {
    #[inline]
    pub fn grad_w(&self) -> Vecd {
        self.e_ij * self.dw
    }
}

/// Inner neighbor relation of a body: for every particle, the particles within
/// the kernel cutoff (excluding itself), ordered by index.
///
/// The lists are a cache tied to one build of the cell-linked list. The
/// generation of that build is stored alongside and checked on every use.
#[derive(Clone, Debug, Default)]
pub struct InnerRelation {
    neighbors: Vec<Vec<Neighbor>>,
    generation: u64,
}

impl InnerRelation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild every list from scratch against a freshly built `cell_list`.
    pub fn update<K: Kernel + ?Sized>(
        &mut self,
        cell_list: &CellLinkedList,
        positions: &[Vecd],
        kernel: &K,
    ) -> Result<()> {
        if cell_list.particle_count() != positions.len() {
            return Err(SphError::IndexInconsistency {
                expected: positions.len(),
                placed: cell_list.particle_count(),
            });
        }
        let cutoff = kernel.cutoff_radius();

        self.neighbors = particle_map(positions.len(), |i| {
            let pos_i = positions[i];
            let mut list = Vec::new();
            cell_list.query_neighbors(pos_i, |j| {
                let j = j as usize;
                if j == i {
                    return;
                }
                let d = cell_list.displacement(pos_i, positions[j]);
                let r = d.length();
                if r <= cutoff {
                    // Coincident particles still weigh in, with no direction
                    let e_ij = if r > TINY_REAL { d / r } else { Vecd::ZERO };
                    list.push(Neighbor {
                        index: j,
                        r,
                        e_ij,
                        w: kernel.w(r),
                        dw: kernel.dw(r),
                    });
                }
            });
            list.sort_unstable_by_key(|n| n.index);
            list
        });
        self.generation = cell_list.generation();
        Ok(())
    }

    /// Fails unless the lists were built from the current state of `cell_list`.
    pub fn ensure_fresh(&self, cell_list: &CellLinkedList) -> Result<()> {
        if self.generation != cell_list.generation() || self.neighbors.len() != cell_list.particle_count() {
            return Err(SphError::StaleRelation {
                relation: self.generation,
                index: cell_list.generation(),
            });
        }
        Ok(())
    }

    #[inline]
    pub fn neighbors_of(&self, index: usize) -> &[Neighbor] {
        &self.neighbors[index]
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }
}
