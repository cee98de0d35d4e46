use crate::error::{Result, SphError};
use crate::math::{component, minimum_image, set_component, Real, Vecd, DIMENSIONS};
use crate::shapes::primitives::BoundingBox;

/// Uniform cell-linked list over a bounded 2D domain.
///
/// Cells are at least one cutoff radius wide, so all neighbors of a particle
/// lie in its own cell or the eight around it. Periodic axes wrap cell
/// lookups and distances (minimum image). Built with a counting sort:
/// count particles per cell -> prefix sum -> scatter.
pub struct CellLinkedList {
    lower: Vecd,
    upper: Vecd,
    domain_length: Vecd,
    inv_cell_size: Vecd,
    dims: [usize; DIMENSIONS],
    periodic: [bool; DIMENSIONS],
    cutoff: Real,
    /// Count array (reused): cell_count[cell] = number of particles in cell
    cell_count: Vec<u32>,
    /// Prefix sum: cell_start[cell] = where the particles of this cell begin in sorted_indices
    cell_start: Vec<u32>,
    /// Particle indices sorted by cell, ascending index within a cell
    sorted_indices: Vec<u32>,
    /// Cell per particle (used during build)
    particle_cells: Vec<u32>,
    /// Bumped on every successful build
    generation: u64,
}

impl CellLinkedList {
    pub fn new(bounds: BoundingBox, cutoff: Real, periodic: [bool; DIMENSIONS]) -> Result<Self> {
        if !(cutoff > 0.0) {
            return Err(SphError::invalid_config(
                "cutoff_radius",
                format!("must be positive, got {}", cutoff),
            ));
        }
        if bounds.is_degenerate() {
            return Err(SphError::invalid_config(
                "domain",
                "bounding box has no interior",
            ));
        }

        let length = bounds.extent();
        let mut dims = [1usize; DIMENSIONS];
        let mut inv_cell_size = Vecd::ZERO;
        for axis in 0..DIMENSIONS {
            let l = component(length, axis);
            if periodic[axis] && cutoff > 0.5 * l {
                return Err(SphError::invalid_config(
                    "periodic",
                    format!("cutoff radius {} exceeds half the extent {} on axis {}", cutoff, l, axis),
                ));
            }
            dims[axis] = ((l / cutoff).floor() as usize).max(1);
            set_component(&mut inv_cell_size, axis, dims[axis] as Real / l);
        }
        let total = dims[0] * dims[1];

        Ok(Self {
            lower: bounds.lower,
            upper: bounds.upper,
            domain_length: length,
            inv_cell_size,
            dims,
            periodic,
            cutoff,
            cell_count: vec![0; total],
            cell_start: vec![0; total],
            sorted_indices: Vec::new(),
            particle_cells: Vec::new(),
            generation: 0,
        })
    }

    /// Assign every particle to the cell containing its position.
    ///
    /// Fails if a particle lies outside the box along a non-periodic axis.
    pub fn build(&mut self, positions: &[Vecd]) -> Result<()> {
        let count = positions.len();
        self.sorted_indices.resize(count, 0);
        self.particle_cells.resize(count, 0);

        // 1. Clear cell_count
        self.cell_count.iter_mut().for_each(|v| *v = 0);

        // 2. For each particle, compute its cell, store it, and increment count
        for (i, pos) in positions.iter().enumerate() {
            let cell = self
                .cell_of(*pos)
                .ok_or(SphError::ParticleOutOfDomain { particle: i, position: *pos })?;
            self.particle_cells[i] = cell as u32;
            self.cell_count[cell] += 1;
        }

        // 3. Prefix sum on cell_count -> cell_start
        self.cell_start[0] = 0;
        for k in 1..self.cell_count.len() {
            self.cell_start[k] = self.cell_start[k - 1] + self.cell_count[k - 1];
        }

        // 4. Reset cell_count to 0 (reuse for scatter offsets)
        self.cell_count.iter_mut().for_each(|v| *v = 0);

        // 5. Scatter particles into sorted_indices
        for i in 0..count {
            let c = self.particle_cells[i] as usize;
            let idx = self.cell_start[c] + self.cell_count[c];
            self.sorted_indices[idx as usize] = i as u32;
            self.cell_count[c] += 1;
        }

        let placed: usize = self.cell_count.iter().map(|c| *c as usize).sum();
        if placed != count {
            return Err(SphError::IndexInconsistency { expected: count, placed });
        }

        self.generation += 1;
        log::debug!(
            "cell-linked list rebuilt: {} particles in {}x{} cells (generation {})",
            count,
            self.dims[0],
            self.dims[1],
            self.generation
        );
        Ok(())
    }

    /// Cell holding `pos`, wrapping periodic axes. `None` if the position is
    /// outside the box on a non-periodic axis or not finite.
    pub fn cell_of(&self, pos: Vecd) -> Option<usize> {
        let [cx, cy] = self.cell_coords(pos)?;
        Some(self.linear_index(cx, cy))
    }

    /// Candidate neighbor cells of `pos`: its own cell and the adjacent ones,
    /// each listed once.
    pub fn cells_around(&self, pos: Vecd) -> CellsAround {
        let mut around = CellsAround::default();
        let Some([cx, cy]) = self.cell_coords(pos) else {
            return around;
        };
        for dy in -1..=1_i64 {
            let Some(y) = self.wrap_axis(cy as i64 + dy, 1) else {
                continue;
            };
            for dx in -1..=1_i64 {
                let Some(x) = self.wrap_axis(cx as i64 + dx, 0) else {
                    continue;
                };
                around.push(self.linear_index(x, y));
            }
        }
        around
    }

    /// Indices of the particles currently in `cell`, ascending.
    pub fn particles_in(&self, cell: usize) -> &[u32] {
        let start = self.cell_start[cell] as usize;
        let end = start + self.cell_count[cell] as usize;
        &self.sorted_indices[start..end]
    }

    /// Calls `callback(particle_index)` for each particle in the cells around
    /// `pos`. The caller is responsible for distance checks.
    pub fn query_neighbors<F: FnMut(u32)>(&self, pos: Vecd, mut callback: F) {
        for cell in self.cells_around(pos) {
            for &idx in self.particles_in(cell) {
                callback(idx);
            }
        }
    }

    /// `x_i - x_j`, taking the nearest periodic image along periodic axes.
    #[inline]
    pub fn displacement(&self, x_i: Vecd, x_j: Vecd) -> Vecd {
        let mut d = x_i - x_j;
        if self.periodic[0] {
            d.x = minimum_image(d.x, self.domain_length.x);
        }
        if self.periodic[1] {
            d.y = minimum_image(d.y, self.domain_length.y);
        }
        d
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cutoff(&self) -> Real {
        self.cutoff
    }

    pub fn dims(&self) -> [usize; DIMENSIONS] {
        self.dims
    }

    pub fn periodic(&self) -> [bool; DIMENSIONS] {
        self.periodic
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.lower, self.upper)
    }

    pub fn particle_count(&self) -> usize {
        self.sorted_indices.len()
    }

    #[inline]
    fn linear_index(&self, cx: usize, cy: usize) -> usize {
        cy * self.dims[0] + cx
    }

    fn cell_coords(&self, pos: Vecd) -> Option<[usize; DIMENSIONS]> {
        if !pos.is_finite() {
            return None;
        }
        let mut coords = [0usize; DIMENSIONS];
        for axis in 0..DIMENSIONS {
            let x = component(pos, axis);
            if !self.periodic[axis] && (x < component(self.lower, axis) || x > component(self.upper, axis)) {
                return None;
            }
            let t = (x - component(self.lower, axis)) * component(self.inv_cell_size, axis);
            let c = t.floor() as i64;
            coords[axis] = if self.periodic[axis] {
                c.rem_euclid(self.dims[axis] as i64) as usize
            } else {
                // Upper face belongs to the last cell
                c.clamp(0, self.dims[axis] as i64 - 1) as usize
            };
        }
        Some(coords)
    }

    fn wrap_axis(&self, c: i64, axis: usize) -> Option<usize> {
        let n = self.dims[axis] as i64;
        if self.periodic[axis] {
            Some(c.rem_euclid(n) as usize)
        } else if (0..n).contains(&c) {
            Some(c as usize)
        } else {
            None
        }
    }
}

/// Lazy sequence of distinct cells around a position (at most 3x3).
#[derive(Clone, Debug, Default)]
pub struct CellsAround {
    cells: [usize; 9],
    len: usize,
    cursor: usize,
}

impl CellsAround {
    fn push(&mut self, cell: usize) {
        // Narrow periodic grids map several offsets to one cell
        if !self.cells[..self.len].contains(&cell) {
            self.cells[self.len] = cell;
            self.len += 1;
        }
    }
}

impl Iterator for CellsAround {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.cursor < self.len {
            let cell = self.cells[self.cursor];
            self.cursor += 1;
            Some(cell)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.cursor;
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> BoundingBox {
        BoundingBox::new(Vecd::ZERO, Vecd::ONE)
    }

    #[test]
    fn test_cell_size_at_least_cutoff() {
        let grid = CellLinkedList::new(unit_box(), 0.3, [true, false]).unwrap();
        assert_eq!(grid.dims(), [3, 3]);
    }

    #[test]
    fn test_narrow_periodic_grid_lists_cells_once() {
        let grid = CellLinkedList::new(unit_box(), 0.45, [true, true]).unwrap();
        assert_eq!(grid.dims(), [2, 2]);
        let cells: Vec<usize> = grid.cells_around(Vecd::new(0.1, 0.1)).collect();
        assert_eq!(cells.len(), 4);
    }

    #[test]
    fn test_corner_cell_without_periodicity() {
        let grid = CellLinkedList::new(unit_box(), 0.1, [false, false]).unwrap();
        assert_eq!(grid.cells_around(Vecd::new(0.01, 0.01)).count(), 4);
        assert_eq!(grid.cells_around(Vecd::new(0.55, 0.55)).count(), 9);
    }
}
