use ndarray::Array3;

use crate::{UnitCell, Vector3D};

/// Maximal number of cells, we need to use this to prevent having too many
/// cells with a small unit cell and a large cutoff
const MAX_NUMBER_OF_CELLS: f64 = 1e5;

/// Relative margin added to the cutoff when sizing cells, to account for
/// rounding errors in the fractional coordinates
const CELL_MARGIN: f64 = 1e-6;

/// Frame of reference used to assign particles to cells
#[derive(Debug, Clone, Copy)]
enum Grid {
    /// Periodic cell, particles are binned using their fractional coordinates
    /// wrapped inside the cell
    Periodic(UnitCell),
    /// No periodic boundary conditions, particles are binned inside the
    /// bounding box of all positions
    Bounded {
        origin: Vector3D,
        extent: Vector3D,
    },
}

/// The cell list is used to sort particles inside bins/cells.
///
/// The list of candidate neighbors of a particle is then constructed by
/// looking through all neighboring cells (the number of cells to search
/// depends on the cutoff and the size of the cells). Candidates are a superset
/// of the pairs below the cutoff with the minimum image convention, and need
/// to be filtered by distance afterward.
#[derive(Debug, Clone)]
pub(crate) struct CellList {
    /// How many cells do we need to look at in each direction when searching
    /// neighbors to include all neighbors below cutoff
    n_search: [usize; 3],
    /// the cells themselves, containing indexes of particles
    cells: Array3<Vec<usize>>,
    grid: Grid,
}

impl CellList {
    /// Create a new `CellList` for the given unit cell and cutoff. For
    /// infinite cells, all the `positions` that will be added to the cell list
    /// or used to look for candidates must be given here to set the bounds of
    /// the grid.
    pub fn new<'p>(unit_cell: UnitCell, cutoff: f64, positions: impl IntoIterator<Item = &'p Vector3D>) -> CellList {
        let (grid, lengths) = if unit_cell.is_infinite() {
            let mut min = Vector3D::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
            let mut max = Vector3D::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
            for position in positions {
                for xyz in 0..3 {
                    min[xyz] = f64::min(min[xyz], position[xyz]);
                    max[xyz] = f64::max(max[xyz], position[xyz]);
                }
            }

            let mut extent = max - min;
            for xyz in 0..3 {
                if !extent[xyz].is_finite() {
                    // no positions, or positions with non-finite values
                    min[xyz] = 0.0;
                    extent[xyz] = 0.0;
                }
            }

            (Grid::Bounded { origin: min, extent: extent }, extent)
        } else {
            (Grid::Periodic(unit_cell), unit_cell.distances_between_faces())
        };

        let width = cutoff * (1.0 + CELL_MARGIN);
        let mut n_cells = [0.0; 3];
        for xyz in 0..3 {
            n_cells[xyz] = f64::clamp(f64::trunc(lengths[xyz] / width), 1.0, MAX_NUMBER_OF_CELLS);
        }

        // limit memory consumption by ensuring we have less than
        // `MAX_NUMBER_OF_CELLS` cells to look though
        let n_cells_total = n_cells[0] * n_cells[1] * n_cells[2];
        if n_cells_total > MAX_NUMBER_OF_CELLS {
            // set the total number of cells close to MAX_NUMBER_OF_CELLS, while
            // keeping roughly the ratio of cells in each direction
            let scale = f64::cbrt(MAX_NUMBER_OF_CELLS / n_cells_total);
            for n in &mut n_cells {
                *n = f64::max(f64::trunc(*n * scale), 1.0);
            }
        }

        let mut n_search = [0; 3];
        for xyz in 0..3 {
            if lengths[xyz] > 0.0 {
                // searching more than `n_cells` cells is never needed, and
                // nearly flat systems would otherwise overflow here
                let search = f64::ceil(width * n_cells[xyz] / lengths[xyz]);
                n_search[xyz] = f64::min(search, n_cells[xyz]) as usize;
            }
        }

        let n_cells = [
            n_cells[0] as usize,
            n_cells[1] as usize,
            n_cells[2] as usize,
        ];

        log::debug!(
            "cell list with {}x{}x{} cells, searching {}x{}x{} cells around each particle",
            n_cells[0], n_cells[1], n_cells[2],
            2 * n_search[0] + 1, 2 * n_search[1] + 1, 2 * n_search[2] + 1,
        );

        CellList {
            n_search: n_search,
            cells: Array3::from_elem(n_cells, Vec::new()),
            grid: grid,
        }
    }

    fn n_cells(&self) -> [usize; 3] {
        let shape = self.cells.shape();
        [shape[0], shape[1], shape[2]]
    }

    /// Get the index of the cell containing the given `position`
    fn cell_index(&self, position: Vector3D) -> [usize; 3] {
        let n_cells = self.n_cells();

        let mut index = [0; 3];
        match self.grid {
            Grid::Periodic(unit_cell) => {
                let fractional = unit_cell.fractional(position);
                for xyz in 0..3 {
                    // wrap the particle inside the cell
                    let mut wrapped = fractional[xyz] - f64::floor(fractional[xyz]);
                    if wrapped >= 1.0 {
                        wrapped = 0.0;
                    }
                    index[xyz] = cell_bin(wrapped, n_cells[xyz]);
                }
            }
            Grid::Bounded { origin, extent } => {
                for xyz in 0..3 {
                    if extent[xyz] > 0.0 {
                        let scaled = (position[xyz] - origin[xyz]) / extent[xyz];
                        index[xyz] = cell_bin(scaled, n_cells[xyz]);
                    }
                }
            }
        }

        return index;
    }

    /// Add a single particle to the cell list at the given `position`. The
    /// particle is uniquely identified by its `index`.
    pub fn add_particle(&mut self, index: usize, position: Vector3D) {
        let cell_index = self.cell_index(position);
        self.cells[cell_index].push(index);
    }

    /// Get the indexes of the cells to search along the axis `xyz`, around
    /// the cell with index `center`
    fn cells_to_search(&self, xyz: usize, center: usize) -> Vec<usize> {
        let n_cells = self.n_cells()[xyz];
        let n_search = self.n_search[xyz];

        if 2 * n_search + 1 >= n_cells {
            return (0..n_cells).collect();
        }

        let center = center as i64;
        let n_search = n_search as i64;
        match self.grid {
            Grid::Periodic(_) => {
                (center - n_search..=center + n_search)
                    .map(|i| divmod(i, n_cells).1)
                    .collect()
            }
            Grid::Bounded { .. } => {
                let start = i64::max(center - n_search, 0) as usize;
                let stop = i64::min(center + n_search, n_cells as i64 - 1) as usize;
                (start..=stop).collect()
            }
        }
    }

    /// Fill `candidates` with the indexes of all particles in the cell list
    /// which could be within the cutoff of `position`. Candidates are sorted
    /// in increasing order, and each one appears only once.
    pub fn candidates(&self, position: Vector3D, candidates: &mut Vec<usize>) {
        candidates.clear();

        let center = self.cell_index(position);
        let search_x = self.cells_to_search(0, center[0]);
        let search_y = self.cells_to_search(1, center[1]);
        let search_z = self.cells_to_search(2, center[2]);

        for &x in &search_x {
            for &y in &search_y {
                for &z in &search_z {
                    candidates.extend_from_slice(&self.cells[[x, y, z]]);
                }
            }
        }

        candidates.sort_unstable();
    }
}

/// Get the bin containing a value `scaled` in `[0, 1]`, when splitting this
/// range in `n_cells` bins
fn cell_bin(scaled: f64, n_cells: usize) -> usize {
    let bin = f64::floor(scaled * n_cells as f64);
    if bin < 0.0 {
        0
    } else {
        usize::min(bin as usize, n_cells - 1)
    }
}

/// Function to compute both quotient and remainder of the division of a by b.
/// This function follows Python convention, making sure the remainder have the
/// same sign as `b`.
fn divmod(a: i64, b: usize) -> (i64, usize) {
    let b = b as i64;
    let mut quotient = a / b;
    let mut remainder = a % b;
    if remainder < 0 {
        remainder += b;
        quotient -= 1;
    }
    return (quotient, remainder as usize);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divmod_negative() {
        assert_eq!(divmod(7, 3), (2, 1));
        assert_eq!(divmod(-1, 3), (-1, 2));
        assert_eq!(divmod(-3, 3), (-1, 0));
        assert_eq!(divmod(-4, 3), (-2, 2));
    }

    #[test]
    fn periodic_cells() {
        let cell = UnitCell::cubic(10.0).unwrap();
        let mut cell_list = CellList::new(cell, 2.0, std::iter::empty());
        assert_eq!(cell_list.n_cells(), [4, 4, 4]);
        assert_eq!(cell_list.n_search, [1, 1, 1]);

        // positions outside of the cell are wrapped inside
        cell_list.add_particle(0, Vector3D::new(1.0, 1.0, 1.0));
        cell_list.add_particle(1, Vector3D::new(-1.0, 1.0, 1.0));
        cell_list.add_particle(2, Vector3D::new(5.0, 5.0, 5.0));
        cell_list.add_particle(3, Vector3D::new(11.5, 1.0, 1.0));

        assert_eq!(cell_list.cells[[0, 0, 0]], [0, 3]);
        assert_eq!(cell_list.cells[[3, 0, 0]], [1]);
        assert_eq!(cell_list.cells[[2, 2, 2]], [2]);

        let mut candidates = Vec::new();
        cell_list.candidates(Vector3D::new(0.5, 0.5, 0.5), &mut candidates);
        assert_eq!(candidates, [0, 1, 3]);

        cell_list.candidates(Vector3D::new(5.5, 5.5, 5.5), &mut candidates);
        assert_eq!(candidates, [2]);
    }

    #[test]
    fn small_cell_large_cutoff() {
        let cell = UnitCell::cubic(3.0).unwrap();
        let mut cell_list = CellList::new(cell, 2.0, std::iter::empty());
        assert_eq!(cell_list.n_cells(), [1, 1, 1]);

        cell_list.add_particle(0, Vector3D::new(0.0, 0.0, 0.0));
        cell_list.add_particle(1, Vector3D::new(2.5, 2.5, 2.5));

        let mut candidates = Vec::new();
        cell_list.candidates(Vector3D::zero(), &mut candidates);
        assert_eq!(candidates, [0, 1]);
    }

    #[test]
    fn bounded_cells() {
        let positions = [
            Vector3D::new(-4.0, 0.0, 0.0),
            Vector3D::new(-3.0, 0.0, 0.0),
            Vector3D::new(4.0, 0.0, 0.0),
            Vector3D::new(4.0, 0.0, 0.0),
        ];

        let mut cell_list = CellList::new(UnitCell::infinite(), 1.5, &positions);
        // 8 / 1.5 => 5 cells along x, a single cell along y and z
        assert_eq!(cell_list.n_cells(), [5, 1, 1]);
        assert_eq!(cell_list.n_search, [1, 0, 0]);

        for (i, &position) in positions.iter().enumerate() {
            cell_list.add_particle(i, position);
        }

        assert_eq!(cell_list.cells[[0, 0, 0]], [0, 1]);
        assert_eq!(cell_list.cells[[4, 0, 0]], [2, 3]);

        let mut candidates = Vec::new();
        cell_list.candidates(positions[0], &mut candidates);
        assert_eq!(candidates, [0, 1]);

        // there are no periodic boundary conditions
        cell_list.candidates(positions[3], &mut candidates);
        assert_eq!(candidates, [2, 3]);
    }

    #[test]
    fn flat_bounded_cells() {
        let positions = [
            Vector3D::new(0.0, 0.0, 0.0),
            Vector3D::new(1.0, 0.0, 1e-300),
        ];

        let mut cell_list = CellList::new(UnitCell::infinite(), 2.0, &positions);
        let n_cells = cell_list.n_cells();
        assert_eq!(n_cells[0], 1);
        assert_eq!(n_cells[1], 1);
        for xyz in 0..3 {
            assert!(cell_list.n_search[xyz] <= n_cells[xyz]);
        }

        for (i, &position) in positions.iter().enumerate() {
            cell_list.add_particle(i, position);
        }

        let mut candidates = Vec::new();
        cell_list.candidates(positions[0], &mut candidates);
        assert_eq!(candidates, [0, 1]);

        cell_list.candidates(positions[1], &mut candidates);
        assert_eq!(candidates, [0, 1]);
    }

    #[test]
    fn limit_number_of_cells() {
        let cell = UnitCell::cubic(1000.0).unwrap();
        let cell_list = CellList::new(cell, 1.0, std::iter::empty());

        let n_cells = cell_list.n_cells();
        assert!((n_cells[0] * n_cells[1] * n_cells[2]) as f64 <= MAX_NUMBER_OF_CELLS);
        assert_eq!(n_cells[0], n_cells[1]);
        assert_eq!(n_cells[1], n_cells[2]);
        assert_eq!(cell_list.n_search, [1, 1, 1]);
    }
}
