//! The `UnitCell` type represents the simulation box of a frame, and the
//! periodic boundary conditions used to compute displacements between
//! particles.
use crate::{Error, Matrix3, Vector3D};

/// The shape of a cell determines how periodic boundary conditions are
/// applied to displacement vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellShape {
    /// Open boundaries, displacements are plain differences of positions
    Infinite,
    /// Cuboid cell, the minimum image is found axis by axis
    Orthorhombic,
    /// Parallelepiped cell, the minimum image is found in fractional
    /// coordinates
    Triclinic,
}

/// Threshold under which off-diagonal terms of a cell matrix are considered
/// to be zero
const ORTHORHOMBIC_TOLERANCE: f64 = 1e-6;

/// An `UnitCell` defines the simulation box and its periodic boundary
/// conditions.
///
/// Cell vectors are stored as the rows of the cell matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitCell {
    matrix: Matrix3,
    /// Transpose of the cell matrix, converting fractional to cartesian
    transpose: Matrix3,
    /// Inverse of the transposed matrix, converting cartesian to fractional
    inverse: Matrix3,
    shape: CellShape,
}

impl std::convert::TryFrom<Matrix3> for UnitCell {
    type Error = Error;

    fn try_from(matrix: Matrix3) -> Result<UnitCell, Error> {
        UnitCell::from_matrix(matrix)
    }
}

impl UnitCell {
    /// Create an infinite unit cell, without periodic boundary conditions
    pub fn infinite() -> UnitCell {
        UnitCell {
            matrix: Matrix3::zero(),
            transpose: Matrix3::zero(),
            inverse: Matrix3::zero(),
            shape: CellShape::Infinite,
        }
    }

    /// Create a unit cell from the given matrix, where each row is one of the
    /// cell vectors. A zero matrix creates an infinite cell, a diagonal one an
    /// orthorhombic cell, and anything else a triclinic cell.
    pub fn from_matrix(matrix: Matrix3) -> Result<UnitCell, Error> {
        if matrix == Matrix3::zero() {
            return Ok(UnitCell::infinite());
        }

        if !matrix.is_finite() {
            return Err(Error::Configuration(
                "the unit cell matrix contains non-finite values".into()
            ));
        }

        if matrix.determinant() < ORTHORHOMBIC_TOLERANCE {
            return Err(Error::Configuration(format!(
                "the unit cell matrix must be invertible and right-handed, got a determinant of {}",
                matrix.determinant()
            )));
        }

        let off_diagonal = [
            matrix[0][1], matrix[0][2],
            matrix[1][0], matrix[1][2],
            matrix[2][0], matrix[2][1],
        ];
        let shape = if off_diagonal.iter().all(|v| v.abs() < ORTHORHOMBIC_TOLERANCE) {
            CellShape::Orthorhombic
        } else {
            CellShape::Triclinic
        };

        let transpose = matrix.transposed();
        return Ok(UnitCell {
            matrix: matrix,
            transpose: transpose,
            inverse: transpose.inverse(),
            shape: shape,
        });
    }

    /// Create an orthorhombic unit cell, with side lengths `a, b, c`.
    pub fn orthorhombic(a: f64, b: f64, c: f64) -> Result<UnitCell, Error> {
        check_lengths(a, b, c)?;
        return UnitCell::from_matrix(Matrix3::new([
            [a, 0.0, 0.0],
            [0.0, b, 0.0],
            [0.0, 0.0, c],
        ]));
    }

    /// Create a cubic unit cell, with side length `length`.
    pub fn cubic(length: f64) -> Result<UnitCell, Error> {
        UnitCell::orthorhombic(length, length, length)
    }

    /// Create a triclinic unit cell, with side lengths `a, b, c` and angles
    /// `alpha, beta, gamma` given in degrees. The first vector is aligned with
    /// the x axis, and the second one is in the xy plane.
    pub fn triclinic(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Result<UnitCell, Error> {
        check_lengths(a, b, c)?;

        let cos_alpha = alpha.to_radians().cos();
        let cos_beta = beta.to_radians().cos();
        let (sin_gamma, cos_gamma) = gamma.to_radians().sin_cos();

        let c_x = c * cos_beta;
        let c_y = c * (cos_alpha - cos_beta * cos_gamma) / sin_gamma;
        let c_z2 = c * c - c_x * c_x - c_y * c_y;
        if !(c_z2 > 0.0) {
            return Err(Error::Configuration(format!(
                "the angles ({}, {}, {}) do not define a valid unit cell",
                alpha, beta, gamma
            )));
        }

        return UnitCell::from_matrix(Matrix3::new([
            [a, 0.0, 0.0],
            [b * cos_gamma, b * sin_gamma, 0.0],
            [c_x, c_y, c_z2.sqrt()],
        ]));
    }

    /// Get the cell shape
    pub fn shape(&self) -> CellShape {
        self.shape
    }

    /// Check if this unit cell is infinite, *i.e.* if it does not have
    /// periodic boundary conditions.
    pub fn is_infinite(&self) -> bool {
        self.shape == CellShape::Infinite
    }

    /// Get the matrix representation of the unit cell
    pub fn matrix(&self) -> Matrix3 {
        self.matrix
    }

    /// Get the distances between opposite faces of the unit cell. This is
    /// the extent of the cell along the normal of each pair of faces, and is
    /// infinite for infinite cells.
    pub fn distances_between_faces(&self) -> Vector3D {
        if self.is_infinite() {
            return Vector3D::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
        }

        let a = Vector3D::from(self.matrix[0]);
        let b = Vector3D::from(self.matrix[1]);
        let c = Vector3D::from(self.matrix[2]);

        let na = (b ^ c).normalized();
        let nb = (c ^ a).normalized();
        let nc = (a ^ b).normalized();

        Vector3D::new(f64::abs(na * a), f64::abs(nb * b), f64::abs(nc * c))
    }

    /// Get the fractional representation of the cartesian `vector` in this
    /// cell
    pub fn fractional(&self, vector: Vector3D) -> Vector3D {
        self.inverse * vector
    }

    /// Get the cartesian representation of the `fractional` vector in this
    /// cell
    pub fn cartesian(&self, fractional: Vector3D) -> Vector3D {
        self.transpose * fractional
    }

    /// Get the periodic image of `vector` closest to the origin, following
    /// the minimum image convention. For a cubic cell of side length `L`,
    /// all the components of the result are in `[-L/2, L/2]`.
    ///
    /// For triclinic cells, the image is found by rounding the fractional
    /// coordinates, which gives the shortest image as long as the vector is
    /// shorter than half of the smallest distance between faces.
    pub fn minimum_image(&self, vector: Vector3D) -> Vector3D {
        match self.shape {
            CellShape::Infinite => vector,
            CellShape::Orthorhombic => {
                let mut image = vector;
                for i in 0..3 {
                    let length = self.matrix[i][i];
                    image[i] -= f64::round(image[i] / length) * length;
                }
                image
            }
            CellShape::Triclinic => {
                let mut fractional = self.fractional(vector);
                for i in 0..3 {
                    fractional[i] -= f64::round(fractional[i]);
                }
                self.cartesian(fractional)
            }
        }
    }

    /// Get the displacement vector going from `first` to `second`, using
    /// the minimum image convention
    pub fn displacement(&self, first: Vector3D, second: Vector3D) -> Vector3D {
        self.minimum_image(second - first)
    }

    /// Get the distance between `first` and `second`, using the minimum
    /// image convention
    pub fn distance(&self, first: Vector3D, second: Vector3D) -> f64 {
        self.displacement(first, second).norm()
    }
}

fn check_lengths(a: f64, b: f64, c: f64) -> Result<(), Error> {
    if a > 0.0 && b > 0.0 && c > 0.0 && a.is_finite() && b.is_finite() && c.is_finite() {
        Ok(())
    } else {
        Err(Error::Configuration(format!(
            "cell lengths must be positive and finite, got ({}, {}, {})", a, b, c
        )))
    }
}
