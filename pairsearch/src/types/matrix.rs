use std::ops::{Index, IndexMut};

use super::Vector3D;

/// A 3x3 matrix type, stored in row-major order. This is used to represent
/// unit cells, where each row is one of the cell vectors.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Matrix3([[f64; 3]; 3]);

impl Matrix3 {
    /// Create a new `Matrix3` from the given rows
    pub const fn new(rows: [[f64; 3]; 3]) -> Matrix3 {
        Matrix3(rows)
    }

    /// Create a matrix with all components set to 0
    pub const fn zero() -> Matrix3 {
        Matrix3([[0.0; 3]; 3])
    }

    /// Create an identity matrix
    pub const fn one() -> Matrix3 {
        Matrix3([
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ])
    }

    /// Get the transposed matrix
    pub fn transposed(&self) -> Matrix3 {
        let m = &self.0;
        Matrix3([
            [m[0][0], m[1][0], m[2][0]],
            [m[0][1], m[1][1], m[2][1]],
            [m[0][2], m[1][2], m[2][2]],
        ])
    }

    /// Compute the determinant of this matrix
    pub fn determinant(&self) -> f64 {
        let m = &self.0;
        m[0][0] * (m[1][1] * m[2][2] - m[2][1] * m[1][2]) -
        m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0]) +
        m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Compute the inverse of this matrix. The result contains infinite or
    /// NaN values if the matrix is not invertible.
    pub fn inverse(&self) -> Matrix3 {
        let m = &self.0;
        let inv_det = 1.0 / self.determinant();

        let mut inverse = Matrix3::zero();
        inverse[0][0] = (m[1][1] * m[2][2] - m[2][1] * m[1][2]) * inv_det;
        inverse[0][1] = (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det;
        inverse[0][2] = (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv_det;
        inverse[1][0] = (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv_det;
        inverse[1][1] = (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv_det;
        inverse[1][2] = (m[1][0] * m[0][2] - m[0][0] * m[1][2]) * inv_det;
        inverse[2][0] = (m[1][0] * m[2][1] - m[2][0] * m[1][1]) * inv_det;
        inverse[2][1] = (m[2][0] * m[0][1] - m[0][0] * m[2][1]) * inv_det;
        inverse[2][2] = (m[0][0] * m[1][1] - m[1][0] * m[0][1]) * inv_det;
        return inverse;
    }

    /// Check if all the components of this matrix are finite
    pub fn is_finite(&self) -> bool {
        self.0.iter().flatten().all(|v| v.is_finite())
    }
}

impl From<[[f64; 3]; 3]> for Matrix3 {
    fn from(rows: [[f64; 3]; 3]) -> Matrix3 {
        Matrix3(rows)
    }
}

impl Index<usize> for Matrix3 {
    type Output = [f64; 3];
    #[inline]
    fn index(&self, index: usize) -> &[f64; 3] {
        &self.0[index]
    }
}

impl IndexMut<usize> for Matrix3 {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut [f64; 3] {
        &mut self.0[index]
    }
}

// matrix-vector product
impl_binary_op!(Matrix3, Vector3D, Mul, mul, Vector3D, |m, v| {
    Vector3D::new(
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    )
});

// matrix-matrix product
impl_binary_op!(Matrix3, Matrix3, Mul, mul, Matrix3, |a, b| {
    let mut result = Matrix3::zero();
    for i in 0..3 {
        for j in 0..3 {
            result[i][j] = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
        }
    }
    result
});

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn determinant() {
        assert_eq!(Matrix3::one().determinant(), 1.0);
        assert_eq!(Matrix3::zero().determinant(), 0.0);

        let matrix = Matrix3::new([
            [2.0, 0.0, 0.0],
            [1.0, 3.0, 0.0],
            [0.0, 4.0, 5.0],
        ]);
        assert_eq!(matrix.determinant(), 30.0);
    }

    #[test]
    fn inverse() {
        let matrix = Matrix3::new([
            [4.0, 0.5, 0.0],
            [-1.0, 3.0, 0.25],
            [0.0, 2.0, 5.0],
        ]);

        let product = matrix * matrix.inverse();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(product[i][j], expected, epsilon = 1e-12);
            }
        }

        assert!(!Matrix3::zero().inverse().is_finite());
    }

    #[test]
    fn vector_product() {
        let matrix = Matrix3::new([
            [1.0, 2.0, 3.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 2.0],
        ]);
        let vector = Vector3D::new(1.0, -1.0, 0.5);
        assert_eq!(matrix * vector, Vector3D::new(0.5, -1.0, 1.0));
        assert_eq!(matrix.transposed()[0], [1.0, 0.0, 0.0]);
    }
}
