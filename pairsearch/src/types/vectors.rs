use std::ops::{Index, IndexMut, Neg};

use approx::{AbsDiffEq, RelativeEq, UlpsEq};

/// A 3-dimensional vector type, used for particle positions and displacements
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Vector3D([f64; 3]);

impl Vector3D {
    /// Create a new `Vector3D` with components `x`, `y`, `z`
    pub const fn new(x: f64, y: f64, z: f64) -> Vector3D {
        Vector3D([x, y, z])
    }

    /// Create a new `Vector3D` with all components set to 0
    pub const fn zero() -> Vector3D {
        Vector3D([0.0, 0.0, 0.0])
    }

    /// Get the squared euclidean norm of this vector
    #[inline]
    pub fn norm2(&self) -> f64 {
        self * self
    }

    /// Get the euclidean norm of this vector
    #[inline]
    pub fn norm(&self) -> f64 {
        f64::sqrt(self.norm2())
    }

    /// Get a normalized copy of this vector. The result is made of NaN if
    /// the vector norm is zero.
    #[inline]
    pub fn normalized(&self) -> Vector3D {
        self / self.norm()
    }

    /// Check if all the components of this vector are finite
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }

    /// Get the components of this vector as an array
    pub fn as_array(&self) -> &[f64; 3] {
        &self.0
    }
}

impl From<[f64; 3]> for Vector3D {
    fn from(array: [f64; 3]) -> Vector3D {
        Vector3D(array)
    }
}

impl From<Vector3D> for [f64; 3] {
    fn from(vector: Vector3D) -> [f64; 3] {
        vector.0
    }
}

impl Index<usize> for Vector3D {
    type Output = f64;
    #[inline]
    fn index(&self, index: usize) -> &f64 {
        &self.0[index]
    }
}

impl IndexMut<usize> for Vector3D {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.0[index]
    }
}

impl_binary_op!(Vector3D, Vector3D, Add, add, Vector3D, |a, b| {
    Vector3D::new(a[0] + b[0], a[1] + b[1], a[2] + b[2])
});

impl_binary_op!(Vector3D, Vector3D, Sub, sub, Vector3D, |a, b| {
    Vector3D::new(a[0] - b[0], a[1] - b[1], a[2] - b[2])
});

// dot product
impl_binary_op!(Vector3D, Vector3D, Mul, mul, f64, |a, b| {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
});

// cross product
impl_binary_op!(Vector3D, Vector3D, BitXor, bitxor, Vector3D, |a, b| {
    Vector3D::new(
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    )
});

impl_inplace_op!(Vector3D, Vector3D, AddAssign, add_assign, |a, b| {
    a.0[0] += b[0];
    a.0[1] += b[1];
    a.0[2] += b[2];
});

impl_inplace_op!(Vector3D, Vector3D, SubAssign, sub_assign, |a, b| {
    a.0[0] -= b[0];
    a.0[1] -= b[1];
    a.0[2] -= b[2];
});

impl_scalar_op!(Vector3D, Mul, mul, |v, s| Vector3D::new(v[0] * s, v[1] * s, v[2] * s));
impl_scalar_op!(Vector3D, Div, div, |v, s| Vector3D::new(v[0] / s, v[1] / s, v[2] / s));

impl std::ops::MulAssign<f64> for Vector3D {
    #[inline]
    fn mul_assign(&mut self, scalar: f64) {
        *self = *self * scalar;
    }
}

impl std::ops::DivAssign<f64> for Vector3D {
    #[inline]
    fn div_assign(&mut self, scalar: f64) {
        *self = *self / scalar;
    }
}

impl Neg for Vector3D {
    type Output = Vector3D;
    #[inline]
    fn neg(self) -> Vector3D {
        Vector3D::new(-self[0], -self[1], -self[2])
    }
}

impl AbsDiffEq for Vector3D {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Vector3D, epsilon: f64) -> bool {
        f64::abs_diff_eq(&self[0], &other[0], epsilon) &&
        f64::abs_diff_eq(&self[1], &other[1], epsilon) &&
        f64::abs_diff_eq(&self[2], &other[2], epsilon)
    }
}

impl RelativeEq for Vector3D {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Vector3D, epsilon: f64, max_relative: f64) -> bool {
        f64::relative_eq(&self[0], &other[0], epsilon, max_relative) &&
        f64::relative_eq(&self[1], &other[1], epsilon, max_relative) &&
        f64::relative_eq(&self[2], &other[2], epsilon, max_relative)
    }
}

impl UlpsEq for Vector3D {
    fn default_max_ulps() -> u32 {
        f64::default_max_ulps()
    }

    fn ulps_eq(&self, other: &Vector3D, epsilon: f64, max_ulps: u32) -> bool {
        f64::ulps_eq(&self[0], &other[0], epsilon, max_ulps) &&
        f64::ulps_eq(&self[1], &other[1], epsilon, max_ulps) &&
        f64::ulps_eq(&self[2], &other[2], epsilon, max_ulps)
    }
}
