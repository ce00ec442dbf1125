//! Three dimensional vectors and matrices, used for positions, displacements
//! and unit cells in all other modules.

/// Implement the binary operator `$Op` between `$Lhs` and `$Rhs`, for all
/// combinations of values and references.
macro_rules! impl_binary_op {
    ($Lhs:ty, $Rhs:ty, $Op:ident, $op:ident, $Output:ty, |$lhs:ident, $rhs:ident| $res:expr) => {
        impl std::ops::$Op<$Rhs> for $Lhs {
            type Output = $Output;
            #[inline] fn $op(self, other: $Rhs) -> $Output {
                let $lhs = &self;
                let $rhs = &other;
                $res
            }
        }

        impl<'a> std::ops::$Op<&'a $Rhs> for $Lhs {
            type Output = $Output;
            #[inline] fn $op(self, other: &'a $Rhs) -> $Output {
                let $lhs = &self;
                let $rhs = other;
                $res
            }
        }

        impl<'a> std::ops::$Op<$Rhs> for &'a $Lhs {
            type Output = $Output;
            #[inline] fn $op(self, other: $Rhs) -> $Output {
                let $lhs = self;
                let $rhs = &other;
                $res
            }
        }

        impl<'a, 'b> std::ops::$Op<&'b $Rhs> for &'a $Lhs {
            type Output = $Output;
            #[inline] fn $op(self, other: &'b $Rhs) -> $Output {
                let $lhs = self;
                let $rhs = other;
                $res
            }
        }
    };
}

/// Implement `$Op` (e.g. `+=`) for `$Lhs`, with `$Rhs` taken by value or by
/// reference.
macro_rules! impl_inplace_op {
    ($Lhs:ty, $Rhs:ty, $Op:ident, $op:ident, |$lhs:ident, $rhs:ident| $res:expr) => {
        impl std::ops::$Op<$Rhs> for $Lhs {
            #[inline] fn $op(&mut self, other: $Rhs) {
                let $lhs = self;
                let $rhs = &other;
                $res
            }
        }

        impl<'a> std::ops::$Op<&'a $Rhs> for $Lhs {
            #[inline] fn $op(&mut self, other: &'a $Rhs) {
                let $lhs = self;
                let $rhs = other;
                $res
            }
        }
    };
}

/// Implement `$Lhs * f64` and `$Lhs / f64` style operations.
macro_rules! impl_scalar_op {
    ($Lhs:ty, $Op:ident, $op:ident, |$lhs:ident, $scalar:ident| $res:expr) => {
        impl std::ops::$Op<f64> for $Lhs {
            type Output = $Lhs;
            #[inline] fn $op(self, $scalar: f64) -> $Lhs {
                let $lhs = &self;
                $res
            }
        }

        impl<'a> std::ops::$Op<f64> for &'a $Lhs {
            type Output = $Lhs;
            #[inline] fn $op(self, $scalar: f64) -> $Lhs {
                let $lhs = self;
                $res
            }
        }
    };
}

mod vectors;
pub use self::vectors::Vector3D;

mod matrix;
pub use self::matrix::Matrix3;
