//! 2×2 integer matrices and the families the shift transformation accepts.
//!
//! A matrix family is a set of constraints a matrix must satisfy before it may
//! drive a [`shift`](crate::bgt::shift):
//! - Special linear: determinant 1 (Pak's convention, the one `shift` uses)
//! - Shear: unit diagonal and exactly one nonzero off-diagonal entry
//!
//! Every shear is special linear, so a validated [`ShearMatrix`] converts into
//! an [`SlMatrix`] without re-checking.
//!
//! # Citations
//! - Pak, "The nature of partition bijections II" (2004), §2 – shift by SL(2, Z)
//! - Newman, "Integral Matrices" (1972), Chapter VII – generators of SL(2, Z)

use crate::point::Coord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// Error type for matrix validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    /// Determinant is not 1.
    NotSpecialLinear {
        /// The offending determinant.
        determinant: Coord,
    },
    /// Diagonal is not (1, 1) or the off-diagonal entries are not exactly one nonzero.
    NotShear,
    /// An entry, the determinant or a product does not fit in a [`Coord`].
    Overflow,
}

impl fmt::Display for MatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixError::NotSpecialLinear { determinant } => {
                write!(f, "matrix is not special linear (determinant {})", determinant)
            }
            MatrixError::NotShear => write!(f, "matrix is not a shear"),
            MatrixError::Overflow => write!(f, "matrix arithmetic overflows the coordinate type"),
        }
    }
}

impl std::error::Error for MatrixError {}

/// A plain 2×2 integer matrix, rows `(a11 a12)` and `(a21 a22)`.
///
/// Entries are fixed after construction. No constraint is implied; use a
/// [`MatrixFamily`] to obtain a validated matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Matrix2x2 {
    a11: Coord,
    a12: Coord,
    a21: Coord,
    a22: Coord,
}

impl Matrix2x2 {
    /// Creates a matrix from its entries in row-major order.
    #[inline]
    pub const fn new(a11: Coord, a12: Coord, a21: Coord, a22: Coord) -> Self {
        Self { a11, a12, a21, a22 }
    }

    /// The identity matrix.
    pub const IDENTITY: Matrix2x2 = Matrix2x2::new(1, 0, 0, 1);

    /// Returns the entries in row-major order.
    #[inline]
    pub const fn entries(&self) -> [Coord; 4] {
        [self.a11, self.a12, self.a21, self.a22]
    }

    /// `a11·a22 − a12·a21`, or `None` if it does not fit in a [`Coord`].
    #[inline]
    pub const fn determinant(&self) -> Option<Coord> {
        match (self.a11.checked_mul(self.a22), self.a12.checked_mul(self.a21)) {
            (Some(main), Some(anti)) => main.checked_sub(anti),
            _ => None,
        }
    }

    /// Whether the determinant is exactly 1.
    #[inline]
    pub const fn is_special_linear(&self) -> bool {
        matches!(self.determinant(), Some(1))
    }

    /// Whether every entry can be negated without overflow.
    #[inline]
    const fn is_negatable(&self) -> bool {
        self.a11 != Coord::MIN
            && self.a12 != Coord::MIN
            && self.a21 != Coord::MIN
            && self.a22 != Coord::MIN
    }

    /// Whether the diagonal is (1, 1) and exactly one off-diagonal entry is nonzero.
    #[inline]
    pub const fn is_shear(&self) -> bool {
        self.a11 == 1 && self.a22 == 1 && ((self.a12 == 0) != (self.a21 == 0))
    }

    /// Matrix–vector product `M·(x, y)`.
    ///
    /// Both output coordinates are computed from the original pair. Keeping
    /// entries and coordinates small enough for the products to fit in a
    /// [`Coord`] is left to the caller.
    #[inline]
    pub const fn apply(&self, x: Coord, y: Coord) -> (Coord, Coord) {
        (self.a11 * x + self.a12 * y, self.a21 * x + self.a22 * y)
    }

    /// Matrix product `self · rhs`, or `None` on overflow.
    pub fn compose(&self, rhs: &Matrix2x2) -> Option<Matrix2x2> {
        Some(Matrix2x2::new(
            dot(self.a11, rhs.a11, self.a12, rhs.a21)?,
            dot(self.a11, rhs.a12, self.a12, rhs.a22)?,
            dot(self.a21, rhs.a11, self.a22, rhs.a21)?,
            dot(self.a21, rhs.a12, self.a22, rhs.a22)?,
        ))
    }
}

/// `a·b + c·d` with overflow checks.
fn dot(a: Coord, b: Coord, c: Coord, d: Coord) -> Option<Coord> {
    a.checked_mul(b)?.checked_add(c.checked_mul(d)?)
}

impl fmt::Display for Matrix2x2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[[{}, {}], [{}, {}]]", self.a11, self.a12, self.a21, self.a22)
    }
}

/// A family of matrices, checked once at construction.
///
/// Implementors are zero-sized markers, in the same way doctrines mark the
/// invariants a graph operation must keep.
pub trait MatrixFamily {
    /// Human-readable family name.
    const NAME: &'static str;

    /// Accepts or rejects a matrix.
    fn validate(matrix: &Matrix2x2) -> Result<(), MatrixError>;
}

/// Matrices with determinant 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SpecialLinear;

impl MatrixFamily for SpecialLinear {
    const NAME: &'static str = "special linear";

    /// Entries equal to `Coord::MIN` are rejected too, so the inverse always exists in range.
    fn validate(matrix: &Matrix2x2) -> Result<(), MatrixError> {
        match matrix.determinant() {
            Some(1) if matrix.is_negatable() => Ok(()),
            Some(1) | None => Err(MatrixError::Overflow),
            Some(determinant) => Err(MatrixError::NotSpecialLinear { determinant }),
        }
    }
}

/// Elementary shears `[[1, s], [0, 1]]` and `[[1, 0], [s, 1]]` with `s ≠ 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Shear;

impl MatrixFamily for Shear {
    const NAME: &'static str = "shear";

    fn validate(matrix: &Matrix2x2) -> Result<(), MatrixError> {
        if !matrix.is_shear() {
            Err(MatrixError::NotShear)
        } else if !matrix.is_negatable() {
            Err(MatrixError::Overflow)
        } else {
            Ok(())
        }
    }
}

/// A matrix known to belong to family `F`.
///
/// Only obtainable through validation, so holding one is proof of membership.
pub struct Validated<F> {
    matrix: Matrix2x2,
    family: PhantomData<F>,
}

/// A validated special-linear matrix, the argument type of `shift`.
pub type SlMatrix = Validated<SpecialLinear>;

/// A validated shear.
pub type ShearMatrix = Validated<Shear>;

impl<F: MatrixFamily> Validated<F> {
    /// Validates `matrix` against `F`.
    pub fn try_from_matrix(matrix: Matrix2x2) -> Result<Self, MatrixError> {
        F::validate(&matrix)?;
        Ok(Self {
            matrix,
            family: PhantomData,
        })
    }

    /// Builds and validates a matrix from row-major entries.
    pub fn new(a11: Coord, a12: Coord, a21: Coord, a22: Coord) -> Result<Self, MatrixError> {
        Self::try_from_matrix(Matrix2x2::new(a11, a12, a21, a22))
    }

    /// Returns the underlying matrix.
    #[inline]
    pub const fn matrix(&self) -> &Matrix2x2 {
        &self.matrix
    }
}

impl SlMatrix {
    /// The identity.
    pub const IDENTITY: SlMatrix = Validated {
        matrix: Matrix2x2::IDENTITY,
        family: PhantomData,
    };

    /// The inverse in SL(2, Z): `[[a22, −a12], [−a21, a11]]`.
    pub fn inverse(&self) -> SlMatrix {
        let [a11, a12, a21, a22] = self.matrix.entries();
        Validated {
            matrix: Matrix2x2::new(a22, -a12, -a21, a11),
            family: PhantomData,
        }
    }

    /// Product `self · rhs`, which is again special linear.
    ///
    /// Fails with [`MatrixError::Overflow`] if an entry of the product does
    /// not fit in a [`Coord`].
    pub fn compose(&self, rhs: &SlMatrix) -> Result<SlMatrix, MatrixError> {
        let product = self
            .matrix
            .compose(&rhs.matrix)
            .ok_or(MatrixError::Overflow)?;
        Self::try_from_matrix(product)
    }
}

impl ShearMatrix {
    /// `[[1, s], [0, 1]]`: `x' = x + s·y`.
    pub fn horizontal(s: Coord) -> Result<Self, MatrixError> {
        Self::new(1, s, 0, 1)
    }

    /// `[[1, 0], [s, 1]]`: `y' = s·x + y`.
    pub fn vertical(s: Coord) -> Result<Self, MatrixError> {
        Self::new(1, 0, s, 1)
    }
}

impl From<ShearMatrix> for SlMatrix {
    fn from(shear: ShearMatrix) -> Self {
        Validated {
            matrix: shear.matrix,
            family: PhantomData,
        }
    }
}

impl<F> Clone for Validated<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F> Copy for Validated<F> {}

impl<F> PartialEq for Validated<F> {
    fn eq(&self, other: &Self) -> bool {
        self.matrix == other.matrix
    }
}

impl<F> Eq for Validated<F> {}

impl<F: MatrixFamily> fmt::Debug for Validated<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", F::NAME, self.matrix)
    }
}
