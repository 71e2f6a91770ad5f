//! Basic geometric transformations on point-sets.
//!
//! Every operation takes its input by reference and returns fresh point-sets;
//! ids ride along unchanged, so a point can be followed through any pipeline
//! built from these pieces.
//!
//! - [`shift`]: apply a special-linear matrix
//! - [`move_by`]: translate
//! - [`cut`] / [`paste`]: split by a half-plane and concatenate back
//! - [`shred2`]: split by parity of one coordinate
//! - [`stretch`]: scale rows and divide columns
//! - [`conjugate`]: reflect across `x = y`
//!
//! # Citations
//! - Pak, "Partition bijections, a survey" (2006), §4 – geometric bijections
//! - Pak, "The nature of partition bijections II" (2004), §2 – BGT/BAT calculus

use crate::matrix::SlMatrix;
use crate::point::{Axis, Coord, PointId};
use crate::point_set::PointSet;
use std::collections::HashMap;
use std::fmt;

/// Error type for transformation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// Two points would occupy the same position after a checked paste.
    PositionCollision {
        /// Column of the collision.
        x: Coord,
        /// Row of the collision.
        y: Coord,
        /// Id of the point already there.
        first: PointId,
        /// Id of the incoming point.
        second: PointId,
    },
    /// `stretch` was asked to divide by zero.
    ZeroDivisor,
    /// A checked stretch would merge points.
    NotInjective {
        /// Row factor.
        k: Coord,
        /// Column divisor.
        l: Coord,
        /// First point whose column is not a multiple of `l`, if any.
        offending: Option<PointId>,
    },
    /// `split` met a rank that neither profile accounts for.
    ProfileMismatch {
        /// 1-based rank of the unmatched group.
        rank: usize,
    },
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformError::PositionCollision { x, y, first, second } => write!(
                f,
                "points {} and {} collide at ({}, {})",
                first, second, x, y
            ),
            TransformError::ZeroDivisor => write!(f, "stretch divisor is zero"),
            TransformError::NotInjective { k, l, offending } => match offending {
                Some(id) => write!(
                    f,
                    "stretch({}, {}) is not injective: column of point {} is not divisible",
                    k, l, id
                ),
                None => write!(f, "stretch({}, {}) is not injective", k, l),
            },
            TransformError::ProfileMismatch { rank } => {
                write!(f, "no group of rank {} in either profile", rank)
            }
        }
    }
}

impl std::error::Error for TransformError {}

/// Applies `matrix` to every point: `(x, y) → M·(x, y)`.
///
/// Special-linear matrices are invertible over the integers, so the result is
/// always injective.
pub fn shift(points: &PointSet, matrix: &SlMatrix) -> PointSet {
    let m = *matrix.matrix();
    points.clone().map_points(|p| {
        let (x, y) = m.apply(p.x, p.y);
        p.x = x;
        p.y = y;
    })
}

/// Translates every point by `(a, b)`.
pub fn move_by(points: &PointSet, a: Coord, b: Coord) -> PointSet {
    points.clone().map_points(|p| {
        p.x += a;
        p.y += b;
    })
}

/// Splits by the line `a·x + b·y = c`.
///
/// Returns `(top, bottom)`: a point goes to `bottom` iff `a·x + b·y > c`, so
/// points on the line stay in `top`. Relative order is kept in both halves.
pub fn cut(points: &PointSet, a: Coord, b: Coord, c: Coord) -> (PointSet, PointSet) {
    let (bottom, top): (Vec<_>, Vec<_>) = points
        .iter()
        .copied()
        .partition(|p| a * p.x + b * p.y > c);
    (PointSet::from_points(top), PointSet::from_points(bottom))
}

/// Concatenates `first` and `second` without checking positions.
pub fn paste(first: &PointSet, second: &PointSet) -> PointSet {
    let mut out = PointSet::with_capacity(first.len() + second.len());
    out.extend(first.iter().copied());
    out.extend(second.iter().copied());
    out
}

/// Concatenates `first` and `second`, failing if a point of `second` lands on
/// a position already held by `first`.
pub fn paste_checked(first: &PointSet, second: &PointSet) -> Result<PointSet, TransformError> {
    let occupied: HashMap<(Coord, Coord), PointId> =
        first.iter().map(|p| ((p.x, p.y), p.id())).collect();
    for p in second {
        if let Some(&existing) = occupied.get(&(p.x, p.y)) {
            return Err(TransformError::PositionCollision {
                x: p.x,
                y: p.y,
                first: existing,
                second: p.id(),
            });
        }
    }
    Ok(paste(first, second))
}

/// [`paste`] on a `(first, second)` pair, as returned by [`cut`] or [`shred2`].
pub fn paste_pair(pair: &(PointSet, PointSet)) -> PointSet {
    paste(&pair.0, &pair.1)
}

/// [`paste_checked`] on a `(first, second)` pair.
pub fn paste_pair_checked(pair: &(PointSet, PointSet)) -> Result<PointSet, TransformError> {
    paste_checked(&pair.0, &pair.1)
}

/// Splits by parity of the coordinate `axis` selects.
///
/// Returns `(first, second)` with even values in `first` and odd values in
/// `second`. Negative coordinates follow the same parity rule.
pub fn shred2(points: &PointSet, axis: Axis) -> (PointSet, PointSet) {
    let (odd, even): (Vec<_>, Vec<_>) = points
        .iter()
        .copied()
        .partition(|p| p.coord(axis).rem_euclid(2) == 1);
    (PointSet::from_points(even), PointSet::from_points(odd))
}

/// `(x, y) → (x / l, k·y)` with truncating division.
///
/// Injectivity requires `k ≠ 0` and every `x` divisible by `l`; this is left
/// to the caller. Use [`stretch_exact`] to have it checked.
pub fn stretch(points: &PointSet, k: Coord, l: Coord) -> Result<PointSet, TransformError> {
    if l == 0 {
        return Err(TransformError::ZeroDivisor);
    }
    Ok(points.clone().map_points(|p| {
        p.x /= l;
        p.y *= k;
    }))
}

/// [`stretch`] that also rejects non-injective parameters.
pub fn stretch_exact(points: &PointSet, k: Coord, l: Coord) -> Result<PointSet, TransformError> {
    if l == 0 {
        return Err(TransformError::ZeroDivisor);
    }
    if k == 0 && points.len() > 1 {
        return Err(TransformError::NotInjective {
            k,
            l,
            offending: None,
        });
    }
    if let Some(p) = points.iter().find(|p| p.x % l != 0) {
        return Err(TransformError::NotInjective {
            k,
            l,
            offending: Some(p.id()),
        });
    }
    stretch(points, k, l)
}

/// Reflects across `x = y`.
pub fn conjugate(points: &PointSet) -> PointSet {
    points.clone().map_points(|p| std::mem::swap(&mut p.x, &mut p.y))
}
