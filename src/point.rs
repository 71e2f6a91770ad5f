//! Lattice points with stable identifiers.
//!
//! A Ferrers diagram is drawn here as a finite set of points in the integer
//! lattice: the part of size `n` in row `y` occupies `(1, y)` through `(n, y)`.
//! Every point carries a [`PointId`] fixed at creation, so a point can be
//! followed through any chain of transformations.
//!
//! # Citations
//! - Pak, "The nature of partition bijections II. Asymptotic stability" (2004), §2
//! - Andrews, "The Theory of Partitions" (1976), Chapter 1 – Ferrers graphs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer type of lattice coordinates.
///
/// Signed, since coordinates may leave the positive quadrant while a
/// pipeline is half way through a transformation.
pub type Coord = i64;

/// Stable identifier of a point.
///
/// # Invariant
/// - Ids are unique within a point-set that represents one diagram. This is
///   not enforced globally; bijection round trips are only observable when it
///   holds.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointId(u64);

impl PointId {
    /// Creates an id from its raw value.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw `u64` value.
    #[inline]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A lattice point tagged with an immutable id.
///
/// Coordinates are public and freely rewritten by transformations; the id is
/// only readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    /// Column.
    pub x: Coord,
    /// Row.
    pub y: Coord,
    id: PointId,
}

impl Point {
    /// Creates a point at `(x, y)` with the given id.
    #[inline]
    pub const fn new(x: Coord, y: Coord, id: PointId) -> Self {
        Self { x, y, id }
    }

    /// Returns the point's id.
    #[inline]
    pub const fn id(&self) -> PointId {
        self.id
    }

    /// Returns the coordinate selected by `axis`.
    #[inline]
    pub const fn coord(&self, axis: Axis) -> Coord {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Overwrites the coordinate selected by `axis`.
    #[inline]
    pub fn set_coord(&mut self, axis: Axis, value: Coord) {
        match axis {
            Axis::Horizontal => self.x = value,
            Axis::Vertical => self.y = value,
        }
    }

    /// Returns `(x, y, id)`, the order used for canonical sorting.
    #[inline]
    pub const fn triple(&self) -> (Coord, Coord, u64) {
        (self.x, self.y, self.id.0)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.id)
    }
}

/// Direction along which an operation reads points.
///
/// `Horizontal` selects the `x` coordinate (columns), `Vertical` selects `y`
/// (rows). A horizontal shred splits by column parity; a horizontal combine
/// regroups columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Operate on `x`.
    Horizontal,
    /// Operate on `y`.
    Vertical,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_survives_coordinate_rewrites() {
        let mut p = Point::new(3, 4, PointId::new(9));
        p.x = -1;
        p.set_coord(Axis::Vertical, 12);
        assert_eq!(p.id(), PointId::new(9));
        assert_eq!(p.triple(), (-1, 12, 9));
    }

    #[test]
    fn axis_selects_coordinate() {
        let p = Point::new(5, 7, PointId::new(1));
        assert_eq!(p.coord(Axis::Horizontal), 5);
        assert_eq!(p.coord(Axis::Vertical), 7);
    }

    #[test]
    fn display_is_comma_separated() {
        assert_eq!(Point::new(2, -1, PointId::new(40)).to_string(), "2,-1,40");
    }
}
