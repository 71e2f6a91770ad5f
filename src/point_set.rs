//! Ordered point collections and the partitions they draw.
//!
//! A [`PointSet`] is the value every transformation consumes and produces.
//! Its order carries no set meaning but is kept so that output is
//! deterministic; comparisons that should ignore order go through
//! [`PointSet::same_points`].

use crate::fingerprint::{HashValue, PointSetFingerprint};
use crate::point::{Axis, Coord, Point, PointId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// An ordered collection of lattice points.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointSet {
    points: Vec<Point>,
}

impl PointSet {
    /// Creates an empty point-set.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty point-set with room for `capacity` points.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Wraps an existing vector of points.
    #[inline]
    pub fn from_points(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Lays out a Ferrers diagram, one row per part in the order given.
    ///
    /// Row `y` (1-based) holds `(1, y) ..= (parts[y-1], y)`. Ids run from 1 in
    /// row-major order.
    pub fn from_parts(parts: &[usize]) -> Self {
        let total = parts.iter().sum();
        let mut out = Self::with_capacity(total);
        let mut id = 0u64;
        for (row, &len) in parts.iter().enumerate() {
            let y = row as Coord + 1;
            for x in 1..=len as Coord {
                id += 1;
                out.points.push(Point::new(x, y, PointId::new(id)));
            }
        }
        out
    }

    /// Expands a multiplicity vector into a Ferrers diagram.
    ///
    /// `multiplicities[i]` is the number of parts of size `i + 1`. Parts are
    /// laid out largest first.
    pub fn from_multiplicities(multiplicities: &[usize]) -> Self {
        let mut parts = Vec::new();
        for (index, &count) in multiplicities.iter().enumerate().rev() {
            parts.extend(std::iter::repeat(index + 1).take(count));
        }
        Self::from_parts(&parts)
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether there are no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Appends a point.
    #[inline]
    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    /// Iterates over the points in order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.points.iter()
    }

    /// Borrows the points as a slice.
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Consumes the set, returning its points.
    #[inline]
    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    /// Rewrites each point in place with `f`, consuming `self`.
    ///
    /// Transformations call this on a private copy; the caller's set is never
    /// touched.
    pub(crate) fn map_points(mut self, mut f: impl FnMut(&mut Point)) -> Self {
        for point in &mut self.points {
            f(point);
        }
        self
    }

    /// `(x, y, id)` triples in sorted order.
    ///
    /// Two point-sets with equal canonical forms hold the same points.
    pub fn canonical(&self) -> Vec<(Coord, Coord, u64)> {
        let mut triples: Vec<_> = self.points.iter().map(Point::triple).collect();
        triples.sort_unstable();
        triples
    }

    /// Multiset equality of `(x, y, id)` triples, ignoring order.
    pub fn same_points(&self, other: &PointSet) -> bool {
        self.len() == other.len() && self.canonical() == other.canonical()
    }

    /// Sorted ids.
    pub fn ids(&self) -> Vec<PointId> {
        let mut ids: Vec<_> = self.points.iter().map(Point::id).collect();
        ids.sort_unstable();
        ids
    }

    /// Order-independent content hash.
    pub fn fingerprint(&self) -> HashValue {
        PointSetFingerprint::of(self).hash()
    }

    /// Number of points on each line along `axis`, keyed by the line's coordinate.
    ///
    /// `Axis::Vertical` counts rows (points sharing `y`), `Axis::Horizontal`
    /// counts columns.
    pub fn line_sizes(&self, axis: Axis) -> BTreeMap<Coord, usize> {
        let mut sizes = BTreeMap::new();
        for point in &self.points {
            *sizes.entry(point.coord(axis)).or_insert(0) += 1;
        }
        sizes
    }

    /// Row sizes in ascending `y` order.
    pub fn row_lengths(&self) -> Vec<usize> {
        self.line_sizes(Axis::Vertical).into_values().collect()
    }

    /// The partition drawn by this set, if it is exactly a Ferrers diagram.
    ///
    /// That means rows `y = 1..=k`, row `y` holding `x = 1..=λ_y` once each,
    /// with `λ` non-increasing. The empty set draws the empty partition.
    pub fn shape(&self) -> Option<Vec<usize>> {
        let mut seen = HashSet::with_capacity(self.points.len());
        for point in &self.points {
            if point.x < 1 || point.y < 1 || !seen.insert((point.x, point.y)) {
                return None;
            }
        }
        let rows = self.line_sizes(Axis::Vertical);
        let mut parts = Vec::with_capacity(rows.len());
        for (expected, (&y, &len)) in (1..).zip(rows.iter()) {
            if y != expected {
                return None;
            }
            parts.push(len);
        }
        // Distinct positive positions plus row counts: a row of length n is
        // left-justified iff its largest x is n.
        let mut widest: BTreeMap<Coord, Coord> = BTreeMap::new();
        for point in &self.points {
            let w = widest.entry(point.y).or_insert(0);
            *w = (*w).max(point.x);
        }
        for (&y, &max_x) in &widest {
            if max_x as usize != parts[(y - 1) as usize] {
                return None;
            }
        }
        if parts.windows(2).any(|w| w[0] < w[1]) {
            return None;
        }
        Some(parts)
    }

    /// Whether this set is a Ferrers diagram of a partition in `class`.
    pub fn belongs_to(&self, class: PartitionClass) -> bool {
        self.shape().map_or(false, |parts| class.contains(&parts))
    }
}

impl fmt::Display for PointSet {
    /// One `x,y,id` line per point.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for point in &self.points {
            writeln!(f, "{}", point)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for PointSet {
    type Err = crate::format::FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::format::read_point_set(s.as_bytes())
    }
}

impl From<Vec<Point>> for PointSet {
    fn from(points: Vec<Point>) -> Self {
        Self::from_points(points)
    }
}

impl FromIterator<Point> for PointSet {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl Extend<Point> for PointSet {
    fn extend<I: IntoIterator<Item = Point>>(&mut self, iter: I) {
        self.points.extend(iter);
    }
}

impl IntoIterator for PointSet {
    type Item = Point;
    type IntoIter = std::vec::IntoIter<Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// A class of partitions a bijection maps from or to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartitionClass {
    /// Every partition.
    Any,
    /// All parts odd.
    OddParts,
    /// All parts different.
    DistinctParts,
    /// All parts odd and different.
    DistinctOddParts,
    /// Ferrers diagram symmetric under conjugation.
    SelfConjugate,
}

impl PartitionClass {
    /// Whether `parts` (non-increasing) lies in this class.
    pub fn contains(&self, parts: &[usize]) -> bool {
        let odd = || parts.iter().all(|p| p % 2 == 1);
        let distinct = || parts.windows(2).all(|w| w[0] > w[1]);
        match self {
            PartitionClass::Any => true,
            PartitionClass::OddParts => odd(),
            PartitionClass::DistinctParts => distinct(),
            PartitionClass::DistinctOddParts => odd() && distinct(),
            PartitionClass::SelfConjugate => conjugate_parts(parts) == parts,
        }
    }
}

impl fmt::Display for PartitionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PartitionClass::Any => "any partition",
            PartitionClass::OddParts => "odd parts",
            PartitionClass::DistinctParts => "distinct parts",
            PartitionClass::DistinctOddParts => "distinct odd parts",
            PartitionClass::SelfConjugate => "self-conjugate",
        };
        f.write_str(name)
    }
}

/// Conjugate of a non-increasing partition: column lengths of its diagram.
pub fn conjugate_parts(parts: &[usize]) -> Vec<usize> {
    let largest = parts.first().copied().unwrap_or(0);
    (1..=largest)
        .map(|c| parts.iter().take_while(|&&p| p >= c).count())
        .collect()
}

/// Size of the Durfee square: the largest `d` with `λ_d ≥ d`.
pub fn durfee_size(parts: &[usize]) -> usize {
    parts
        .iter()
        .enumerate()
        .take_while(|&(i, &p)| p > i)
        .count()
}
