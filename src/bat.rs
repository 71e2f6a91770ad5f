//! Basic arithmetic transformations: merging two diagrams line by line.
//!
//! [`combine`] groups each input by one coordinate, orders all groups by size
//! and renumbers them, which adds partitions part-wise ([`sum`], by columns)
//! or merges their parts ([`union`], by rows). [`split`] undoes a combine when
//! the shapes of both inputs are known.
//!
//! # Citations
//! - Pak, "The nature of partition bijections II" (2004), §3 – sum and union of diagrams

use crate::bgt::TransformError;
use crate::point::{Axis, Coord};
use crate::point_set::PointSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Groups `points` by the coordinate `axis` selects, ascending by key.
fn groups(points: &PointSet, axis: Axis) -> BTreeMap<Coord, PointSet> {
    let mut out: BTreeMap<Coord, PointSet> = BTreeMap::new();
    for p in points {
        out.entry(p.coord(axis)).or_default().push(*p);
    }
    out
}

/// Merges `first` and `second` by ranking their lines along `axis`.
///
/// Lines are formed per input and never merged across inputs. All lines of
/// `first` (ascending key) come before all lines of `second`; a stable sort by
/// decreasing size then assigns ranks `1, 2, ...`, and every point's grouped
/// coordinate becomes its line's rank. The other coordinate and the id are
/// untouched.
pub fn combine(first: &PointSet, second: &PointSet, axis: Axis) -> PointSet {
    let mut lines: Vec<PointSet> = groups(first, axis).into_values().collect();
    lines.extend(groups(second, axis).into_values());
    lines.sort_by(|a, b| b.len().cmp(&a.len()));

    let mut out = PointSet::with_capacity(first.len() + second.len());
    for (index, line) in lines.into_iter().enumerate() {
        let rank = index as Coord + 1;
        out.extend(line.map_points(|p| p.set_coord(axis, rank)));
    }
    out
}

/// Part-wise sum: [`combine`] by columns.
pub fn sum(first: &PointSet, second: &PointSet) -> PointSet {
    combine(first, second, Axis::Horizontal)
}

/// Union of parts: [`combine`] by rows.
pub fn union(first: &PointSet, second: &PointSet) -> PointSet {
    combine(first, second, Axis::Vertical)
}

/// [`combine`] on a `(first, second)` pair.
pub fn combine_pair(pair: &(PointSet, PointSet), axis: Axis) -> PointSet {
    combine(&pair.0, &pair.1, axis)
}

/// Sizes of an input's lines along one axis, ascending by key.
///
/// This is exactly what [`combine`] forgets about an input, so two profiles
/// are enough to [`split`] its output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupProfile {
    lines: Vec<(Coord, usize)>,
}

impl GroupProfile {
    /// Profile of `points` grouped along `axis`.
    pub fn of(points: &PointSet, axis: Axis) -> Self {
        Self {
            lines: points.line_sizes(axis).into_iter().collect(),
        }
    }

    /// Column profile of a left-justified diagram with the given row lengths.
    ///
    /// Column `c` (from 1) holds one point per row of length at least `c`.
    /// Rows need not be sorted; negative lengths count as empty rows.
    pub fn of_rows(rows: &[Coord]) -> Self {
        let widest = rows.iter().copied().max().unwrap_or(0).max(0);
        Self {
            lines: (1..=widest)
                .map(|c| (c, rows.iter().filter(|&&len| len >= c).count()))
                .collect(),
        }
    }

    /// `(key, size)` pairs in ascending key order.
    pub fn lines(&self) -> &[(Coord, usize)] {
        &self.lines
    }

    /// Total number of points the profile describes.
    pub fn total(&self) -> usize {
        self.lines.iter().map(|&(_, size)| size).sum()
    }
}

/// Inverse of [`combine`]: sorts the points of `combined` back into the two
/// inputs whose profiles are given.
///
/// Fails with [`TransformError::ProfileMismatch`] when a point's rank has no
/// group in either profile or when a rank holds a different number of points
/// than its group.
pub fn split(
    combined: &PointSet,
    first: &GroupProfile,
    second: &GroupProfile,
    axis: Axis,
) -> Result<(PointSet, PointSet), TransformError> {
    // (size, is_second, key) in the order combine sees them, then ranked.
    let mut ranked: Vec<(usize, bool, Coord)> = first
        .lines
        .iter()
        .map(|&(key, size)| (size, false, key))
        .chain(second.lines.iter().map(|&(key, size)| (size, true, key)))
        .collect();
    ranked.sort_by(|a, b| b.0.cmp(&a.0));

    let mut seen = vec![0usize; ranked.len()];
    let mut out_first = PointSet::new();
    let mut out_second = PointSet::new();
    for p in combined {
        let rank = p.coord(axis);
        let index = rank
            .checked_sub(1)
            .and_then(|i| usize::try_from(i).ok())
            .filter(|&i| i < ranked.len())
            .ok_or(TransformError::ProfileMismatch {
                rank: rank.max(0) as usize,
            })?;
        let (_, is_second, key) = ranked[index];
        seen[index] += 1;
        let mut restored = *p;
        restored.set_coord(axis, key);
        if is_second {
            out_second.push(restored);
        } else {
            out_first.push(restored);
        }
    }
    if let Some(index) = (0..ranked.len()).find(|&i| seen[i] != ranked[i].0) {
        return Err(TransformError::ProfileMismatch { rank: index + 1 });
    }
    Ok((out_first, out_second))
}
