//! Self-conjugate partitions ↔ partitions into distinct odd parts.
//!
//! A self-conjugate diagram is a nest of symmetric diagonal hooks. Hook `j`
//! has arm and leg of equal length `a_j = λ_j − j`, so it holds `2a_j + 1`
//! points, and these sizes strictly decrease with `j`. The forward map
//! straightens hook `j` into row `j`: the arm (on or right of the diagonal)
//! fills the odd columns, the leg (below it) fills the even columns.
//!
//! # Citations
//! - Pak, "Partition bijections, a survey" (2006), §3.1 – diagonal hooks
//! - MacMahon, "Combinatory Analysis" vol. 2 (1916), §VII

use super::{Bijection, BijectionError, Context, Staged};
use crate::bgt::{conjugate, cut, move_by, shift, shred2};
use crate::matrix::SlMatrix;
use crate::point::Axis;
use crate::point_set::PointSet;

/// Self-conjugate → distinct odd parts, on the fast path.
pub fn scdo_forward(points: &PointSet) -> Result<PointSet, BijectionError> {
    Bijection::ScdoForward.apply(points)
}

/// Distinct odd parts → self-conjugate, on the fast path.
pub fn scdo_backward(points: &PointSet) -> Result<PointSet, BijectionError> {
    Bijection::ScdoBackward.apply(points)
}

pub(crate) fn forward(cx: &mut Context<'_>, input: &Staged) -> Result<Staged, BijectionError> {
    let drop_row = SlMatrix::new(1, -1, 0, 1)?;
    let drop_column = SlMatrix::new(1, 0, -1, 1)?;

    let (top, bottom) = cx.fork(["top", "bottom"], input, |ps| Ok(cut(ps, -1, 1, 0)))?;

    // Arm of hook j: (j..=λ_j, j) → odd columns 1..=2a_j+1 of row j.
    let arm = cx.map("top.move", &top, |ps| move_by(ps, 1, 0))?;
    let arm = cx.map("top.shift", &arm, |ps| shift(ps, &drop_row))?;
    let arm = cx.map("top.transpose", &arm, conjugate)?;
    let arm = cx.try_map("top.stretch", &arm, |ps, o| o.stretch(ps, 2, 1))?;
    let arm = cx.map("top.odd", &arm, |ps| move_by(ps, 0, -1))?;
    let arm = cx.map("top.restore", &arm, conjugate)?;

    // Leg of hook j: (j, j+1..=j+a_j) → even columns 2..=2a_j of row j.
    let leg = cx.map("bottom.shift", &bottom, |ps| shift(ps, &drop_column))?;
    let leg = cx.try_map("bottom.stretch", &leg, |ps, o| o.stretch(ps, 2, 1))?;
    let leg = cx.map("bottom.transpose", &leg, conjugate)?;

    cx.paste("output", &arm, &leg)
}

pub(crate) fn backward(cx: &mut Context<'_>, input: &Staged) -> Result<Staged, BijectionError> {
    let raise_row = SlMatrix::new(1, 1, 0, 1)?;
    let raise_column = SlMatrix::new(1, 0, 1, 1)?;

    let (even, odd) = cx.fork(["even", "odd"], input, |ps| Ok(shred2(ps, Axis::Horizontal)))?;

    // Odd column 2t-1 of row j → arm point (j+t-1, j).
    let arm = cx.map("odd.move", &odd, |ps| move_by(ps, 1, 0))?;
    let arm = cx.try_map("odd.stretch", &arm, |ps, o| o.stretch(ps, 1, 2))?;
    let arm = cx.map("odd.shift", &arm, |ps| shift(ps, &raise_row))?;
    let arm = cx.map("odd.back", &arm, |ps| move_by(ps, -1, 0))?;

    // Even column 2t of row j → leg point (j, j+t).
    let leg = cx.try_map("even.stretch", &even, |ps, o| o.stretch(ps, 1, 2))?;
    let leg = cx.map("even.transpose", &leg, conjugate)?;
    let leg = cx.map("even.shift", &leg, |ps| shift(ps, &raise_column))?;

    cx.paste("output", &arm, &leg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BijectionOptions;

    #[test]
    fn hooks_become_rows() {
        // (3, 2, 1): hooks of size 5 and 1.
        let out = scdo_forward(&PointSet::from_parts(&[3, 2, 1])).unwrap();
        assert_eq!(out.shape(), Some(vec![5, 1]));
        // (4, 3, 3, 1): a = (3, 1, 0).
        let out = scdo_forward(&PointSet::from_parts(&[4, 3, 3, 1])).unwrap();
        assert_eq!(out.shape(), Some(vec![7, 3, 1]));
    }

    #[test]
    fn diagonal_point_heads_its_row() {
        // The corner (1, 1) is the first point of hook 1 and stays at (1, 1).
        let ps = PointSet::from_parts(&[2, 1]);
        let out = scdo_forward(&ps).unwrap();
        assert_eq!(out.canonical(), vec![(1, 1, 1), (2, 1, 3), (3, 1, 2)]);
    }

    #[test]
    fn backward_restores_every_point() {
        for parts in [vec![1], vec![2, 2], vec![3, 1, 1], vec![4, 3, 3, 1], vec![5, 3, 3, 1, 1]] {
            let ps = PointSet::from_parts(&parts);
            let there = scdo_forward(&ps).unwrap();
            let back = scdo_backward(&there).unwrap();
            assert!(back.same_points(&ps), "{:?}", parts);
        }
    }

    #[test]
    fn backward_builds_self_conjugate_diagram() {
        let out = scdo_backward(&PointSet::from_parts(&[7, 3])).unwrap();
        assert_eq!(out.shape(), Some(vec![4, 3, 2, 1]));
    }

    #[test]
    fn checked_path_agrees_with_fast_path() {
        let ps = PointSet::from_parts(&[4, 3, 3, 1]);
        let checked = Bijection::ScdoForward
            .apply_with(&ps, BijectionOptions::checked(), None)
            .unwrap();
        assert_eq!(checked.output, scdo_forward(&ps).unwrap());
    }

    #[test]
    fn empty_diagram_maps_to_empty() {
        assert!(scdo_forward(&PointSet::new()).unwrap().is_empty());
        assert!(scdo_backward(&PointSet::new()).unwrap().is_empty());
    }
}
