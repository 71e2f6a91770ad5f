//! Sylvester's bijection: odd parts ↔ distinct parts.
//!
//! An odd-part diagram splits by column parity into a right half `R` (odd
//! columns, each row `(μ_i + 1) / 2` long) and a left half `L` (even columns,
//! one shorter per row). Both halves are cut into diagonal hooks, each hook is
//! straightened into a row, and the two hook lists are merged. With `p_j`,
//! `q_j` the arms and legs of `R`, the hooks of `L` have arm `p_j − 1` and
//! leg `q_{j+1} + 1`, so the lengths interleave strictly:
//!
//! `h(R, 1) > h(L, 1) > h(R, 2) > h(L, 2) > ...`
//!
//! and the merged rows form a partition into distinct parts. The inverse
//! reads the hooks back off alternate rows and solves for `p`, `q` from the
//! last row up.
//!
//! # Citations
//! - Sylvester, "A constructive theory of partitions" (1882), §45
//! - Pak, "Partition bijections, a survey" (2006), §2.3

use super::{Bijection, BijectionError, Context, Staged};
use crate::bat::{split, sum, union, GroupProfile};
use crate::bgt::{conjugate, cut, move_by, shift, shred2};
use crate::matrix::SlMatrix;
use crate::point::{Axis, Coord};
use crate::point_set::PointSet;

/// Odd parts → distinct parts, on the fast path.
pub fn sylvester_forward(points: &PointSet) -> Result<PointSet, BijectionError> {
    Bijection::SylvesterForward.apply(points)
}

/// Distinct parts → odd parts, on the fast path.
pub fn sylvester_backward(points: &PointSet) -> Result<PointSet, BijectionError> {
    Bijection::SylvesterBackward.apply(points)
}

pub(crate) fn forward(cx: &mut Context<'_>, input: &Staged) -> Result<Staged, BijectionError> {
    let (even, odd) = cx.fork(["even", "odd"], input, |ps| Ok(shred2(ps, Axis::Horizontal)))?;

    let right = cx.map("right.move", &odd, |ps| move_by(ps, 1, 0))?;
    let right = cx.try_map("right.stretch", &right, |ps, o| o.stretch(ps, 1, 2))?;
    let left = cx.try_map("left.stretch", &even, |ps, o| o.stretch(ps, 1, 2))?;

    let right = hooks(cx, "right", &right)?;
    let left = hooks(cx, "left", &left)?;
    cx.join("output", &right, &left, |a, b, _| Ok(union(a, b)))
}

/// Straightens the diagonal hooks of a diagram: hook `j` becomes row `j`.
fn hooks(cx: &mut Context<'_>, prefix: &str, diagram: &Staged) -> Result<Staged, BijectionError> {
    let flatten = SlMatrix::new(1, -1, 0, 1)?;
    let arm_name = format!("{}.arm", prefix);
    let leg_name = format!("{}.leg", prefix);

    let (arm, leg) = cx.fork([arm_name.as_str(), leg_name.as_str()], diagram, |ps| Ok(cut(ps, -1, 1, 0)))?;
    let arm = cx.map(&format!("{}.move", arm_name), &arm, |ps| move_by(ps, 1, 0))?;
    let arm = cx.map(&format!("{}.shift", arm_name), &arm, |ps| shift(ps, &flatten))?;
    let leg = cx.map(&format!("{}.transpose", leg_name), &leg, conjugate)?;
    let leg = cx.map(&format!("{}.shift", leg_name), &leg, |ps| shift(ps, &flatten))?;

    cx.join(&format!("{}.hooks", prefix), &arm, &leg, |a, b, _| Ok(sum(a, b)))
}

pub(crate) fn backward(cx: &mut Context<'_>, input: &Staged) -> Result<Staged, BijectionError> {
    let rows = HookRows::from_parts(&input.points.row_lengths());

    let (even, odd) = cx.fork(["even-rows", "odd-rows"], input, |ps| {
        Ok(shred2(ps, Axis::Vertical))
    })?;
    let right = cx.map("right.raise", &odd, |ps| move_by(ps, 0, 1))?;
    let right = cx.halve_y("right.halve", &right)?;
    let left = cx.halve_y("left.halve", &even)?;

    let right = unhook(cx, "right", &right, &rows.right_arms, &rows.right_legs)?;
    let left = unhook(cx, "left", &left, &rows.left_arms, &rows.left_legs)?;

    let right = cx.double_x("right.double", &right)?;
    let right = cx.map("right.back", &right, |ps| move_by(ps, -1, 0))?;
    let left = cx.double_x("left.double", &left)?;
    cx.paste("output", &right, &left)
}

/// Rebuilds a diagram from its straightened hooks, given the row lengths of
/// the flattened arms and legs.
fn unhook(
    cx: &mut Context<'_>,
    prefix: &str,
    hooks: &Staged,
    arm_rows: &[Coord],
    leg_rows: &[Coord],
) -> Result<Staged, BijectionError> {
    let unflatten = SlMatrix::new(1, 1, 0, 1)?;
    let arm_profile = GroupProfile::of_rows(arm_rows);
    let leg_profile = GroupProfile::of_rows(leg_rows);
    let arm_name = format!("{}.arm", prefix);
    let leg_name = format!("{}.leg", prefix);

    let (arm, leg) = cx.fork([arm_name.as_str(), leg_name.as_str()], hooks, |ps| {
        split(ps, &arm_profile, &leg_profile, Axis::Horizontal)
    })?;
    let arm = cx.map(&format!("{}.shift", arm_name), &arm, |ps| shift(ps, &unflatten))?;
    let arm = cx.map(&format!("{}.move", arm_name), &arm, |ps| move_by(ps, -1, 0))?;
    let leg = cx.map(&format!("{}.shift", leg_name), &leg, |ps| shift(ps, &unflatten))?;
    let leg = cx.map(&format!("{}.transpose", leg_name), &leg, conjugate)?;

    cx.paste(&format!("{}.diagram", prefix), &arm, &leg)
}

/// Row lengths of the flattened arms and legs of both halves, recovered from
/// the parts of a distinct-part partition.
#[derive(Debug, Clone, PartialEq, Eq)]
struct HookRows {
    right_arms: Vec<Coord>,
    right_legs: Vec<Coord>,
    left_arms: Vec<Coord>,
    left_legs: Vec<Coord>,
}

impl HookRows {
    /// Solves `μ_{2j} = p_j + q_j + 1`, `μ_{2j+1} = p_j + q_{j+1} + 1`
    /// (0-based) for the arms `p` and legs `q` of the right half.
    ///
    /// An odd number of parts ends on a right hook with no arm; an even number
    /// ends on a left hook with no leg, i.e. `q_d = −1`. Inputs that are not
    /// distinct-part diagrams give rows that may be negative, which the
    /// profiles treat as empty.
    fn from_parts(parts: &[usize]) -> Self {
        let mu: Vec<Coord> = parts.iter().map(|&p| p as Coord).collect();
        let k = mu.len();
        let d = (k + 1) / 2;
        let d_left = k / 2;
        let mut p: Vec<Coord> = vec![0; d];
        let mut q: Vec<Coord> = vec![0; d + 1];
        if d > 0 {
            if k % 2 == 1 {
                p[d - 1] = 0;
                q[d - 1] = mu[k - 1] - 1;
            } else {
                q[d] = -1;
                p[d - 1] = mu[k - 1];
                q[d - 1] = mu[k - 2] - p[d - 1] - 1;
            }
            for j in (0..d - 1).rev() {
                p[j] = mu[2 * j + 1] - q[j + 1] - 1;
                q[j] = mu[2 * j] - p[j] - 1;
            }
        }
        Self {
            right_arms: p.iter().map(|a| a + 1).collect(),
            right_legs: q[..d].to_vec(),
            left_arms: p[..d_left].to_vec(),
            left_legs: q[1..=d_left].iter().map(|l| l + 1).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BijectionOptions;

    fn forward_shape(parts: &[usize]) -> Option<Vec<usize>> {
        sylvester_forward(&PointSet::from_parts(parts)).unwrap().shape()
    }

    #[test]
    fn known_images() {
        assert_eq!(forward_shape(&[1]), Some(vec![1]));
        assert_eq!(forward_shape(&[1, 1, 1]), Some(vec![3]));
        assert_eq!(forward_shape(&[3]), Some(vec![2, 1]));
        assert_eq!(forward_shape(&[3, 1]), Some(vec![3, 1]));
        assert_eq!(forward_shape(&[3, 1, 1]), Some(vec![4, 1]));
        assert_eq!(forward_shape(&[1, 1, 1, 1, 1]), Some(vec![5]));
        assert_eq!(forward_shape(&[5]), Some(vec![3, 2]));
        assert_eq!(forward_shape(&[3, 3, 3]), Some(vec![4, 3, 2]));
        assert_eq!(forward_shape(&[5, 3]), Some(vec![4, 3, 1]));
    }

    #[test]
    fn hook_rows_from_parts() {
        // (4, 3, 1) comes from R = (3, 2): arms (2, 0), legs (1, 0).
        let rows = HookRows::from_parts(&[4, 3, 1]);
        assert_eq!(rows.right_arms, vec![3, 1]);
        assert_eq!(rows.right_legs, vec![1, 0]);
        assert_eq!(rows.left_arms, vec![2]);
        assert_eq!(rows.left_legs, vec![1]);

        // Even number of parts: the last left hook has no leg.
        let rows = HookRows::from_parts(&[3, 2]);
        assert_eq!(rows.right_arms, vec![3]);
        assert_eq!(rows.right_legs, vec![0]);
        assert_eq!(rows.left_arms, vec![2]);
        assert_eq!(rows.left_legs, vec![0]);

        assert_eq!(HookRows::from_parts(&[]).right_arms, Vec::<Coord>::new());
    }

    #[test]
    fn backward_inverts_forward() {
        for parts in [
            vec![1],
            vec![3, 1],
            vec![3, 3, 3],
            vec![5, 3, 3, 1, 1],
            vec![7, 7, 1],
            vec![9, 5, 5, 3, 1, 1, 1],
        ] {
            let ps = PointSet::from_parts(&parts);
            let there = sylvester_forward(&ps).unwrap();
            assert!(there.belongs_to(crate::point_set::PartitionClass::DistinctParts));
            let back = sylvester_backward(&there).unwrap();
            assert!(back.same_points(&ps), "{:?}", parts);
        }
    }

    #[test]
    fn backward_of_distinct_parts() {
        let back = sylvester_backward(&PointSet::from_parts(&[3, 2])).unwrap();
        assert_eq!(back.shape(), Some(vec![5]));
        let back = sylvester_backward(&PointSet::from_parts(&[4, 3, 1])).unwrap();
        assert_eq!(back.shape(), Some(vec![5, 3]));
    }

    #[test]
    fn malformed_input_is_rejected_when_checked() {
        // Repeated parts: the fast path returns something without panicking,
        // the checked path refuses to start.
        let ps = PointSet::from_parts(&[2, 2, 2]);
        let _ = sylvester_backward(&ps);
        let err = Bijection::SylvesterBackward
            .apply_with(&ps, BijectionOptions::checked(), None)
            .unwrap_err();
        assert!(matches!(err, BijectionError::ClassMismatch { .. }));
    }

    #[test]
    fn checked_path_agrees_with_fast_path() {
        let ps = PointSet::from_parts(&[5, 3, 3, 1, 1]);
        let checked = Bijection::SylvesterForward
            .apply_with(&ps, BijectionOptions::checked(), None)
            .unwrap();
        assert_eq!(checked.output, sylvester_forward(&ps).unwrap());
        let back = Bijection::SylvesterBackward
            .apply_with(&checked.output, BijectionOptions::checked(), None)
            .unwrap();
        assert!(back.output.same_points(&ps));
    }
}
