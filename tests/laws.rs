//! Algebraic laws of the transformations and the bijections built on them.
//!
//! Property tests run on random point-sets and partitions; the counting
//! checks walk every partition of small `n`.

use ferrers::point_set::durfee_size;
use ferrers::prelude::*;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashSet};

/// All partitions of `n`, parts non-increasing.
fn partitions(n: usize) -> Vec<Vec<usize>> {
    fn go(n: usize, max: usize, prefix: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if n == 0 {
            out.push(prefix.clone());
            return;
        }
        for part in (1..=n.min(max)).rev() {
            prefix.push(part);
            go(n - part, part, prefix, out);
            prefix.pop();
        }
    }
    let mut out = Vec::new();
    go(n, n, &mut Vec::new(), &mut out);
    out
}

/// Maximal runs of consecutive integers in a strictly decreasing list.
fn runs(parts: &[usize]) -> usize {
    if parts.is_empty() {
        return 0;
    }
    1 + parts.windows(2).filter(|w| w[0] != w[1] + 1).count()
}

fn point_set_strategy() -> impl Strategy<Value = PointSet> {
    prop::collection::vec((-20i64..20, -20i64..20), 0..40).prop_map(|coords| {
        coords
            .into_iter()
            .enumerate()
            .map(|(i, (x, y))| Point::new(x, y, PointId::new(i as u64 + 1)))
            .collect()
    })
}

/// Nonzero shear factor; a zero off-diagonal is not a shear.
fn shear_factor() -> impl Strategy<Value = i64> {
    (-3i64..=3).prop_filter("shear factor must be nonzero", |s| *s != 0)
}

fn sl_matrix_strategy() -> impl Strategy<Value = SlMatrix> {
    (shear_factor(), shear_factor(), any::<bool>()).prop_map(|(s, t, vertical_first)| {
        let h = SlMatrix::from(ShearMatrix::horizontal(s).unwrap());
        let v = SlMatrix::from(ShearMatrix::vertical(t).unwrap());
        if vertical_first {
            v.compose(&h).unwrap()
        } else {
            h.compose(&v).unwrap()
        }
    })
}

fn partition_strategy() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(1usize..10, 0..10).prop_map(|mut parts| {
        parts.sort_unstable_by(|a, b| b.cmp(a));
        parts
    })
}

fn odd_partition_strategy() -> impl Strategy<Value = Vec<usize>> {
    partition_strategy().prop_map(|parts| parts.into_iter().map(|p| 2 * p - 1).collect())
}

fn distinct_partition_strategy() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::btree_set(1usize..16, 0..8)
        .prop_map(|parts| parts.into_iter().rev().collect())
}

/// Self-conjugate partition from its strictly decreasing hook arms.
fn self_conjugate_strategy() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::btree_set(0usize..8, 0..6).prop_map(|arms| {
        let mut cells = HashSet::new();
        for (j, arm) in arms.into_iter().rev().enumerate() {
            let d = j + 1;
            for t in 0..=arm {
                cells.insert((d + t, d));
                cells.insert((d, d + t));
            }
        }
        let rows = cells.iter().map(|&(_, y)| y).max().unwrap_or(0);
        (1..=rows)
            .map(|y| cells.iter().filter(|&&(_, cy)| cy == y).count())
            .collect()
    })
}

proptest! {
    #[test]
    fn move_round_trips(s in point_set_strategy(), a in -10i64..10, b in -10i64..10) {
        prop_assert_eq!(move_by(&move_by(&s, a, b), -a, -b), s);
    }

    #[test]
    fn composed_shears_stay_special_linear(m in sl_matrix_strategy()) {
        prop_assert!(m.matrix().is_special_linear());
        prop_assert_eq!(m.compose(&m.inverse()), Ok(SlMatrix::IDENTITY));
    }

    #[test]
    fn shift_round_trips(s in point_set_strategy(), m in sl_matrix_strategy()) {
        let there = shift(&s, &m);
        prop_assert_eq!(there.len(), s.len());
        prop_assert_eq!(there.ids(), s.ids());
        prop_assert_eq!(shift(&there, &m.inverse()), s);
    }

    #[test]
    fn cut_then_paste_restores_points(
        s in point_set_strategy(),
        a in -3i64..=3,
        b in -3i64..=3,
        c in -5i64..=5,
    ) {
        let (top, bottom) = cut(&s, a, b, c);
        prop_assert!(top.iter().all(|p| a * p.x + b * p.y <= c));
        prop_assert!(bottom.iter().all(|p| a * p.x + b * p.y > c));
        prop_assert!(paste(&top, &bottom).same_points(&s));
    }

    #[test]
    fn shred_then_paste_restores_points(s in point_set_strategy(), vertical in any::<bool>()) {
        let axis = if vertical { Axis::Vertical } else { Axis::Horizontal };
        let (even, odd) = shred2(&s, axis);
        prop_assert!(even.iter().all(|p| p.coord(axis).rem_euclid(2) == 0));
        prop_assert!(odd.iter().all(|p| p.coord(axis).rem_euclid(2) == 1));
        prop_assert!(paste(&even, &odd).same_points(&s));
    }

    #[test]
    fn exact_stretch_accepts_multiples(s in point_set_strategy(), k in 1i64..4, l in 1i64..4) {
        let scaled: PointSet = s
            .iter()
            .map(|p| Point::new(p.x * l, p.y, p.id()))
            .collect();
        let out = stretch_exact(&scaled, k, l).unwrap();
        prop_assert_eq!(out.len(), s.len());
        for (p, q) in s.iter().zip(out.iter()) {
            prop_assert_eq!((q.x, q.y), (p.x, k * p.y));
        }
    }

    #[test]
    fn split_undoes_combine(
        a in partition_strategy(),
        b in partition_strategy(),
        vertical in any::<bool>(),
    ) {
        let axis = if vertical { Axis::Vertical } else { Axis::Horizontal };
        let first = PointSet::from_parts(&a);
        // Offset ids and positions so the second input is clearly foreign.
        let second: PointSet = PointSet::from_parts(&b)
            .iter()
            .map(|p| Point::new(p.x + 3, p.y + 5, PointId::new(p.id().as_u64() + 1000)))
            .collect();
        let combined = combine(&first, &second, axis);
        prop_assert_eq!(combined.len(), first.len() + second.len());
        let (x, y) = split(
            &combined,
            &GroupProfile::of(&first, axis),
            &GroupProfile::of(&second, axis),
            axis,
        )
        .unwrap();
        prop_assert!(x.same_points(&first));
        prop_assert!(y.same_points(&second));
    }

    #[test]
    fn union_of_diagrams_merges_parts(a in partition_strategy(), b in partition_strategy()) {
        let second: PointSet = PointSet::from_parts(&b)
            .iter()
            .map(|p| Point::new(p.x, p.y, PointId::new(p.id().as_u64() + 1000)))
            .collect();
        let mut merged: Vec<usize> = a.iter().chain(b.iter()).copied().collect();
        merged.sort_unstable_by(|x, y| y.cmp(x));
        prop_assert_eq!(union(&PointSet::from_parts(&a), &second).shape(), Some(merged));
    }

    #[test]
    fn sum_of_diagrams_adds_parts(a in partition_strategy(), b in partition_strategy()) {
        let second: PointSet = PointSet::from_parts(&b)
            .iter()
            .map(|p| Point::new(p.x, p.y, PointId::new(p.id().as_u64() + 1000)))
            .collect();
        let rows = a.len().max(b.len());
        let expected: Vec<usize> = (0..rows)
            .map(|i| a.get(i).copied().unwrap_or(0) + b.get(i).copied().unwrap_or(0))
            .collect();
        prop_assert_eq!(sum(&PointSet::from_parts(&a), &second).shape(), Some(expected));
    }

    #[test]
    fn sylvester_round_trips(parts in odd_partition_strategy()) {
        let ps = PointSet::from_parts(&parts);
        let there = sylvester_forward(&ps).unwrap();
        prop_assert!(there.belongs_to(PartitionClass::DistinctParts));
        prop_assert_eq!(there.ids(), ps.ids());
        prop_assert!(sylvester_backward(&there).unwrap().same_points(&ps));
    }

    #[test]
    fn sylvester_backward_round_trips(parts in distinct_partition_strategy()) {
        let ps = PointSet::from_parts(&parts);
        let there = sylvester_backward(&ps).unwrap();
        prop_assert!(there.belongs_to(PartitionClass::OddParts));
        prop_assert!(sylvester_forward(&there).unwrap().same_points(&ps));
    }

    #[test]
    fn scdo_round_trips(parts in self_conjugate_strategy()) {
        let ps = PointSet::from_parts(&parts);
        prop_assert!(ps.belongs_to(PartitionClass::SelfConjugate));
        let there = scdo_forward(&ps).unwrap();
        prop_assert!(there.belongs_to(PartitionClass::DistinctOddParts));
        prop_assert!(scdo_backward(&there).unwrap().same_points(&ps));
    }

    #[test]
    fn ag_round_trips(parts in self_conjugate_strategy()) {
        let ps = PointSet::from_parts(&parts);
        let there = ag_forward(&ps).unwrap();
        let shape = there.shape().unwrap();
        prop_assert!(PartitionClass::DistinctParts.contains(&shape));
        prop_assert_eq!(runs(&shape), durfee_size(&parts));
        prop_assert!(ag_backward(&there).unwrap().same_points(&ps));
    }

    #[test]
    fn checked_runs_agree_with_fast_runs(parts in odd_partition_strategy()) {
        let ps = PointSet::from_parts(&parts);
        let checked = Bijection::SylvesterForward
            .apply_with(&ps, BijectionOptions::checked(), None)
            .unwrap();
        prop_assert_eq!(checked.output, sylvester_forward(&ps).unwrap());
    }
}

/// Image of every partition of `n` in the domain, checking ids on the way.
fn images(bijection: Bijection, n: usize) -> (usize, BTreeSet<Vec<usize>>) {
    let domain: Vec<_> = partitions(n)
        .into_iter()
        .filter(|p| bijection.domain().contains(p))
        .collect();
    let mut image = BTreeSet::new();
    for parts in &domain {
        let ps = PointSet::from_parts(parts);
        let out = bijection.apply(&ps).unwrap();
        assert_eq!(out.ids(), ps.ids(), "{} on {:?}", bijection, parts);
        let shape = out
            .shape()
            .unwrap_or_else(|| panic!("{} on {:?} is not a diagram", bijection, parts));
        assert!(bijection.codomain().contains(&shape), "{} on {:?}", bijection, parts);
        image.insert(shape);
    }
    (domain.len(), image)
}

#[test]
fn sylvester_is_a_bijection_for_small_n() {
    for n in 1..=12 {
        let (count, image) = images(Bijection::SylvesterForward, n);
        assert_eq!(image.len(), count, "not injective at n = {}", n);
        let distinct: BTreeSet<_> = partitions(n)
            .into_iter()
            .filter(|p| PartitionClass::DistinctParts.contains(p))
            .collect();
        assert_eq!(image, distinct, "not onto at n = {}", n);
    }
}

#[test]
fn scdo_is_a_bijection_for_small_n() {
    for n in 1..=14 {
        let (count, image) = images(Bijection::ScdoForward, n);
        assert_eq!(image.len(), count, "not injective at n = {}", n);
        let odd: BTreeSet<_> = partitions(n)
            .into_iter()
            .filter(|p| PartitionClass::DistinctOddParts.contains(p))
            .collect();
        assert_eq!(image, odd, "not onto at n = {}", n);
    }
}

#[test]
fn ag_image_counts_runs_for_small_n() {
    for n in 1..=14 {
        let (count, image) = images(Bijection::AgForward, n);
        assert_eq!(image.len(), count, "not injective at n = {}", n);
        for parts in partitions(n)
            .into_iter()
            .filter(|p| PartitionClass::SelfConjugate.contains(p))
        {
            let shape = ag_forward(&PointSet::from_parts(&parts)).unwrap().shape().unwrap();
            assert_eq!(runs(&shape), durfee_size(&parts));
        }
    }
}

#[test]
fn traced_stages_form_a_ranked_dag() {
    for bijection in Bijection::ALL {
        let input = match bijection.domain() {
            PartitionClass::OddParts => vec![5, 3, 3, 1],
            PartitionClass::DistinctParts => vec![6, 4, 3, 2],
            PartitionClass::DistinctOddParts => vec![7, 3, 1],
            _ => vec![4, 3, 3, 1],
        };
        let mut sink = ArchiveSink::new();
        let outcome = bijection
            .apply_traced(&PointSet::from_parts(&input), &mut sink)
            .unwrap();
        let archive = sink.into_archive();
        archive.verify().unwrap();

        let graph = &outcome.graph;
        assert_eq!(archive.stages.len(), graph.vertex_count());
        assert_eq!(graph.vertices().iter().filter(|(_, rank)| *rank == 1).count(), 1);
        for (a, b) in graph.edges() {
            assert!(graph.rank(a) < graph.rank(b), "{} -> {} in {}", a, b, bijection);
        }
        let last = archive.output().unwrap();
        assert_eq!(last.points, outcome.output);
        // No stage holds more points than the run started with.
        assert!(archive.stages.iter().all(|s| s.points.len() <= outcome.output.len()));
    }
}

#[test]
fn archive_survives_cbor_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.cbor");
    let mut sink = ArchiveSink::new();
    Bijection::SylvesterForward
        .apply_traced(&PointSet::from_parts(&[5, 3, 1]), &mut sink)
        .unwrap();
    let archive = sink.into_archive();
    archive.save_to_file(&path).unwrap();

    let loaded = TraceArchive::load_from_file(&path).unwrap();
    loaded.verify().unwrap();
    assert_eq!(loaded.stages.len(), archive.stages.len());
    assert_eq!(loaded.graph.dump(), archive.graph.dump());
}

#[test]
fn configured_run_writes_stage_files() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::default().with_trace_dir(dir.path());
    let outcome = Bijection::ScdoForward
        .run(&PointSet::from_parts(&[3, 2, 1]), &config)
        .unwrap();
    assert_eq!(outcome.output.shape(), Some(vec![5, 1]));

    let run_dir = dir.path().join("scdo-forward");
    assert!(run_dir.join(ferrers::provenance::GRAPH_FILE_NAME).is_file());
    let stage_files = std::fs::read_dir(&run_dir)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name() != ferrers::provenance::GRAPH_FILE_NAME)
        .count();
    assert_eq!(stage_files, outcome.graph.vertex_count());
}

#[test]
fn cut_and_combine_scenarios() {
    // (2, 1) cut along y = x: the diagonal and right of it stay on top.
    let (top, bottom) = cut(&PointSet::from_parts(&[2, 1]), -1, 1, 0);
    assert_eq!(top.canonical(), vec![(1, 1, 1), (2, 1, 2)]);
    assert_eq!(bottom.canonical(), vec![(1, 2, 3)]);

    // Columns of size 3 and 5: the larger is ranked first.
    let three: PointSet = (1..=3).map(|y| Point::new(4, y, PointId::new(y as u64))).collect();
    let five: PointSet = (1..=5)
        .map(|y| Point::new(9, y, PointId::new(100 + y as u64)))
        .collect();
    let out = combine(&three, &five, Axis::Horizontal);
    assert!(out.iter().filter(|p| p.id().as_u64() > 100).all(|p| p.x == 1));
    assert!(out.iter().filter(|p| p.id().as_u64() <= 3).all(|p| p.x == 2));
}
