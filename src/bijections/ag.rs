//! Self-conjugate partitions ↔ distinct parts, through distinct odd parts.
//!
//! The forward map straightens the diagonal hooks of a self-conjugate
//! diagram into distinct odd parts and then applies Sylvester's bijection.
//! A self-conjugate partition with Durfee square `d` thus lands on a
//! partition into distinct parts with exactly `d` maximal runs of
//! consecutive integers. Each half is traced under its own namespace
//! (`scdo/…`, `sylvester/…`) in one provenance graph.
//!
//! Only distinct-part partitions whose Sylvester preimage has distinct parts
//! come from a self-conjugate one; a checked backward run rejects the rest
//! at the midpoint.
//!
//! # Citations
//! - Andrews, "The Theory of Partitions" (1976), Ex. 1.20 – Sylvester's refinement by runs
//! - Pak, "Partition bijections, a survey" (2006), §3.1, §2.3

use super::{scdo, sylvester, Bijection, BijectionError, Context, Staged};
use crate::point_set::{PartitionClass, PointSet};

/// Self-conjugate → distinct parts, on the fast path.
pub fn ag_forward(points: &PointSet) -> Result<PointSet, BijectionError> {
    Bijection::AgForward.apply(points)
}

/// Distinct parts → self-conjugate, on the fast path.
pub fn ag_backward(points: &PointSet) -> Result<PointSet, BijectionError> {
    Bijection::AgBackward.apply(points)
}

pub(crate) fn forward(cx: &mut Context<'_>, input: &Staged) -> Result<Staged, BijectionError> {
    let outer = cx.tracer.set_namespace("scdo");
    let odd = scdo::forward(cx, input)?;
    cx.tracer.set_namespace("sylvester");
    let out = sylvester::forward(cx, &odd)?;
    cx.tracer.set_namespace(&outer);
    Ok(out)
}

pub(crate) fn backward(cx: &mut Context<'_>, input: &Staged) -> Result<Staged, BijectionError> {
    let outer = cx.tracer.set_namespace("sylvester");
    let odd = sylvester::backward(cx, input)?;
    cx.require(
        Bijection::AgBackward.name(),
        &odd.points,
        PartitionClass::DistinctOddParts,
    )?;
    cx.tracer.set_namespace("scdo");
    let out = scdo::backward(cx, &odd)?;
    cx.tracer.set_namespace(&outer);
    Ok(out)
}
