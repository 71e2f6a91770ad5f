//! Partition bijections as fixed pipelines of geometric transformations.
//!
//! Each bijection threads a point-set through a fixed DAG of [`bgt`] and
//! [`bat`] calls. Every intermediate result is a traced stage, so a run can
//! be audited stage by stage through its provenance graph.
//!
//! | Bijection | From | To |
//! |---|---|---|
//! | [`Bijection::ScdoForward`] | self-conjugate | distinct odd parts |
//! | [`Bijection::ScdoBackward`] | distinct odd parts | self-conjugate |
//! | [`Bijection::SylvesterForward`] | odd parts | distinct parts |
//! | [`Bijection::SylvesterBackward`] | distinct parts | odd parts |
//! | [`Bijection::AgForward`] | self-conjugate | distinct parts |
//! | [`Bijection::AgBackward`] | distinct parts | self-conjugate |
//!
//! On the fast path the input is trusted; [`BijectionOptions`] turns on class
//! checks, exact stretches and collision-checked pastes.
//!
//! # Citations
//! - Pak, "Partition bijections, a survey" (2006), §2.3 (Sylvester), §3.1 (self-conjugate)
//! - Sylvester, "A constructive theory of partitions" (1882)
//!
//! [`bgt`]: crate::bgt
//! [`bat`]: crate::bat

pub mod ag;
pub mod scdo;
pub mod sylvester;

pub use ag::{ag_backward, ag_forward};
pub use scdo::{scdo_backward, scdo_forward};
pub use sylvester::{sylvester_backward, sylvester_forward};

use crate::bgt::{self, TransformError};
use crate::config::{BijectionOptions, Config};
use crate::matrix::MatrixError;
use crate::point_set::{PartitionClass, PointSet};
use crate::provenance::ProvenanceGraph;
use crate::trace::{DirectorySink, StageId, TraceError, TraceSink, Tracer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error type for bijection runs.
#[derive(Debug)]
pub enum BijectionError {
    /// A transformation step failed.
    Transform(TransformError),
    /// A pipeline matrix failed validation.
    Matrix(MatrixError),
    /// Tracing failed.
    Trace(TraceError),
    /// A checked run met a point-set outside the expected class.
    ClassMismatch {
        /// Bijection that rejected it.
        bijection: &'static str,
        /// Class the point-set should have belonged to.
        expected: PartitionClass,
    },
}

impl fmt::Display for BijectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BijectionError::Transform(err) => write!(f, "transformation failed: {}", err),
            BijectionError::Matrix(err) => write!(f, "invalid matrix: {}", err),
            BijectionError::Trace(err) => write!(f, "tracing failed: {}", err),
            BijectionError::ClassMismatch {
                bijection,
                expected,
            } => write!(f, "{}: point-set is not a diagram with {}", bijection, expected),
        }
    }
}

impl std::error::Error for BijectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BijectionError::Transform(err) => Some(err),
            BijectionError::Matrix(err) => Some(err),
            BijectionError::Trace(err) => Some(err),
            BijectionError::ClassMismatch { .. } => None,
        }
    }
}

impl From<TransformError> for BijectionError {
    fn from(err: TransformError) -> Self {
        BijectionError::Transform(err)
    }
}

impl From<MatrixError> for BijectionError {
    fn from(err: MatrixError) -> Self {
        BijectionError::Matrix(err)
    }
}

impl From<TraceError> for BijectionError {
    fn from(err: TraceError) -> Self {
        BijectionError::Trace(err)
    }
}

/// The bijections this crate implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bijection {
    /// Odd parts → distinct parts.
    SylvesterForward,
    /// Distinct parts → odd parts.
    SylvesterBackward,
    /// Self-conjugate → distinct odd parts, one part per diagonal hook.
    ScdoForward,
    /// Distinct odd parts → self-conjugate.
    ScdoBackward,
    /// Self-conjugate → distinct parts, through distinct odd parts.
    AgForward,
    /// Distinct parts → self-conjugate, through distinct odd parts.
    AgBackward,
}

/// Result of a run: the output and the provenance graph of its stages.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// Output point-set.
    pub output: PointSet,
    /// Every stage the run recorded.
    pub graph: ProvenanceGraph<StageId>,
}

impl Bijection {
    /// All bijections, forward before backward.
    pub const ALL: [Bijection; 6] = [
        Bijection::SylvesterForward,
        Bijection::SylvesterBackward,
        Bijection::ScdoForward,
        Bijection::ScdoBackward,
        Bijection::AgForward,
        Bijection::AgBackward,
    ];

    /// Stable name, also the stage namespace of the run.
    pub const fn name(&self) -> &'static str {
        match self {
            Bijection::SylvesterForward => "sylvester-forward",
            Bijection::SylvesterBackward => "sylvester-backward",
            Bijection::ScdoForward => "scdo-forward",
            Bijection::ScdoBackward => "scdo-backward",
            Bijection::AgForward => "ag-forward",
            Bijection::AgBackward => "ag-backward",
        }
    }

    /// Class of accepted inputs.
    pub const fn domain(&self) -> PartitionClass {
        match self {
            Bijection::SylvesterForward => PartitionClass::OddParts,
            Bijection::SylvesterBackward => PartitionClass::DistinctParts,
            Bijection::ScdoForward | Bijection::AgForward => PartitionClass::SelfConjugate,
            Bijection::ScdoBackward => PartitionClass::DistinctOddParts,
            Bijection::AgBackward => PartitionClass::DistinctParts,
        }
    }

    /// Class the outputs land in.
    pub const fn codomain(&self) -> PartitionClass {
        match self {
            Bijection::SylvesterForward | Bijection::AgForward => PartitionClass::DistinctParts,
            Bijection::SylvesterBackward => PartitionClass::OddParts,
            Bijection::ScdoForward => PartitionClass::DistinctOddParts,
            Bijection::ScdoBackward | Bijection::AgBackward => PartitionClass::SelfConjugate,
        }
    }

    /// The bijection going the other way.
    pub const fn inverse(&self) -> Bijection {
        match self {
            Bijection::SylvesterForward => Bijection::SylvesterBackward,
            Bijection::SylvesterBackward => Bijection::SylvesterForward,
            Bijection::ScdoForward => Bijection::ScdoBackward,
            Bijection::ScdoBackward => Bijection::ScdoForward,
            Bijection::AgForward => Bijection::AgBackward,
            Bijection::AgBackward => Bijection::AgForward,
        }
    }

    /// Fast path: no checks, no sink, no provenance graph.
    pub fn apply(&self, points: &PointSet) -> Result<PointSet, BijectionError> {
        let (output, _) = self.execute(points, BijectionOptions::default(), Tracer::disabled())?;
        Ok(output)
    }

    /// Fast path with every stage snapshotted to `sink`.
    pub fn apply_traced(
        &self,
        points: &PointSet,
        sink: &mut dyn TraceSink,
    ) -> Result<Outcome, BijectionError> {
        self.apply_with(points, BijectionOptions::default(), Some(sink))
    }

    /// Runs with the options and trace directory of `config`.
    pub fn run(&self, points: &PointSet, config: &Config) -> Result<Outcome, BijectionError> {
        match &config.trace_dir {
            Some(dir) => {
                let mut sink = DirectorySink::new(dir.join(self.name()))?;
                self.apply_with(points, config.options, Some(&mut sink))
            }
            None => self.apply_with(points, config.options, None),
        }
    }

    /// Runs with explicit options and an optional sink.
    pub fn apply_with(
        &self,
        points: &PointSet,
        options: BijectionOptions,
        sink: Option<&mut dyn TraceSink>,
    ) -> Result<Outcome, BijectionError> {
        let tracer = match sink {
            Some(sink) => Tracer::with_sink(sink),
            None => Tracer::new(),
        };
        let (output, graph) = self.execute(points, options, tracer)?;
        Ok(Outcome { output, graph })
    }

    fn execute(
        &self,
        points: &PointSet,
        options: BijectionOptions,
        tracer: Tracer<'_>,
    ) -> Result<(PointSet, ProvenanceGraph<StageId>), BijectionError> {
        let mut cx = Context { options, tracer };
        cx.require(self.name(), points, self.domain())?;
        cx.tracer.set_namespace(self.name());
        let input = cx.input("input", points)?;
        let output = match self {
            Bijection::SylvesterForward => sylvester::forward(&mut cx, &input)?,
            Bijection::SylvesterBackward => sylvester::backward(&mut cx, &input)?,
            Bijection::ScdoForward => scdo::forward(&mut cx, &input)?,
            Bijection::ScdoBackward => scdo::backward(&mut cx, &input)?,
            Bijection::AgForward => ag::forward(&mut cx, &input)?,
            Bijection::AgBackward => ag::backward(&mut cx, &input)?,
        };
        let graph = cx.tracer.finish()?;
        tracing::info!(
            bijection = self.name(),
            points = points.len(),
            stages = graph.vertex_count(),
            "bijection complete"
        );
        Ok((output.points, graph))
    }
}

impl fmt::Display for Bijection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl BijectionOptions {
    /// `stretch` or `stretch_exact`, as configured.
    pub(crate) fn stretch(
        &self,
        points: &PointSet,
        k: i64,
        l: i64,
    ) -> Result<PointSet, TransformError> {
        if self.exact_stretch {
            bgt::stretch_exact(points, k, l)
        } else {
            bgt::stretch(points, k, l)
        }
    }

    /// `paste` or `paste_checked`, as configured.
    pub(crate) fn paste(
        &self,
        first: &PointSet,
        second: &PointSet,
    ) -> Result<PointSet, TransformError> {
        if self.validate_paste {
            bgt::paste_checked(first, second)
        } else {
            Ok(bgt::paste(first, second))
        }
    }
}

/// A point-set and the stage that produced it.
#[derive(Debug, Clone)]
pub(crate) struct Staged {
    pub(crate) points: PointSet,
    pub(crate) stage: StageId,
}

/// State of one pipeline invocation.
pub(crate) struct Context<'t> {
    pub(crate) options: BijectionOptions,
    pub(crate) tracer: Tracer<'t>,
}

impl Context<'_> {
    /// Rejects `points` outside `class` when input checks are on.
    pub(crate) fn require(
        &self,
        bijection: &'static str,
        points: &PointSet,
        class: PartitionClass,
    ) -> Result<(), BijectionError> {
        if self.options.check_input && !points.belongs_to(class) {
            tracing::warn!(bijection, expected = %class, points = points.len(), "rejected input");
            return Err(BijectionError::ClassMismatch {
                bijection,
                expected: class,
            });
        }
        Ok(())
    }

    pub(crate) fn input(&mut self, name: &str, points: &PointSet) -> Result<Staged, BijectionError> {
        let stage = self.tracer.input(name, points)?;
        Ok(Staged {
            points: points.clone(),
            stage,
        })
    }

    /// Records `points` as a stage derived from `parents`.
    pub(crate) fn record(
        &mut self,
        name: &str,
        parents: &[&Staged],
        points: PointSet,
    ) -> Result<Staged, BijectionError> {
        let ids: Vec<&StageId> = parents.iter().map(|p| &p.stage).collect();
        let stage = self.tracer.record(name, &ids, &points)?;
        Ok(Staged { points, stage })
    }

    /// One infallible step.
    pub(crate) fn map(
        &mut self,
        name: &str,
        from: &Staged,
        f: impl FnOnce(&PointSet) -> PointSet,
    ) -> Result<Staged, BijectionError> {
        let points = f(&from.points);
        self.record(name, &[from], points)
    }

    /// One step that may fail, with access to the options.
    pub(crate) fn try_map(
        &mut self,
        name: &str,
        from: &Staged,
        f: impl FnOnce(&PointSet, &BijectionOptions) -> Result<PointSet, TransformError>,
    ) -> Result<Staged, BijectionError> {
        let points = f(&from.points, &self.options)?;
        self.record(name, &[from], points)
    }

    /// One step with two outputs, such as `cut` or `shred2`.
    pub(crate) fn fork(
        &mut self,
        names: [&str; 2],
        from: &Staged,
        f: impl FnOnce(&PointSet) -> Result<(PointSet, PointSet), TransformError>,
    ) -> Result<(Staged, Staged), BijectionError> {
        let (first, second) = f(&from.points)?;
        let first = self.record(names[0], &[from], first)?;
        let second = self.record(names[1], &[from], second)?;
        Ok((first, second))
    }

    /// One step with two inputs, such as `paste` or `sum`.
    pub(crate) fn join(
        &mut self,
        name: &str,
        first: &Staged,
        second: &Staged,
        f: impl FnOnce(&PointSet, &PointSet, &BijectionOptions) -> Result<PointSet, TransformError>,
    ) -> Result<Staged, BijectionError> {
        let points = f(&first.points, &second.points, &self.options)?;
        self.record(name, &[first, second], points)
    }

    /// Pastes two branches with the configured paste.
    pub(crate) fn paste(
        &mut self,
        name: &str,
        first: &Staged,
        second: &Staged,
    ) -> Result<Staged, BijectionError> {
        self.join(name, first, second, |a, b, o| o.paste(a, b))
    }

    /// `x → 2x`, as conjugate, `stretch(2, 1)`, conjugate.
    pub(crate) fn double_x(&mut self, prefix: &str, from: &Staged) -> Result<Staged, BijectionError> {
        let flipped = self.map(&format!("{}.transpose", prefix), from, bgt::conjugate)?;
        let stretched = self.try_map(&format!("{}.stretch", prefix), &flipped, |ps, o| {
            o.stretch(ps, 2, 1)
        })?;
        self.map(&format!("{}.restore", prefix), &stretched, bgt::conjugate)
    }

    /// `y → y / 2`, as conjugate, `stretch(1, 2)`, conjugate.
    pub(crate) fn halve_y(&mut self, prefix: &str, from: &Staged) -> Result<Staged, BijectionError> {
        let flipped = self.map(&format!("{}.transpose", prefix), from, bgt::conjugate)?;
        let stretched = self.try_map(&format!("{}.stretch", prefix), &flipped, |ps, o| {
            o.stretch(ps, 1, 2)
        })?;
        self.map(&format!("{}.restore", prefix), &stretched, bgt::conjugate)
    }
}
