//! Ferrers: geometric bijections between classes of integer partitions.
//!
//! A partition is drawn as its Ferrers diagram, a finite set of lattice
//! points, and a bijection is a fixed pipeline of small invertible moves on
//! that set. The crate provides:
//! - Point-sets whose points keep their ids through every transformation.
//! - Basic geometric transformations (shift, move, cut, paste, shred,
//!   stretch, conjugate) and arithmetic merges (sum, union, split).
//! - Sylvester's bijection, the self-conjugate ↔ distinct-odd bijection and
//!   their composite, each recorded stage by stage in a provenance graph.
//!
//! # Mathematical Foundations
//!
//! Pak's "geometric bijections" describe classical partition bijections as
//! compositions of a few piecewise-linear maps on the lattice. Because every
//! step is a bijection on points, a composite map is injective by
//! construction, and following a point id through the pipeline shows where
//! each cell of the input diagram ends up.
//!
//! # References
//!
//! - Pak, I. "Partition bijections, a survey" (2006)
//! - Pak, I. "The nature of partition bijections II. Asymptotic stability" (2004)
//! - Sylvester, J.J. "A constructive theory of partitions" (1882)
//! - Andrews, G.E. "The Theory of Partitions" (1976)
//!
//! # Example
//!
//! ```
//! use ferrers::prelude::*;
//!
//! let diagram = PointSet::from_parts(&[3, 3, 1]);
//! let distinct = sylvester_forward(&diagram).unwrap();
//! assert_eq!(distinct.shape(), Some(vec![4, 2, 1]));
//!
//! let back = sylvester_backward(&distinct).unwrap();
//! assert!(back.same_points(&diagram));
//! ```

pub mod bat;
pub mod bgt;
pub mod bijections;
pub mod config;
pub mod fingerprint;
pub mod format;
pub mod matrix;
pub mod point;
pub mod point_set;
pub mod provenance;
pub mod trace;

pub use bijections::{Bijection, BijectionError, Outcome};
pub use config::{BijectionOptions, Config};
pub use point::{Axis, Coord, Point, PointId};
pub use point_set::{PartitionClass, PointSet};
pub use provenance::{GraphError, ProvenanceGraph};
pub use trace::{StageId, TraceError, TraceSink, Tracer};

/// Prelude for convenient usage.
pub mod prelude {
    pub use crate::bat::{combine, split, sum, union, GroupProfile};
    pub use crate::bgt::{
        conjugate, cut, move_by, paste, paste_checked, shift, shred2, stretch, stretch_exact,
        TransformError,
    };
    pub use crate::bijections::{
        ag_backward, ag_forward, scdo_backward, scdo_forward, sylvester_backward,
        sylvester_forward, Bijection, BijectionError, Outcome,
    };
    pub use crate::config::{BijectionOptions, Config};
    pub use crate::fingerprint::{HashValue, PointSetFingerprint};
    pub use crate::matrix::{Matrix2x2, MatrixError, MatrixFamily, ShearMatrix, SlMatrix};
    pub use crate::point::{Axis, Coord, Point, PointId};
    pub use crate::point_set::{PartitionClass, PointSet};
    pub use crate::provenance::{GraphError, ProvenanceGraph};
    pub use crate::trace::{
        ArchiveSink, DirectorySink, StageId, TraceArchive, TraceError, TraceSink, Tracer,
    };
}
