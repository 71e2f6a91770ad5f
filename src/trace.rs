//! Stage tracing for bijection pipelines.
//!
//! Each intermediate point-set a pipeline produces is a *stage*. A [`Tracer`]
//! gives every stage an opaque [`StageId`], records it in a
//! [`ProvenanceGraph`] with edges from the stages it was computed from, and
//! forwards a snapshot to an optional [`TraceSink`]:
//! - [`DirectorySink`] writes flat text files and the graph dump
//! - [`ArchiveSink`] collects a [`TraceArchive`], storable as CBOR and
//!   verifiable against the recorded fingerprints
//!
//! # Citations
//! - Moreau et al., "The Open Provenance Model core specification" (2011)

use crate::fingerprint::{HashValue, PointSetFingerprint};
use crate::format::write_point_set;
use crate::point_set::PointSet;
use crate::provenance::{GraphError, ProvenanceGraph, Rank};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

/// Identifier of one pipeline stage.
///
/// Stage ids are names, optionally scoped by a namespace (`scdo/top.move`).
/// They say nothing about where a sink stores the stage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageId(String);

impl StageId {
    /// Creates an unscoped stage id.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates `namespace/name`, or just `name` for an empty namespace.
    pub fn scoped(namespace: &str, name: &str) -> Self {
        if namespace.is_empty() {
            Self::new(name)
        } else {
            Self(format!("{}/{}", namespace, name))
        }
    }

    /// The full id as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error type for tracing and trace storage.
#[derive(Debug)]
pub enum TraceError {
    /// The sink could not write.
    Io(io::Error),
    /// The provenance graph rejected an insertion.
    Graph(GraphError),
    /// A trace archive could not be encoded or decoded.
    Encoding(String),
    /// A stored stage no longer matches its recorded fingerprint.
    FingerprintMismatch {
        /// Stage whose points changed.
        stage: StageId,
        /// Fingerprint recorded when the stage was traced.
        expected: HashValue,
        /// Fingerprint of the points now stored.
        found: HashValue,
    },
    /// A stored stage is missing from the archive's graph, or has another rank there.
    Inconsistent(StageId),
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceError::Io(err) => write!(f, "trace i/o error: {}", err),
            TraceError::Graph(err) => write!(f, "provenance error: {}", err),
            TraceError::Encoding(msg) => write!(f, "trace encoding error: {}", msg),
            TraceError::FingerprintMismatch {
                stage,
                expected,
                found,
            } => write!(
                f,
                "stage {} fingerprint mismatch: recorded {}, found {}",
                stage,
                expected.to_hex(),
                found.to_hex()
            ),
            TraceError::Inconsistent(stage) => {
                write!(f, "stage {} disagrees with the provenance graph", stage)
            }
        }
    }
}

impl std::error::Error for TraceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TraceError::Io(err) => Some(err),
            TraceError::Graph(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for TraceError {
    fn from(err: io::Error) -> Self {
        TraceError::Io(err)
    }
}

impl From<GraphError> for TraceError {
    fn from(err: GraphError) -> Self {
        TraceError::Graph(err)
    }
}

impl From<serde_cbor::Error> for TraceError {
    fn from(err: serde_cbor::Error) -> Self {
        TraceError::Encoding(err.to_string())
    }
}

/// Destination for stage snapshots.
pub trait TraceSink {
    /// Receives the points of a freshly recorded stage.
    fn snapshot(&mut self, stage: &StageId, rank: Rank, points: &PointSet) -> Result<(), TraceError>;

    /// Receives the complete graph once the pipeline is done.
    fn finish(&mut self, graph: &ProvenanceGraph<StageId>) -> Result<(), TraceError>;
}

/// Records stages of one pipeline invocation.
pub struct Tracer<'a> {
    graph: ProvenanceGraph<StageId>,
    sink: Option<&'a mut dyn TraceSink>,
    namespace: String,
    enabled: bool,
}

impl<'a> Tracer<'a> {
    /// A tracer that only builds the graph.
    pub fn new() -> Self {
        Self {
            graph: ProvenanceGraph::new(),
            sink: None,
            namespace: String::new(),
            enabled: true,
        }
    }

    /// A tracer that also snapshots every stage to `sink`.
    pub fn with_sink(sink: &'a mut dyn TraceSink) -> Self {
        Self {
            sink: Some(sink),
            ..Self::new()
        }
    }

    /// A tracer that only names stages: no graph, no sink.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }


    /// Sets the namespace for subsequent stages and returns the previous one.
    pub fn set_namespace(&mut self, namespace: &str) -> String {
        std::mem::replace(&mut self.namespace, namespace.to_string())
    }

    /// Records a stage computed from `parents`.
    ///
    /// The stage's rank is one more than the largest parent rank, or 1 for a
    /// stage with no parents. An edge joins each parent to the new stage.
    /// A disabled tracer only returns the scoped id.
    pub fn record(
        &mut self,
        name: &str,
        parents: &[&StageId],
        points: &PointSet,
    ) -> Result<StageId, TraceError> {
        let id = StageId::scoped(&self.namespace, name);
        if !self.enabled {
            return Ok(id);
        }
        let rank = parents
            .iter()
            .filter_map(|parent| self.graph.rank(parent))
            .max()
            .map_or(1, |r| r + 1);
        self.graph.add_vertex(id.clone(), rank)?;
        for parent in parents {
            self.graph.add_edge((*parent).clone(), id.clone())?;
        }
        tracing::debug!(stage = %id, rank, points = points.len(), "recorded stage");
        if let Some(sink) = self.sink.as_mut() {
            sink.snapshot(&id, rank, points)?;
        }
        Ok(id)
    }

    /// Records an input stage.
    pub fn input(&mut self, name: &str, points: &PointSet) -> Result<StageId, TraceError> {
        self.record(name, &[], points)
    }

    /// The graph so far.
    pub fn graph(&self) -> &ProvenanceGraph<StageId> {
        &self.graph
    }

    /// Hands the graph to the sink and returns it.
    pub fn finish(mut self) -> Result<ProvenanceGraph<StageId>, TraceError> {
        if let Some(sink) = self.sink.as_mut() {
            sink.finish(&self.graph)?;
            tracing::info!(
                stages = self.graph.vertex_count(),
                edges = self.graph.edge_count(),
                "flushed provenance graph"
            );
        }
        Ok(self.graph)
    }
}

impl Default for Tracer<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes each stage to `NNN-<stage>.txt` and the graph to `graph.txt`.
#[derive(Debug)]
pub struct DirectorySink {
    dir: PathBuf,
    written: usize,
}

impl DirectorySink {
    /// Creates `dir` if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, TraceError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir, written: 0 })
    }

    /// The target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name for the `index`-th stage; path separators become `_`.
    pub fn file_name(index: usize, stage: &StageId) -> String {
        let safe: String = stage
            .as_str()
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        format!("{:03}-{}.txt", index, safe)
    }
}

impl TraceSink for DirectorySink {
    fn snapshot(&mut self, stage: &StageId, _rank: Rank, points: &PointSet) -> Result<(), TraceError> {
        let path = self.dir.join(Self::file_name(self.written, stage));
        write_point_set(BufWriter::new(File::create(path)?), points)?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self, graph: &ProvenanceGraph<StageId>) -> Result<(), TraceError> {
        graph.write_to_dir(&self.dir)?;
        Ok(())
    }
}

/// One recorded stage inside a [`TraceArchive`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRecord {
    /// Stage id.
    pub stage: StageId,
    /// Rank in the provenance graph.
    pub rank: Rank,
    /// Fingerprint taken when the stage was recorded.
    pub fingerprint: HashValue,
    /// The stage's points.
    pub points: PointSet,
}

/// Every stage of one traced run together with its provenance graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceArchive {
    /// Stages in record order.
    pub stages: Vec<StageRecord>,
    /// Derivation graph over the stage ids.
    pub graph: ProvenanceGraph<StageId>,
}

impl TraceArchive {
    /// Looks up a stage by id.
    pub fn stage(&self, stage: &str) -> Option<&StageRecord> {
        self.stages.iter().find(|record| record.stage.as_str() == stage)
    }

    /// The last stage recorded, which holds the pipeline's result.
    pub fn output(&self) -> Option<&StageRecord> {
        self.stages.last()
    }

    /// Checks every stage against its fingerprint and the graph.
    pub fn verify(&self) -> Result<(), TraceError> {
        for record in &self.stages {
            let found = PointSetFingerprint::of(&record.points).hash();
            if found != record.fingerprint {
                return Err(TraceError::FingerprintMismatch {
                    stage: record.stage.clone(),
                    expected: record.fingerprint,
                    found,
                });
            }
            if self.graph.rank(&record.stage) != Some(record.rank) {
                return Err(TraceError::Inconsistent(record.stage.clone()));
            }
        }
        Ok(())
    }

    /// Serializes the archive to CBOR bytes.
    pub fn to_cbor(&self) -> Result<Vec<u8>, TraceError> {
        Ok(serde_cbor::to_vec(self)?)
    }

    /// Deserializes an archive from CBOR bytes.
    ///
    /// The graph is rebuilt through its checked insertions.
    pub fn from_cbor(bytes: &[u8]) -> Result<Self, TraceError> {
        Ok(serde_cbor::from_slice(bytes)?)
    }

    /// Saves the archive to a file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), TraceError> {
        std::fs::write(path, self.to_cbor()?)?;
        Ok(())
    }

    /// Loads an archive from a file.
    pub fn load_from_file(path: &Path) -> Result<Self, TraceError> {
        let bytes = std::fs::read(path)?;
        Self::from_cbor(&bytes)
    }
}

/// Collects a [`TraceArchive`] in memory.
#[derive(Debug, Default)]
pub struct ArchiveSink {
    archive: TraceArchive,
}

impl ArchiveSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The archive collected so far.
    pub fn archive(&self) -> &TraceArchive {
        &self.archive
    }

    /// Consumes the sink.
    pub fn into_archive(self) -> TraceArchive {
        self.archive
    }
}

impl TraceSink for ArchiveSink {
    fn snapshot(&mut self, stage: &StageId, rank: Rank, points: &PointSet) -> Result<(), TraceError> {
        self.archive.stages.push(StageRecord {
            stage: stage.clone(),
            rank,
            fingerprint: points.fingerprint(),
            points: points.clone(),
        });
        Ok(())
    }

    fn finish(&mut self, graph: &ProvenanceGraph<StageId>) -> Result<(), TraceError> {
        self.archive.graph = graph.clone();
        Ok(())
    }
}
