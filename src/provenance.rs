//! Append-only provenance graphs.
//!
//! A provenance graph records which intermediate results were derived from
//! which. Vertices are keys with a rank (the length of the longest derivation
//! chain ending there); edges are unordered pairs of keys. Nothing is ever
//! removed, and every insertion is checked:
//! - a key is added at most once
//! - an edge may only join keys already present
//! - an unordered pair is joined at most once
//!
//! # Citations
//! - Moreau et al., "The Open Provenance Model core specification" (2011)
//! - W3C PROV-DM (2013) – derivation relations

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::io;
use std::path::{Path, PathBuf};

/// Depth of a vertex in its derivation chain; inputs have rank 1.
pub type Rank = u32;

/// File name [`ProvenanceGraph::write_to_dir`] writes to.
pub const GRAPH_FILE_NAME: &str = "graph.txt";

/// Error type for rejected graph insertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The key is already a vertex.
    DuplicateVertex(String),
    /// An edge endpoint is not a vertex.
    UnknownVertex(String),
    /// The unordered pair is already an edge.
    DuplicateEdge(String, String),
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::DuplicateVertex(key) => write!(f, "vertex {} already exists", key),
            GraphError::UnknownVertex(key) => write!(f, "vertex {} does not exist", key),
            GraphError::DuplicateEdge(a, b) => write!(f, "edge {} - {} already exists", a, b),
        }
    }
}

impl std::error::Error for GraphError {}

/// Serialized form of a [`ProvenanceGraph`]: the two insertion lists,
/// replayed through the checked insertions on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphRecord<K> {
    /// Vertices in insertion order.
    pub vertices: Vec<(K, Rank)>,
    /// Edges in insertion order.
    pub edges: Vec<(K, K)>,
}

/// A write-once graph of derivations keyed by `K`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    into = "GraphRecord<K>",
    try_from = "GraphRecord<K>",
    bound(
        serialize = "K: Serialize + Clone + Eq + std::hash::Hash + std::fmt::Display",
        deserialize = "K: Deserialize<'de> + Clone + Eq + std::hash::Hash + std::fmt::Display"
    )
)]
pub struct ProvenanceGraph<K> {
    /// Vertices in insertion order.
    vertices: Vec<(K, Rank)>,
    /// Key → position in `vertices`.
    index: HashMap<K, usize>,
    /// Edges in insertion order.
    edges: Vec<(K, K)>,
    /// Each edge under both orientations.
    pairs: HashSet<(K, K)>,
}

impl<K> Default for ProvenanceGraph<K> {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            index: HashMap::new(),
            edges: Vec::new(),
            pairs: HashSet::new(),
        }
    }
}

impl<K: Clone + Eq + Hash + fmt::Display> ProvenanceGraph<K> {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `key` with `rank`.
    ///
    /// Fails with [`GraphError::DuplicateVertex`] if `key` is present.
    pub fn add_vertex(&mut self, key: K, rank: Rank) -> Result<(), GraphError> {
        if self.index.contains_key(&key) {
            return Err(GraphError::DuplicateVertex(key.to_string()));
        }
        self.index.insert(key.clone(), self.vertices.len());
        self.vertices.push((key, rank));
        Ok(())
    }

    /// Joins `a` and `b`.
    ///
    /// Fails if either key is absent or the unordered pair already exists.
    pub fn add_edge(&mut self, a: K, b: K) -> Result<(), GraphError> {
        for key in [&a, &b] {
            if !self.index.contains_key(key) {
                return Err(GraphError::UnknownVertex(key.to_string()));
            }
        }
        if self.pairs.contains(&(a.clone(), b.clone())) {
            return Err(GraphError::DuplicateEdge(a.to_string(), b.to_string()));
        }
        self.pairs.insert((a.clone(), b.clone()));
        self.pairs.insert((b.clone(), a.clone()));
        self.edges.push((a, b));
        Ok(())
    }

    /// Whether `key` is a vertex.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Whether `a` and `b` are joined, in either orientation.
    pub fn has_edge(&self, a: &K, b: &K) -> bool {
        self.pairs.contains(&(a.clone(), b.clone()))
    }

    /// Rank of `key`, if present.
    pub fn rank(&self, key: &K) -> Option<Rank> {
        self.index.get(key).map(|&i| self.vertices[i].1)
    }

    /// Vertices in insertion order.
    pub fn vertices(&self) -> &[(K, Rank)] {
        &self.vertices
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[(K, K)] {
        &self.edges
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Text dump, identical to the `Display` output.
    pub fn dump(&self) -> String {
        self.to_string()
    }

    /// Writes the dump to `dir/graph.txt`, creating `dir` if needed.
    pub fn write_to_dir(&self, dir: &Path) -> io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(GRAPH_FILE_NAME);
        std::fs::write(&path, self.dump())?;
        Ok(path)
    }

    fn rank_of(&self, key: &K) -> Rank {
        self.rank(key).unwrap_or_default()
    }
}

impl<K: Clone + Eq + Hash + fmt::Display> fmt::Display for ProvenanceGraph<K> {
    /// ```text
    /// VERTICES
    /// <key> <rank>
    /// EDGES
    /// <key1> <rank1>;<key2> <rank2>;
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "VERTICES")?;
        for (key, rank) in &self.vertices {
            writeln!(f, "{} {}", key, rank)?;
        }
        writeln!(f, "EDGES")?;
        for (a, b) in &self.edges {
            writeln!(f, "{} {};{} {};", a, self.rank_of(a), b, self.rank_of(b))?;
        }
        Ok(())
    }
}

impl<K> From<ProvenanceGraph<K>> for GraphRecord<K> {
    fn from(graph: ProvenanceGraph<K>) -> Self {
        GraphRecord {
            vertices: graph.vertices,
            edges: graph.edges,
        }
    }
}

impl<K: Clone + Eq + Hash + fmt::Display> TryFrom<GraphRecord<K>> for ProvenanceGraph<K> {
    type Error = GraphError;

    fn try_from(record: GraphRecord<K>) -> Result<Self, Self::Error> {
        let mut graph = ProvenanceGraph::new();
        for (key, rank) in record.vertices {
            graph.add_vertex(key, rank)?;
        }
        for (a, b) in record.edges {
            graph.add_edge(a, b)?;
        }
        Ok(graph)
    }
}
