//! HNSW graph data structure.
//!
//! The layered multigraph behind the index: layer 0 at the bottom holds
//! every linked node, higher layers hold exponentially fewer. Each layer
//! maps a vector id to its neighbor ids. Edges are undirected — a link is
//! recorded in both endpoints' neighbor lists.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::types::Vector;

/// The layered graph plus the identity map it indexes.
///
/// The identity map lives inside the graph so that every id reachable
/// through `layers` can be resolved without a second lock. Ids may dangle
/// after an identity-map removal; lookups return `Option` and traversal
/// skips unresolvable ids.
#[derive(Debug)]
pub(crate) struct Graph {
    /// Layers of the graph, layer 0 first. Each layer maps an id to its
    /// neighbor ids (no duplicates).
    pub layers: Vec<HashMap<String, Vec<String>>>,
    /// Highest layer index in use.
    pub max_layer: usize,
    /// The node every descent begins at. Set on the first insertion and
    /// never cleared.
    pub entry_point: Option<String>,
    /// The identity map `id -> Vector`.
    pub vectors: HashMap<String, Vector>,
}

impl Graph {
    pub(crate) fn new() -> Self {
        Self {
            layers: vec![HashMap::new()],
            max_layer: 0,
            entry_point: None,
            vectors: HashMap::new(),
        }
    }

    /// Extend `layers` so a node assigned `level` fits, raising
    /// `max_layer` when the level is a new maximum.
    pub(crate) fn ensure_level(&mut self, level: usize) {
        while self.layers.len() <= level {
            self.layers.push(HashMap::new());
        }
        if level > self.max_layer {
            self.max_layer = level;
        }
    }

    /// The neighbor list of `id` in `layer`, empty if absent.
    pub(crate) fn neighbors(&self, layer: usize, id: &str) -> &[String] {
        self.layers
            .get(layer)
            .and_then(|l| l.get(id))
            .map_or(&[], |n| n.as_slice())
    }

    /// Resolve the data array for an id, if it is still present in the
    /// identity map.
    pub(crate) fn data_of(&self, id: &str) -> Option<&[f32]> {
        self.vectors.get(id).map(|v| v.data.as_slice())
    }
}

/// A candidate during layer search: an id with its distance to the query.
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    pub id: String,
    pub distance: f32,
}

impl Candidate {
    pub(crate) fn new(id: impl Into<String>, distance: f32) -> Self {
        Self { id: id.into(), distance }
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.distance == other.distance && self.id == other.id
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior (smallest distance first).
        // NaN compares equal to keep the ordering total; valid kernels
        // never produce NaN.
        other.distance.partial_cmp(&self.distance).unwrap_or(Ordering::Equal)
    }
}

/// A max-heap wrapper used for the result set, so the worst element can be
/// ejected in O(log ef).
#[derive(Debug, Clone)]
pub(crate) struct MaxCandidate(pub Candidate);

impl PartialEq for MaxCandidate {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for MaxCandidate {}

impl PartialOrd for MaxCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MaxCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.distance.partial_cmp(&other.0.distance).unwrap_or(Ordering::Equal)
    }
}

/// Sort candidates by ascending distance to the query.
pub(crate) fn sort_by_distance(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(Ordering::Equal));
}
