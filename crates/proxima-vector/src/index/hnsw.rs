//! HNSW index implementation.
//!
//! The index maintains a multi-layer proximity graph with skip-list-like
//! properties: every node lives in layer 0, and each node is promoted to
//! higher layers with geometrically decreasing probability. Searches
//! descend greedily through the sparse upper layers before running a
//! beam search across the dense bottom layer, which gives logarithmic
//! search complexity in practice.
//!
//! Key parameters:
//! - `m`: neighbor cap per node per layer
//! - `ef_construction`: candidate-list width while wiring an insertion
//! - `ef_search`: candidate-list width during queries
//!
//! The index is internally synchronized: insertions take the writer lock,
//! searches the reader lock, and all methods work through `&self`.

use std::collections::{BinaryHeap, HashMap, HashSet};
use std::sync::RwLock;

use crate::distance::DistanceMetric;
use crate::error::VectorError;
use crate::types::Vector;

use super::config::HnswConfig;
use super::graph::{sort_by_distance, Candidate, Graph, MaxCandidate};

/// Slack applied to the layer-search early-stop bound: candidates up to
/// 10% worse than the current worst result are still explored. Raising it
/// trades latency for recall; 1.1 matches the reference recall numbers.
const EXPLORATION_SLACK: f32 = 1.1;

/// Hard cap on assigned levels, guarding against pathological draws.
const MAX_LEVEL: usize = 16;

/// Random level generator.
///
/// Draws node levels from the geometric distribution `floor(-ln(u) * mL)`
/// described in the HNSW paper, where `mL = 1 / ln(M)`.
struct LevelGenerator {
    ml: f64,
    rng_state: u64,
}

impl LevelGenerator {
    #[allow(clippy::cast_possible_truncation)] // Nanos truncation is fine for seeding
    fn new(ml: f64) -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x9E37_79B9_7F4A_7C15);
        Self::with_seed(ml, seed)
    }

    fn with_seed(ml: f64, seed: u64) -> Self {
        // xorshift64 has a fixed point at zero.
        let rng_state = if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed };
        Self { ml, rng_state }
    }

    /// Generate a random level for a new node.
    #[allow(clippy::cast_precision_loss)] // Precision loss is acceptable for RNG
    #[allow(clippy::cast_possible_truncation)] // Level is bounded by MAX_LEVEL
    #[allow(clippy::cast_sign_loss)] // Level is non-negative after floor
    fn next_level(&mut self) -> usize {
        // xorshift64
        let mut x = self.rng_state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.rng_state = x;

        let mut uniform = (x as f64) / (u64::MAX as f64);
        if uniform <= 0.0 {
            uniform = f64::MIN_POSITIVE;
        }

        let level = ((-uniform.ln()) * self.ml).floor() as usize;
        level.min(MAX_LEVEL)
    }
}

/// HNSW (Hierarchical Navigable Small World) index.
///
/// Owns the identity map `id -> Vector` alongside the layered graph, so
/// any id reachable through the graph can be resolved under the same lock.
///
/// # Example
///
/// ```
/// use proxima_vector::index::{HnswConfig, HnswIndex};
/// use proxima_vector::types::Vector;
///
/// let index = HnswIndex::new(HnswConfig::new(2));
/// index.insert(Vector::new("a", vec![0.0, 0.0]))?;
/// index.insert(Vector::new("b", vec![1.0, 0.0]))?;
///
/// let results = index.search(&[0.1, 0.0], 1)?;
/// assert_eq!(results[0].id, "a");
/// # Ok::<(), proxima_vector::VectorError>(())
/// ```
pub struct HnswIndex {
    config: HnswConfig,
    graph: RwLock<Graph>,
    level_gen: RwLock<LevelGenerator>,
}

impl HnswIndex {
    /// Create a new empty index with a clock-seeded level generator.
    #[must_use]
    pub fn new(config: HnswConfig) -> Self {
        let level_gen = LevelGenerator::new(config.level_multiplier());
        Self { config, graph: RwLock::new(Graph::new()), level_gen: RwLock::new(level_gen) }
    }

    /// Create a new empty index with a fixed level-generator seed, for
    /// reproducible graph construction in tests.
    #[must_use]
    pub fn with_seed(config: HnswConfig, seed: u64) -> Self {
        let level_gen = LevelGenerator::with_seed(config.level_multiplier(), seed);
        Self { config, graph: RwLock::new(Graph::new()), level_gen: RwLock::new(level_gen) }
    }

    /// The configuration this index was built with.
    #[must_use]
    pub fn config(&self) -> &HnswConfig {
        &self.config
    }

    /// The distance metric this index compares vectors with.
    #[must_use]
    pub fn metric(&self) -> DistanceMetric {
        self.config.distance_type
    }

    /// Compute the distance between two raw vectors under the bound metric.
    #[inline]
    #[must_use]
    pub fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        self.config.distance_type.calculate(a, b)
    }

    /// Insert a vector and wire it into the graph.
    ///
    /// The first inserted vector becomes the entry point and receives no
    /// edges. Every later insertion descends from the entry point to its
    /// assigned level, then links into each layer from that level down to
    /// 0, trimming any neighbor that ends up with more than `m` links.
    ///
    /// Validation happens before any mutation, so a rejected insert leaves
    /// the identity map and the graph untouched.
    ///
    /// # Errors
    ///
    /// - [`VectorError::EmptyVector`] if the data array is empty.
    /// - [`VectorError::InvalidParameter`] if the id is empty.
    /// - [`VectorError::Duplicate`] if the id is already indexed.
    /// - [`VectorError::LockPoisoned`] if the internal lock is poisoned.
    pub fn insert(&self, vector: Vector) -> Result<(), VectorError> {
        if vector.data.is_empty() {
            return Err(VectorError::EmptyVector);
        }
        if vector.id.is_empty() {
            return Err(VectorError::InvalidParameter("vector id is empty"));
        }

        let mut graph = self.graph.write().map_err(|_| VectorError::LockPoisoned)?;
        if graph.vectors.contains_key(&vector.id) {
            return Err(VectorError::Duplicate(vector.id));
        }

        let level = self.level_gen.write().map_err(|_| VectorError::LockPoisoned)?.next_level();
        graph.ensure_level(level);

        let id = vector.id.clone();
        let data = vector.data.clone();
        graph.vectors.insert(id.clone(), vector);

        // First insertion: the new node becomes the entry point, no edges.
        let Some(mut entry) = graph.entry_point.clone() else {
            graph.entry_point = Some(id);
            return Ok(());
        };

        // Phase 1: descend with width 1 to find the entry for the target
        // level. A layer that yields nothing keeps the current entry.
        for layer in (level + 1..=graph.max_layer).rev() {
            let path = self.search_layer(&graph, &data, &entry, 1, layer);
            if let Some(best) = path.into_iter().next() {
                entry = best.id;
            }
        }

        // Phase 2: link into each layer from the assigned level down to 0.
        for layer in (0..=level).rev() {
            let candidates =
                self.search_layer(&graph, &data, &entry, self.config.ef_construction, layer);
            let candidate_ids: Vec<String> = candidates.into_iter().map(|c| c.id).collect();
            let chosen = self.select_neighbors(&graph, &data, &candidate_ids, self.config.m);

            graph.layers[layer].insert(id.clone(), chosen.clone());

            // Mutual links; collect neighbors pushed over the cap.
            let mut overfull = Vec::new();
            for neighbor in &chosen {
                let links = graph.layers[layer].entry(neighbor.clone()).or_default();
                links.push(id.clone());
                if links.len() > self.config.m {
                    overfull.push(neighbor.clone());
                }
            }

            // Re-select an overfull neighbor's links against its own
            // vector, dropping the back-edge of every link that does not
            // survive so edges stay undirected.
            for neighbor in overfull {
                let Some(neighbor_data) = graph.data_of(&neighbor).map(|d| d.to_vec()) else {
                    continue;
                };
                let current = graph.neighbors(layer, &neighbor).to_vec();
                let trimmed =
                    self.select_neighbors(&graph, &neighbor_data, &current, self.config.m);
                for dropped in current.iter().filter(|&id| !trimmed.contains(id)) {
                    if let Some(links) = graph.layers[layer].get_mut(dropped) {
                        links.retain(|id| id != &neighbor);
                    }
                }
                graph.layers[layer].insert(neighbor, trimmed);
            }

            // The next layer down starts from the best candidate found here.
            if let Some(best) = candidate_ids.into_iter().next() {
                entry = best;
            }
        }

        Ok(())
    }

    /// Find up to `k` stored vectors nearest to `query`, ordered by
    /// ascending distance.
    ///
    /// Returns an empty list when the index is empty.
    ///
    /// # Errors
    ///
    /// - [`VectorError::EmptyVector`] if the query is empty.
    /// - [`VectorError::InvalidParameter`] if `k` is zero.
    /// - [`VectorError::LockPoisoned`] if the internal lock is poisoned.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Vector>, VectorError> {
        if query.is_empty() {
            return Err(VectorError::EmptyVector);
        }
        if k == 0 {
            return Err(VectorError::InvalidParameter("k must be positive"));
        }

        let graph = self.graph.read().map_err(|_| VectorError::LockPoisoned)?;
        let Some(mut entry) = graph.entry_point.clone() else {
            return Ok(Vec::new());
        };

        // Phase 1: descend to layer 1, tracking only the single best entry.
        for layer in (1..=graph.max_layer).rev() {
            let path = self.search_layer(&graph, query, &entry, 1, layer);
            match path.into_iter().next() {
                Some(best) => entry = best.id,
                None => break,
            }
        }

        // Phase 2: beam search across layer 0.
        let width = k.max(self.config.ef_search);
        let found = self.search_layer(&graph, query, &entry, width, 0);

        Ok(found
            .into_iter()
            .take(k)
            .filter_map(|c| graph.vectors.get(&c.id).cloned())
            .collect())
    }

    /// The number of vectors in the identity map.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::LockPoisoned`] if the internal lock is
    /// poisoned.
    pub fn len(&self) -> Result<usize, VectorError> {
        let graph = self.graph.read().map_err(|_| VectorError::LockPoisoned)?;
        Ok(graph.vectors.len())
    }

    /// Whether the index holds no vectors.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::LockPoisoned`] if the internal lock is
    /// poisoned.
    pub fn is_empty(&self) -> Result<bool, VectorError> {
        Ok(self.len()? == 0)
    }

    /// Whether an id is present in the identity map.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::LockPoisoned`] if the internal lock is
    /// poisoned.
    pub fn contains(&self, id: &str) -> Result<bool, VectorError> {
        let graph = self.graph.read().map_err(|_| VectorError::LockPoisoned)?;
        Ok(graph.vectors.contains_key(id))
    }

    /// Look up a stored vector by id.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::LockPoisoned`] if the internal lock is
    /// poisoned.
    pub fn get(&self, id: &str) -> Result<Option<Vector>, VectorError> {
        let graph = self.graph.read().map_err(|_| VectorError::LockPoisoned)?;
        Ok(graph.vectors.get(id).cloned())
    }

    /// Remove a vector from the identity map, returning it if present.
    ///
    /// The graph keeps whatever edges referenced the id; traversals skip
    /// ids they can no longer resolve.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::LockPoisoned`] if the internal lock is
    /// poisoned.
    pub fn remove(&self, id: &str) -> Result<Option<Vector>, VectorError> {
        let mut graph = self.graph.write().map_err(|_| VectorError::LockPoisoned)?;
        Ok(graph.vectors.remove(id))
    }

    /// A snapshot of the identity map.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::LockPoisoned`] if the internal lock is
    /// poisoned.
    pub fn vectors(&self) -> Result<HashMap<String, Vector>, VectorError> {
        let graph = self.graph.read().map_err(|_| VectorError::LockPoisoned)?;
        Ok(graph.vectors.clone())
    }

    /// The current entry point id, if any vector has been inserted.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::LockPoisoned`] if the internal lock is
    /// poisoned.
    pub fn entry_point(&self) -> Result<Option<String>, VectorError> {
        let graph = self.graph.read().map_err(|_| VectorError::LockPoisoned)?;
        Ok(graph.entry_point.clone())
    }

    /// The highest layer index currently in use.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::LockPoisoned`] if the internal lock is
    /// poisoned.
    pub fn max_layer(&self) -> Result<usize, VectorError> {
        let graph = self.graph.read().map_err(|_| VectorError::LockPoisoned)?;
        Ok(graph.max_layer)
    }

    /// The number of layers, including empty ones created by level
    /// assignment.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::LockPoisoned`] if the internal lock is
    /// poisoned.
    pub fn layer_count(&self) -> Result<usize, VectorError> {
        let graph = self.graph.read().map_err(|_| VectorError::LockPoisoned)?;
        Ok(graph.layers.len())
    }

    /// The neighbor ids of `id` in `layer`, empty if the id is not linked
    /// there.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::LockPoisoned`] if the internal lock is
    /// poisoned.
    pub fn neighbors(&self, id: &str, layer: usize) -> Result<Vec<String>, VectorError> {
        let graph = self.graph.read().map_err(|_| VectorError::LockPoisoned)?;
        Ok(graph.neighbors(layer, id).to_vec())
    }

    /// A diagnostic snapshot of every layer's adjacency map.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::LockPoisoned`] if the internal lock is
    /// poisoned.
    pub fn layers(&self) -> Result<Vec<HashMap<String, Vec<String>>>, VectorError> {
        let graph = self.graph.read().map_err(|_| VectorError::LockPoisoned)?;
        Ok(graph.layers.clone())
    }

    /// Beam search within a single layer.
    ///
    /// Maintains a visited set, a min-ordered frontier, and a max-ordered
    /// result set of at most `ef` elements. Terminates when the frontier
    /// drains or the best remaining candidate is worse than the current
    /// worst result by more than [`EXPLORATION_SLACK`]. Returns the up to
    /// `k` best candidates in ascending distance order.
    fn search_layer(
        &self,
        graph: &Graph,
        query: &[f32],
        entry: &str,
        k: usize,
        layer: usize,
    ) -> Vec<Candidate> {
        if k == 0 {
            return Vec::new();
        }
        let metric = self.config.distance_type;
        let Some(entry_data) = graph.data_of(entry) else {
            return Vec::new();
        };
        let entry_distance = metric.calculate(query, entry_data);

        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(entry.to_string());

        let seed = Candidate::new(entry, entry_distance);
        let mut frontier: BinaryHeap<Candidate> = BinaryHeap::new();
        let mut results: BinaryHeap<MaxCandidate> = BinaryHeap::new();
        frontier.push(seed.clone());
        results.push(MaxCandidate(seed));

        let ef = self.effective_width(k, layer);

        while let Some(current) = frontier.pop() {
            if results.len() >= ef {
                let worst = results.peek().map_or(f32::INFINITY, |c| c.0.distance);
                if current.distance > worst * EXPLORATION_SLACK {
                    break;
                }
            }

            for neighbor in graph.neighbors(layer, &current.id) {
                if !visited.insert(neighbor.clone()) {
                    continue;
                }
                let Some(neighbor_data) = graph.data_of(neighbor) else {
                    continue;
                };
                let distance = metric.calculate(query, neighbor_data);
                let worst = results.peek().map_or(f32::INFINITY, |c| c.0.distance);
                if results.len() < ef || distance < worst {
                    let candidate = Candidate::new(neighbor.clone(), distance);
                    results.push(MaxCandidate(candidate.clone()));
                    if results.len() > ef {
                        results.pop();
                    }
                    frontier.push(candidate);
                }
            }
        }

        let mut out: Vec<Candidate> = results.into_iter().map(|m| m.0).collect();
        sort_by_distance(&mut out);
        out.truncate(k);
        out
    }

    /// The effective candidate-list width for a layer search: the caller's
    /// `k`, upgraded to `ef_search` in layer 0 or `ef_construction` in
    /// upper layers when those are wider.
    fn effective_width(&self, k: usize, layer: usize) -> usize {
        if layer == 0 && self.config.ef_search > k {
            self.config.ef_search
        } else if layer > 0 && self.config.ef_construction > k {
            self.config.ef_construction
        } else {
            k
        }
    }

    /// Select at most `m` neighbors from `candidates` for a node at
    /// `query`.
    ///
    /// Small candidate sets are taken whole. Larger sets are reduced with
    /// the diversity heuristic from the HNSW paper: seed with the nearest
    /// candidate, then repeatedly take the candidate whose minimum distance
    /// to the already-selected set is largest. This spreads links across
    /// directions and reduces dead ends compared to a plain top-M cut.
    fn select_neighbors(
        &self,
        graph: &Graph,
        query: &[f32],
        candidates: &[String],
        m: usize,
    ) -> Vec<String> {
        if candidates.len() <= m {
            return candidates.to_vec();
        }
        let metric = self.config.distance_type;

        let mut remaining: Vec<Candidate> = candidates
            .iter()
            .filter_map(|id| {
                graph.data_of(id).map(|d| Candidate::new(id.clone(), metric.calculate(query, d)))
            })
            .collect();
        sort_by_distance(&mut remaining);

        let mut selected: Vec<String> = Vec::with_capacity(m);
        if !remaining.is_empty() {
            selected.push(remaining.remove(0).id);
        }

        while selected.len() < m && !remaining.is_empty() {
            let mut best_index = 0;
            let mut best_separation = f32::NEG_INFINITY;
            for (i, item) in remaining.iter().enumerate() {
                let Some(item_data) = graph.data_of(&item.id) else {
                    continue;
                };
                let mut separation = f32::INFINITY;
                for chosen in &selected {
                    if let Some(chosen_data) = graph.data_of(chosen) {
                        separation = separation.min(metric.calculate(item_data, chosen_data));
                    }
                }
                if separation > best_separation {
                    best_separation = separation;
                    best_index = i;
                }
            }
            selected.push(remaining.remove(best_index).id);
        }

        selected
    }
}
