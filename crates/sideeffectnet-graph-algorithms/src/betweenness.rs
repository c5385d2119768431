//! Betweenness centrality (Brandes' algorithm)
//!
//! Exact all-sources computation and a pivot-sampled approximation for large
//! graphs. The sampled variant estimates centrality from shortest paths rooted
//! at `k` uniformly chosen pivot sources and rescales by `n / k`.

use super::common::{GraphView, NodeId};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::collections::{HashMap, VecDeque};
use std::fmt;

/// Betweenness centrality configuration
#[derive(Debug, Clone, Copy)]
pub struct BetweennessConfig {
    /// Rescale scores into [0, 1] by the number of node pairs
    pub normalized: bool,
    /// Treat edges as one-way; affects normalization only (the view itself
    /// decides whether reciprocal edges were materialized)
    pub directed: bool,
    /// RNG seed for pivot sampling; `None` uses entropy
    pub seed: Option<u64>,
}

impl Default for BetweennessConfig {
    fn default() -> Self {
        Self {
            normalized: true,
            directed: true,
            seed: None,
        }
    }
}

/// Errors from the sampled computation
#[derive(Debug, PartialEq, Eq)]
pub enum BetweennessError {
    /// The requested pivot count was zero
    NoPivots,
}

impl fmt::Display for BetweennessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetweennessError::NoPivots => write!(f, "pivot count must be at least 1"),
        }
    }
}

impl std::error::Error for BetweennessError {}

/// Exact betweenness centrality from all sources.
pub fn betweenness_centrality(view: &GraphView, config: &BetweennessConfig) -> HashMap<NodeId, f64> {
    let sources: Vec<usize> = (0..view.node_count).collect();
    let raw = accumulate(view, &sources);
    rescale(view, raw, config, None)
}

/// Approximate betweenness centrality from `k` uniformly sampled pivot
/// sources. `k` is clamped to the node count; zero pivots is an error.
pub fn sampled_betweenness_centrality(
    view: &GraphView,
    k: usize,
    config: &BetweennessConfig,
) -> Result<HashMap<NodeId, f64>, BetweennessError> {
    if k == 0 {
        return Err(BetweennessError::NoPivots);
    }
    let n = view.node_count;
    if n == 0 {
        return Ok(HashMap::new());
    }
    let k = k.min(n);

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let sources = rand::seq::index::sample(&mut rng, n, k).into_vec();

    let raw = accumulate(view, &sources);
    Ok(rescale(view, raw, config, Some(k)))
}

/// Run one Brandes pass per source and sum the pair dependencies.
fn accumulate(view: &GraphView, sources: &[usize]) -> Vec<f64> {
    let n = view.node_count;
    sources
        .par_iter()
        .map(|&s| brandes_pass(view, s))
        .reduce(
            || vec![0.0; n],
            |mut acc, delta| {
                for (a, d) in acc.iter_mut().zip(delta) {
                    *a += d;
                }
                acc
            },
        )
}

/// Single-source shortest-path counting plus backward dependency
/// accumulation (Brandes 2001, unweighted).
fn brandes_pass(view: &GraphView, source: usize) -> Vec<f64> {
    let n = view.node_count;
    let mut sigma = vec![0.0_f64; n];
    let mut dist = vec![usize::MAX; n];
    let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut order = Vec::with_capacity(n);
    let mut queue = VecDeque::new();

    sigma[source] = 1.0;
    dist[source] = 0;
    queue.push_back(source);

    while let Some(u) = queue.pop_front() {
        order.push(u);
        for &v in view.successors(u) {
            if dist[v] == usize::MAX {
                dist[v] = dist[u] + 1;
                queue.push_back(v);
            }
            if dist[v] == dist[u] + 1 {
                sigma[v] += sigma[u];
                preds[v].push(u);
            }
        }
    }

    let mut delta = vec![0.0_f64; n];
    while let Some(w) = order.pop() {
        for &v in &preds[w] {
            delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
        }
    }
    delta[source] = 0.0;
    delta
}

/// Apply pair-count normalization and, for sampled runs, the `n / k`
/// extrapolation factor.
fn rescale(
    view: &GraphView,
    raw: Vec<f64>,
    config: &BetweennessConfig,
    pivots: Option<usize>,
) -> HashMap<NodeId, f64> {
    let n = view.node_count;
    let mut scale = if config.normalized {
        if n > 2 {
            Some(1.0 / ((n - 1) as f64 * (n - 2) as f64))
        } else {
            None
        }
    } else if !config.directed {
        // Each unordered pair is visited from both endpoints
        Some(0.5)
    } else {
        None
    };

    if let (Some(s), Some(k)) = (scale, pivots) {
        scale = Some(s * n as f64 / k as f64);
    } else if let (None, Some(k)) = (scale, pivots) {
        scale = Some(n as f64 / k as f64);
    }

    let mut result = HashMap::with_capacity(n);
    for (idx, mut score) in raw.into_iter().enumerate() {
        if let Some(s) = scale {
            score *= s;
        }
        result.insert(view.index_to_node[idx], score);
    }
    result
}
