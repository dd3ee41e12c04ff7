//! Clusters exact matches by diagonal and separation, then chains each cluster.

pub mod chain;
pub mod diagonal;
pub mod filter;
pub mod union_find;

pub use chain::{peel_chains, ChainLink, GapChain};
pub use diagonal::{assign_clusters, diagonal_tolerance};
pub use filter::filter_matches;
pub use union_find::UnionFind;

use itertools::Itertools;

use crate::libs::mum::Match;

pub const DEFAULT_FIXED_SEPARATION: i64 = 5;
pub const DEFAULT_MAX_SEPARATION: i64 = 1000;
pub const DEFAULT_MIN_OUTPUT_SCORE: i64 = 200;
pub const DEFAULT_SEPARATION_FACTOR: f64 = 0.05;

/// How a peeled chain is scored against `min_output_score`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChainScore {
    /// Sum of member lengths
    #[default]
    Sum,
    /// End minus start of the chain on the reference
    Extent,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterOpt {
    /// Diagonal difference always tolerated between two matches
    pub fixed_separation: i64,
    /// Diagonal difference tolerated per unit of query separation
    pub separation_factor: f64,
    /// Matches further apart on the query are never joined
    pub max_separation: i64,
    pub min_output_score: i64,
    pub scoring: ChainScore,
}

impl Default for ClusterOpt {
    fn default() -> Self {
        Self {
            fixed_separation: DEFAULT_FIXED_SEPARATION,
            separation_factor: DEFAULT_SEPARATION_FACTOR,
            max_separation: DEFAULT_MAX_SEPARATION,
            min_output_score: DEFAULT_MIN_OUTPUT_SCORE,
            scoring: ChainScore::Sum,
        }
    }
}

/// Runs filter, clustering and chain extraction over one block at a time.
///
/// The disjoint-set buffer is reused from block to block.
#[derive(Debug, Clone, Default)]
pub struct Clusterer {
    opt: ClusterOpt,
    uf: UnionFind,
}

impl Clusterer {
    pub fn new(opt: ClusterOpt) -> Self {
        Self {
            opt,
            uf: UnionFind::default(),
        }
    }

    /// Returns the chains of one block that reach `min_output_score`, cluster by cluster.
    ///
    /// `matches` is reordered and filtered in place.
    pub fn process(&mut self, matches: &mut Vec<Match>) -> Vec<GapChain> {
        if matches.is_empty() {
            return vec![];
        }
        let input = matches.len();

        matches.sort_by_key(|m| (m.q_start, m.r_start));
        filter_matches(matches);

        self.uf.reset(matches.len());
        let clusters = assign_clusters(matches, &mut self.uf, &self.opt);

        matches.sort_by_key(|m| (m.cluster, m.q_start, m.r_start));

        let mut chains = vec![];
        for (_, run) in &matches.iter().chunk_by(|m| m.cluster) {
            let peeled = peel_chains(run.copied().collect(), &self.opt);
            chains.extend(
                peeled
                    .into_iter()
                    .filter(|c| c.score >= self.opt.min_output_score),
            );
        }

        log::debug!(
            "{} matches, {} after filter, {} clusters, {} chains",
            input,
            matches.len(),
            clusters,
            chains.len()
        );

        chains
    }
}
