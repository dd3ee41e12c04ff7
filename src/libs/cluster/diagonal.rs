use crate::libs::cluster::{ClusterOpt, UnionFind};
use crate::libs::mum::Match;

/// Largest diagonal difference allowed between two matches `sep` apart on the query.
pub fn diagonal_tolerance(opt: &ClusterOpt, sep: i64) -> i64 {
    let scaled = (opt.separation_factor * sep as f64) as i64;
    opt.fixed_separation.max(scaled)
}

/// Unions nearby matches with similar diagonals and records each match's cluster.
///
/// `matches` *must* be sorted by `q_start`, and `uf` reset to `matches.len()`.
/// Returns the number of clusters.
pub fn assign_clusters(matches: &mut [Match], uf: &mut UnionFind, opt: &ClusterOpt) -> usize {
    let n = matches.len();

    for i in 0..n {
        let i_end = matches[i].q_end();
        let i_diag = matches[i].diagonal();

        for j in (i + 1)..n {
            let sep = matches[j].q_start - i_end;
            if sep > opt.max_separation {
                break;
            }

            let diag_diff = (matches[j].diagonal() - i_diag).abs();
            if diag_diff <= diagonal_tolerance(opt, sep) {
                let (a, b) = (uf.find(i), uf.find(j));
                uf.union(a, b);
            }
        }
    }

    let mut clusters = 0;
    for (i, m) in matches.iter_mut().enumerate() {
        m.cluster = uf.find(i);
        if m.cluster == i {
            clusters += 1;
        }
    }

    clusters
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster_ids(matches: &mut [Match], opt: &ClusterOpt) -> Vec<usize> {
        let mut uf = UnionFind::new(matches.len());
        assign_clusters(matches, &mut uf, opt);
        matches.iter().map(|m| m.cluster).collect()
    }

    #[test]
    fn test_tolerance() {
        let opt = ClusterOpt::default();
        assert_eq!(diagonal_tolerance(&opt, 0), 5);
        assert_eq!(diagonal_tolerance(&opt, 100), 5);
        assert_eq!(diagonal_tolerance(&opt, 119), 5);
        assert_eq!(diagonal_tolerance(&opt, 200), 10);
        assert_eq!(diagonal_tolerance(&opt, 1000), 50);
        // overlapping spans
        assert_eq!(diagonal_tolerance(&opt, -300), 5);
    }

    #[test]
    fn test_threshold_boundary() {
        let opt = ClusterOpt::default();

        // gap 200, tolerance 10
        let mut matches = vec![Match::new(0, 0, 10), Match::new(200, 210, 10)];
        let ids = cluster_ids(&mut matches, &opt);
        assert_eq!(ids[0], ids[1]);

        let mut matches = vec![Match::new(0, 0, 10), Match::new(199, 210, 10)];
        let ids = cluster_ids(&mut matches, &opt);
        assert_ne!(ids[0], ids[1]);

        // small gap, fixed tolerance
        let mut matches = vec![Match::new(0, 0, 10), Match::new(15, 20, 10)];
        let ids = cluster_ids(&mut matches, &opt);
        assert_eq!(ids[0], ids[1]);

        let mut matches = vec![Match::new(0, 0, 10), Match::new(14, 20, 10)];
        let ids = cluster_ids(&mut matches, &opt);
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn test_max_separation() {
        let opt = ClusterOpt::default();

        let mut matches = vec![Match::new(0, 0, 10), Match::new(1010, 1010, 10)];
        let ids = cluster_ids(&mut matches, &opt);
        assert_eq!(ids[0], ids[1]);

        let mut matches = vec![Match::new(0, 0, 10), Match::new(1011, 1011, 10)];
        let ids = cluster_ids(&mut matches, &opt);
        assert_ne!(ids[0], ids[1]);

        let opt = ClusterOpt {
            max_separation: 2000,
            ..ClusterOpt::default()
        };
        let mut matches = vec![Match::new(0, 0, 10), Match::new(1011, 1011, 10)];
        let ids = cluster_ids(&mut matches, &opt);
        assert_eq!(ids[0], ids[1]);
    }

    #[test]
    fn test_transitive_clusters() {
        let opt = ClusterOpt::default();
        let mut matches = vec![
            Match::new(0, 0, 50),
            Match::new(5000, 20, 50),
            Match::new(103, 100, 50),
            Match::new(5090, 110, 50),
            Match::new(204, 200, 50),
        ];
        matches.sort_by_key(|m| (m.q_start, m.r_start));

        let mut uf = UnionFind::new(matches.len());
        let count = assign_clusters(&mut matches, &mut uf, &opt);
        assert_eq!(count, 2);

        let near: Vec<usize> = matches
            .iter()
            .filter(|m| m.r_start < 1000)
            .map(|m| m.cluster)
            .collect();
        assert_eq!(near.len(), 3);
        assert!(near.iter().all(|&c| c == near[0]));

        let far: Vec<usize> = matches
            .iter()
            .filter(|m| m.r_start >= 1000)
            .map(|m| m.cluster)
            .collect();
        assert_eq!(far.len(), 2);
        assert_eq!(far[0], far[1]);
        assert_ne!(far[0], near[0]);
    }
}
