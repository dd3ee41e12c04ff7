use std::fmt;

use itertools::Itertools;

use crate::libs::cluster::{ChainScore, ClusterOpt};
use crate::libs::mum::Match;

/// One member of an extracted chain, already trimmed by its overlap with the previous member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainLink {
    pub r_start: i64,
    pub q_start: i64,
    pub len: i64,
    /// Amount trimmed from the front of the match
    pub adj: i64,
    /// Gap on the reference and the query from the previous member's end
    pub gap: Option<(i64, i64)>,
}

impl fmt::Display for ChainLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let adj = if self.adj == 0 {
            "none".to_string()
        } else {
            (-self.adj).to_string()
        };
        let (r_gap, q_gap) = match self.gap {
            Some((r, q)) => (r.to_string(), q.to_string()),
            None => ("-".to_string(), "-".to_string()),
        };

        write!(
            f,
            "{:>8} {:>8} {:>6} {:>7} {:>6} {:>6}",
            self.r_start, self.q_start, self.len, adj, r_gap, q_gap
        )
    }
}

/// A monotone run of matches peeled from one cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GapChain {
    pub links: Vec<ChainLink>,
    /// Sum of member lengths, or the reference extent
    pub score: i64,
}

impl fmt::Display for GapChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for link in &self.links {
            writeln!(f, "{}", link)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
struct DpEntry {
    score: i64,
    pred: Option<usize>,
    adj: i64,
}

fn score_run(run: &[Match]) -> Vec<DpEntry> {
    let mut dp: Vec<DpEntry> = Vec::with_capacity(run.len());

    for (i, cur) in run.iter().enumerate() {
        let mut entry = DpEntry {
            score: cur.len,
            pred: None,
            adj: 0,
        };

        for (j, prev) in run[..i].iter().enumerate() {
            let olap = 0i64
                .max(prev.r_end() - cur.r_start)
                .max(prev.q_end() - cur.q_start);
            // penalize off diagonal matches
            let pen = olap + (cur.diagonal() - prev.diagonal()).abs();

            let candidate = dp[j].score + cur.len - pen;
            if candidate > entry.score {
                entry = DpEntry {
                    score: candidate,
                    pred: Some(j),
                    adj: olap,
                };
            }
        }

        dp.push(entry);
    }

    dp
}

/// Repeatedly extracts the best-scoring chain from `run` until no match is left.
///
/// `run` is one cluster, sorted by `(q_start, r_start)`. Every match ends up in
/// exactly one returned chain; callers filter them by score.
pub fn peel_chains(mut run: Vec<Match>, opt: &ClusterOpt) -> Vec<GapChain> {
    let mut chains = vec![];

    while !run.is_empty() {
        let dp = score_run(&run);

        // first maximum wins
        let mut best = 0;
        for (i, entry) in dp.iter().enumerate().skip(1) {
            if entry.score > dp[best].score {
                best = i;
            }
        }

        let mut members = vec![];
        let mut cur = Some(best);
        while let Some(i) = cur {
            members.push(i);
            cur = dp[i].pred;
        }
        members.reverse();

        let score = match opt.scoring {
            ChainScore::Sum => members.iter().map(|&i| run[i].len).sum(),
            ChainScore::Extent => {
                let lo = members.iter().map(|&i| run[i].r_start).min().unwrap_or(0);
                let hi = members.iter().map(|&i| run[i].r_end()).max().unwrap_or(0);
                hi - lo
            }
        };

        let mut links = Vec::with_capacity(members.len());
        links.push(ChainLink {
            r_start: run[members[0]].r_start,
            q_start: run[members[0]].q_start,
            len: run[members[0]].len,
            adj: 0,
            gap: None,
        });
        for (&p, &i) in members.iter().tuple_windows() {
            let (prev, cur, adj) = (&run[p], &run[i], dp[i].adj);
            links.push(ChainLink {
                r_start: cur.r_start + adj,
                q_start: cur.q_start + adj,
                len: cur.len - adj,
                adj,
                gap: Some((
                    cur.r_start + adj - prev.r_end(),
                    cur.q_start + adj - prev.q_end(),
                )),
            });
        }
        chains.push(GapChain { links, score });

        let mut selected = vec![false; run.len()];
        for &i in &members {
            selected[i] = true;
        }
        let mut flags = selected.into_iter();
        run.retain(|_| !flags.next().unwrap_or(false));
    }

    chains
}
