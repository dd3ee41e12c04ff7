use crate::libs::mum::Match;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Keep,
    DropEarlier,
    DropLater,
    MarkLater,
}

/// Decides between two matches that start at the same position on one axis.
///
/// `olap` is measured on the other axis.
fn judge_repeat(earlier: &Match, later: &Match, olap: i64) -> Verdict {
    if earlier.len < later.len {
        if olap >= earlier.len / 2 {
            return Verdict::DropEarlier;
        }
    } else if later.len < earlier.len {
        if olap >= later.len / 2 {
            return Verdict::DropLater;
        }
    } else if olap >= earlier.len / 2 {
        return Verdict::MarkLater;
    }

    Verdict::Keep
}

/// Removes matches internal to a repeat and merges overlapping matches on the same diagonal.
///
/// If the reference has 27 As and the query has 20, `mummer` reports one match per
/// phase; only the first and the last are kept.
///
/// `matches` *must* be sorted by `(q_start, r_start)`. Survivors keep their order.
pub fn filter_matches(matches: &mut Vec<Match>) {
    let n = matches.len();
    let mut good = vec![true; n];
    let mut tentative = vec![false; n];

    for i in 0..n.saturating_sub(1) {
        if !good[i] {
            continue;
        }

        let i_diag = matches[i].diagonal();
        let mut i_end = matches[i].q_end();

        let mut j = i + 1;
        while j < n && matches[j].q_start <= i_end {
            debug_assert!(matches[i].q_start <= matches[j].q_start);

            if !good[j] {
                j += 1;
                continue;
            }

            let (a, b) = (matches[i], matches[j]);
            let verdict = if b.diagonal() == i_diag {
                let j_extent = b.q_end() - a.q_start;
                if j_extent > a.len {
                    matches[i].len = j_extent;
                    i_end = a.q_start + j_extent;
                }
                Verdict::DropLater
            } else if a.r_start == b.r_start {
                judge_repeat(&a, &b, a.q_end() - b.q_start)
            } else if a.q_start == b.q_start {
                judge_repeat(&a, &b, a.r_end() - b.r_start)
            } else {
                Verdict::Keep
            };

            match verdict {
                Verdict::Keep => {}
                Verdict::DropLater => good[j] = false,
                Verdict::DropEarlier => {
                    good[i] = false;
                    break;
                }
                Verdict::MarkLater => {
                    tentative[j] = true;
                    if tentative[i] {
                        good[i] = false;
                        break;
                    }
                }
            }

            j += 1;
        }
    }

    let mut keep = good.into_iter();
    matches.retain(|_| keep.next().unwrap_or(false));
}
