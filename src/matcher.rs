use crate::format::{Match, MAX_DISTANCE, MAX_MATCH};

/// Length of the common run starting at `i` and `j` (`i < j`)
///
/// The run at `i` may overlap the one at `j`. Never looks past the end of `inp`
/// and never counts past [MAX_MATCH].
#[inline]
pub fn match_length(inp: &[u8], i: usize, j: usize) -> usize {
    debug_assert!(i < j);
    inp[j..]
        .iter()
        .take(MAX_MATCH)
        .zip(inp[i..].iter())
        .take_while(|(a, b)| a == b)
        .count()
}

/// Longest match for position `j`, searching the prefix chain in `offsets`
///
/// Candidates are visited nearest first and only a strictly longer run replaces
/// the current best, so the nearest of equally long candidates wins.
pub fn best_match(inp: &[u8], offsets: &[usize], j: usize) -> Match {
    if offsets[j] == 0 {
        return Match::NONE;
    }

    let upper_bound = MAX_MATCH.min(inp.len() - j);
    let mut best = Match::NONE;
    let mut i = j - offsets[j];
    while j - i <= MAX_DISTANCE {
        let n = match_length(inp, i, j);
        if n > best.length {
            best = Match {
                distance: j - i,
                length: n,
            };
            // nothing further back can be strictly longer
            if n == upper_bound {
                break;
            }
        }

        if offsets[i] == 0 {
            break;
        }
        i -= offsets[i];
    }

    best
}
