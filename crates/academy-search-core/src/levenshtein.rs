//! Edit distance and the normalized similarity built on it.
//!
//! Distances count `char`s, not bytes. Insert, delete, and substitute all
//! cost 1; the history similarity formula is calibrated to that.

/// Classic Levenshtein distance using two rolling rows.
///
/// Rows are sized by the shorter string, so memory is `O(min(m, n))`.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };

    let mut prev: Vec<usize> = (0..=short.len()).collect();
    let mut curr: Vec<usize> = vec![0; short.len() + 1];

    for (i, lc) in long.iter().enumerate() {
        curr[0] = i + 1;
        for (j, sc) in short.iter().enumerate() {
            curr[j + 1] = if lc == sc {
                prev[j]
            } else {
                1 + prev[j].min(prev[j + 1]).min(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}

/// Similarity in `[0, 1]`: `(len(longer) - distance) / len(longer)`.
///
/// Two empty strings are identical (`1.0`).
pub fn similarity(a: &str, b: &str) -> f64 {
    let longer = a.chars().count().max(b.chars().count());
    if longer == 0 {
        return 1.0;
    }
    let distance = levenshtein_distance(a, b);
    (longer - distance) as f64 / longer as f64
}

/// Best edit distance between `pattern` and any substring of `text`.
///
/// Sellers' variant of the Levenshtein recurrence: the first row is all
/// zeros so a match may start anywhere in `text`, and the answer is the
/// minimum of the last row so it may end anywhere.
pub fn substring_distance(pattern: &[char], text: &[char]) -> usize {
    if pattern.is_empty() {
        return 0;
    }

    let mut prev: Vec<usize> = vec![0; text.len() + 1];
    let mut curr: Vec<usize> = vec![0; text.len() + 1];

    for (i, pc) in pattern.iter().enumerate() {
        curr[0] = i + 1;
        for (j, tc) in text.iter().enumerate() {
            let cost = usize::from(pc != tc);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev.iter().copied().min().unwrap_or(pattern.len())
}
