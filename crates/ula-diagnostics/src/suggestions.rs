// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Did-you-mean hints for misspelled names.

/// Compute edit distance (Levenshtein) between two strings.
fn edit_distance(a: &str, b: &str) -> usize {
    let b_len = b.chars().count();
    if a.is_empty() {
        return b_len;
    }
    if b.is_empty() {
        return a.chars().count();
    }

    // Single-row formulation: row[j] holds the distance from the prefix
    // of `a` seen so far to the first j chars of `b`.
    let mut row: Vec<usize> = (0..=b_len).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut diag = row[0];
        row[0] = i + 1;
        for (j, cb) in b.chars().enumerate() {
            let substitute = diag + usize::from(ca != cb);
            diag = row[j + 1];
            row[j + 1] = substitute.min(diag + 1).min(row[j] + 1);
        }
    }
    row[b_len]
}

/// Find the best match for `name` among `candidates`.
///
/// Returns `Some("did you mean `closest`?")` if a close match is found.
/// The distance budget scales with the name length so short names only
/// match near-exact candidates.
pub fn did_you_mean<'a>(
    name: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> Option<String> {
    let budget = match name.len() {
        0..=2 => 1,
        3..=5 => 2,
        _ => 3,
    };

    candidates
        .into_iter()
        .filter(|c| c.len().abs_diff(name.len()) <= budget)
        .map(|c| (edit_distance(name, c), c))
        .filter(|&(dist, _)| dist <= budget)
        .min_by_key(|&(dist, _)| dist)
        .map(|(_, closest)| format!("did you mean `{}`?", closest))
}
