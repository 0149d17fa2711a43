//! Common-prefix extraction over batches of keys.

/// Longest string that is a leading substring of every key in the batch.
///
/// Compares character positions until divergence or until the shortest key
/// is exhausted. Returns the empty string for fewer than two keys: a single
/// key carries no evidence that its neighborhood is dense enough to be worth
/// subdividing.
pub fn common_prefix<S: AsRef<str>>(keys: &[S]) -> String {
    if keys.len() < 2 {
        return String::new();
    }

    let first = keys[0].as_ref();
    let mut end = first.len();

    for key in &keys[1..] {
        let key = key.as_ref();
        let shared = first
            .char_indices()
            .zip(key.chars())
            .find(|((_, a), b)| a != b)
            .map(|((i, _), _)| i)
            .unwrap_or_else(|| first.len().min(key.len()));
        end = end.min(shared);
        if end == 0 {
            return String::new();
        }
    }

    first[..end].to_string()
}
