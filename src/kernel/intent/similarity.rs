//! Normalized string similarity on a 0-100 scale.
//!
//! `ratio` is the indel-normalized similarity `200 * LCS / (|a| + |b|)`.
//! `partial_ratio` slides the shorter string over the longer one and keeps the
//! best `ratio`, so a trigger embedded in a longer utterance still scores high.

/// Full-string similarity. Two empty strings are identical (100).
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    ratio_chars(&a, &b)
}

/// Best-aligned substring similarity.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() && b.is_empty() {
        return 100.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    if a.len() < b.len() {
        best_window(&a, &b)
    } else if a.len() > b.len() {
        best_window(&b, &a)
    } else {
        // Equal lengths: edge windows differ by direction
        best_window(&a, &b).max(best_window(&b, &a))
    }
}

/// Word-order insensitive similarity: tokens are sorted before `ratio`.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    200.0 * lcs_len(a, b) as f64 / total as f64
}

fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];

    for x in a {
        for (j, y) in b.iter().enumerate() {
            cur[j + 1] = if x == y {
                prev[j] + 1
            } else {
                prev[j + 1].max(cur[j])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

/// `needle.len() <= hay.len()`. Includes the partial windows hanging off both edges.
fn best_window(needle: &[char], hay: &[char]) -> f64 {
    let m = needle.len();
    let n = hay.len();
    let mut best: f64 = 0.0;

    for i in 1..m {
        best = best.max(ratio_chars(needle, &hay[..i]));
    }
    for i in 0..=(n - m) {
        best = best.max(ratio_chars(needle, &hay[i..i + m]));
        if best >= 100.0 {
            return 100.0;
        }
    }
    for i in (n - m + 1)..n {
        best = best.max(ratio_chars(needle, &hay[i..]));
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_of_identical_strings_is_full() {
        assert_eq!(ratio("what time is it", "what time is it"), 100.0);
        assert_eq!(ratio("", ""), 100.0);
        assert_eq!(ratio("abc", ""), 0.0);
    }

    #[test]
    fn ratio_counts_common_subsequence() {
        // LCS("yes", "yeah") = "ye" -> 200 * 2 / 7
        let score = ratio("yes", "yeah");
        assert!((score - 400.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn partial_ratio_finds_embedded_trigger() {
        assert_eq!(partial_ratio("please open chrome now", "chrome"), 100.0);
        assert_eq!(partial_ratio("chrome", "please open chrome now"), 100.0);
        assert!(partial_ratio("hi", "hello jarvis") < 98.0);
    }

    #[test]
    fn partial_ratio_handles_edge_windows() {
        // "me" hangs off the end of "chrome"
        assert!(partial_ratio("mex", "chrome") > 60.0);
        assert_eq!(partial_ratio("", "x"), 0.0);
    }

    #[test]
    fn token_sort_ignores_word_order() {
        assert_eq!(token_sort_ratio("open chrome", "chrome open"), 100.0);
    }
}
