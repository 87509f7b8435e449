use rayon::prelude::*;

/// Builds the brute-force search space for `domain`.
///
/// Fast mode produces one candidate per prefix. Thorough mode adds every
/// ordered hyphenated pair `p1-p2`, which is quadratic in the wordlist
/// size; callers keep that tractable by feeding the shorter wordlist in.
/// No dedup happens here; the aggregator is the dedup point.
pub fn generate(prefixes: &[String], domain: &str, fast: bool) -> Vec<String> {
    let mut candidates: Vec<String> = prefixes
        .iter()
        .map(|prefix| format!("{prefix}.{domain}"))
        .collect();

    if !fast {
        let pairs: Vec<String> = prefixes
            .par_iter()
            .flat_map_iter(|first| {
                prefixes
                    .iter()
                    .map(move |second| format!("{first}-{second}.{domain}"))
            })
            .collect();
        candidates.extend(pairs);
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wordlist() -> Vec<String> {
        vec!["a".to_string(), "b".to_string()]
    }

    #[test]
    fn fast_mode_is_one_candidate_per_prefix() {
        let candidates = generate(&wordlist(), "x.com", true);
        assert_eq!(candidates, vec!["a.x.com", "b.x.com"]);
    }

    #[test]
    fn thorough_mode_adds_every_ordered_pair() {
        let candidates = generate(&wordlist(), "x.com", false);
        assert_eq!(
            candidates,
            vec![
                "a.x.com", "b.x.com", "a-a.x.com", "a-b.x.com", "b-a.x.com", "b-b.x.com",
            ]
        );
    }

    #[test]
    fn empty_wordlist_yields_no_candidates() {
        assert!(generate(&[], "x.com", false).is_empty());
    }
}
