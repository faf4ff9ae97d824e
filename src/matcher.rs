//! Fuzzy resolution of a voice transcript against a course roster.

/// Minimum similarity score a candidate must strictly exceed to count as a
/// positive identification.
pub const MATCH_THRESHOLD: u32 = 70;

/// Case-insensitive similarity between two strings as a 0-100 integer:
/// `100 * (1 - edit_distance / max(len(a), len(b)))`, rounded.
pub fn similarity(a: &str, b: &str) -> u32 {
    let ratio = strsim::normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase());
    (ratio * 100.0).round() as u32
}

/// Scan the roster in iteration order and keep the single highest-scoring
/// candidate. A candidate replaces the current best only on a strictly
/// greater score, so ties keep the first-encountered entry. Returns the best
/// candidate only when its score exceeds [`MATCH_THRESHOLD`]; an empty roster
/// yields `None`.
pub fn best_match<'a, I>(transcript: &str, roster: I) -> Option<(i64, &'a str)>
where
    I: IntoIterator<Item = (i64, &'a str)>,
{
    let mut best: Option<(i64, &'a str)> = None;
    let mut best_score: u32 = 0;

    for (id, full_name) in roster {
        let score = similarity(transcript, full_name);
        if score > best_score {
            best_score = score;
            best = Some((id, full_name));
        }
    }

    if best_score > MATCH_THRESHOLD {
        best
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(names: &[(i64, &'static str)]) -> Vec<(i64, &'static str)> {
        names.to_vec()
    }

    #[test]
    fn exact_match_scores_100() {
        assert_eq!(similarity("Ayşe Yılmaz", "Ayşe Yılmaz"), 100);
        assert_eq!(similarity("ayşe yılmaz", "AYŞE YILMAZ"), 100);
    }

    #[test]
    fn diacritic_variants_stay_above_threshold() {
        let r = roster(&[(1, "Ayşe Yılmaz")]);
        let hit = best_match("Ayşe Yilmaz", r.iter().copied());
        assert_eq!(hit, Some((1, "Ayşe Yılmaz")));
    }

    #[test]
    fn unrelated_name_is_rejected() {
        let r = roster(&[(1, "Ayşe Yılmaz")]);
        assert_eq!(
            best_match("Completely Unrelated Name", r.iter().copied()),
            None
        );
    }

    #[test]
    fn empty_roster_never_matches() {
        assert_eq!(best_match("Ayşe Yılmaz", std::iter::empty()), None);
    }

    #[test]
    fn tie_break_keeps_first_roster_entry() {
        let r = roster(&[(7, "Ali Demir"), (8, "Ali Demir")]);
        assert_eq!(best_match("Ali Demir", r.iter().copied()), Some((7, "Ali Demir")));
    }

    #[test]
    fn threshold_is_strict() {
        // Distance 3 over length 10 gives exactly 70, which must not match.
        assert_eq!(similarity("abcdefghij", "abcdefgxyz"), 70);
        let r = roster(&[(1, "abcdefgxyz")]);
        assert_eq!(best_match("abcdefghij", r.iter().copied()), None);

        // Distance 2 over length 10 gives 80, which must match.
        let r = roster(&[(1, "abcdefghyz")]);
        assert_eq!(
            best_match("abcdefghij", r.iter().copied()),
            Some((1, "abcdefghyz"))
        );
    }
}
