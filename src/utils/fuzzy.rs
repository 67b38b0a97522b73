//! "Did you mean?" suggestions for unresolved type and member names.

/// Edit distance between two names, ignoring ASCII case
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().map(|c| c.to_ascii_lowercase()).collect();
    let b: Vec<char> = b.chars().map(|c| c.to_ascii_lowercase()).collect();
    if a.is_empty() || b.is_empty() {
        return a.len().max(b.len());
    }

    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = diagonal + usize::from(ca != cb);
            diagonal = row[j + 1];
            row[j + 1] = substitution.min(row[j] + 1).min(row[j + 1] + 1);
        }
    }
    row[b.len()]
}

/// Largest distance still worth suggesting for a name of this length
pub fn threshold(target: &str) -> usize {
    (target.chars().count() / 3).max(2)
}

/// Up to `limit` candidates within [`threshold`] of `target`, closest first.
///
/// Ties keep candidate order; the target itself is never suggested.
pub fn suggest<'a>(target: &str, candidates: &'a [String], limit: usize) -> Vec<&'a str> {
    let max = threshold(target);
    let target_len = target.chars().count();

    let mut scored: Vec<(usize, &str)> = candidates
        .iter()
        .filter(|c| c.as_str() != target)
        .filter(|c| c.chars().count().abs_diff(target_len) <= max)
        .map(|c| (edit_distance(target, c), c.as_str()))
        .filter(|(distance, _)| *distance <= max)
        .collect();

    scored.sort_by_key(|(distance, _)| *distance);
    scored.dedup_by(|a, b| a.1 == b.1);
    scored.into_iter().take(limit).map(|(_, name)| name).collect()
}

/// The single closest candidate, if any
pub fn suggest_one<'a>(target: &str, candidates: &'a [String]) -> Option<&'a str> {
    suggest(target, candidates, 1).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("String", "String"), 0);
        assert_eq!(edit_distance("Strng", "String"), 1);
        assert_eq!(edit_distance("Sting", "String"), 1);
        assert_eq!(edit_distance("abc", "xyz"), 3);
        assert_eq!(edit_distance("", "List"), 4);
    }

    #[test]
    fn test_edit_distance_ignores_case() {
        assert_eq!(edit_distance("arraylist", "ArrayList"), 0);
    }

    #[test]
    fn test_suggest_orders_by_distance() {
        let candidates = names(&["Set", "List", "Lost", "Map"]);
        assert_eq!(suggest("Lst", &candidates, 2), vec!["List", "Lost"]);
    }

    #[test]
    fn test_suggest_skips_far_names() {
        let candidates = names(&["BigDecimal", "Integer"]);
        assert!(suggest("Qux", &candidates, 3).is_empty());
        assert_eq!(suggest_one("Integr", &candidates), Some("Integer"));
    }
}
