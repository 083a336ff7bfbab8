use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;

static WILDCARD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^v?(\d+)\.(\d+)\.x$").unwrap());
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}[-./]\d{1,2}(?:[-./]\d{1,2})?$").unwrap());
static NUMERIC_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v?\d+(?:[._-][0-9A-Za-z]+)*$").unwrap());

// Pre-release markers in precedence order. Deliberately ranked ahead of a
// suffix-free label of equal numeric value; pinned by a test below.
const PRERELEASE_ORDER: &[&str] = &["alpha", "beta", "rc", "preview", "pre"];

/// Descending (newest-first) order over mixed label shapes. Total over any
/// pair, antisymmetric, but not guaranteed transitive across every shape
/// combination; used only for final sorting.
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    let a = a.trim();
    let b = b.trim();

    // Rule 1/2: wildcard labels lead; two wildcards compare major.minor.
    match (wildcard_parts(a), wildcard_parts(b)) {
        (Some(_), None) => return Ordering::Less,
        (None, Some(_)) => return Ordering::Greater,
        (Some((am, an)), Some((bm, bn))) => return bm.cmp(&am).then(bn.cmp(&an)),
        (None, None) => {}
    }

    // Rule 3: a date beats a non-date; two dates compare componentwise.
    match (DATE_RE.is_match(a), DATE_RE.is_match(b)) {
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (true, true) => return compare_date_components(a, b),
        (false, false) => {}
    }

    // Rule 4/5: numeric versions beat free text; free text is reverse-lex.
    match (NUMERIC_VERSION_RE.is_match(a), NUMERIC_VERSION_RE.is_match(b)) {
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => return b.cmp(a),
        (true, true) => {}
    }

    // Rule 6: component decomposition.
    let (a_nums, a_suffix) = decompose(a);
    let (b_nums, b_suffix) = decompose(b);

    for (an, bn) in a_nums.iter().zip(b_nums.iter()) {
        let ord = bn.cmp(an);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    if a_nums.len() != b_nums.len() {
        // Equal prefix: "1.2" sorts after "1.2.3".
        return b_nums.len().cmp(&a_nums.len());
    }

    compare_suffixes(&a_suffix, &b_suffix)
}

fn wildcard_parts(label: &str) -> Option<(u64, u64)> {
    let caps = WILDCARD_RE.captures(label)?;
    Some((caps[1].parse().ok()?, caps[2].parse().ok()?))
}

/// Newest first, numeric per component; at an equal prefix the label with
/// more components wins (a full date beats its own year-month).
fn compare_date_components(a: &str, b: &str) -> Ordering {
    let parts = |s: &str| -> Vec<u64> {
        s.split(['-', '.', '/'])
            .filter_map(|p| p.parse().ok())
            .collect()
    };
    let ap = parts(a);
    let bp = parts(b);
    for (x, y) in ap.iter().zip(bp.iter()) {
        let ord = y.cmp(x);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    bp.len().cmp(&ap.len())
}

/// Split a numeric-version label into its leading numeric components and the
/// trailing suffix tokens, lowercased. "v1.2.0-beta.1" → ([1,2,0], ["beta","1"]).
fn decompose(label: &str) -> (Vec<u64>, Vec<String>) {
    let stripped = label.strip_prefix('v').unwrap_or(label);
    let mut nums = Vec::new();
    let mut suffix = Vec::new();
    for token in stripped.split(['.', '-', '_']) {
        if token.is_empty() {
            continue;
        }
        if suffix.is_empty() {
            if let Ok(n) = token.parse::<u64>() {
                nums.push(n);
                continue;
            }
        }
        suffix.push(token.to_lowercase());
    }
    (nums, suffix)
}

fn prerelease_rank(suffix: &[String]) -> Option<usize> {
    suffix
        .first()
        .and_then(|tok| PRERELEASE_ORDER.iter().position(|m| m == tok))
}

fn compare_suffixes(a: &[String], b: &[String]) -> Ordering {
    match (prerelease_rank(a), prerelease_rank(b)) {
        // A recognized pre-release marker takes precedence before no suffix.
        (Some(_), None) if b.is_empty() => return Ordering::Less,
        (None, Some(_)) if a.is_empty() => return Ordering::Greater,
        (Some(ar), Some(br)) if ar != br => return ar.cmp(&br),
        _ => {}
    }

    for (x, y) in a.iter().zip(b.iter()) {
        let ord = match (x.parse::<u64>(), y.parse::<u64>()) {
            (Ok(xn), Ok(yn)) => yn.cmp(&xn),
            // Numeric components rank earlier than string ones.
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => y.cmp(x),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }

    // Suffix-free sorts first among otherwise equal remainders.
    a.len().cmp(&b.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut labels: Vec<&str>) -> Vec<&str> {
        labels.sort_by(|a, b| compare_labels(a, b));
        labels
    }

    #[test]
    fn antisymmetric_and_reflexive() {
        let labels = [
            "1.2.3",
            "0.48.x",
            "2024-01-01",
            "Build 42",
            "Unreleased",
            "v2.0.0-beta",
            "Spring Update 2024",
            "1.2",
        ];
        for a in labels {
            assert_eq!(compare_labels(a, a), Ordering::Equal, "{a}");
            for b in labels {
                assert_eq!(compare_labels(a, b), compare_labels(b, a).reverse(), "{a} vs {b}");
            }
        }
    }

    #[test]
    fn wildcard_sorts_first() {
        assert_eq!(sorted(vec!["1.0.0", "0.48.x"]), vec!["0.48.x", "1.0.0"]);
        assert_eq!(sorted(vec!["0.48.x", "1.0.0"]), vec!["0.48.x", "1.0.0"]);
    }

    #[test]
    fn two_wildcards_numeric() {
        assert_eq!(sorted(vec!["1.2.x", "1.10.x"]), vec!["1.10.x", "1.2.x"]);
    }

    #[test]
    fn date_beats_title() {
        assert_eq!(
            sorted(vec!["New Feature Announcement", "2024-01-01"]),
            vec!["2024-01-01", "New Feature Announcement"]
        );
    }

    #[test]
    fn newer_date_first() {
        assert_eq!(
            sorted(vec!["2023-12-31", "2024-01-01"]),
            vec!["2024-01-01", "2023-12-31"]
        );
        // More components beat fewer at an equal prefix.
        assert_eq!(sorted(vec!["2024.1", "2024.1.5"]), vec!["2024.1.5", "2024.1"]);
    }

    #[test]
    fn numeric_version_beats_free_text() {
        assert_eq!(
            sorted(vec!["Big Summer Release", "1.0.0"]),
            vec!["1.0.0", "Big Summer Release"]
        );
    }

    #[test]
    fn free_text_reverse_lexicographic() {
        assert_eq!(
            sorted(vec!["Alpha rollout notes", "Zeta rollout notes"]),
            vec!["Zeta rollout notes", "Alpha rollout notes"]
        );
    }

    #[test]
    fn semver_descending() {
        assert_eq!(
            sorted(vec!["1.1.0", "1.2.0", "1.10.0", "0.9.9"]),
            vec!["1.10.0", "1.2.0", "1.1.0", "0.9.9"]
        );
    }

    #[test]
    fn shorter_equal_prefix_sorts_after() {
        assert_eq!(sorted(vec!["1.2", "1.2.3"]), vec!["1.2.3", "1.2"]);
    }

    #[test]
    fn v_prefix_ignored_in_decomposition() {
        assert_eq!(sorted(vec!["v1.1.0", "1.2.0"]), vec!["1.2.0", "v1.1.0"]);
    }

    // Pins the documented (and likely defective) ranking: a pre-release
    // suffix sorts ahead of the suffix-free label of equal numeric value.
    // Changing this must be a visible, deliberate decision.
    #[test]
    fn prerelease_ranks_above_stable() {
        assert_eq!(sorted(vec!["2.0.0", "2.0.0-beta"]), vec!["2.0.0-beta", "2.0.0"]);
        assert_eq!(
            sorted(vec!["2.0.0-rc", "2.0.0-alpha", "2.0.0-beta"]),
            vec!["2.0.0-alpha", "2.0.0-beta", "2.0.0-rc"]
        );
    }
}
