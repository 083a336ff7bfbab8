use std::sync::LazyLock;

use regex::Regex;

use crate::consolidate::{submit, EntryMap};
use crate::normalize;

static PLAIN_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#\s+(v?\d+\.\d+(?:\.\d+)?(?:-[0-9A-Za-z.]+)?)\s*$").unwrap());
static RELEASE_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://[^\s)\]>]+/(?:releases(?:/tag)?|release-notes|changelog)[^\s)\]>]*").unwrap()
});

/// Plain version-heading style: top-level `# vN.N(.N)?` headings, body sliced
/// up to the next one, detail link taken from a release-URL in the body.
pub fn segment(text: &str) -> EntryMap {
    let lines: Vec<&str> = text.lines().collect();
    let hits: Vec<(usize, String)> = lines
        .iter()
        .enumerate()
        .filter_map(|(idx, line)| {
            PLAIN_VERSION_RE
                .captures(line.trim_end())
                .map(|caps| (idx, caps[1].to_string()))
        })
        .collect();

    let mut map = EntryMap::new();
    for (i, (idx, label)) in hits.iter().enumerate() {
        let end = hits.get(i + 1).map_or(lines.len(), |(next_idx, _)| *next_idx);
        let body = lines[idx + 1..end].join("\n");
        let cleaned = normalize::clean_block(&body);
        let link = RELEASE_URL_RE.find(&body).map(|m| {
            m.as_str()
                .trim_end_matches(['.', ',', ';'])
                .to_string()
        });
        submit(&mut map, label.clone(), cleaned, link);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consolidate::consolidate;

    const PLAIN_DOC: &str = "\
# v2.3.0

Rewrote the scheduler for lower latency.
Release page: https://github.com/acme/sched/releases/tag/v2.3.0

# v2.2.1

Hotfix for a panic in the retry loop.

## Notes

Not a release boundary, stays in the body above.
";

    #[test]
    fn top_level_versions_sliced() {
        let entries = consolidate(segment(PLAIN_DOC));
        let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["v2.3.0", "v2.2.1"]);
    }

    #[test]
    fn release_url_in_body_becomes_link() {
        let entries = consolidate(segment(PLAIN_DOC));
        let first = entries.iter().find(|e| e.label == "v2.3.0").unwrap();
        assert_eq!(
            first.detail_link.as_deref(),
            Some("https://github.com/acme/sched/releases/tag/v2.3.0")
        );
        let second = entries.iter().find(|e| e.label == "v2.2.1").unwrap();
        assert_eq!(second.detail_link, None);
    }

    #[test]
    fn second_level_headings_do_not_split() {
        let entries = consolidate(segment(PLAIN_DOC));
        let second = entries.iter().find(|e| e.label == "v2.2.1").unwrap();
        assert!(second.description.contains("stays in the body above"));
    }

    #[test]
    fn suffixed_versions_match() {
        let doc = "# 1.0.0-rc.1\nCandidate build for the 1.0 launch.\n";
        let entries = consolidate(segment(doc));
        assert_eq!(entries[0].label, "1.0.0-rc.1");
    }
}
