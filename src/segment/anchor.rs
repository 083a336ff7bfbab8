use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::generic;
use crate::consolidate::{submit, EntryMap};
use crate::links;
use crate::normalize;

static ANCHOR_H2_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^##\s+\[([^\]]+)\]\(([^)\s]+)\)\s*$").unwrap());
// Looser shape: any heading level, trailing text after the link tolerated.
static ANCHOR_ANY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,6}\s+\[([^\]]+)\]\(([^)\s]+)\)").unwrap());
static WILDCARD_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d+\.\d+)\.x\b").unwrap());

/// Minimum sliced-section content for the wildcard variant to keep a block.
const MIN_SECTION_LEN: usize = 10;

struct AnchorHeading {
    line_idx: usize,
    label: String,
    url: String,
    heading_line: String,
}

/// Anchor-link-heading style: every `## [Title](URL)` in document order.
/// Falls back to a looser pattern, then to a plain line scan, when fewer
/// than two headings match.
pub fn segment(text: &str) -> EntryMap {
    let lines: Vec<&str> = text.lines().collect();

    let hits = find_headings(&lines, &ANCHOR_H2_RE);
    if hits.len() >= 2 {
        return slice_sections(&lines, &hits);
    }

    let loose = find_headings(&lines, &ANCHOR_ANY_RE);
    if loose.len() >= 2 {
        debug!(count = loose.len(), "anchor segmenter using loose heading shape");
        return slice_sections(&lines, &loose);
    }

    debug!("anchor segmenter falling back to line scan");
    generic::scan(text, anchor_heading)
}

/// Wildcard-version variant: one `N.N.x` token anywhere becomes its own
/// synthesized entry, then the anchor pass runs independently, keeping any
/// section whose content is longer than [`MIN_SECTION_LEN`].
pub fn segment_wildcard(text: &str) -> EntryMap {
    let mut map = EntryMap::new();

    if let Some(label) = wildcard_label(text) {
        let description = format!("Rolling updates for the {label} release line.");
        submit(&mut map, label, description, None);
    }

    let lines: Vec<&str> = text.lines().collect();
    let hits = find_headings(&lines, &ANCHOR_H2_RE);
    for (i, hit) in hits.iter().enumerate() {
        let end = hits.get(i + 1).map_or(lines.len(), |next| next.line_idx);
        let body = lines[hit.line_idx + 1..end].join("\n");
        let cleaned = normalize::clean_block(&body);
        if cleaned.chars().count() > MIN_SECTION_LEN {
            let link = links::last_see_more_link(&body).or_else(|| Some(hit.url.clone()));
            submit(&mut map, hit.label.clone(), cleaned, link);
        }
    }
    map
}

fn wildcard_label(text: &str) -> Option<String> {
    WILDCARD_TOKEN_RE
        .captures(text)
        .map(|c| format!("{}.x", &c[1]))
}

fn find_headings(lines: &[&str], pattern: &Regex) -> Vec<AnchorHeading> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(idx, line)| {
            pattern.captures(line.trim_end()).map(|caps| AnchorHeading {
                line_idx: idx,
                label: caps[1].trim().to_string(),
                url: caps[2].to_string(),
                heading_line: line.to_string(),
            })
        })
        .filter(|h| h.label.chars().count() > 5 || crate::classify::is_valid_label(&h.label))
        .collect()
}

/// Slice body content between consecutive headings. The last "See more"
/// style link in a section beats the heading's own link.
fn slice_sections(lines: &[&str], hits: &[AnchorHeading]) -> EntryMap {
    let mut map = EntryMap::new();
    for (i, hit) in hits.iter().enumerate() {
        let end = hits.get(i + 1).map_or(lines.len(), |next| next.line_idx);
        let body = lines[hit.line_idx + 1..end].join("\n");
        let cleaned = normalize::clean_block(&body);
        let link = links::last_see_more_link(&body)
            .or_else(|| links::extract_detail_link(&hit.heading_line, &cleaned));
        submit(&mut map, hit.label.clone(), cleaned, link);
    }
    map
}

/// Predicate for the final line-scan fallback: same anchor heading shape.
fn anchor_heading(line: &str) -> Option<(String, usize)> {
    let caps = ANCHOR_ANY_RE.captures(line.trim_end())?;
    let label = caps[1].trim().to_string();
    if label.chars().count() > 5 || crate::classify::is_valid_label(&label) {
        let level = line.chars().take_while(|&c| c == '#').count();
        Some((label, level))
    } else {
        None
    }
}
