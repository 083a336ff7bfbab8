use std::sync::LazyLock;

use regex::Regex;

use super::RawBlock;
use crate::classify;
use crate::consolidate::{submit, EntryMap};
use crate::links;
use crate::normalize;

static WHATS_NEW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(#{1,6})\s+what'?s new in .*?(\d{4}\.\d{1,2}(?:\.\d{1,2})?)\s*$").unwrap()
});
static MONTH_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(#{1,6})\s+(?:january|february|march|april|may|june|july|august|september|october|november|december)\s+\d{4}\s+\(version\s+(v?\d+\.\d+(?:\.\d+)?)\)\s*$",
    )
    .unwrap()
});
static BARE_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(v\d+\.\d+(?:\.\d+)?)\s*$").unwrap());
static VERSION_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(#{1,6})\s+version\s+(\d+\.\d+(?:\.\d+)?|\d{4}\.\d{1,2})\s*$").unwrap()
});
static ANY_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6})\s+\S").unwrap());
static DOC_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://[^\s)\]>]*(?:/docs?/|/updates?/|/whatsnew|/releases?/)[^\s)\]>]*").unwrap()
});

/// Dated "what's new" style used by IDE/tooling changelog pages. Heading
/// nesting decides where a section ends: a heading at the same or shallower
/// level terminates the open block, release-shaped or not.
pub fn segment(text: &str) -> EntryMap {
    let mut map = EntryMap::new();
    let mut current: Option<RawBlock> = None;

    for line in text.lines() {
        if let Some((level, label)) = release_heading(line) {
            if let Some(block) = current.take() {
                close_with_doc_link(block, &mut map);
            }
            if classify::is_valid_label(&label) {
                current = Some(RawBlock::new(label, line, level));
            }
            continue;
        }

        if let Some(level) = heading_level(line) {
            if let Some(block) = current.as_ref() {
                if level <= block.heading_level {
                    // Section over; this heading belongs to something else.
                    if let Some(done) = current.take() {
                        close_with_doc_link(done, &mut map);
                    }
                    continue;
                }
            }
        }

        if let Some(block) = current.as_mut() {
            block.push_line(line);
        }
    }

    if let Some(block) = current.take() {
        close_with_doc_link(block, &mut map);
    }
    map
}

fn close_with_doc_link(block: RawBlock, map: &mut EntryMap) {
    if !block.has_content() {
        return;
    }
    let body = block.body_lines.join("\n");
    let cleaned = normalize::clean_block(&body);
    let link = DOC_URL_RE
        .find(&body)
        .map(|m| m.as_str().trim_end_matches(['.', ',', ';']).to_string())
        .or_else(|| links::extract_detail_link(&block.heading_line, &cleaned));
    submit(map, block.label, cleaned, link);
}

/// The alternative heading shapes this page family uses, tried in order.
fn release_heading(line: &str) -> Option<(usize, String)> {
    let line = line.trim_end();
    for re in [&*WHATS_NEW_RE, &*MONTH_VERSION_RE, &*BARE_VERSION_RE, &*VERSION_WORD_RE] {
        if let Some(caps) = re.captures(line) {
            return Some((caps[1].len(), caps[2].to_string()));
        }
    }
    None
}

fn heading_level(line: &str) -> Option<usize> {
    ANY_HEADING_RE
        .captures(line)
        .map(|caps| caps[1].len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consolidate::consolidate;

    #[test]
    fn whats_new_heading_shape() {
        let doc = "\
# What's New in Drill 2024.1

Smarter completion across the whole project model.

## Performance

Indexing got measurably faster on large repos.
";
        let entries = consolidate(segment(doc));
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].label, "2024.1");
        // Deeper heading stays inside the section.
        assert!(entries[0].description.contains("Indexing"));
    }

    #[test]
    fn month_version_heading_shape() {
        let doc = "\
## March 2024 (version 1.77)

Accessibility improvements across the workbench.

## February 2024 (version 1.76)

New profile switcher in the activity bar.
";
        let entries = consolidate(segment(doc));
        let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["1.77", "1.76"]);
    }

    #[test]
    fn same_level_heading_terminates_section() {
        let doc = "\
## v1.80

Terminal tabs can now be pinned in place.

## Other updates

This prose is outside any release section.

## v1.79

Sticky scroll enabled by default everywhere.
";
        let entries = consolidate(segment(doc));
        let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["v1.80", "v1.79"]);
        assert!(entries.iter().all(|e| !e.description.contains("outside any release")));
    }

    #[test]
    fn version_word_heading_shape() {
        let doc = "# Version 2024.1\nBrand new welcome screen for first runs.\n";
        let entries = consolidate(segment(doc));
        assert_eq!(entries[0].label, "2024.1");
    }

    #[test]
    fn doc_url_in_body_becomes_link() {
        let doc = "\
## v1.81

Read the full notes at https://code.example.com/updates/v1_81 for details.
";
        let entries = consolidate(segment(doc));
        assert_eq!(
            entries[0].detail_link.as_deref(),
            Some("https://code.example.com/updates/v1_81")
        );
    }
}
