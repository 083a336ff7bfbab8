use std::sync::LazyLock;

use regex::Regex;

use super::{close_block, RawBlock};
use crate::classify;
use crate::consolidate::EntryMap;

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").unwrap());
static BOLD_LINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\*\*(.+)\*\*:?$").unwrap());

const FENCE: &str = "```";

/// Heading predicate: given a raw line, the label and nesting level if the
/// line opens a new block. Plugging a different predicate into [`scan`]
/// yields an alternate segmenter over the same automaton.
pub type HeadingFn = fn(&str) -> Option<(String, usize)>;

enum ScanState {
    Searching,
    InBlock(RawBlock),
    /// Inside a fenced code region; no heading classification happens and
    /// lines go to the open block verbatim, if there is one.
    InCodeFence(Option<RawBlock>),
}

/// Generic segmentation: the heading classifier decides the boundaries.
pub fn segment(text: &str) -> EntryMap {
    scan(text, classifier_heading)
}

/// Single-pass three-state line machine shared by the generic segmenter and
/// the specialized fallbacks.
pub(crate) fn scan(text: &str, heading: HeadingFn) -> EntryMap {
    let mut map = EntryMap::new();
    let mut state = ScanState::Searching;

    for line in text.lines() {
        state = step(state, line, heading, &mut map);
    }

    match state {
        ScanState::InBlock(block) | ScanState::InCodeFence(Some(block)) => close_block(block, &mut map),
        ScanState::Searching | ScanState::InCodeFence(None) => {}
    }
    map
}

fn step(state: ScanState, line: &str, heading: HeadingFn, map: &mut EntryMap) -> ScanState {
    let is_fence = line.trim_start().starts_with(FENCE);

    match state {
        ScanState::InCodeFence(mut open) => {
            if let Some(block) = open.as_mut() {
                block.push_line(line);
            }
            if is_fence {
                match open {
                    Some(block) => ScanState::InBlock(block),
                    None => ScanState::Searching,
                }
            } else {
                ScanState::InCodeFence(open)
            }
        }
        ScanState::Searching => {
            if is_fence {
                return ScanState::InCodeFence(None);
            }
            match heading(line) {
                Some((label, level)) => ScanState::InBlock(RawBlock::new(label, line, level)),
                None => ScanState::Searching,
            }
        }
        ScanState::InBlock(mut block) => {
            if is_fence {
                block.push_line(line);
                return ScanState::InCodeFence(Some(block));
            }
            match heading(line) {
                Some((label, level)) => {
                    close_block(block, map);
                    ScanState::InBlock(RawBlock::new(label, line, level))
                }
                None => {
                    block.push_line(line);
                    ScanState::InBlock(block)
                }
            }
        }
    }
}

/// Default predicate: markdown headings, bold-only lines, and bare
/// version/date lines, all routed through the classifier rule table.
fn classifier_heading(line: &str) -> Option<(String, usize)> {
    if let Some(caps) = HEADING_RE.captures(line.trim_end()) {
        let level = caps[1].len();
        return classify::classify_heading(level, &caps[2]).map(|label| (label, level));
    }
    let trimmed = line.trim();
    if let Some(caps) = BOLD_LINE_RE.captures(trimmed) {
        return classify::classify_heading(2, &caps[1]).map(|label| (label, 2));
    }
    if classify::matches_version_or_date(trimmed) {
        return Some((trimmed.to_string(), 2));
    }
    None
}
