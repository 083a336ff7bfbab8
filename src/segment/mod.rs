pub mod anchor;
pub mod generic;
pub mod plain;
pub mod whats_new;

use tracing::debug;

use crate::consolidate::{self, ChangelogEntry, EntryMap};
use crate::content::PageContent;
use crate::links;
use crate::normalize;

/// Extraction strategy, selected explicitly by the caller per known page
/// identity; never inferred from the content itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Line-scanning state machine over the heading classifier; the default
    /// for unfamiliar page shapes.
    Generic,
    /// Pages built from `## [Title](URL)` anchor headings.
    AnchorHeadings,
    /// Single-product pages with one `N.N.x` wildcard line plus anchor headings.
    WildcardAnchor,
    /// Top-level `# vN.N.N` headings and nothing fancier.
    PlainVersionHeadings,
    /// IDE/tooling "what's new" pages with dated heading shapes.
    DatedWhatsNew,
}

/// A block under construction: one accepted heading plus the body lines
/// accumulated until the next boundary.
#[derive(Debug, Clone)]
pub struct RawBlock {
    pub label: String,
    pub heading_line: String,
    pub body_lines: Vec<String>,
    pub heading_level: usize,
}

impl RawBlock {
    pub fn new(label: String, heading_line: &str, heading_level: usize) -> Self {
        Self {
            label,
            heading_line: heading_line.to_string(),
            body_lines: Vec::new(),
            heading_level,
        }
    }

    pub fn push_line(&mut self, line: &str) {
        self.body_lines.push(line.to_string());
    }

    pub fn has_content(&self) -> bool {
        self.body_lines.iter().any(|l| !l.trim().is_empty())
    }
}

/// Clean a finished block, pick its link, and merge it into the entry map.
/// Blocks with no body are discarded here.
pub(crate) fn close_block(block: RawBlock, map: &mut EntryMap) {
    if !block.has_content() {
        debug!(label = %block.label, "discarding empty block");
        return;
    }
    let body = block.body_lines.join("\n");
    let cleaned = normalize::clean_block(&body);
    let link = links::extract_detail_link(&block.heading_line, &cleaned);
    consolidate::submit(map, block.label, cleaned, link);
}

/// The engine's entry point: segment with the chosen strategy, then filter
/// and sort. Pure and deterministic; `Unavailable` content yields no entries.
pub fn extract_entries(content: &PageContent, strategy: Strategy) -> Vec<ChangelogEntry> {
    let Some(text) = content.text() else {
        return Vec::new();
    };
    let map = match strategy {
        Strategy::Generic => generic::segment(&text),
        Strategy::AnchorHeadings => anchor::segment(&text),
        Strategy::WildcardAnchor => anchor::segment_wildcard(&text),
        Strategy::PlainVersionHeadings => plain::segment(&text),
        Strategy::DatedWhatsNew => whats_new::segment(&text),
    };
    consolidate::consolidate(map)
}
