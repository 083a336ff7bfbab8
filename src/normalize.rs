use std::sync::LazyLock;

use regex::{Captures, Regex};

static ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?is)<a\s+[^>]*href\s*=\s*["']([^"']+)["'][^>]*>(.*?)</a>"#).unwrap());
static HEADING_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h([1-6])[^>]*>(.*?)</h[1-6]>").unwrap());
static LIST_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<li[^>]*>(.*?)</li>").unwrap());
static BR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static HR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<hr\s*/?>").unwrap());
static PARA_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</?p[^>]*>").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]+>").unwrap());
static EXCESS_BLANKS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

static DATE_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:\d{4}[-./]\d{1,2}[-./]\d{1,2}|(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.? \d{1,2},? \d{4}|\d{1,2} (?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.? \d{4})$",
    )
    .unwrap()
});
static CATEGORY_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:\*\*)?[\[(]?(?:new|improved|improvement|fixed|fix|changed|added|removed|deprecated|security|beta|feature|enhancement)s?[\])]?(?:\*\*)?:?$",
    )
    .unwrap()
});
static BOILER_LINK_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*\**(?:\[(?:see more|read more|learn more|full changelog|compare view)[^\]\n]*\]\([^)]*\)|(?:see more|read more|learn more|full changelog|compare view))\**\s*:?\s*(?:https?://\S+)?\s*\.{0,3}\s*$",
    )
    .unwrap()
});
static HR_LINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?:-{3,}|\*{3,}|_{3,})$").unwrap());

const FENCE: &str = "```";

// Section headers that GitHub templates prepend to release bodies.
const GENERIC_FIRST_HEADERS: &[&str] = &[
    "changes",
    "what's changed",
    "whats changed",
    "summary",
    "highlights",
    "overview",
    "notes",
    "release notes",
];

const FIXED_PHRASES: &[&str] = &["thanks to all contributors!", "what's changed", "## contributors"];

/// Best-effort lossy conversion of raw markup into line-oriented text.
/// Unrecognized markup is dropped; this never fails.
pub fn html_to_text(html: &str) -> String {
    let text = ANCHOR_RE.replace_all(html, |c: &Captures| {
        let inner = TAG_RE.replace_all(&c[2], "");
        format!("[{}]({})", inner.trim(), &c[1])
    });
    let text = HEADING_TAG_RE.replace_all(&text, |c: &Captures| {
        let level = c[1].parse::<usize>().unwrap_or(1);
        let inner = TAG_RE.replace_all(&c[2], "");
        format!("\n{} {}\n", "#".repeat(level), inner.trim())
    });
    let text = LIST_ITEM_RE.replace_all(&text, |c: &Captures| {
        let inner = TAG_RE.replace_all(&c[1], "");
        format!("\n- {}", inner.trim())
    });
    let text = BR_RE.replace_all(&text, "\n");
    let text = HR_RE.replace_all(&text, "\n---\n");
    let text = PARA_RE.replace_all(&text, "\n");
    let text = TAG_RE.replace_all(&text, "");
    let text = decode_entities(&text);
    EXCESS_BLANKS_RE.replace_all(&text, "\n\n").trim().to_string()
}

fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Clean an extracted block's body: strip leading boilerplate, normalize
/// blank lines, drop boilerplate link lines, preserve structural markup and
/// code-fence contents verbatim.
pub fn clean_block(raw: &str) -> String {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines: Vec<&str> = normalized.lines().collect();

    while lines.first().is_some_and(|l| l.trim().is_empty()) {
        lines.remove(0);
    }

    // A single leading date line is metadata, not content.
    if lines.first().is_some_and(|l| DATE_LINE_RE.is_match(l.trim())) {
        lines.remove(0);
    }

    // Runs of leading category tags ("**New**", "[Fixed]", ...).
    while lines.first().is_some_and(|l| CATEGORY_TAG_RE.is_match(l.trim())) {
        lines.remove(0);
        while lines.first().is_some_and(|l| l.trim().is_empty()) {
            lines.remove(0);
        }
    }

    // Generic footer headers only count when they open the block.
    if lines
        .first()
        .map(|l| l.trim().trim_start_matches('#').trim().trim_end_matches(':').to_lowercase())
        .is_some_and(|h| GENERIC_FIRST_HEADERS.contains(&h.as_str()))
    {
        lines.remove(0);
    }

    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut in_fence = false;

    for line in lines {
        let trimmed = line.trim();

        if trimmed.starts_with(FENCE) {
            in_fence = !in_fence;
            out.push(line.to_string());
            continue;
        }
        if in_fence {
            out.push(line.to_string());
            continue;
        }

        if BOILER_LINK_LINE_RE.is_match(line) {
            continue;
        }
        if FIXED_PHRASES.contains(&trimmed.to_lowercase().as_str()) {
            continue;
        }

        if trimmed.is_empty() {
            out.push(String::new());
            continue;
        }

        // Structural markup is kept verbatim, prose is trimmed.
        if trimmed.starts_with('#')
            || trimmed.starts_with("- ")
            || trimmed.starts_with("* ")
            || trimmed.starts_with("+ ")
            || trimmed.starts_with('>')
            || HR_LINE_RE.is_match(trimmed)
        {
            out.push(line.to_string());
        } else {
            out.push(trimmed.to_string());
        }
    }

    collapse_blanks(&out)
}

fn collapse_blanks(lines: &[String]) -> String {
    let mut result: Vec<&str> = Vec::with_capacity(lines.len());
    let mut prev_blank = true; // drops leading blanks too
    for line in lines {
        let blank = line.trim().is_empty();
        if blank && prev_blank {
            continue;
        }
        result.push(line.as_str());
        prev_blank = blank;
    }
    while result.last().is_some_and(|l| l.trim().is_empty()) {
        result.pop();
    }
    result.join("\n")
}
