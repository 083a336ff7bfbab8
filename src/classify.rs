use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

static LINK_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([^\]]+)\]\(([^)\s]+)\)$").unwrap());
static SEMVER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v?\d+\.\d+(?:\.\d+){0,2}(?:-[0-9A-Za-z.]+)?$").unwrap());
static ISO_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}(-\d{2}-\d{2}|\.\d{2}\.\d{2})$").unwrap());
static SHORT_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}\.\d{1,2}(?:\.\d{1,2})?$").unwrap());
static BUILD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^(?:build|patch)\s+\d+$").unwrap());
static SERVICE_PACK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^sp\d+$").unwrap());
static RELEASE_CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^R\d{4}[a-z]?$").unwrap());
static WILDCARD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^v?\d+\.\d+\.x$").unwrap());
static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}$").unwrap());
static BRACKET_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\[(.+)\]$").unwrap());

// Section words that head a subsection, never a release boundary.
const GENERIC_SECTIONS: &[&str] = &[
    "features",
    "feature",
    "bug fixes",
    "bugfixes",
    "fixes",
    "fixed",
    "changes",
    "changed",
    "improvements",
    "added",
    "removed",
    "deprecated",
    "security",
    "known issues",
    "notes",
    "misc",
    "other",
    "highlights",
    "summary",
    "what's changed",
    "breaking changes",
    "documentation",
    "internal",
    "upgrading",
    "contributors",
];

const RELEASE_WORDS: &[&str] = &[
    "release",
    "update",
    "version",
    "build",
    "patch",
    "edition",
    "changelog",
    "announcement",
    "month",
    "year",
    "week",
    "day",
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// A candidate boundary heading: nesting level plus marker-stripped text.
#[derive(Debug, Clone, Copy)]
pub struct Heading<'a> {
    pub level: usize,
    pub text: &'a str,
}

/// One classification rule; returns the accepted label, or `None`.
pub struct HeadingRule {
    pub name: &'static str,
    pub extract: fn(&Heading) -> Option<String>,
}

/// Decision order matters: first match wins.
pub const HEADING_RULES: &[HeadingRule] = &[
    HeadingRule { name: "link_wrapped_title", extract: link_wrapped_title },
    HeadingRule { name: "version_or_date", extract: version_or_date },
    HeadingRule { name: "descriptive_title", extract: descriptive_title },
    HeadingRule { name: "unreleased", extract: unreleased },
];

/// Run the rule table over a heading. `Some(label)` marks a release boundary.
pub fn classify_heading(level: usize, text: &str) -> Option<String> {
    let heading = Heading { level, text: text.trim() };
    if heading.text.is_empty() {
        return None;
    }
    HEADING_RULES.iter().find_map(|rule| (rule.extract)(&heading))
}

fn link_wrapped_title(h: &Heading) -> Option<String> {
    let caps = LINK_HEADING_RE.captures(h.text)?;
    let title = caps[1].trim().to_string();
    (title.chars().count() > 5).then_some(title)
}

fn version_or_date(h: &Heading) -> Option<String> {
    matches_version_or_date(h.text).then(|| h.text.to_string())
}

fn descriptive_title(h: &Heading) -> Option<String> {
    // Link-wrapped headings are rule 1's business; a too-short title there
    // does not come back as a descriptive one.
    if LINK_HEADING_RE.is_match(h.text) {
        return None;
    }
    let text = BRACKET_TITLE_RE
        .captures(h.text)
        .map(|c| c[1].trim().to_string())
        .unwrap_or_else(|| h.text.to_string());

    let len = text.chars().count();
    if !(5..=150).contains(&len) {
        return None;
    }
    let lower = text.to_lowercase();
    if GENERIC_SECTIONS.contains(&lower.trim_end_matches(':').trim()) {
        return None;
    }
    let has_digit = text.chars().any(|c| c.is_ascii_digit());
    let has_release_word = lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|tok| RELEASE_WORDS.contains(&tok));
    (has_digit || has_release_word).then_some(text)
}

fn unreleased(h: &Heading) -> Option<String> {
    h.text
        .eq_ignore_ascii_case("unreleased")
        .then(|| "Unreleased".to_string())
}

/// True when the whole string is one of the recognized version/date/build
/// shapes. A bare 4-digit year only counts when it is the entire heading;
/// embedded in a longer title it falls through to the descriptive rule.
pub fn matches_version_or_date(text: &str) -> bool {
    let t = text.trim();
    SEMVER_RE.is_match(t)
        || is_calendar_date(t)
        || SHORT_DATE_RE.is_match(t)
        || BUILD_RE.is_match(t)
        || SERVICE_PACK_RE.is_match(t)
        || RELEASE_CODE_RE.is_match(t)
        || WILDCARD_RE.is_match(t)
        || YEAR_RE.is_match(t)
}

/// ISO-like date, verified against the calendar so "2024-99-99" is not a date.
pub fn is_calendar_date(text: &str) -> bool {
    if !ISO_DATE_RE.is_match(text) {
        return false;
    }
    let normalized = text.replace('.', "-");
    NaiveDate::parse_from_str(&normalized, "%Y-%m-%d").is_ok()
}

/// Stricter check for a label extracted by a specialized segmenter rather
/// than the rule table above.
pub fn is_valid_label(label: &str) -> bool {
    let t = label.trim();
    if t.is_empty() {
        return false;
    }
    if matches_version_or_date(t) || t.eq_ignore_ascii_case("unreleased") {
        return true;
    }
    if LINK_HEADING_RE.is_match(t) {
        return true;
    }
    t.chars().count() < 15 && t.chars().any(|c| c.is_ascii_digit())
}
