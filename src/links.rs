use std::sync::LazyLock;

use regex::Regex;

static MD_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\(([^)\s]+)\)").unwrap());
static RAW_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s)\]>"'`]+"#).unwrap());
static CALLOUT_TEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:release notes|full changelog|compare view|view release|release page|details)\b")
        .unwrap()
});
static RELEASE_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(?:releases|compare|commit|commits|tree|tags?)(?:/|$)").unwrap());
static SEE_MORE_TEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:see more|read more|learn more)").unwrap());

const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp", ".ico", ".bmp"];

const IMAGE_HOSTS: &[&str] = &[
    "imgur.com",
    "giphy.com",
    "user-images.githubusercontent.com",
    "camo.githubusercontent.com",
    "img.shields.io",
    "cloudinary.com",
];

// Source hosts and vendor doc domains beat arbitrary raw URLs.
const OFFICIAL_DOMAINS: &[&str] = &["github.com", "gitlab.com", "bitbucket.org", "sourceforge.net"];

/// Pick the single most relevant URL for a block: heading link, then explicit
/// call-out, then "See more"-style link, then first markdown link, then first
/// raw URL (official domains preferred). `None` when no tier matches.
pub fn extract_detail_link(heading_line: &str, body: &str) -> Option<String> {
    heading_link(heading_line)
        .or_else(|| callout_link(body))
        .or_else(|| see_more_link(body))
        .or_else(|| first_markdown_link(body))
        .or_else(|| first_raw_url(body))
}

fn heading_link(heading_line: &str) -> Option<String> {
    MD_LINK_RE
        .captures(heading_line)
        .map(|c| c[2].to_string())
        .filter(|url| !is_image_url(url))
}

fn callout_link(body: &str) -> Option<String> {
    MD_LINK_RE
        .captures_iter(body)
        .map(|c| (c[1].to_string(), c[2].to_string()))
        .find(|(text, url)| {
            !is_image_url(url) && (CALLOUT_TEXT_RE.is_match(text) || RELEASE_URL_RE.is_match(url))
        })
        .map(|(_, url)| url)
}

fn see_more_link(body: &str) -> Option<String> {
    MD_LINK_RE
        .captures_iter(body)
        .find(|c| SEE_MORE_TEXT_RE.is_match(c[1].trim()) && !is_image_url(&c[2]))
        .map(|c| c[2].to_string())
}

/// The last "See more"-style link in a section, used by the anchor segmenter
/// which prefers it over the heading's own link.
pub fn last_see_more_link(body: &str) -> Option<String> {
    MD_LINK_RE
        .captures_iter(body)
        .filter(|c| SEE_MORE_TEXT_RE.is_match(c[1].trim()) && !is_image_url(&c[2]))
        .last()
        .map(|c| c[2].to_string())
}

fn first_markdown_link(body: &str) -> Option<String> {
    MD_LINK_RE
        .captures_iter(body)
        .find(|c| !c[1].trim_start().starts_with('!') && !is_image_url(&c[2]))
        .map(|c| c[2].to_string())
}

fn first_raw_url(body: &str) -> Option<String> {
    let candidates: Vec<String> = RAW_URL_RE
        .find_iter(body)
        .map(|m| m.as_str().trim_end_matches(['.', ',', ';', ':']).to_string())
        .filter(|url| !is_image_url(url))
        .collect();

    candidates
        .iter()
        .find(|url| is_official_url(url))
        .or_else(|| candidates.first())
        .cloned()
}

fn is_image_url(url: &str) -> bool {
    let lower = url.to_lowercase();
    let path = lower.split(['?', '#']).next().unwrap_or(&lower);
    IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
        || IMAGE_HOSTS.iter().any(|host| domain_of(&lower).ends_with(host))
}

fn is_official_url(url: &str) -> bool {
    let domain = domain_of(&url.to_lowercase());
    OFFICIAL_DOMAINS.iter().any(|d| domain.ends_with(d)) || domain.starts_with("docs.")
}

fn domain_of(url: &str) -> String {
    url.split("//")
        .nth(1)
        .unwrap_or(url)
        .split('/')
        .next()
        .unwrap_or("")
        .trim_start_matches("www.")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_link_wins_over_body_callout() {
        let link = extract_detail_link(
            "## [Release 9](http://a/rel)",
            "Adds things.\n[Full Changelog](http://a/cl)",
        );
        assert_eq!(link.as_deref(), Some("http://a/rel"));
    }

    #[test]
    fn image_heading_link_skipped() {
        let link = extract_detail_link(
            "## [shot](https://a.dev/shot.png)",
            "[Release notes](https://a.dev/notes)",
        );
        assert_eq!(link.as_deref(), Some("https://a.dev/notes"));
    }

    #[test]
    fn callout_by_url_shape() {
        let body = "Bug fixes.\n[diff](https://github.com/acme/w/compare/v1...v2)";
        assert_eq!(
            extract_detail_link("## 1.2.0", body).as_deref(),
            Some("https://github.com/acme/w/compare/v1...v2")
        );
    }

    #[test]
    fn see_more_tier() {
        let body = "Short summary.\n[See more](https://a.dev/more)";
        assert_eq!(extract_detail_link("## 1.0.1", body).as_deref(), Some("https://a.dev/more"));
    }

    #[test]
    fn last_see_more_preferred() {
        let body = "[See more](https://a.dev/first)\ntext\n[Read more](https://a.dev/last)";
        assert_eq!(last_see_more_link(body).as_deref(), Some("https://a.dev/last"));
    }

    #[test]
    fn plain_markdown_link_fallback() {
        let body = "We shipped [the importer](https://a.dev/import) today.";
        assert_eq!(extract_detail_link("## 3.1.0", body).as_deref(), Some("https://a.dev/import"));
    }

    #[test]
    fn image_links_never_chosen() {
        let body = "![screenshot](https://a.dev/pic.png)\nNo other links here.";
        assert_eq!(extract_detail_link("## 1.0.0", body), None);
    }

    #[test]
    fn raw_url_official_preference() {
        let body = "More at https://blog.example.com/post and https://github.com/acme/widget too";
        assert_eq!(
            extract_detail_link("## 2.2.0", body).as_deref(),
            Some("https://github.com/acme/widget")
        );
    }

    #[test]
    fn raw_url_trailing_punctuation_trimmed() {
        let body = "Docs moved to https://docs.example.com/v2.";
        assert_eq!(
            extract_detail_link("## 2.0.0", body).as_deref(),
            Some("https://docs.example.com/v2")
        );
    }

    #[test]
    fn no_link_at_all() {
        assert_eq!(extract_detail_link("## 1.1.0", "Just words, nothing else."), None);
    }
}
