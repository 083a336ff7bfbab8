use std::borrow::Cow;

use crate::normalize;

/// Response shape of the external fetch collaborator. The engine only ever
/// consumes the first two variants; `Unavailable` yields an empty extraction.
#[derive(Debug, Clone)]
pub enum PageContent {
    /// Structured line-oriented text (markdown or markdown-like) is available.
    Markdown(String),
    /// Only raw markup came back; needs the fallback conversion first.
    RawHtml(String),
    /// The fetch failed upstream; there is nothing to extract from.
    Unavailable,
}

impl PageContent {
    /// Line-oriented text ready for segmentation, converting raw markup
    /// through the fallback path. `None` for `Unavailable`.
    pub fn text(&self) -> Option<Cow<'_, str>> {
        match self {
            PageContent::Markdown(s) => Some(Cow::Borrowed(s.as_str())),
            PageContent::RawHtml(s) => Some(Cow::Owned(normalize::html_to_text(s))),
            PageContent::Unavailable => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_passes_through() {
        let c = PageContent::Markdown("## 1.2.0\nStuff".into());
        assert_eq!(c.text().unwrap(), "## 1.2.0\nStuff");
    }

    #[test]
    fn html_is_converted() {
        let c = PageContent::RawHtml("<h2>1.2.0</h2><p>Stuff</p>".into());
        let text = c.text().unwrap();
        assert!(text.contains("## 1.2.0"));
        assert!(text.contains("Stuff"));
    }

    #[test]
    fn unavailable_has_no_text() {
        assert!(PageContent::Unavailable.text().is_none());
    }
}
