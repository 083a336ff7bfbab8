use std::collections::BTreeMap;

use serde::Serialize;

use crate::compare::compare_labels;

/// Minimum cleaned-description length for an entry to survive.
pub const MIN_DESCRIPTION_LEN: usize = 10;

/// One extracted release entry. `detailLink` serializes as `null`, never
/// absent, for strict-schema consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangelogEntry {
    pub label: String,
    pub description: String,
    #[serde(rename = "detailLink")]
    pub detail_link: Option<String>,
}

/// Intermediate per-label state while a segmenter is still scanning.
#[derive(Debug, Clone, Default)]
pub struct Draft {
    pub description: String,
    pub link: Option<String>,
}

pub type EntryMap = BTreeMap<String, Draft>;

/// Merge a finished block into the map: on a label collision the longer
/// cleaned description wins, and a non-empty link from either side is kept
/// when the winner lacks one.
pub fn submit(map: &mut EntryMap, label: String, description: String, link: Option<String>) {
    let link = link.filter(|l| !l.is_empty());
    match map.get_mut(&label) {
        Some(existing) => {
            if description.chars().count() > existing.description.chars().count() {
                existing.description = description;
            }
            if existing.link.is_none() {
                existing.link = link;
            }
        }
        None => {
            map.insert(label, Draft { description, link });
        }
    }
}

/// Filter degenerate drafts and impose the final newest-first order.
pub fn consolidate(map: EntryMap) -> Vec<ChangelogEntry> {
    let mut entries: Vec<ChangelogEntry> = map
        .into_iter()
        .filter(|(label, draft)| keeps(label, &draft.description))
        .map(|(label, draft)| ChangelogEntry {
            label,
            description: draft.description,
            detail_link: draft.link,
        })
        .collect();
    entries.sort_by(|a, b| compare_labels(&a.label, &b.label));
    entries
}

fn keeps(label: &str, description: &str) -> bool {
    description.chars().count() >= MIN_DESCRIPTION_LEN && !restates_label(label, description)
}

/// A description that is merely the label again ("version 1.2.3" for label
/// "1.2.3") carries no information.
fn restates_label(label: &str, description: &str) -> bool {
    let norm = |s: &str| {
        s.to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
    };
    let d = norm(description);
    let l = norm(label);
    if l.is_empty() {
        return false;
    }
    d == l
        || d == format!("v{l}")
        || d == format!("version{l}")
        || d == format!("release{l}")
        || d == format!("build{l}")
}
