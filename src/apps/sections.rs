use serde::Serialize;

use super::scanner::AppEntry;

/// Label used for apps that are administratively disabled
pub const DISABLED_LABEL: &str = "--";

/// Start of one fast-scroll section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub label: String,
    pub first_offset: usize,
}

/// Jump-list over a sorted entry list.
///
/// A new section starts wherever the label changes, so a label that shows
/// up again after a different one gets a second section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SectionIndex {
    sections: Vec<Section>,
}

/// Display label for one entry
pub fn section_label(entry: &AppEntry) -> String {
    if !entry.enabled {
        return DISABLED_LABEL.to_string();
    }
    match entry.title.chars().next() {
        Some(first) => first.to_uppercase().collect(),
        None => String::new(),
    }
}

impl SectionIndex {
    pub fn build(entries: &[AppEntry]) -> Self {
        let mut sections: Vec<Section> = Vec::new();
        for (offset, entry) in entries.iter().enumerate() {
            let label = section_label(entry);
            if sections.last().map_or(true, |last| last.label != label) {
                sections.push(Section {
                    label,
                    first_offset: offset,
                });
            }
        }
        Self { sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn labels(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.label.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// First list offset of section `section`, if it exists
    pub fn position_for_section(&self, section: usize) -> Option<usize> {
        self.sections.get(section).map(|s| s.first_offset)
    }

    /// Section containing list offset `position` (0 for an empty index)
    pub fn section_for_position(&self, position: usize) -> usize {
        self.sections
            .partition_point(|s| s.first_offset <= position)
            .saturating_sub(1)
    }
}
