use crate::dive_table::DiveTable;
use crate::models::Dive;

/// Free-text search over the descriptive fields of a dive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextFilter {
    needle: String,
    case_sensitive: bool,
    include_notes: bool,
}

impl TextFilter {
    /// Returns `None` for empty text, which means "no text filter". The text
    /// is used as given; surrounding whitespace is part of the needle.
    pub fn new(text: &str, case_sensitive: bool, include_notes: bool) -> Option<Self> {
        if text.is_empty() {
            return None;
        }
        let needle = if case_sensitive {
            text.to_string()
        } else {
            text.to_lowercase()
        };
        Some(Self {
            needle,
            case_sensitive,
            include_notes,
        })
    }

    pub fn matches(&self, dive: &Dive, table: &DiveTable) -> bool {
        let fields = [
            table.dive_location(dive),
            dive.suit.as_str(),
            dive.buddy.as_str(),
            dive.divemaster.as_str(),
        ];
        fields
            .into_iter()
            .chain(dive.tag_names())
            .chain(self.include_notes.then_some(dive.notes.as_str()))
            .any(|field| self.contains(field))
    }

    fn contains(&self, haystack: &str) -> bool {
        if self.case_sensitive {
            haystack.contains(&self.needle)
        } else {
            haystack.to_lowercase().contains(&self.needle)
        }
    }
}
