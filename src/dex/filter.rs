use serde::{Deserialize, Serialize};

use crate::data::record::Record;

/// Independent search predicates over the catalog. `None` (or an empty
/// search string) means "no constraint"; active predicates are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Case-insensitive substring of the name, or substring of the id.
    pub text: String,
    /// Generation number the record must belong to.
    pub region: Option<u8>,
    /// Type tag the record must carry (case-insensitive).
    pub type_tag: Option<String>,
    /// Minimum base-stat total.
    pub min_bst: Option<u32>,
    /// Egg group the record must belong to (exact tag).
    pub egg_group: Option<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_region(mut self, generation: u8) -> Self {
        self.region = Some(generation);
        self
    }

    pub fn with_type(mut self, tag: impl Into<String>) -> Self {
        self.type_tag = Some(tag.into());
        self
    }

    pub fn with_min_bst(mut self, min_bst: u32) -> Self {
        self.min_bst = Some(min_bst);
        self
    }

    pub fn with_egg_group(mut self, group: impl Into<String>) -> Self {
        self.egg_group = Some(group.into());
        self
    }

    /// Whether every criterion is at its "no constraint" value.
    pub fn is_unset(&self) -> bool {
        *self == FilterCriteria::default()
    }

    /// Back to "no constraint" on every criterion.
    pub fn reset(&mut self) {
        *self = FilterCriteria::default();
    }

    fn matches_text(&self, record: &Record) -> bool {
        if self.text.is_empty() {
            return true;
        }
        record
            .name
            .to_lowercase()
            .contains(&self.text.to_lowercase())
            || record.id.to_string().contains(&self.text)
    }

    fn matches_region(&self, record: &Record) -> bool {
        self.region.map_or(true, |g| record.generation == g)
    }

    fn matches_type(&self, record: &Record) -> bool {
        self.type_tag
            .as_deref()
            .map_or(true, |tag| record.has_type(tag))
    }

    fn matches_bst(&self, record: &Record) -> bool {
        // A zero total means the record has no usable stats, which fails
        // any active threshold.
        self.min_bst
            .map_or(true, |min| record.bst > 0 && record.bst >= min)
    }

    fn matches_egg_group(&self, record: &Record) -> bool {
        self.egg_group
            .as_deref()
            .map_or(true, |group| record.egg_groups.iter().any(|g| g == group))
    }

    /// Whether a record satisfies every active predicate.
    pub fn matches(&self, record: &Record) -> bool {
        self.matches_text(record)
            && self.matches_region(record)
            && self.matches_type(record)
            && self.matches_bst(record)
            && self.matches_egg_group(record)
    }
}

/// The records satisfying `criteria`, ascending by id.
pub fn filter<'a>(records: &'a [Record], criteria: &FilterCriteria) -> Vec<&'a Record> {
    let mut visible: Vec<&Record> = records.iter().filter(|r| criteria.matches(r)).collect();
    visible.sort_by_key(|r| r.id);
    visible
}
