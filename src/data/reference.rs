use std::ops::RangeInclusive;

/// Every type tag, in canonical display order.
pub const TYPES: [&str; 18] = [
    "Normal", "Fire", "Water", "Grass", "Electric", "Ice", "Fighting", "Poison", "Ground",
    "Flying", "Psychic", "Bug", "Rock", "Ghost", "Dragon", "Dark", "Steel", "Fairy",
];

/// Egg-group tags offered as filter options.
pub const EGG_GROUPS: [&str; 15] = [
    "Monster",
    "Water 1",
    "Bug",
    "Flying",
    "Field",
    "Fairy",
    "Grass",
    "Human-Like",
    "Water 3",
    "Mineral",
    "Amorphous",
    "Water 2",
    "Ditto",
    "Dragon",
    "Undiscovered",
];

/// Minimum base-stat-total thresholds offered as filter options, highest first.
pub const BST_THRESHOLDS: [u32; 4] = [600, 500, 400, 300];

/// A region and the national-dex ids it introduced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// Same value as the generation number.
    pub generation: u8,
    pub name: &'static str,
    pub ids: RangeInclusive<u32>,
}

impl Region {
    pub fn contains(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }
}

static REGIONS: [Region; 9] = [
    Region { generation: 1, name: "Kanto (Gen I)", ids: 1..=151 },
    Region { generation: 2, name: "Johto (Gen II)", ids: 152..=251 },
    Region { generation: 3, name: "Hoenn (Gen III)", ids: 252..=386 },
    Region { generation: 4, name: "Sinnoh (Gen IV)", ids: 387..=493 },
    Region { generation: 5, name: "Unova (Gen V)", ids: 494..=649 },
    Region { generation: 6, name: "Kalos (Gen VI)", ids: 650..=721 },
    Region { generation: 7, name: "Alola (Gen VII)", ids: 722..=809 },
    Region { generation: 8, name: "Galar (Gen VIII)", ids: 810..=905 },
    Region { generation: 9, name: "Paldea (Gen IX)", ids: 906..=1025 },
];

pub fn regions() -> &'static [Region] {
    &REGIONS
}

pub fn region_by_generation(generation: u8) -> Option<&'static Region> {
    regions().iter().find(|r| r.generation == generation)
}

/// The region whose dex range covers `id`.
pub fn region_for_id(id: u32) -> Option<&'static Region> {
    regions().iter().find(|r| r.contains(id))
}

/// Canonical spelling of a type tag, matched case-insensitively.
pub fn canonical_type(tag: &str) -> Option<&'static str> {
    TYPES.iter().copied().find(|t| t.eq_ignore_ascii_case(tag.trim()))
}

/// Label for a BST threshold option.
pub fn bst_label(threshold: u32) -> String {
    format!("BST > {}", threshold)
}
