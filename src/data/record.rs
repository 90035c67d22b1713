use std::fmt;
use std::sync::OnceLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// Upper bound of a single base stat.
pub const MAX_STAT_VALUE: u32 = 255;

/// The six base stats every species has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatName {
    #[serde(rename = "HP")]
    Hp,
    Attack,
    Defense,
    #[serde(rename = "Sp. Atk")]
    SpAtk,
    #[serde(rename = "Sp. Def")]
    SpDef,
    Speed,
}

impl StatName {
    pub fn all() -> &'static [StatName] {
        &[
            StatName::Hp,
            StatName::Attack,
            StatName::Defense,
            StatName::SpAtk,
            StatName::SpDef,
            StatName::Speed,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            StatName::Hp => "HP",
            StatName::Attack => "Attack",
            StatName::Defense => "Defense",
            StatName::SpAtk => "Sp. Atk",
            StatName::SpDef => "Sp. Def",
            StatName::Speed => "Speed",
        }
    }
}

impl fmt::Display for StatName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One named base stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub name: StatName,
    pub value: u32,
}

/// Damage category of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

/// How a move is learned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LearnMethod {
    /// Learned on reaching a level ("Lvl 16").
    Level(u32),
    /// Taught by a numbered machine ("TM01").
    Machine(u32),
    /// Anything else, kept verbatim (tutor, egg move, event...).
    Other(String),
}

impl LearnMethod {
    /// Parse the free-text learn method carried by the dataset.
    pub fn parse(text: &str) -> LearnMethod {
        static LEVEL: OnceLock<Option<Regex>> = OnceLock::new();
        static MACHINE: OnceLock<Option<Regex>> = OnceLock::new();

        let trimmed = text.trim();
        let level = LEVEL.get_or_init(|| Regex::new(r"(?i)^(?:lvl|lv|level)\.?\s*(\d+)$").ok());
        let machine = MACHINE.get_or_init(|| Regex::new(r"(?i)^tm\s*(\d+)$").ok());

        if let Some(n) = capture_number(level.as_ref(), trimmed) {
            return LearnMethod::Level(n);
        }
        if let Some(n) = capture_number(machine.as_ref(), trimmed) {
            return LearnMethod::Machine(n);
        }
        LearnMethod::Other(trimmed.to_string())
    }
}

fn capture_number(re: Option<&Regex>, text: &str) -> Option<u32> {
    re?.captures(text)?.get(1)?.as_str().parse().ok()
}

impl fmt::Display for LearnMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LearnMethod::Level(n) => write!(f, "Lvl {}", n),
            LearnMethod::Machine(n) => write!(f, "TM{:02}", n),
            LearnMethod::Other(s) => f.write_str(s),
        }
    }
}

/// A move a species can learn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub name: String,
    /// The move's own type tag (e.g. "Fire").
    pub type_tag: String,
    pub category: MoveCategory,
    pub power: Option<u32>,
    pub accuracy: Option<u32>,
    pub pp: Option<u32>,
    pub learn_method: LearnMethod,
}

/// A species this one evolves into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evolution {
    pub name: String,
    pub sprite: String,
    /// e.g. "Level 16", "Use Water Stone".
    pub condition: String,
}

/// The species this one evolves from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreEvolution {
    pub name: String,
    pub sprite: String,
}

/// An alternate form (regional variant, mega, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    pub name: String,
    pub sprite: String,
    pub types: Vec<String>,
}

/// A complete catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// National dex number, unique across the catalog.
    pub id: u32,
    pub name: String,
    /// One or two type tags, primary first.
    pub types: Vec<String>,
    pub sprite: String,
    pub stats: Vec<Stat>,
    pub abilities: Vec<String>,
    pub hidden_ability: Option<String>,
    pub description: String,
    /// Generation number, 1-9.
    pub generation: u8,
    pub egg_groups: Vec<String>,
    pub ev_yield: String,
    /// Base-stat total. Always derived from `stats` by the loader.
    pub bst: u32,

    // -- Defensive matchups --
    pub weaknesses: Vec<String>,
    pub resistances: Vec<String>,
    pub immunities: Vec<String>,

    pub evolutions: Vec<Evolution>,
    pub preevolution: Option<PreEvolution>,
    pub forms: Vec<Form>,
    pub moves: Vec<Move>,
}

impl Record {
    /// Sum of the six stat values.
    pub fn stat_total(stats: &[Stat]) -> u32 {
        stats.iter().fold(0, |total: u32, s| total.saturating_add(s.value))
    }

    /// Recompute `bst` from the current stat list.
    pub fn refresh_bst(&mut self) {
        self.bst = Record::stat_total(&self.stats);
    }

    pub fn stat(&self, name: StatName) -> Option<u32> {
        self.stats.iter().find(|s| s.name == name).map(|s| s.value)
    }

    pub fn primary_type(&self) -> Option<&str> {
        self.types.first().map(|t| t.as_str())
    }

    pub fn has_type(&self, tag: &str) -> bool {
        self.types.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    pub fn has_forms(&self) -> bool {
        !self.forms.is_empty()
    }

    /// "Name (Types: A/B)", the shape used when describing a team member.
    pub fn summary(&self) -> String {
        format!("{} (Types: {})", self.name, self.types.join("/"))
    }
}
