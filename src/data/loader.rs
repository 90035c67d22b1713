use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::record::{
    Evolution, Form, LearnMethod, Move, MoveCategory, PreEvolution, Record, Stat, StatName,
    MAX_STAT_VALUE,
};

/// Why the dataset could not be loaded. Any of these ends the session.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Pokedex data not found at {url} (HTTP {status}). Generate the dataset before starting.")]
    Status { url: String, status: u16 },
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a JSON array of records")]
    NotAnArray,
    /// The dataset is a placeholder whose first entry carries an `error` message.
    #[error("{0}")]
    Placeholder(String),
    #[error("record #{index} is invalid: {reason}")]
    InvalidRecord { index: usize, reason: String },
    #[error("duplicate record id {0}")]
    DuplicateId(u32),
}

/// Raw record as it appears in pokedex.json.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    #[serde(default)]
    id: Option<u32>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    types: Option<Vec<String>>,
    #[serde(default)]
    sprite: Option<String>,
    #[serde(default)]
    stats: Option<Vec<Value>>,
    #[serde(default)]
    abilities: Option<Vec<String>>,
    #[serde(default)]
    hidden_ability: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    generation: Option<Value>,
    #[serde(default)]
    egg_groups: Option<Vec<String>>,
    #[serde(default)]
    ev_yield: Option<String>,
    #[serde(default)]
    weaknesses: Option<Vec<String>>,
    #[serde(default)]
    resistances: Option<Vec<String>>,
    #[serde(default)]
    immunities: Option<Vec<String>>,
    #[serde(default)]
    evolutions: Option<Vec<Value>>,
    #[serde(default)]
    preevolution: Option<RawPreEvolution>,
    #[serde(default)]
    forms: Option<Vec<Value>>,
    #[serde(default)]
    moves: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct RawStat {
    name: StatName,
    #[serde(default)]
    value: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMove {
    name: String,
    #[serde(rename = "type", default)]
    type_tag: String,
    #[serde(default)]
    category: Option<MoveCategory>,
    #[serde(default)]
    power: Option<Value>,
    #[serde(default)]
    accuracy: Option<Value>,
    #[serde(default)]
    pp: Option<Value>,
    #[serde(default)]
    learn_method: String,
}

#[derive(Debug, Deserialize)]
struct RawEvolution {
    name: String,
    #[serde(default)]
    sprite: String,
    #[serde(default)]
    condition: String,
}

#[derive(Debug, Deserialize)]
struct RawPreEvolution {
    name: String,
    #[serde(default)]
    sprite: String,
}

#[derive(Debug, Deserialize)]
struct RawForm {
    name: String,
    #[serde(default)]
    sprite: String,
    #[serde(default)]
    types: Vec<String>,
}

/// Numbers show up as integers, whole floats, numeric strings, or dashes.
fn parse_number(value: Option<Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().trim_end_matches('%').parse().ok(),
        _ => None,
    }
}

fn parse_numeric(value: Option<Value>) -> Option<u32> {
    parse_number(value).and_then(|v| u32::try_from(v).ok())
}

/// Stat values outside 0..=255 are clamped; unreadable ones count as 0.
fn parse_stat_value(index: usize, name: StatName, value: Option<Value>) -> u32 {
    let Some(value) = parse_number(value) else {
        tracing::warn!(record = index, stat = %name, "unreadable stat value, using 0");
        return 0;
    };
    if value > u64::from(MAX_STAT_VALUE) {
        tracing::warn!(record = index, stat = %name, value, "stat value out of range, clamping");
        return MAX_STAT_VALUE;
    }
    value as u32
}

/// Deserialize each nested entry on its own, dropping the ones that don't fit.
fn lenient_entries<T: DeserializeOwned>(
    index: usize,
    field: &str,
    items: Option<Vec<Value>>,
) -> Vec<T> {
    items
        .unwrap_or_default()
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(record = index, field, error = %e, "dropping malformed entry");
                None
            }
        })
        .collect()
}

fn convert_raw_record(index: usize, raw: RawRecord) -> Result<Record, LoadError> {
    let id = match raw.id {
        Some(id) if id > 0 => id,
        Some(_) => {
            return Err(LoadError::InvalidRecord {
                index,
                reason: "id must be positive".to_string(),
            })
        }
        None => {
            return Err(LoadError::InvalidRecord {
                index,
                reason: "missing id".to_string(),
            })
        }
    };

    let stats: Vec<Stat> = lenient_entries::<RawStat>(index, "stats", raw.stats)
        .into_iter()
        .map(|s| Stat {
            name: s.name,
            value: parse_stat_value(index, s.name, s.value),
        })
        .collect();

    let moves = lenient_entries::<RawMove>(index, "moves", raw.moves)
        .into_iter()
        .filter_map(|m| {
            let Some(category) = m.category else {
                tracing::warn!(record = index, name = %m.name, "dropping move without category");
                return None;
            };
            Some(Move {
                name: m.name,
                type_tag: m.type_tag,
                category,
                power: parse_numeric(m.power),
                accuracy: parse_numeric(m.accuracy),
                pp: parse_numeric(m.pp),
                learn_method: LearnMethod::parse(&m.learn_method),
            })
        })
        .collect();

    let mut record = Record {
        id,
        name: raw.name.unwrap_or_default(),
        types: raw.types.unwrap_or_default(),
        sprite: raw.sprite.unwrap_or_default(),
        stats,
        abilities: raw.abilities.unwrap_or_default(),
        hidden_ability: raw.hidden_ability,
        description: raw.description.unwrap_or_default(),
        generation: parse_number(raw.generation)
            .and_then(|g| u8::try_from(g).ok())
            .unwrap_or(0),
        egg_groups: raw.egg_groups.unwrap_or_default(),
        ev_yield: raw.ev_yield.unwrap_or_default(),
        bst: 0,
        weaknesses: raw.weaknesses.unwrap_or_default(),
        resistances: raw.resistances.unwrap_or_default(),
        immunities: raw.immunities.unwrap_or_default(),
        evolutions: lenient_entries::<RawEvolution>(index, "evolutions", raw.evolutions)
            .into_iter()
            .map(|e| Evolution {
                name: e.name,
                sprite: e.sprite,
                condition: e.condition,
            })
            .collect(),
        preevolution: raw.preevolution.map(|p| PreEvolution {
            name: p.name,
            sprite: p.sprite,
        }),
        forms: lenient_entries::<RawForm>(index, "forms", raw.forms)
            .into_iter()
            .map(|f| Form {
                name: f.name,
                sprite: f.sprite,
                types: f.types,
            })
            .collect(),
        moves,
    };
    // Never trust a bst carried by the input.
    record.refresh_bst();
    Ok(record)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Parse a pokedex.json document into records.
///
/// Fails on anything but a JSON array, on a placeholder document whose
/// first element carries a truthy `error` field, and on records without an
/// id. Malformed nested entries are dropped rather than failing the load.
pub fn parse_records(json: &str) -> Result<Vec<Record>, LoadError> {
    let document: Value = serde_json::from_str(json)?;
    let Value::Array(items) = document else {
        return Err(LoadError::NotAnArray);
    };

    let placeholder = items
        .first()
        .and_then(|first| first.get("error"))
        .filter(|error| is_truthy(error));
    if let Some(message) = placeholder {
        let message = match message {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Err(LoadError::Placeholder(message));
    }

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let raw: RawRecord =
                serde_json::from_value(item).map_err(|e| LoadError::InvalidRecord {
                    index,
                    reason: e.to_string(),
                })?;
            convert_raw_record(index, raw)
        })
        .collect()
}

/// Load all records from a JSON file.
pub fn load_records(path: &Path) -> Result<Vec<Record>, LoadError> {
    let data = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_records(&data)
}

/// Load records from a file and index them.
pub fn load_pokedex(path: &Path) -> Result<Pokedex, LoadError> {
    let pokedex = Pokedex::new(load_records(path)?)?;
    tracing::info!(path = %path.display(), records = pokedex.len(), "loaded pokedex");
    Ok(pokedex)
}

/// Fetch and index the dataset over HTTP. Non-2xx responses fail the load.
pub async fn fetch_pokedex(client: &reqwest::Client, url: &str) -> Result<Pokedex, LoadError> {
    let fetch_err = |source| LoadError::Fetch {
        url: url.to_string(),
        source,
    };
    let resp = client.get(url).send().await.map_err(fetch_err)?;

    let status = resp.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = resp.text().await.map_err(fetch_err)?;
    let pokedex = Pokedex::new(parse_records(&body)?)?;
    tracing::info!(url, records = pokedex.len(), "fetched pokedex");
    Ok(pokedex)
}

/// The full, read-only record set, indexed for lookup.
#[derive(Debug, Clone, Default)]
pub struct Pokedex {
    /// All records, ascending by id.
    records: Vec<Record>,
    /// Index: id -> position in `records`.
    by_id: HashMap<u32, usize>,
    /// Index: lowercase name -> position in `records`.
    by_name: HashMap<String, usize>,
}

impl Pokedex {
    pub fn new(mut records: Vec<Record>) -> Result<Self, LoadError> {
        records.sort_by_key(|r| r.id);

        let mut by_id = HashMap::with_capacity(records.len());
        let mut by_name = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            if by_id.insert(record.id, i).is_some() {
                return Err(LoadError::DuplicateId(record.id));
            }
            // First (lowest id) wins for repeated names.
            by_name.entry(record.name.to_lowercase()).or_insert(i);
        }

        Ok(Self {
            records,
            by_id,
            by_name,
        })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Record> {
        self.by_id.get(&id).map(|&i| &self.records[i])
    }

    /// Case-insensitive exact-name lookup.
    pub fn find_by_name(&self, name: &str) -> Option<&Record> {
        self.by_name
            .get(&name.to_lowercase())
            .map(|&i| &self.records[i])
    }

    pub fn max_bst(&self) -> u32 {
        self.records.iter().map(|r| r.bst).max().unwrap_or(0)
    }
}
