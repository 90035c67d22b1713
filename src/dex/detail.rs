use serde::{Deserialize, Serialize};

use crate::data::record::{Evolution, Record, Stat, MAX_STAT_VALUE};

/// Pages of a record's detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DetailPage {
    About,
    Stats,
    Evolutions,
    Defenses,
    Moves,
    /// Only offered for records with alternate forms.
    Forms,
    /// Free-text Q&A about the record.
    Oracle,
}

impl DetailPage {
    /// Pages available for a record, in navigation order.
    pub fn available_for(record: &Record) -> Vec<DetailPage> {
        let mut pages = vec![
            DetailPage::About,
            DetailPage::Stats,
            DetailPage::Evolutions,
            DetailPage::Defenses,
            DetailPage::Moves,
        ];
        if record.has_forms() {
            pages.push(DetailPage::Forms);
        }
        pages.push(DetailPage::Oracle);
        pages
    }
}

/// Colour band of a stat bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatTier {
    /// Under a quarter of the maximum.
    Low,
    /// Under half of the maximum.
    Mid,
    High,
}

/// Fill percentage of a stat bar (0-100, relative to 255).
pub fn stat_percentage(stat: &Stat) -> f32 {
    stat.value as f32 / MAX_STAT_VALUE as f32 * 100.0
}

pub fn stat_tier(stat: &Stat) -> StatTier {
    let pct = stat_percentage(stat);
    if pct < 25.0 {
        StatTier::Low
    } else if pct < 50.0 {
        StatTier::Mid
    } else {
        StatTier::High
    }
}

/// Branching lines show each target as a "NEXT" option; a single
/// evolution is the "FINAL" step shown.
pub fn evolution_label(record: &Record) -> &'static str {
    if record.evolutions.len() > 1 {
        "NEXT"
    } else {
        "FINAL"
    }
}

/// Evolutions paired with their display label.
pub fn labelled_evolutions(record: &Record) -> Vec<(&'static str, &Evolution)> {
    let label = evolution_label(record);
    record.evolutions.iter().map(|e| (label, e)).collect()
}
