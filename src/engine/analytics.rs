//! Success-rate / explosiveness tendencies derived from a ledger side.
//!
//! Always a full pass over the current rows; edits to old rows therefore
//! can never leave a stale bucket behind.

use super::classifier::{normalize, PlayTextClassifier};
use super::ledger::{Gain, PlayRecord};
use crate::config::AnalyticsConfig;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsBucket {
    pub label: String,
    pub plays: u32,
    pub success_rate: f64,
    pub avg_gain: f64,
    pub explosive_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalyticsReport {
    /// Rows with a recorded result.
    pub plays: u32,
    pub by_keyword: Vec<AnalyticsBucket>,
    pub by_formation: Vec<AnalyticsBucket>,
    pub by_play: Vec<AnalyticsBucket>,
    pub by_down: Vec<AnalyticsBucket>,
    /// Offense only.
    pub by_formation_play: Option<Vec<AnalyticsBucket>>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    plays: u32,
    successes: u32,
    explosives: u32,
    total_gain: i64,
}

impl Tally {
    fn add(&mut self, outcome: &Outcome) {
        self.plays += 1;
        if outcome.success {
            self.successes += 1;
        }
        if outcome.explosive {
            self.explosives += 1;
        }
        self.total_gain += outcome.yards as i64;
    }

    fn into_bucket(self, label: String) -> AnalyticsBucket {
        let plays = self.plays as f64;
        AnalyticsBucket {
            label,
            plays: self.plays,
            success_rate: self.successes as f64 / plays,
            avg_gain: self.total_gain as f64 / plays,
            explosive_rate: self.explosives as f64 / plays,
        }
    }
}

/// Classification of a single snap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub success: bool,
    pub explosive: bool,
    /// Turnovers count as zero yards.
    pub yards: i32,
}

/// Judge one snap from the point of view of the side that logged it.
///
/// Downs 3-4 need the line to gain; downs 1-2 (and rows missing the down or
/// distance) need `success_yards`. Defense succeeds exactly when offense
/// fails, and a turnover is always a defensive win.
pub fn classify(record: &PlayRecord, gain: Gain, is_offense: bool, cfg: &AnalyticsConfig) -> Outcome {
    let yards = match gain {
        Gain::Yards(y) => y,
        Gain::Interception | Gain::Turnover => {
            return Outcome {
                success: !is_offense,
                explosive: false,
                yards: 0,
            };
        }
    };

    let offense_success = match (record.down, record.distance) {
        (Some(3..=4), Some(distance)) => yards >= distance,
        _ => yards >= cfg.success_yards,
    };

    Outcome {
        success: offense_success == is_offense,
        explosive: yards >= cfg.explosive_yards,
        yards,
    }
}

fn down_label(down: i32) -> Option<&'static str> {
    match down {
        1 => Some("1st Down"),
        2 => Some("2nd Down"),
        3 => Some("3rd Down"),
        4 => Some("4th Down"),
        _ => None,
    }
}

/// Rebuild every bucket family from scratch.
pub fn aggregate(
    records: &[PlayRecord],
    is_offense: bool,
    classifier: &PlayTextClassifier,
    cfg: &AnalyticsConfig,
) -> AnalyticsReport {
    let mut keywords: HashMap<String, Tally> = HashMap::new();
    let mut formations: HashMap<String, Tally> = HashMap::new();
    let mut plays: HashMap<String, Tally> = HashMap::new();
    let mut downs: HashMap<String, Tally> = HashMap::new();
    let mut combos: HashMap<String, Tally> = HashMap::new();
    let mut counted = 0u32;

    for record in records {
        let Some(gain) = record.gain else {
            continue;
        };
        let outcome = classify(record, gain, is_offense, cfg);
        counted += 1;

        let normalized = normalize(&record.call_text);
        let mut seen = HashSet::new();
        for word in normalized.split_whitespace() {
            if seen.insert(word) {
                keywords.entry(word.to_string()).or_default().add(&outcome);
            }
        }

        let formation = classifier.detect_formation(&record.call_text);
        if let Some(f) = formation {
            formations.entry(f.to_string()).or_default().add(&outcome);
        }

        for play in classifier.detect_plays(&record.call_text) {
            plays.entry(play.to_string()).or_default().add(&outcome);
            if let (true, Some(f)) = (is_offense, formation) {
                combos
                    .entry(format!("{} + {}", f, play))
                    .or_default()
                    .add(&outcome);
            }
        }

        if let Some(label) = record.down.and_then(down_label) {
            downs.entry(label.to_string()).or_default().add(&outcome);
        }
    }

    tracing::debug!(is_offense, plays = counted, "analytics recomputed");

    let mut by_down = into_buckets(downs);
    by_down.sort_by(|a, b| a.label.cmp(&b.label));

    AnalyticsReport {
        plays: counted,
        by_keyword: ranked(keywords, cfg.bucket_limit),
        by_formation: ranked(formations, cfg.bucket_limit),
        by_play: ranked(plays, cfg.bucket_limit),
        by_down,
        by_formation_play: is_offense.then(|| ranked(combos, cfg.bucket_limit)),
    }
}

fn into_buckets(map: HashMap<String, Tally>) -> Vec<AnalyticsBucket> {
    map.into_iter()
        .filter(|(_, t)| t.plays > 0)
        .map(|(label, t)| t.into_bucket(label))
        .collect()
}

/// Best success rate first, then explosive rate, then average gain; label
/// breaks remaining ties so output order is stable.
fn ranked(map: HashMap<String, Tally>, limit: usize) -> Vec<AnalyticsBucket> {
    let mut buckets = into_buckets(map);
    buckets.sort_by(|a, b| {
        b.success_rate
            .total_cmp(&a.success_rate)
            .then(b.explosive_rate.total_cmp(&a.explosive_rate))
            .then(b.avg_gain.total_cmp(&a.avg_gain))
            .then_with(|| a.label.cmp(&b.label))
    });
    buckets.truncate(limit);
    buckets
}
