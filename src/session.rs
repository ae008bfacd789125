//! The single owned game state. The presentation layer talks to this; the
//! engine functions stay pure and never see it.

use crate::config::{AnalyticsConfig, ClockConfig, Config};
use crate::engine::analytics::{self, AnalyticsReport};
use crate::engine::classifier::PlayTextClassifier;
use crate::engine::clock::{self, ClockAdvice, ClockInputs, Half, Team, TimeoutBoard};
use crate::engine::ledger::{DriveLedger, FieldEdit, Side};
use crate::engine::scoring::DifferentialReport;
use serde::Serialize;
use std::sync::Arc;

/// Crew names worth having on the sideline. Blank means not entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Officials {
    pub head_ref: Option<String>,
    pub side_judge: Option<String>,
}

impl Officials {
    /// Display lines for whichever names are set.
    pub fn lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(name) = &self.head_ref {
            out.push(format!("Head Ref: {}", name));
        }
        if let Some(name) = &self.side_judge {
            out.push(format!("Side Judge: {}", name));
        }
        out
    }
}

fn optional_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[derive(Debug, Clone)]
pub struct GameSession {
    team_name: String,
    opponent_name: String,
    resolver_cap: usize,
    ledger_capacity: usize,
    analytics_cfg: AnalyticsConfig,
    clock_cfg: ClockConfig,
    classifier: Arc<PlayTextClassifier>,

    own_score: String,
    opp_score: String,
    ledger: DriveLedger,
    timeouts: TimeoutBoard,
    half: Half,
    ball: Team,
    opening_receiver: Option<Team>,
    time_left: u32,
    officials: Officials,
}

impl GameSession {
    pub fn new(config: &Config) -> Self {
        let classifier = PlayTextClassifier::new(
            &config.dictionaries.formations,
            &config.dictionaries.plays,
        );
        Self {
            team_name: config.team.name.clone(),
            opponent_name: config.team.opponent.clone(),
            resolver_cap: config.resolver.cap,
            ledger_capacity: config.ledger.capacity,
            analytics_cfg: config.analytics.clone(),
            clock_cfg: config.clock.clone(),
            classifier: Arc::new(classifier),
            own_score: "0".to_string(),
            opp_score: "0".to_string(),
            ledger: DriveLedger::new(config.ledger.capacity),
            timeouts: TimeoutBoard::default(),
            half: Half::First,
            ball: Team::Us,
            opening_receiver: None,
            time_left: config.clock.quarter_secs,
            officials: Officials::default(),
        }
    }

    /// Back to a fresh game with the same configuration.
    pub fn reset(&mut self) {
        tracing::info!("session reset");
        self.own_score = "0".to_string();
        self.opp_score = "0".to_string();
        self.ledger = DriveLedger::new(self.ledger_capacity);
        self.timeouts = TimeoutBoard::default();
        self.half = Half::First;
        self.ball = Team::Us;
        self.opening_receiver = None;
        self.time_left = self.clock_cfg.quarter_secs;
        self.officials = Officials::default();
    }

    pub fn classifier(&self) -> Arc<PlayTextClassifier> {
        Arc::clone(&self.classifier)
    }

    pub fn analytics_config(&self) -> &AnalyticsConfig {
        &self.analytics_cfg
    }

    pub fn set_opponent_name(&mut self, name: &str) {
        let trimmed = name.trim();
        self.opponent_name = if trimmed.is_empty() {
            "Opponent".to_string()
        } else {
            trimmed.to_string()
        };
    }

    // ── Officials ────────────────────────────────────────────────────

    pub fn officials(&self) -> &Officials {
        &self.officials
    }

    pub fn set_head_ref(&mut self, name: &str) {
        self.officials.head_ref = optional_name(name);
    }

    pub fn set_side_judge(&mut self, name: &str) {
        self.officials.side_judge = optional_name(name);
    }

    pub fn clear_officials(&mut self) {
        self.officials = Officials::default();
    }

    // ── Scores ───────────────────────────────────────────────────────

    /// Store the raw score cells and return the refreshed differential.
    pub fn set_scores(&mut self, own: &str, opp: &str) -> DifferentialReport {
        self.own_score = own.trim().to_string();
        self.opp_score = opp.trim().to_string();
        tracing::info!(own = %self.own_score, opp = %self.opp_score, "score updated");
        self.differential()
    }

    pub fn differential(&self) -> DifferentialReport {
        DifferentialReport::from_raw(&self.own_score, &self.opp_score, self.resolver_cap)
    }

    // ── Ledger ───────────────────────────────────────────────────────

    pub fn ledger(&self) -> &DriveLedger {
        &self.ledger
    }

    pub fn edit_play(&mut self, side: Side, index: usize, edit: FieldEdit) -> &DriveLedger {
        self.ledger = self.ledger.set_field(side, index, edit);
        &self.ledger
    }

    pub fn clear_side(&mut self, side: Side) {
        self.ledger = self.ledger.clear(side);
    }

    /// Synchronous recompute; the pipeline does the same off the edit path.
    pub fn analytics(&self, side: Side) -> AnalyticsReport {
        analytics::aggregate(
            self.ledger.records(side),
            side == Side::Offense,
            &self.classifier,
            &self.analytics_cfg,
        )
    }

    // ── Clock ────────────────────────────────────────────────────────

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn set_clock(&mut self, text: &str) {
        self.time_left = clock::parse_mmss(text, self.clock_cfg.quarter_secs);
    }

    pub fn adjust_clock(&mut self, delta: i32) {
        self.time_left = clock::adjust(self.time_left, delta, self.clock_cfg.quarter_secs);
    }

    pub fn half(&self) -> Half {
        self.half
    }

    pub fn set_half(&mut self, half: Half) {
        self.half = half;
    }

    pub fn ball(&self) -> Team {
        self.ball
    }

    pub fn set_ball(&mut self, team: Team) {
        self.ball = team;
    }

    pub fn timeouts_left(&self, team: Team) -> u8 {
        self.timeouts.left(team, self.half)
    }

    /// Charge a timeout to `team` in the current half.
    pub fn use_timeout(&mut self, team: Team) -> bool {
        let used = self.timeouts.use_timeout(team, self.half);
        if !used {
            tracing::warn!(%team, "no timeouts left");
        }
        used
    }

    pub fn set_timeout(&mut self, team: Team, half: Half, slot: usize, available: bool) {
        self.timeouts.set(team, half, slot, available);
    }

    pub fn set_opening_receiver(&mut self, team: Team) {
        self.opening_receiver = Some(team);
    }

    pub fn second_half_receiver(&self) -> Option<Team> {
        clock::second_half_receiver(self.opening_receiver)
    }

    /// Clock advice for the current situation. `None` arguments fall back to
    /// the configured defaults.
    pub fn clock_advice(
        &self,
        snaps: Option<u32>,
        play_clock: Option<u32>,
        play_time: Option<u32>,
    ) -> ClockAdvice {
        clock::advise(&ClockInputs {
            time_left: self.time_left,
            snaps: snaps.unwrap_or(self.clock_cfg.snaps),
            play_clock: play_clock.unwrap_or(self.clock_cfg.play_clock),
            play_time: play_time.unwrap_or(self.clock_cfg.play_time),
            ball: self.ball,
            our_timeouts: self.timeouts_left(Team::Us),
            opp_timeouts: self.timeouts_left(Team::Them),
            our_name: &self.team_name,
            opp_name: &self.opponent_name,
        })
    }
}
