//! Game-clock helper: how much time a possession can burn, timeouts left,
//! and who receives the second-half kickoff.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// High-school quarter length.
pub const QUARTER_SECS: u32 = 12 * 60;

pub const TIMEOUTS_PER_HALF: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Us,
    Them,
}

impl Team {
    pub fn other(self) -> Team {
        match self {
            Team::Us => Team::Them,
            Team::Them => Team::Us,
        }
    }
}

impl FromStr for Team {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "us" | "we" | "our" | "own" => Ok(Team::Us),
            "them" | "opp" | "opponent" => Ok(Team::Them),
            other => Err(format!("unknown team '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Half {
    First,
    Second,
}

impl FromStr for Half {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" | "h1" | "first" => Ok(Half::First),
            "2" | "h2" | "second" => Ok(Half::Second),
            other => Err(format!("unknown half '{}'", other)),
        }
    }
}

// ── Clock text ───────────────────────────────────────────────────────

/// Parse `M:SS` / `MM:SS` (one or two second digits). Anything else is 0.
/// Clamped to `[0, max_secs]`.
pub fn parse_mmss(text: &str, max_secs: u32) -> u32 {
    let Some((m, s)) = text.trim().split_once(':') else {
        return 0;
    };
    let all_digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(m) || !all_digits(s) || s.len() > 2 {
        return 0;
    }
    match (m.parse::<u32>(), s.parse::<u32>()) {
        (Ok(mm), Ok(ss)) => mm.saturating_mul(60).saturating_add(ss).min(max_secs),
        _ => 0,
    }
}

pub fn format_mmss(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Nudge the clock by `delta` seconds, staying inside the quarter.
pub fn adjust(secs: u32, delta: i32, max_secs: u32) -> u32 {
    (secs as i64 + delta as i64).clamp(0, max_secs as i64) as u32
}

// ── Timeouts ─────────────────────────────────────────────────────────

/// Per team, per half: `true` = timeout still available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutBoard {
    us: [[bool; TIMEOUTS_PER_HALF]; 2],
    them: [[bool; TIMEOUTS_PER_HALF]; 2],
}

impl Default for TimeoutBoard {
    fn default() -> Self {
        Self {
            us: [[true; TIMEOUTS_PER_HALF]; 2],
            them: [[true; TIMEOUTS_PER_HALF]; 2],
        }
    }
}

impl TimeoutBoard {
    fn slots(&self, team: Team, half: Half) -> &[bool; TIMEOUTS_PER_HALF] {
        let h = half as usize;
        match team {
            Team::Us => &self.us[h],
            Team::Them => &self.them[h],
        }
    }

    fn slots_mut(&mut self, team: Team, half: Half) -> &mut [bool; TIMEOUTS_PER_HALF] {
        let h = half as usize;
        match team {
            Team::Us => &mut self.us[h],
            Team::Them => &mut self.them[h],
        }
    }

    pub fn left(&self, team: Team, half: Half) -> u8 {
        self.slots(team, half).iter().filter(|&&a| a).count() as u8
    }

    /// Mark the last available timeout used. Returns false when none remain.
    pub fn use_timeout(&mut self, team: Team, half: Half) -> bool {
        match self.slots_mut(team, half).iter_mut().rev().find(|a| **a) {
            Some(slot) => {
                *slot = false;
                true
            }
            None => false,
        }
    }

    /// Toggle a single slot; out-of-range slots are ignored.
    pub fn set(&mut self, team: Team, half: Half, slot: usize, available: bool) {
        if let Some(s) = self.slots_mut(team, half).get_mut(slot) {
            *s = available;
        }
    }
}

// ── Advice ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockInputs<'a> {
    pub time_left: u32,
    pub snaps: u32,
    pub play_clock: u32,
    pub play_time: u32,
    pub ball: Team,
    pub our_timeouts: u8,
    pub opp_timeouts: u8,
    pub our_name: &'a str,
    pub opp_name: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClockAdvice {
    pub ball: Team,
    pub burned_secs: u32,
    pub remaining_secs: u32,
    pub can_run_out: bool,
    pub summary: String,
}

/// Estimate how much clock the team with the ball can run over the next
/// few snaps. Every snap costs `play_time`; the play clock also runs
/// between snaps except where the defense stops it with a timeout.
pub fn advise(inputs: &ClockInputs<'_>) -> ClockAdvice {
    let snaps = inputs.snaps.clamp(1, 4);
    let play_clock = inputs.play_clock.clamp(20, 45);
    let play_time = inputs.play_time.clamp(1, 15);

    let defending_timeouts = match inputs.ball {
        Team::Us => inputs.opp_timeouts,
        Team::Them => inputs.our_timeouts,
    } as u32;
    let burn = snaps * play_time + snaps.saturating_sub(defending_timeouts) * play_clock;
    let burned = inputs.time_left.min(burn);
    let remaining = inputs.time_left - burned;

    let summary = match inputs.ball {
        Team::Us => {
            let tail = if remaining == 0 {
                "Can run out the half.".to_string()
            } else {
                format!("~{} would remain.", format_mmss(remaining))
            };
            format!(
                "{} has ball. {} TOs: {}. Over {} snaps, est burn ≈ {}. {}",
                inputs.our_name,
                inputs.opp_name,
                inputs.opp_timeouts,
                snaps,
                format_mmss(burned),
                tail
            )
        }
        Team::Them => format!(
            "{} has ball. {} TOs: {}. Over {} snaps, they can drain ≈ {}. Time left would be ≈ {}.",
            inputs.opp_name,
            inputs.our_name,
            inputs.our_timeouts,
            snaps,
            format_mmss(burned),
            format_mmss(remaining)
        ),
    };

    ClockAdvice {
        ball: inputs.ball,
        burned_secs: burned,
        remaining_secs: remaining,
        can_run_out: inputs.ball == Team::Us && remaining == 0,
        summary,
    }
}

/// Whoever did not receive the opening kickoff receives the second half.
pub fn second_half_receiver(opening_receiver: Option<Team>) -> Option<Team> {
    opening_receiver.map(Team::other)
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::Us => f.write_str("us"),
            Team::Them => f.write_str("them"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(time_left: u32, ball: Team, our_to: u8, opp_to: u8) -> ClockInputs<'static> {
        ClockInputs {
            time_left,
            snaps: 3,
            play_clock: 40,
            play_time: 6,
            ball,
            our_timeouts: our_to,
            opp_timeouts: opp_to,
            our_name: "Home",
            opp_name: "Visitors",
        }
    }

    #[test]
    fn test_parse_mmss() {
        assert_eq!(parse_mmss("2:05", QUARTER_SECS), 125);
        assert_eq!(parse_mmss("10:5", QUARTER_SECS), 605);
        assert_eq!(parse_mmss("0:00", QUARTER_SECS), 0);
        assert_eq!(parse_mmss("15:00", QUARTER_SECS), QUARTER_SECS);
        assert_eq!(parse_mmss("2:005", QUARTER_SECS), 0);
        assert_eq!(parse_mmss("abc", QUARTER_SECS), 0);
        assert_eq!(parse_mmss("", QUARTER_SECS), 0);
        assert_eq!(parse_mmss("-1:30", QUARTER_SECS), 0);
    }

    #[test]
    fn test_format_and_adjust() {
        assert_eq!(format_mmss(125), "2:05");
        assert_eq!(format_mmss(0), "0:00");
        assert_eq!(adjust(10, -30, QUARTER_SECS), 0);
        assert_eq!(adjust(700, 60, QUARTER_SECS), QUARTER_SECS);
        assert_eq!(adjust(60, 5, QUARTER_SECS), 65);
    }

    #[test]
    fn test_timeouts_use_last_available() {
        let mut board = TimeoutBoard::default();
        assert_eq!(board.left(Team::Us, Half::First), 3);
        assert!(board.use_timeout(Team::Us, Half::First));
        assert_eq!(board.left(Team::Us, Half::First), 2);
        assert_eq!(board.left(Team::Us, Half::Second), 3);
        assert_eq!(board.left(Team::Them, Half::First), 3);

        board.set(Team::Them, Half::Second, 0, false);
        board.set(Team::Them, Half::Second, 7, false);
        assert_eq!(board.left(Team::Them, Half::Second), 2);

        assert!(board.use_timeout(Team::Us, Half::First));
        assert!(board.use_timeout(Team::Us, Half::First));
        assert!(!board.use_timeout(Team::Us, Half::First));
        assert_eq!(board.left(Team::Us, Half::First), 0);
    }

    #[test]
    fn test_advise_can_run_out() {
        // 3 snaps * 6s + (3 - 0) * 40s = 138s > 120s
        let advice = advise(&inputs(120, Team::Us, 2, 0));
        assert_eq!(advice.burned_secs, 120);
        assert!(advice.can_run_out);
        assert!(advice.summary.ends_with("Can run out the half."));
    }

    #[test]
    fn test_advise_defense_timeouts_stop_clock() {
        // 3*6 + (3-2)*40 = 58
        let advice = advise(&inputs(300, Team::Us, 3, 2));
        assert_eq!(advice.burned_secs, 58);
        assert_eq!(advice.remaining_secs, 242);
        assert!(!advice.can_run_out);
        assert!(advice.summary.contains("~4:02 would remain."));
    }

    #[test]
    fn test_advise_opponent_ball() {
        // our 3 TOs cover all 3 snaps: only play time burns
        let advice = advise(&inputs(100, Team::Them, 3, 0));
        assert_eq!(advice.burned_secs, 18);
        assert_eq!(advice.remaining_secs, 82);
        assert!(!advice.can_run_out);
        assert!(advice.summary.starts_with("Visitors has ball."));
    }

    #[test]
    fn test_advise_clamps_inputs() {
        let mut raw = inputs(1000, Team::Us, 0, 0);
        raw.snaps = 9;
        raw.play_clock = 5;
        raw.play_time = 0;
        // 4*1 + 4*20
        assert_eq!(advise(&raw).burned_secs, 84);
    }

    #[test]
    fn test_second_half_receiver() {
        assert_eq!(second_half_receiver(Some(Team::Us)), Some(Team::Them));
        assert_eq!(second_half_receiver(Some(Team::Them)), Some(Team::Us));
        assert_eq!(second_half_receiver(None), None);
    }
}
