//! Scoring-differential resolver.
//!
//! Answers "what does it take to tie / take the lead" by enumerating every
//! multiset of scoring plays that sums exactly to the deficit, then ranking
//! them fewest-possessions-first.

use serde::Serialize;
use std::cmp::Reverse;
use std::collections::HashSet;
use std::fmt;

/// A single way to put points on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoringPlay {
    pub points: i32,
    pub label: &'static str,
}

/// Catalog order is also tie-break priority: most valuable single play first.
pub const CATALOG: [ScoringPlay; 5] = [
    ScoringPlay { points: 8, label: "TD + 2pt" },
    ScoringPlay { points: 7, label: "TD + PAT" },
    ScoringPlay { points: 6, label: "TD (no conv)" },
    ScoringPlay { points: 3, label: "FG" },
    ScoringPlay { points: 2, label: "Safety" },
];

const IDX_FG: usize = 3;
const IDX_SAFETY: usize = 4;

/// One combination of scoring plays reaching the target exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoringOption {
    /// Plays of each catalog entry, aligned with [`CATALOG`].
    pub counts: [u32; 5],
    pub total_plays: u32,
    pub display_text: String,
}

impl ScoringOption {
    fn from_counts(counts: [u32; 5]) -> Self {
        let display_text = CATALOG
            .iter()
            .zip(counts.iter())
            .filter(|(_, n)| **n > 0)
            .map(|(play, n)| format!("{}× {}", n, play.label))
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            counts,
            total_plays: counts.iter().sum(),
            display_text,
        }
    }

    /// Total points this option is worth.
    pub fn points(&self) -> i32 {
        CATALOG
            .iter()
            .zip(self.counts.iter())
            .map(|(play, &n)| play.points * n as i32)
            .sum()
    }

    /// Fewest plays first; then more 8s, 7s, 6s; then fewer field goals and
    /// safeties; display text last so the order is total.
    #[allow(clippy::type_complexity)]
    pub fn rank_key(&self) -> (u32, Reverse<u32>, Reverse<u32>, Reverse<u32>, u32, u32, &str) {
        (
            self.total_plays,
            Reverse(self.counts[0]),
            Reverse(self.counts[1]),
            Reverse(self.counts[2]),
            self.counts[IDX_FG],
            self.counts[IDX_SAFETY],
            self.display_text.as_str(),
        )
    }
}

/// Why the resolver produced no options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResolveMessage {
    AlreadyTied,
    NoPointsNeeded,
    NotReachable,
    InvalidScore,
}

impl fmt::Display for ResolveMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ResolveMessage::AlreadyTied => "Already tied",
            ResolveMessage::NoPointsNeeded => "No points needed.",
            ResolveMessage::NotReachable => "Not reachable with standard scoring.",
            ResolveMessage::InvalidScore => "Enter both scores",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ResolveOutcome {
    Message(ResolveMessage),
    Options(Vec<ScoringOption>),
}

impl ResolveOutcome {
    pub fn options(&self) -> &[ScoringOption] {
        match self {
            ResolveOutcome::Options(opts) => opts,
            ResolveOutcome::Message(_) => &[],
        }
    }

    pub fn message(&self) -> Option<ResolveMessage> {
        match self {
            ResolveOutcome::Message(m) => Some(*m),
            ResolveOutcome::Options(_) => None,
        }
    }
}

/// Enumerate, rank, dedup and truncate all ways to score exactly `target`.
///
/// `cap` is clamped to at least 1. Cost grows roughly with `target^4`, so
/// callers feeding raw user input should bound the scores first.
pub fn resolve(target: i32, cap: usize) -> ResolveOutcome {
    if target == 0 {
        return ResolveOutcome::Message(ResolveMessage::AlreadyTied);
    }
    if target < 0 {
        return ResolveOutcome::Message(ResolveMessage::NoPointsNeeded);
    }

    let mut found = Vec::new();
    let mut counts = [0u32; 5];
    search(target, 0, &mut counts, &mut found);

    if found.is_empty() {
        return ResolveOutcome::Message(ResolveMessage::NotReachable);
    }

    let mut options: Vec<ScoringOption> =
        found.into_iter().map(ScoringOption::from_counts).collect();
    options.sort_by(|a, b| a.rank_key().cmp(&b.rank_key()));

    let mut seen = HashSet::new();
    options.retain(|opt| seen.insert(opt.display_text.clone()));
    options.truncate(cap.max(1));

    tracing::debug!(target, count = options.len(), "resolved scoring options");
    ResolveOutcome::Options(options)
}

/// Backtracking over catalog entries. Descent never revisits an earlier
/// index, so each multiset is produced once.
fn search(remaining: i32, start: usize, counts: &mut [u32; 5], out: &mut Vec<[u32; 5]>) {
    if remaining == 0 {
        out.push(*counts);
        return;
    }
    for idx in start..CATALOG.len() {
        let points = CATALOG[idx].points;
        if points > remaining {
            continue;
        }
        counts[idx] += 1;
        search(remaining - points, idx, counts, out);
        counts[idx] -= 1;
    }
}

/// Both result sets shown next to the scoreboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DifferentialReport {
    pub to_tie: ResolveOutcome,
    pub to_lead: ResolveOutcome,
}

/// Scores above this are treated as typos rather than searched.
pub const MAX_SCORE: u32 = 199;

impl DifferentialReport {
    /// Scores above [`MAX_SCORE`] are rejected with the invalid-score message.
    pub fn from_scores(own: u32, opp: u32, cap: usize) -> Self {
        if own > MAX_SCORE || opp > MAX_SCORE {
            tracing::warn!(own, opp, "score out of range");
            return Self::invalid();
        }
        // both sides are bounded, so the difference fits comfortably
        let diff = (i64::from(opp) - i64::from(own)) as i32;
        Self {
            to_tie: resolve(diff, cap),
            to_lead: resolve(diff + 1, cap),
        }
    }

    /// Validate raw score cells before resolving. Blank, non-numeric,
    /// negative or absurd scores yield a message on both sides.
    pub fn from_raw(own: &str, opp: &str, cap: usize) -> Self {
        match (parse_score(own), parse_score(opp)) {
            (Some(own), Some(opp)) => Self::from_scores(own, opp, cap),
            _ => Self::invalid(),
        }
    }

    fn invalid() -> Self {
        Self {
            to_tie: ResolveOutcome::Message(ResolveMessage::InvalidScore),
            to_lead: ResolveOutcome::Message(ResolveMessage::InvalidScore),
        }
    }
}

fn parse_score(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all(target: i32) -> Vec<ScoringOption> {
        resolve(target, usize::MAX).options().to_vec()
    }

    #[test]
    fn test_tied_and_leading_messages() {
        assert_eq!(resolve(0, 5).message(), Some(ResolveMessage::AlreadyTied));
        assert_eq!(resolve(-5, 5).message(), Some(ResolveMessage::NoPointsNeeded));
        assert_eq!(ResolveMessage::AlreadyTied.to_string(), "Already tied");
        assert_eq!(ResolveMessage::NoPointsNeeded.to_string(), "No points needed.");
    }

    #[test]
    fn test_one_point_not_reachable() {
        let outcome = resolve(1, 200);
        assert_eq!(outcome.message(), Some(ResolveMessage::NotReachable));
        assert!(outcome.options().is_empty());
    }

    #[test]
    fn test_fourteen_two_play_options_first() {
        let opts = resolve(14, 5).options().to_vec();
        assert_eq!(opts.len(), 5);
        // 8+6 and 7+7 are the only two-play answers; the 8 wins the tie-break
        assert_eq!(opts[0].counts, [1, 0, 1, 0, 0]);
        assert_eq!(opts[1].counts, [0, 2, 0, 0, 0]);
        assert_eq!(opts[1].display_text, "2× TD + PAT");
        assert!(opts[2..].iter().all(|o| o.total_plays >= 3));
    }

    #[test]
    fn test_two_play_tie_break_prefers_eight() {
        // 10 = 8+2 or 7+3
        let ten = all(10);
        assert_eq!(ten[0].counts, [1, 0, 0, 0, 1]);
        assert_eq!(ten[1].counts, [0, 1, 0, 1, 0]);
    }

    #[test]
    fn test_field_goal_beats_safety_pairing_at_same_length() {
        // 9 = 7+2 or 6+3 or 3+3+3 ...; 7+2 ranks before 6+3 (more 7s)
        let nine = all(9);
        assert_eq!(nine[0].counts, [0, 1, 0, 0, 1]);
        assert_eq!(nine[1].counts, [0, 0, 1, 1, 0]);
    }

    #[test]
    fn test_cap_truncates() {
        assert_eq!(resolve(21, 3).options().len(), 3);
        assert_eq!(resolve(21, 0).options().len(), 1);
    }

    #[test]
    fn test_every_option_sums_to_target() {
        for target in 1..=40 {
            for opt in all(target) {
                assert_eq!(opt.points(), target, "{:?}", opt);
            }
        }
    }

    #[test]
    fn test_no_duplicate_multisets() {
        for target in 1..=40 {
            let opts = all(target);
            let unique: HashSet<_> = opts.iter().map(|o| o.counts).collect();
            assert_eq!(unique.len(), opts.len(), "target {target}");
        }
    }

    #[test]
    fn test_ranking_is_sorted() {
        let opts = all(30);
        for pair in opts.windows(2) {
            assert!(pair[0].rank_key() < pair[1].rank_key());
        }
    }

    #[test]
    fn test_differential_report() {
        let report = DifferentialReport::from_scores(10, 17, 10);
        assert_eq!(report.to_tie.options()[0].counts, [0, 1, 0, 0, 0]);
        // lead by one: 8 in a single play
        assert_eq!(report.to_lead.options()[0].counts, [1, 0, 0, 0, 0]);

        let ahead = DifferentialReport::from_scores(21, 14, 10);
        assert_eq!(ahead.to_tie.message(), Some(ResolveMessage::NoPointsNeeded));
        assert_eq!(ahead.to_lead.message(), Some(ResolveMessage::NoPointsNeeded));

        let tied = DifferentialReport::from_scores(7, 7, 10);
        assert_eq!(tied.to_tie.message(), Some(ResolveMessage::AlreadyTied));
        assert_eq!(tied.to_lead.message(), Some(ResolveMessage::NotReachable));
    }

    #[test]
    fn test_out_of_range_scores_are_invalid() {
        for (own, opp) in [(2_147_483_648, 1), (1, u32::MAX), (MAX_SCORE + 1, 0)] {
            let report = DifferentialReport::from_scores(own, opp, 5);
            assert_eq!(report.to_tie.message(), Some(ResolveMessage::InvalidScore));
            assert_eq!(report.to_lead.message(), Some(ResolveMessage::InvalidScore));
        }
        let edge = DifferentialReport::from_scores(0, MAX_SCORE, 1);
        assert_eq!(edge.to_tie.options().len(), 1);
    }

    #[test]
    fn test_differential_report_rejects_bad_input() {
        let report = DifferentialReport::from_raw("ten", "7", 10);
        assert_eq!(report.to_tie.message(), Some(ResolveMessage::InvalidScore));
        assert_eq!(report.to_lead.message(), Some(ResolveMessage::InvalidScore));
        assert_eq!(
            DifferentialReport::from_raw("-3", "7", 10).to_tie.message(),
            Some(ResolveMessage::InvalidScore)
        );
        assert_eq!(
            DifferentialReport::from_raw(" 3 ", "10", 10).to_tie.options()[0].counts,
            [0, 1, 0, 0, 0]
        );
    }
}
