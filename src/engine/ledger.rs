//! Per-side play log with down/distance/field-position auto-progression.
//!
//! Every operation takes a snapshot and returns a new one; nothing is
//! mutated behind the caller's back. Incomplete rows are normal here and
//! unknown values simply drop out of the arithmetic.

use super::field::{self, to_absolute};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rows per side when no capacity is configured.
pub const DEFAULT_CAPACITY: usize = 75;

/// Yards to gain on a fresh set of downs.
pub const FIRST_DOWN_DISTANCE: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Offense,
    Defense,
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "offense" | "o" => Ok(Side::Offense),
            "def" | "defense" | "d" => Ok(Side::Defense),
            other => Err(format!("unknown side '{}'", other)),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Offense => f.write_str("offense"),
            Side::Defense => f.write_str("defense"),
        }
    }
}

/// Result of a snap: yards, or a change of possession entered by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gain {
    Yards(i32),
    Interception,
    Turnover,
}

impl Gain {
    pub fn is_turnover(&self) -> bool {
        matches!(self, Gain::Interception | Gain::Turnover)
    }

    pub fn yards(&self) -> Option<i32> {
        match self {
            Gain::Yards(y) => Some(*y),
            _ => None,
        }
    }

    /// Parse a gain cell. "INT" and "TO" (and spelled-out forms) are the
    /// turnover markers; anything else non-numeric is unknown.
    pub fn parse(raw: &str) -> Option<Gain> {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "int" | "interception" | "pick" => Some(Gain::Interception),
            "to" | "turnover" | "fumble" | "fum" => Some(Gain::Turnover),
            _ => trimmed
                .strip_prefix('+')
                .unwrap_or(trimmed)
                .parse()
                .ok()
                .map(Gain::Yards),
        }
    }
}

impl fmt::Display for Gain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gain::Yards(y) => write!(f, "{}", y),
            Gain::Interception => f.write_str("INT"),
            Gain::Turnover => f.write_str("TO"),
        }
    }
}

/// One row of a side's possession log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayRecord {
    /// Signed yard line before the snap; only resolvable values are stored.
    pub yard_line: Option<i32>,
    pub down: Option<i32>,
    pub distance: Option<i32>,
    pub call_text: String,
    pub gain: Option<Gain>,
    pub new_drive: bool,
}

impl PlayRecord {
    pub fn is_empty(&self) -> bool {
        self.yard_line.is_none()
            && self.down.is_none()
            && self.distance.is_none()
            && self.call_text.trim().is_empty()
            && self.gain.is_none()
            && !self.new_drive
    }

    fn absolute(&self) -> Option<i32> {
        self.yard_line.and_then(to_absolute)
    }

    fn apply(&mut self, edit: FieldEdit) {
        match edit {
            FieldEdit::YardLine(v) => self.yard_line = v.filter(|y| to_absolute(*y).is_some()),
            FieldEdit::Down(v) => self.down = v.filter(|d| (1..=4).contains(d)),
            FieldEdit::Distance(v) => self.distance = v.filter(|d| *d >= 0),
            FieldEdit::CallText(text) => self.call_text = text,
            FieldEdit::Gain(g) => self.gain = g,
            FieldEdit::NewDrive(flag) => self.new_drive = flag,
        }
        if self.new_drive {
            self.down = Some(1);
            self.distance = Some(FIRST_DOWN_DISTANCE);
        }
    }
}

/// Editable cells of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    YardLine,
    Down,
    Distance,
    CallText,
    Gain,
    NewDrive,
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yard" | "yardline" | "yard_line" | "yl" => Ok(Field::YardLine),
            "down" | "dn" => Ok(Field::Down),
            "distance" | "dist" => Ok(Field::Distance),
            "call" | "calltext" | "call_text" | "play" => Ok(Field::CallText),
            "gain" | "result" => Ok(Field::Gain),
            "newdrive" | "new_drive" | "nd" => Ok(Field::NewDrive),
            other => Err(format!("unknown field '{}'", other)),
        }
    }
}

/// A typed cell edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldEdit {
    YardLine(Option<i32>),
    Down(Option<i32>),
    Distance(Option<i32>),
    CallText(String),
    Gain(Option<Gain>),
    NewDrive(bool),
}

impl FieldEdit {
    /// Build an edit from raw cell text. Malformed numbers become "unknown".
    pub fn parse(field: Field, raw: &str) -> FieldEdit {
        match field {
            Field::YardLine => FieldEdit::YardLine(field::parse_yard_line(raw)),
            Field::Down => FieldEdit::Down(parse_down(raw)),
            Field::Distance => FieldEdit::Distance(raw.trim().parse().ok()),
            Field::CallText => FieldEdit::CallText(raw.trim().to_string()),
            Field::Gain => FieldEdit::Gain(Gain::parse(raw)),
            Field::NewDrive => FieldEdit::NewDrive(matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "y" | "on" | "x"
            )),
        }
    }

    pub fn field(&self) -> Field {
        match self {
            FieldEdit::YardLine(_) => Field::YardLine,
            FieldEdit::Down(_) => Field::Down,
            FieldEdit::Distance(_) => Field::Distance,
            FieldEdit::CallText(_) => Field::CallText,
            FieldEdit::Gain(_) => Field::Gain,
            FieldEdit::NewDrive(_) => Field::NewDrive,
        }
    }
}

fn parse_down(raw: &str) -> Option<i32> {
    let lower = raw.trim().to_ascii_lowercase();
    let digits = lower
        .trim_end_matches("st")
        .trim_end_matches("nd")
        .trim_end_matches("rd")
        .trim_end_matches("th");
    digits.parse().ok().filter(|d| (1..=4).contains(d))
}

// ── Pure row-sequence operations ─────────────────────────────────────

/// Infer each row's gain from where the next snap starts.
///
/// A row is rewritten only when its gain is empty or numeric, and both it
/// and its successor have resolvable yard lines with the successor not
/// opening a new drive. Every other row keeps what the user entered.
pub fn recompute_gains(records: &[PlayRecord]) -> Vec<PlayRecord> {
    let mut out = records.to_vec();
    for i in 0..out.len().saturating_sub(1) {
        if out[i].gain.is_some_and(|g| g.is_turnover()) {
            continue;
        }
        let next = &records[i + 1];
        if next.new_drive {
            continue;
        }
        if let (Some(from), Some(to)) = (records[i].absolute(), next.absolute()) {
            out[i].gain = Some(Gain::Yards(to - from));
        }
    }
    out
}

/// Push the consequences of row `index` into row `index + 1` only.
///
/// Down and distance of the next row are always re-derived; its yard line
/// is filled only when blank. A next row that opens a new drive is left
/// alone, as is everything further down the log.
pub fn cascade(records: &[PlayRecord], index: usize) -> Vec<PlayRecord> {
    let mut out = records.to_vec();
    let Some(current) = records.get(index) else {
        return out;
    };
    let Some(next) = out.get_mut(index + 1) else {
        return out;
    };
    if next.new_drive {
        return out;
    }
    let Some(gain) = current.gain else {
        return out;
    };

    let yards = match gain {
        Gain::Yards(y) => y,
        Gain::Interception | Gain::Turnover => {
            next.down = Some(1);
            next.distance = Some(FIRST_DOWN_DISTANCE);
            return out;
        }
    };

    if let Some(distance) = current.distance {
        if current.down == Some(4) && yards < distance {
            // turnover on downs: new possession, spot is up to the user
            next.down = Some(1);
            next.distance = Some(FIRST_DOWN_DISTANCE);
            return out;
        }
        if yards >= distance {
            next.down = Some(1);
            next.distance = Some(FIRST_DOWN_DISTANCE);
        } else if let (Some(down), Some(left)) = (current.down, distance.checked_sub(yards)) {
            next.down = Some(down + 1);
            next.distance = Some(left);
        }
    }

    if next.yard_line.is_none() {
        next.yard_line = current.yard_line.and_then(|y| field::advance(y, yards));
    }
    out
}

// ── Ledger ───────────────────────────────────────────────────────────

/// Fixed-capacity play logs for both sides of the ball.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveLedger {
    offense: Vec<PlayRecord>,
    defense: Vec<PlayRecord>,
}

impl Default for DriveLedger {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl DriveLedger {
    pub fn new(capacity: usize) -> Self {
        Self {
            offense: vec![PlayRecord::default(); capacity],
            defense: vec![PlayRecord::default(); capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.offense.len()
    }

    pub fn records(&self, side: Side) -> &[PlayRecord] {
        match side {
            Side::Offense => &self.offense,
            Side::Defense => &self.defense,
        }
    }

    pub fn record(&self, side: Side, index: usize) -> Option<&PlayRecord> {
        self.records(side).get(index)
    }

    fn with_side(&self, side: Side, records: Vec<PlayRecord>) -> Self {
        let mut next = self.clone();
        match side {
            Side::Offense => next.offense = records,
            Side::Defense => next.defense = records,
        }
        next
    }

    /// Apply one cell edit, re-infer gains, then cascade into the next row.
    #[must_use]
    pub fn set_field(&self, side: Side, index: usize, edit: FieldEdit) -> Self {
        if index >= self.capacity() {
            tracing::warn!(%side, index, capacity = self.capacity(), "edit outside ledger ignored");
            return self.clone();
        }
        tracing::debug!(%side, index, field = ?edit.field(), "ledger edit");
        let mut records = self.records(side).to_vec();
        records[index].apply(edit);
        self.with_side(side, records)
            .recompute_gains(side)
            .cascade(side, index)
    }

    #[must_use]
    pub fn recompute_gains(&self, side: Side) -> Self {
        self.with_side(side, recompute_gains(self.records(side)))
    }

    #[must_use]
    pub fn cascade(&self, side: Side, index: usize) -> Self {
        self.with_side(side, cascade(self.records(side), index))
    }

    /// Reset every row of one side; capacity is unchanged.
    #[must_use]
    pub fn clear(&self, side: Side) -> Self {
        tracing::info!(%side, "ledger cleared");
        self.with_side(side, vec![PlayRecord::default(); self.capacity()])
    }
}
