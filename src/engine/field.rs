//! Field position conversions.
//!
//! Yard lines are written relative to the half of the field the ball is on:
//! own territory negative (`-25` = own 25), opponent territory positive
//! (`+25` = their 25), midfield `50`. Gains only add up on a single monotonic
//! scale, so arithmetic goes through an absolute 0-100 coordinate measured
//! from our own goal line.

/// Convert a signed yard line to the absolute 0-100 scale.
///
/// Returns `None` for `0` (ambiguous) and anything outside `-50..=50`.
/// Both `-50` and `50` are midfield.
pub fn to_absolute(signed: i32) -> Option<i32> {
    match signed {
        0 => None,
        -50..=-1 => Some(-signed),
        50 => Some(50),
        1..=49 => Some(100 - signed),
        _ => None,
    }
}

/// Inverse of [`to_absolute`]. Positions on or past either goal line
/// (a score or a touchback) have no signed form and return `None`.
pub fn from_absolute(absolute: i32) -> Option<i32> {
    match absolute {
        1..=49 => Some(-absolute),
        50 => Some(50),
        51..=99 => Some(100 - absolute),
        _ => None,
    }
}

/// Parse a yard-line cell ("-25", "+30", "50").
///
/// Anything that does not resolve to a field position is `None`.
pub fn parse_yard_line(raw: &str) -> Option<i32> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let value: i32 = digits.parse().ok()?;
    to_absolute(value).map(|_| value)
}

/// Advance a signed yard line by `gain` yards. `None` when the start is
/// unknown or the ball ends up in an end zone.
pub fn advance(signed: i32, gain: i32) -> Option<i32> {
    let start = to_absolute(signed)?;
    from_absolute(start.checked_add(gain)?)
}
