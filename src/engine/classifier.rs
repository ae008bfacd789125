//! Dictionary matching over free-text play calls.
//!
//! Both the call text and every dictionary entry go through [`normalize`],
//! then entries are matched as whole-word substrings of the call.

/// Lowercase, turn punctuation into spaces, collapse whitespace and expand
/// common sideline shorthand ("rt" -> "right", "dbl" -> "double").
pub fn normalize(text: &str) -> String {
    let spaced: String = text
        .chars()
        .flat_map(|c| {
            let keep = c.is_alphanumeric();
            c.to_lowercase().map(move |l| if keep { l } else { ' ' })
        })
        .collect();

    spaced
        .split_whitespace()
        .map(expand_abbreviation)
        .collect::<Vec<_>>()
        .join(" ")
}

fn expand_abbreviation(word: &str) -> &str {
    match word {
        "rt" | "rgt" | "rght" => "right",
        "lt" | "lft" => "left",
        "dbl" | "dub" => "double",
        "dbls" | "dubs" => "doubles",
        _ => word,
    }
}

/// Whole-word containment: "trips right" matches "trips right up" but
/// "go" does not match "cargo".
fn contains_phrase(haystack_padded: &str, needle: &str) -> bool {
    haystack_padded.contains(&format!(" {} ", needle))
}

#[derive(Debug, Clone)]
struct Entry {
    label: String,
    normalized: String,
}

fn prepare(labels: &[String]) -> Vec<Entry> {
    labels
        .iter()
        .map(|label| Entry {
            label: label.trim().to_string(),
            normalized: normalize(label),
        })
        .filter(|e| !e.normalized.is_empty())
        .collect()
}

/// Extracts a formation and play names from a play call.
///
/// Dictionaries are static configuration; duplicates are tolerated.
#[derive(Debug, Clone)]
pub struct PlayTextClassifier {
    /// Sorted longest normalized form first.
    formations: Vec<Entry>,
    /// Dictionary order.
    plays: Vec<Entry>,
}

impl PlayTextClassifier {
    pub fn new(formations: &[String], plays: &[String]) -> Self {
        let mut formations = prepare(formations);
        // stable: equal lengths keep dictionary order
        formations.sort_by(|a, b| b.normalized.len().cmp(&a.normalized.len()));
        Self {
            formations,
            plays: prepare(plays),
        }
    }

    /// The most specific formation named in `text`, if any.
    pub fn detect_formation(&self, text: &str) -> Option<&str> {
        let padded = format!(" {} ", normalize(text));
        self.formations
            .iter()
            .find(|e| contains_phrase(&padded, &e.normalized))
            .map(|e| e.label.as_str())
    }

    /// Every play concept named in `text`, deduplicated by normalized form,
    /// in dictionary order.
    pub fn detect_plays(&self, text: &str) -> Vec<&str> {
        let padded = format!(" {} ", normalize(text));
        let mut seen: Vec<&str> = Vec::new();
        let mut out = Vec::new();
        for entry in &self.plays {
            if seen.contains(&entry.normalized.as_str()) {
                continue;
            }
            if contains_phrase(&padded, &entry.normalized) {
                seen.push(entry.normalized.as_str());
                out.push(entry.label.as_str());
            }
        }
        out
    }
}
