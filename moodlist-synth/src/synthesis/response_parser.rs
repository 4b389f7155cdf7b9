//! Model response parsing
//!
//! Turns free-form model text into ordered (title, artist) candidates.
//!
//! # Strategy Chain
//! The primary pass reads numbered lines, trying per line (first match wins):
//! 1. `N. Title - Artist` (hyphen or en dash)
//! 2. `N. Title by Artist`
//! 3. `N. Artist: Title`
//!
//! Only when the primary pass yields nothing are the fallbacks tried, in
//! order, stopping at the first that yields at least one candidate:
//! - single-hyphen lines (`Title - Artist`, no parentheses or quotes)
//! - `"Title" by Artist` lines
//! - `song:`/`title:` + `artist:` labelled blocks
//! - an embedded JSON array of `{title, artist}` objects

use crate::types::Candidate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static NUMBERED_DASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+[.)]\s*(.+)\s+[-–]\s+(.+)$").expect("valid regex"));
static NUMBERED_BY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\d+[.)]\s*(.+)\s+by\s+(.+)$").expect("valid regex"));
static NUMBERED_COLON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+[.)]\s*([^:]+?)\s*:\s*(.+)$").expect("valid regex"));
static QUOTED_BY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)^[-*•\s]*["“](.+?)["”]\s+by\s+(.+)$"#).expect("valid regex"));
static UNQUOTED_BY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[-*•\s]*(.+)\s+by\s+(.+)$").expect("valid regex"));
static LABELLED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)^[-*•\s]*["']?(song|title|artist)["']?\s*:\s*(.+)$"#).expect("valid regex")
});

/// Strategy that produced a parse result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    Numbered,
    SingleHyphen,
    ByLine,
    KeyValueBlock,
    JsonArray,
}

/// Candidates plus the strategy that found them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    pub candidates: Vec<Candidate>,
    /// `None` when every strategy came up empty
    pub strategy: Option<ParseStrategy>,
}

type Strategy = fn(&str) -> Vec<Candidate>;

const FALLBACKS: [(ParseStrategy, Strategy); 4] = [
    (ParseStrategy::SingleHyphen, parse_single_hyphen),
    (ParseStrategy::ByLine, parse_by_lines),
    (ParseStrategy::KeyValueBlock, parse_labelled_blocks),
    (ParseStrategy::JsonArray, parse_json_array),
];

/// Parse model text into candidates, possibly none
pub fn parse(text: &str) -> Vec<Candidate> {
    parse_with_strategy(text).candidates
}

/// Parse model text, reporting which strategy matched
pub fn parse_with_strategy(text: &str) -> ParseOutcome {
    let primary = parse_numbered(text);
    if !primary.is_empty() {
        return ParseOutcome {
            candidates: primary,
            strategy: Some(ParseStrategy::Numbered),
        };
    }

    FALLBACKS
        .iter()
        .find_map(|(strategy, run)| {
            let candidates = run(text);
            (!candidates.is_empty()).then_some(ParseOutcome {
                candidates,
                strategy: Some(*strategy),
            })
        })
        .unwrap_or_default()
}

/// Trim whitespace plus wrapping quotes and markdown emphasis
fn clean(field: &str) -> String {
    field
        .trim()
        .trim_matches(|c| matches!(c, '"' | '“' | '”' | '*' | '_'))
        .trim()
        .to_string()
}

fn candidate(title: &str, artist: &str) -> Option<Candidate> {
    let title = clean(title);
    let artist = clean(artist);
    if title.is_empty() || artist.is_empty() {
        return None;
    }
    Some(Candidate::new(title, artist))
}

fn lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty())
}

fn parse_numbered(text: &str) -> Vec<Candidate> {
    lines(text).filter_map(parse_numbered_line).collect()
}

fn parse_numbered_line(line: &str) -> Option<Candidate> {
    if let Some(caps) = NUMBERED_DASH.captures(line) {
        if let Some(c) = candidate(&caps[1], &caps[2]) {
            return Some(c);
        }
    }
    if let Some(caps) = NUMBERED_BY.captures(line) {
        if let Some(c) = candidate(&caps[1], &caps[2]) {
            return Some(c);
        }
    }
    // Artist first
    NUMBERED_COLON
        .captures(line)
        .and_then(|caps| candidate(&caps[2], &caps[1]))
}

fn parse_single_hyphen(text: &str) -> Vec<Candidate> {
    lines(text)
        .filter(|line| line.matches(" - ").count() == 1)
        .filter(|line| !line.contains(['(', ')', '"', '“', '”']))
        .filter_map(|line| {
            let (title, artist) = line.split_once(" - ")?;
            let title = title.trim_start_matches(['-', '*', '•', ' ']);
            candidate(title, artist)
        })
        .collect()
}

fn parse_by_lines(text: &str) -> Vec<Candidate> {
    lines(text)
        .filter_map(|line| {
            QUOTED_BY
                .captures(line)
                .or_else(|| UNQUOTED_BY.captures(line))
                .and_then(|caps| candidate(&caps[1], &caps[2]))
        })
        .collect()
}

fn parse_labelled_blocks(text: &str) -> Vec<Candidate> {
    let mut found = Vec::new();
    let mut title: Option<String> = None;
    let mut artist: Option<String> = None;

    for line in lines(text) {
        let Some(caps) = LABELLED.captures(line) else {
            continue;
        };
        let value = clean(&caps[2]).trim_end_matches(',').trim().to_string();
        let value = clean(&value);
        if value.is_empty() {
            continue;
        }
        if caps[1].eq_ignore_ascii_case("artist") {
            artist = Some(value);
        } else {
            title = Some(value);
        }

        if let (Some(t), Some(a)) = (&title, &artist) {
            found.push(Candidate::new(t.clone(), a.clone()));
            title = None;
            artist = None;
        }
    }

    found
}

fn parse_json_array(text: &str) -> Vec<Candidate> {
    let (Some(start), Some(end)) = (text.find('['), text.rfind(']')) else {
        return Vec::new();
    };
    if end <= start {
        return Vec::new();
    }

    let Ok(items) = serde_json::from_str::<Vec<Value>>(&text[start..=end]) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let object = item.as_object()?;
            let title = object
                .get("title")
                .or_else(|| object.get("song"))
                .and_then(Value::as_str)?;
            let artist = object.get("artist").and_then(Value::as_str)?;
            candidate(title, artist)
        })
        .collect()
}
