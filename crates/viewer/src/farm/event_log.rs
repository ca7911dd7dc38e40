//! Decoder for the free-text event log attached to each snapshot.
//!
//! Matching is substring based and ordered: the soup marker is checked
//! before the climate marker, and climate keywords are tried in
//! `CLIMATE_RULES` order. The first rule that matches a line decides it.

use tracing::warn;

use super::entity::ClimateKind;
use super::location::Location;

pub const SOUP_MARKER: &str = "[SOUP]";
pub const CLIMATE_MARKER: &str = "[CLIMATE]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventRequest {
    Soup { vegetables: u32 },
    Climate { kind: ClimateKind, target: Location },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClimateTarget {
    /// Floods hit the whole factory.
    SoupFactory,
    /// The line ends with the affected location name.
    TrailingLocation,
}

#[derive(Debug, Clone, Copy)]
struct ClimateRule {
    keyword: &'static str,
    kind: ClimateKind,
    target: ClimateTarget,
}

const CLIMATE_RULES: [ClimateRule; 4] = [
    ClimateRule {
        keyword: "flood",
        kind: ClimateKind::Flood,
        target: ClimateTarget::SoupFactory,
    },
    ClimateRule {
        keyword: "fire",
        kind: ClimateKind::Fire,
        target: ClimateTarget::TrailingLocation,
    },
    ClimateRule {
        keyword: "frost",
        kind: ClimateKind::Frost,
        target: ClimateTarget::TrailingLocation,
    },
    ClimateRule {
        keyword: "heat wave",
        kind: ClimateKind::HeatWave,
        target: ClimateTarget::TrailingLocation,
    },
];

pub fn decode_events<S: AsRef<str>>(lines: &[S]) -> Vec<EventRequest> {
    lines
        .iter()
        .filter_map(|line| decode_line(line.as_ref()))
        .collect()
}

/// Decodes one log line. Unrelated or malformed lines yield `None`.
pub fn decode_line(line: &str) -> Option<EventRequest> {
    if let Some((_, rest)) = line.split_once(SOUP_MARKER) {
        return decode_soup(line, rest);
    }
    if line.contains(CLIMATE_MARKER) {
        return decode_climate(line);
    }
    None
}

fn decode_soup(line: &str, rest: &str) -> Option<EventRequest> {
    let token = rest.split_whitespace().next();
    match token.map(str::parse::<u32>) {
        Some(Ok(vegetables)) => Some(EventRequest::Soup { vegetables }),
        _ => {
            warn!(line = %line, "soup_line_without_quantity");
            None
        }
    }
}

fn decode_climate(line: &str) -> Option<EventRequest> {
    let Some(rule) = CLIMATE_RULES
        .iter()
        .find(|rule| line.contains(rule.keyword))
    else {
        warn!(line = %line, "climate_line_without_known_kind");
        return None;
    };

    let target = match rule.target {
        ClimateTarget::SoupFactory => Location::SoupFactory,
        ClimateTarget::TrailingLocation => {
            let name = line.split_whitespace().last().unwrap_or_default();
            match name.parse::<Location>() {
                Ok(location) => location,
                Err(error) => {
                    warn!(line = %line, %error, "climate_line_with_unknown_location");
                    return None;
                }
            }
        }
    };

    Some(EventRequest::Climate {
        kind: rule.kind,
        target,
    })
}
