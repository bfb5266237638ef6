use serde::de::{self, Deserializer};
use serde::Deserialize;

pub const LUCKY_PATTERNS: [&str; 7] = ["888", "999", "777", "666", "123", "456", "789"];

/// Cosmetic only: has no bearing on winnings.
pub fn is_lucky_number(ticket_number: &str) -> bool {
    LUCKY_PATTERNS
        .iter()
        .any(|pattern| ticket_number.contains(pattern))
}

/// Display filter for a list of tickets. Both conditions must hold when set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct TicketFilter {
    #[serde(default)]
    pub lucky_only: bool,
    #[serde(default, deserialize_with = "single_digit")]
    pub last_digit: Option<char>,
}

/// An empty string means no last-digit filter.
fn single_digit<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<char>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_digit() => Ok(Some(c)),
                _ => Err(de::Error::custom("last_digit must be a single digit")),
            }
        }
    }
}

impl TicketFilter {
    pub fn keeps(&self, ticket_number: &str) -> bool {
        if self.lucky_only && !is_lucky_number(ticket_number) {
            return false;
        }
        match self.last_digit {
            Some(digit) => ticket_number.ends_with(digit),
            None => true,
        }
    }

    pub fn apply<S: AsRef<str>>(&self, ticket_numbers: &[S]) -> Vec<String> {
        ticket_numbers
            .iter()
            .map(AsRef::as_ref)
            .filter(|t| self.keeps(t))
            .map(str::to_string)
            .collect()
    }
}
