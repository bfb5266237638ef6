use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::CheckError;

pub const TICKET_LENGTH: usize = 6;

/// A six-digit ticket number. Leading zeros are significant, so the value is
/// kept as text and never converted to an integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TicketNumber(String);

impl TicketNumber {
    pub fn parse(raw: &str) -> Result<Self, CheckError> {
        if raw.len() == TICKET_LENGTH && raw.bytes().all(|b| b.is_ascii_digit()) {
            Ok(TicketNumber(raw.to_string()))
        } else {
            Err(CheckError::Validation {
                number: raw.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First `len` digits. `len` is clamped to the ticket length.
    pub fn prefix(&self, len: usize) -> &str {
        &self.0[..len.min(TICKET_LENGTH)]
    }

    /// Last `len` digits. `len` is clamped to the ticket length.
    pub fn suffix(&self, len: usize) -> &str {
        &self.0[TICKET_LENGTH - len.min(TICKET_LENGTH)..]
    }
}

impl FromStr for TicketNumber {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TicketNumber::parse(s)
    }
}

impl TryFrom<String> for TicketNumber {
    type Error = CheckError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TicketNumber::parse(&value)
    }
}

impl From<TicketNumber> for String {
    fn from(value: TicketNumber) -> Self {
        value.0
    }
}

impl AsRef<str> for TicketNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a running-number tier slices the ticket before the membership test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchRule {
    #[serde(rename = "prefix-3")]
    Prefix3,
    #[serde(rename = "suffix-3")]
    Suffix3,
    #[serde(rename = "suffix-2")]
    Suffix2,
}

impl MatchRule {
    pub fn width(self) -> usize {
        match self {
            MatchRule::Prefix3 | MatchRule::Suffix3 => 3,
            MatchRule::Suffix2 => 2,
        }
    }

    pub fn slice(self, ticket: &TicketNumber) -> &str {
        match self {
            MatchRule::Prefix3 => ticket.prefix(self.width()),
            MatchRule::Suffix3 | MatchRule::Suffix2 => ticket.suffix(self.width()),
        }
    }
}

/// Exact-match tier: the whole ticket must equal one of `numbers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrizeTier {
    pub id: String,
    pub name: String,
    pub reward: f64,
    pub numbers: BTreeSet<String>,
}

/// Partial-match tier keyed on a prefix or suffix slice of the ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunningTier {
    pub id: String,
    pub name: String,
    pub reward: f64,
    pub numbers: BTreeSet<String>,
    pub match_rule: MatchRule,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawResult {
    pub date: String,
    pub endpoint: String,
    pub prize_tiers: Vec<PrizeTier>,
    pub running_tiers: Vec<RunningTier>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedTier {
    pub id: String,
    pub name: String,
    pub reward: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceCheckResult {
    pub ticket_number: String,
    pub matched_tiers: Vec<MatchedTier>,
    pub total_winning: f64,
    pub draw_date: String,
    pub draw_endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PriceCheckResult {
    pub fn new(ticket_number: &str, draw: &DrawResult) -> Self {
        Self {
            ticket_number: ticket_number.to_string(),
            matched_tiers: Vec::new(),
            total_winning: 0.0,
            draw_date: draw.date.clone(),
            draw_endpoint: draw.endpoint.clone(),
            error: None,
        }
    }

    /// A result that was never evaluated. Carries no tiers and zero winnings.
    pub fn failed(ticket_number: &str, draw: &DrawResult, error: impl fmt::Display) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::new(ticket_number, draw)
        }
    }

    pub fn record(&mut self, tier: MatchedTier) {
        self.total_winning += tier.reward;
        self.matched_tiers.push(tier);
    }

    pub fn is_winner(&self) -> bool {
        self.error.is_none() && self.total_winning > 0.0
    }
}

/// Entry of the provider's paged draw history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawListItem {
    pub id: String,
    pub url: String,
    pub date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierWarningKind {
    UnrecognizedRule,
    NumbersNotSequence,
    ZeroReward,
}

impl fmt::Display for TierWarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TierWarningKind::UnrecognizedRule => "running tier id matches no known rule",
            TierWarningKind::NumbersNotSequence => "number list is not a sequence of strings",
            TierWarningKind::ZeroReward => "tier pays no reward",
        };
        f.write_str(text)
    }
}

/// A tier the adapter skipped without failing the whole draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierWarning {
    pub tier_id: String,
    pub kind: TierWarningKind,
}
