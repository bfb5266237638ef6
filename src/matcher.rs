use crate::types::{MatchedTier, PrizeTier, RunningTier, TicketNumber};

/// A prize category a ticket can be tested against.
pub trait Tier {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn reward(&self) -> f64;
    fn matches(&self, ticket: &TicketNumber) -> bool;

    fn to_matched(&self) -> MatchedTier {
        MatchedTier {
            id: self.id().to_string(),
            name: self.name().to_string(),
            reward: self.reward(),
        }
    }
}

impl Tier for PrizeTier {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn reward(&self) -> f64 {
        self.reward
    }

    fn matches(&self, ticket: &TicketNumber) -> bool {
        self.numbers.contains(ticket.as_str())
    }
}

impl Tier for RunningTier {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn reward(&self) -> f64 {
        self.reward
    }

    fn matches(&self, ticket: &TicketNumber) -> bool {
        self.numbers.contains(self.match_rule.slice(ticket))
    }
}

pub fn matches<T: Tier + ?Sized>(ticket: &TicketNumber, tier: &T) -> bool {
    tier.matches(ticket)
}
