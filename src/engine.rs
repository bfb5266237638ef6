use crate::error::Result;
use crate::matcher::Tier;
use crate::types::{DrawResult, PriceCheckResult, TicketNumber};

/// Runs every exact-match tier, then every running tier, in draw order and
/// records each hit. A ticket may win several tiers at once.
pub fn evaluate(ticket: &TicketNumber, draw: &DrawResult) -> PriceCheckResult {
    let mut result = PriceCheckResult::new(ticket.as_str(), draw);

    let tiers = draw
        .prize_tiers
        .iter()
        .map(|t| t as &dyn Tier)
        .chain(draw.running_tiers.iter().map(|t| t as &dyn Tier));

    for tier in tiers {
        if tier.matches(ticket) {
            result.record(tier.to_matched());
        }
    }

    result
}

/// Validates `ticket_number` first; a malformed number never reaches the engine.
pub fn try_check_prize(ticket_number: &str, draw: &DrawResult) -> Result<PriceCheckResult> {
    let ticket = TicketNumber::parse(ticket_number)?;
    Ok(evaluate(&ticket, draw))
}

/// Like [`try_check_prize`], but a validation failure is reported in the
/// result's `error` field instead.
pub fn check_prize(ticket_number: &str, draw: &DrawResult) -> PriceCheckResult {
    try_check_prize(ticket_number, draw)
        .unwrap_or_else(|e| PriceCheckResult::failed(ticket_number, draw, e))
}
