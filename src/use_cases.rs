use anyhow::Result;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;

use crate::api::LottoApi;
use crate::batch::{BatchSummary, check_prizes_batch};
use crate::engine::check_prize;
use crate::lucky::{TicketFilter, is_lucky_number};
use crate::schema::{ParsedDraw, parse_draw_result};
use crate::utils::{format_draw_date_english, format_ticket_display};

/// Resolves the draw a check runs against: an inline provider payload when the
/// caller passes `raw_json`, otherwise `draw_id` (or the latest draw) from the API.
async fn resolve_draw(api: &LottoApi, arguments: &HashMap<String, Value>) -> Result<ParsedDraw> {
    if let Some(raw_json) = arguments.get("raw_json").and_then(|v| v.as_str()) {
        let payload: Value = serde_json::from_str(raw_json)?;
        return Ok(parse_draw_result(&payload)?);
    }
    let draw_id = arguments.get("draw_id").and_then(|v| v.as_str());
    Ok(api.fetch_draw_result(draw_id).await?)
}

fn string_list(arguments: &HashMap<String, Value>, key: &str) -> Result<Vec<String>> {
    let value = arguments
        .get(key)
        .ok_or_else(|| anyhow::anyhow!("Missing {} parameter", key))?;
    serde_json::from_value(value.clone())
        .map_err(|e| anyhow::anyhow!("{} must be an array of strings: {}", key, e))
}

pub struct CheckUseCase {
    api: Arc<LottoApi>,
}

impl CheckUseCase {
    pub fn new(api: Arc<LottoApi>) -> Self {
        Self { api }
    }

    pub async fn check_prize(&self, arguments: &HashMap<String, Value>) -> Result<String> {
        let ticket_number = arguments
            .get("ticket_number")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow::anyhow!("Missing ticket_number parameter"))?;

        let parsed = resolve_draw(&self.api, arguments).await?;
        let result = check_prize(ticket_number, &parsed.draw);

        Ok(json!({
            "success": true,
            "result": result,
            "drawDateEnglish": format_draw_date_english(&parsed.draw.date),
            "warnings": parsed.warnings
        })
        .to_string())
    }

    pub async fn check_prizes_batch(&self, arguments: &HashMap<String, Value>) -> Result<String> {
        let ticket_numbers = string_list(arguments, "ticket_numbers")?;

        let parsed = resolve_draw(&self.api, arguments).await?;
        let results = check_prizes_batch(&ticket_numbers, Arc::new(parsed.draw)).await;
        let summary = BatchSummary::from_results(&results);

        Ok(json!({
            "success": true,
            "summary": summary,
            "results": results,
            "warnings": parsed.warnings
        })
        .to_string())
    }
}

pub struct TicketUseCase;

impl TicketUseCase {
    pub fn new() -> Self {
        Self
    }

    pub async fn is_lucky_number(&self, arguments: &HashMap<String, Value>) -> Result<String> {
        let ticket_number = arguments
            .get("ticket_number")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow::anyhow!("Missing ticket_number parameter"))?;

        Ok(json!({
            "success": true,
            "ticket_number": ticket_number,
            "display": format_ticket_display(ticket_number),
            "lucky": is_lucky_number(ticket_number)
        })
        .to_string())
    }

    pub async fn filter_tickets(&self, arguments: &HashMap<String, Value>) -> Result<String> {
        let ticket_numbers = string_list(arguments, "ticket_numbers")?;

        let filter: TicketFilter = serde_json::from_value(serde_json::to_value(arguments)?)
            .map_err(|e| anyhow::anyhow!("Invalid filter: {}", e))?;
        let tickets = filter.apply(&ticket_numbers);

        Ok(json!({
            "success": true,
            "total": ticket_numbers.len(),
            "filtered": tickets.len(),
            "tickets": tickets
        })
        .to_string())
    }
}

impl Default for TicketUseCase {
    fn default() -> Self {
        Self::new()
    }
}

pub struct DrawUseCase {
    api: Arc<LottoApi>,
}

impl DrawUseCase {
    pub fn new(api: Arc<LottoApi>) -> Self {
        Self { api }
    }

    pub async fn get_draw_result(&self, arguments: &HashMap<String, Value>) -> Result<String> {
        let parsed = resolve_draw(&self.api, arguments).await?;
        let date_english = format_draw_date_english(&parsed.draw.date);

        Ok(json!({
            "success": true,
            "result": parsed.draw,
            "drawDateEnglish": date_english,
            "warnings": parsed.warnings
        })
        .to_string())
    }

    pub async fn get_draw_history(&self, arguments: &HashMap<String, Value>) -> Result<String> {
        let page = match arguments.get("page").and_then(|v| v.as_u64()) {
            Some(p) => u32::try_from(p)
                .map_err(|_| anyhow::anyhow!("page {} is out of range", p))?,
            None => 1,
        };

        let draws = self.api.fetch_draw_history(page).await?;
        let draws: Vec<Value> = draws
            .into_iter()
            .map(|d| {
                let date_english = format_draw_date_english(&d.date);
                json!({
                    "id": d.id,
                    "url": d.url,
                    "date": d.date,
                    "dateEnglish": date_english
                })
            })
            .collect();

        Ok(json!({
            "success": true,
            "page": page,
            "results": draws
        })
        .to_string())
    }
}
