use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{CheckError, Result};
use crate::schema::{ParsedDraw, parse_draw_result};
use crate::types::DrawListItem;

pub const DEFAULT_API_BASE: &str = "https://lotto.api.rayriffy.com";

/// Client for the public Thai lottery result API. Lives outside the prize
/// engine; the engine only ever sees the [`ParsedDraw`] it produces.
#[derive(Debug, Clone)]
pub struct LottoApi {
    client: Client,
    base_url: String,
}

impl LottoApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// `None` asks for the latest draw.
    pub fn draw_url(&self, draw_id: Option<&str>) -> String {
        match draw_id {
            Some(id) => format!("{}/lotto/{}", self.base_url, id),
            None => format!("{}/latest", self.base_url),
        }
    }

    pub fn history_url(&self, page: u32) -> String {
        format!("{}/list/{}", self.base_url, page)
    }

    pub async fn fetch_draw_payload(&self, draw_id: Option<&str>) -> Result<Value> {
        let url = self.draw_url(draw_id);
        debug!("Fetching draw result from {}", url);
        self.get_json(&url).await
    }

    pub async fn fetch_draw_result(&self, draw_id: Option<&str>) -> Result<ParsedDraw> {
        let payload = self.fetch_draw_payload(draw_id).await?;
        let parsed = parse_draw_result(&payload)?;
        info!(
            "Loaded draw {} ({} prize tiers, {} running tiers)",
            parsed.draw.date,
            parsed.draw.prize_tiers.len(),
            parsed.draw.running_tiers.len()
        );
        Ok(parsed)
    }

    pub async fn fetch_draw_history(&self, page: u32) -> Result<Vec<DrawListItem>> {
        let url = self.history_url(page);
        debug!("Fetching draw history from {}", url);
        let payload = self.get_json(&url).await?;
        parse_draw_history(payload)
    }

    async fn get_json(&self, url: &str) -> Result<Value> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CheckError::Provider(format!("{} returned {}", url, status)));
        }
        Ok(response.json().await?)
    }
}

pub fn parse_draw_history(payload: Value) -> Result<Vec<DrawListItem>> {
    if payload.get("status").and_then(Value::as_str) != Some("success") {
        return Err(CheckError::Provider(
            "draw history status is not \"success\"".to_string(),
        ));
    }
    match payload.get("response") {
        Some(items @ Value::Array(_)) => Ok(serde_json::from_value(items.clone())?),
        _ => Err(CheckError::Provider(
            "draw history response is not a list".to_string(),
        )),
    }
}
